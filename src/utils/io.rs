//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents, tagging failures with the operation name.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(e, operation))
}

/// Write content to a file, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(e, format!("{} (mkdir)", operation)))?;
    }
    fs::write(path, content).map_err(|e| Error::io(e, operation))
}

/// Append content to an existing file without rewriting it.
pub fn append_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    use std::io::Write;

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| Error::io(e, format!("{} (open)", operation)))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(e, operation))
}
