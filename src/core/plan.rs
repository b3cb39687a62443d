//! Relocation plan — total mapping from every discovered old path to its
//! new path.
//!
//! Construction seeds the plan with the explicit moves from the plan file,
//! then walks the source root and identity-maps every `.c`/`.h` file not
//! already listed. The resolver in `core::include` relies on this totality:
//! a file that did not move still has an entry, so "unmapped" never needs a
//! separate case.

use crate::descriptor::DescriptorSpec;
use crate::error::{Error, Result};
use crate::relpath;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed contents of a relocation plan file.
#[derive(Debug, Clone, Deserialize)]
pub struct RelocationSpec {
    /// Explicit old → new moves, both relative to the root.
    pub moves: BTreeMap<String, String>,
    /// Optional build descriptor patching configuration.
    #[serde(default)]
    pub descriptor: Option<DescriptorSpec>,
}

/// Total old → new mapping over the discovered file set.
#[derive(Debug, Clone)]
pub struct RelocationPlan {
    entries: BTreeMap<String, String>,
}

impl RelocationPlan {
    /// Build a plan from explicit moves plus auto-discovery under `root`.
    ///
    /// Rejects two old paths relocating to the same new path — writing such
    /// a plan would silently overwrite one file with the other.
    pub fn new(moves: &BTreeMap<String, String>, root: &Path) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (old, new) in moves {
            entries.insert(relpath::normalize(old), relpath::normalize(new));
        }

        for file in discover_files(root) {
            entries.entry(file.clone()).or_insert(file);
        }

        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for (old, new) in &entries {
            if let Some(first) = seen.insert(new.as_str(), old.as_str()) {
                return Err(Error::PlanCollision {
                    first: first.to_string(),
                    second: old.clone(),
                    target: new.clone(),
                });
            }
        }

        Ok(RelocationPlan { entries })
    }

    /// Look up the new path for an old path. `None` means the path is not
    /// part of the reorganized set.
    pub fn new_path(&self, old_path: &str) -> Option<&str> {
        self.entries.get(old_path).map(String::as_str)
    }

    pub fn contains(&self, old_path: &str) -> bool {
        self.entries.contains_key(old_path)
    }

    /// All entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, n)| (o.as_str(), n.as_str()))
    }

    /// Entries whose path actually changes.
    pub fn moves(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries().filter(|(o, n)| o != n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walk `root` and collect every `.c`/`.h` file as a root-relative path.
fn discover_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    walk_recursive(root, root, &mut files);
    files.sort();
    files
}

fn walk_recursive(dir: &Path, root: &Path, files: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk_recursive(&path, root, files);
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if matches!(ext, "c" | "h") {
                let relative = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                files.push(relative);
            }
        }
    }
}
