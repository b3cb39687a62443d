//! Tree relocation pipeline.
//!
//! `generate` builds the entire new tree in memory (reading every plan
//! entry and rewriting its includes) without touching disk. `apply`
//! materializes it under a sibling staging directory, and only once every
//! file is written does it move the original root aside and promote the
//! staging directory in its place. A failure at any point before the swap
//! leaves the original tree untouched.

use crate::descriptor::{self, DescriptorSpec, PatchReport, Substitution};
use crate::error::{Error, Result};
use crate::include;
use crate::io;
use crate::log_status;
use crate::plan::{RelocationPlan, RelocationSpec};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One relocated file and how many of its includes were rewritten.
#[derive(Debug, Clone, Serialize)]
pub struct FileMove {
    pub old_path: String,
    pub new_path: String,
    pub rewrites: usize,
}

/// The full result of a relocation generate pass.
#[derive(Debug)]
pub struct RelocationResult {
    /// Every plan entry, identity moves included.
    pub files: Vec<FileMove>,
    /// New path → rewritten content.
    pub contents: BTreeMap<String, String>,
    /// Descriptor patch outcome, when the plan configures one.
    pub descriptor: Option<PatchReport>,
    descriptor_path: Option<PathBuf>,
    /// Whether changes were written to disk.
    pub applied: bool,
}

/// Read and rewrite every file in the plan. No writes.
pub fn generate(spec: &RelocationSpec, root: &Path) -> Result<RelocationResult> {
    let plan = RelocationPlan::new(&spec.moves, root)?;

    let mut files = Vec::new();
    let mut contents = BTreeMap::new();
    for (old, new) in plan.entries() {
        let content = io::read_file(&root.join(old), &format!("read {}", old))?;
        let (content, rewrites) = include::rewrite_includes(&plan, old, new, &content);
        files.push(FileMove {
            old_path: old.to_string(),
            new_path: new.to_string(),
            rewrites,
        });
        contents.insert(new.to_string(), content);
    }

    let (descriptor, descriptor_path) = match &spec.descriptor {
        Some(dspec) => {
            let path = root.join(&dspec.path);
            let content =
                io::read_file(&path, &format!("read descriptor {}", dspec.path))?;
            let subs = relocation_substitutions(dspec, &plan);
            (Some(descriptor::patch(&content, &subs)), Some(path))
        }
        None => (None, None),
    };

    Ok(RelocationResult {
        files,
        contents,
        descriptor,
        descriptor_path,
        applied: false,
    })
}

/// Descriptor substitutions for a relocation: the plan file's explicit
/// pairs first, then one derived pair per non-identity move.
fn relocation_substitutions(spec: &DescriptorSpec, plan: &RelocationPlan) -> Vec<Substitution> {
    let mut subs = spec.substitutions.clone();
    for (old, new) in plan.moves() {
        subs.push(Substitution {
            find: format!("{}{}", spec.prefix, old),
            replace: format!("{}{}", spec.prefix, new),
        });
    }
    subs
}

/// Materialize the new tree and swap it into place.
///
/// Stages under `<root>.new`, retires the original to `<root>.old` (kept
/// for manual inspection), then renames the staging directory onto the
/// root path. Refuses to run if `<root>.old` already exists — re-runs over
/// a swapped tree are not supported.
pub fn apply(result: &mut RelocationResult, root: &Path) -> Result<()> {
    let staging = sibling(root, "new")?;
    let retired = sibling(root, "old")?;

    if retired.exists() {
        return Err(Error::InvalidArgument {
            field: "root".to_string(),
            problem: format!(
                "'{}' already exists; a previous relocation was applied here",
                retired.display()
            ),
        });
    }
    if staging.exists() {
        std::fs::remove_dir_all(&staging)
            .map_err(|e| Error::io(e, format!("clear staging {}", staging.display())))?;
    }
    std::fs::create_dir_all(&staging)
        .map_err(|e| Error::io(e, format!("create staging {}", staging.display())))?;

    for (new_path, content) in &result.contents {
        io::write_file(&staging.join(new_path), content, &format!("stage {}", new_path))?;
    }
    log_status!(
        "relocate",
        "Staged {} files under {}",
        result.contents.len(),
        staging.display()
    );

    std::fs::rename(root, &retired)
        .map_err(|e| Error::io(e, format!("retire {}", root.display())))?;
    std::fs::rename(&staging, root)
        .map_err(|e| Error::io(e, format!("promote {}", staging.display())))?;
    log_status!("relocate", "Swapped new tree into {}", root.display());

    if let (Some(report), Some(path)) = (&result.descriptor, &result.descriptor_path) {
        if report.changed() {
            io::write_file(path, &report.content, "write descriptor")?;
            log_status!(
                "relocate",
                "Patched descriptor {} ({} substitutions)",
                path.display(),
                report.applied.len()
            );
        }
    }

    result.applied = true;
    Ok(())
}

/// Sibling path `<root>.<suffix>` for staging and retirement.
fn sibling(root: &Path, suffix: &str) -> Result<PathBuf> {
    let name = root.file_name().ok_or_else(|| Error::InvalidArgument {
        field: "root".to_string(),
        problem: format!("'{}' has no directory name", root.display()),
    })?;
    Ok(root.with_file_name(format!("{}.{}", name.to_string_lossy(), suffix)))
}
