//! Build descriptor patching by exact literal substitution.
//!
//! The descriptor contract is textual, not structural: each substitution
//! names a verbatim substring expected to occur in the descriptor. A pair
//! whose `find` text does not occur is not an error — it is reported back
//! as unapplied so callers (and tests) can assert full coverage instead of
//! discovering a silent no-op later. Re-running over already-patched text
//! applies nothing, because the old literals no longer occur.

use serde::{Deserialize, Serialize};

/// One literal `find` → `replace` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Substitution {
    pub find: String,
    pub replace: String,
}

/// Descriptor patching configuration carried in a plan or split spec file.
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptorSpec {
    /// Descriptor location, relative to the source root (e.g.
    /// `"../CMakeLists.txt"` when the root is a `src/` directory).
    pub path: String,
    /// Prefix descriptor paths carry relative to plan paths, usually the
    /// root directory's own name.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Extra literal pairs beyond the derived per-file ones (e.g. a glob
    /// block rewrite).
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

fn default_prefix() -> String {
    "src/".to_string()
}

/// Outcome of one patch pass.
#[derive(Debug, Clone)]
pub struct PatchReport {
    pub content: String,
    pub applied: Vec<Substitution>,
    pub unapplied: Vec<Substitution>,
}

impl PatchReport {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Apply each substitution at most once, in listed order.
pub fn patch(content: &str, substitutions: &[Substitution]) -> PatchReport {
    let mut content = content.to_string();
    let mut applied = Vec::new();
    let mut unapplied = Vec::new();

    for sub in substitutions {
        if content.contains(&sub.find) {
            content = content.replacen(&sub.find, &sub.replace, 1);
            applied.push(sub.clone());
        } else {
            unapplied.push(sub.clone());
        }
    }

    PatchReport {
        content,
        applied,
        unapplied,
    }
}
