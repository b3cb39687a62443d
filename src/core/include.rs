//! Quoted `#include` resolution and rewriting.
//!
//! Operates purely on directive text: the pattern matches the quoted form
//! only, and nothing else in the file is parsed or touched. Angle-bracket
//! includes never match and are never rewritten.
//!
//! Resolution is two-tier because real trees mix both conventions: an
//! include may be written relative to the including file's directory
//! (`"../utils/logger.h"`) or relative to an implicit search root
//! (`"core/types.h"`). A directive that resolves under neither convention
//! is treated as external (system or third-party) and left byte-for-byte
//! unchanged.

use crate::plan::RelocationPlan;
use crate::relpath;
use regex::Regex;

/// The quoted include directive form. Matches the whole directive so the
/// rewrite can replace it wholesale.
pub fn directive_pattern() -> Regex {
    Regex::new(r#"#include\s+"([^"]+)""#).expect("directive pattern is valid")
}

/// Resolve a directive literal found in `old_file` to the plan key it
/// names, or `None` for an external include.
///
/// Directory-relative resolution is tried first, then the literal itself
/// as a root-relative path.
pub fn resolve(plan: &RelocationPlan, old_file: &str, literal: &str) -> Option<String> {
    let joined = relpath::normalize(&relpath::join(relpath::parent(old_file), literal));
    if plan.contains(&joined) {
        return Some(joined);
    }
    if plan.contains(literal) {
        return Some(literal.to_string());
    }
    None
}

/// Compute the new literal for an include of `new_target` written from
/// `new_file`. Pure path algebra; never reuses the old directive text,
/// since directory depth changes during relocation.
pub fn new_literal(new_file: &str, new_target: &str) -> String {
    relpath::relative_to(relpath::parent(new_file), new_target)
}

/// Rewrite every resolvable quoted include in `content`.
///
/// `old_file` is the file's path before relocation (resolution context);
/// `new_file` is where it is going (rewrite context). Returns the new
/// content and the number of directives rewritten. Unresolvable directives
/// are left untouched.
pub fn rewrite_includes(
    plan: &RelocationPlan,
    old_file: &str,
    new_file: &str,
    content: &str,
) -> (String, usize) {
    let pattern = directive_pattern();
    let mut rewrites = 0;

    let new_content = pattern.replace_all(content, |caps: &regex::Captures| {
        let literal = &caps[1];
        match resolve(plan, old_file, literal) {
            Some(old_target) => {
                // Totality of the plan guarantees the lookup succeeds for
                // any resolved key.
                let new_target = plan.new_path(&old_target).unwrap_or(&old_target);
                rewrites += 1;
                format!("#include \"{}\"", new_literal(new_file, new_target))
            }
            None => caps[0].to_string(),
        }
    });

    (new_content.into_owned(), rewrites)
}
