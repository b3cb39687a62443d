//! Slash-separated relative path algebra.
//!
//! All paths in a relocation plan are relative to a single root and use `/`
//! regardless of platform, matching the text that appears inside `#include`
//! directives. Equality is exact string equality after [`normalize`].

/// Collapse `.` and `..` segments, POSIX-normpath style.
///
/// Leading `..` segments are preserved (a directive can legitimately climb
/// above the including file's directory). Returns `""` for an empty input.
pub fn normalize(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if matches!(out.last(), Some(&last) if last != "..") {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            _ => out.push(seg),
        }
    }
    out.join("/")
}

/// Directory component of a path, `""` for a root-level file.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Final component of a path.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Join a directory and a path. The directory may be `""`.
pub fn join(dir: &str, path: &str) -> String {
    if dir.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", dir, path)
    }
}

/// Shortest relative path from `from_dir` to `target`, usable verbatim
/// inside a quoted include (no leading `./`).
///
/// Same directory yields the bare file name. Otherwise: `..` for each
/// segment of `from_dir` below the longest common prefix, then the
/// non-common suffix of the target's directory, then the file name.
pub fn relative_to(from_dir: &str, target: &str) -> String {
    let target_dir = parent(target);
    if from_dir == target_dir {
        return file_name(target).to_string();
    }

    let from_parts: Vec<&str> = if from_dir.is_empty() {
        Vec::new()
    } else {
        from_dir.split('/').collect()
    };
    let target_parts: Vec<&str> = if target_dir.is_empty() {
        Vec::new()
    } else {
        target_dir.split('/').collect()
    };

    let mut common = 0;
    while common < from_parts.len()
        && common < target_parts.len()
        && from_parts[common] == target_parts[common]
    {
        common += 1;
    }

    let mut parts: Vec<&str> = Vec::new();
    parts.resize(from_parts.len() - common, "..");
    parts.extend(&target_parts[common..]);
    parts.push(file_name(target));
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(normalize("core/./wm.c"), "core/wm.c");
        assert_eq!(normalize("core/../utils/list.h"), "utils/list.h");
        assert_eq!(normalize("a/b/../../c.h"), "c.h");
        assert_eq!(normalize("wm.c"), "wm.c");
    }

    #[test]
    fn normalize_preserves_leading_parent_segments() {
        assert_eq!(normalize("../platform.h"), "../platform.h");
        assert_eq!(normalize("a/../../b.h"), "../b.h");
    }

    #[test]
    fn parent_and_file_name() {
        assert_eq!(parent("core/wm.c"), "core");
        assert_eq!(parent("wm.c"), "");
        assert_eq!(file_name("core/sub/wm.c"), "wm.c");
        assert_eq!(file_name("wm.c"), "wm.c");
    }

    #[test]
    fn join_handles_empty_dir() {
        assert_eq!(join("", "wm.c"), "wm.c");
        assert_eq!(join("core", "wm.c"), "core/wm.c");
    }

    #[test]
    fn relative_to_same_dir_is_bare_name() {
        assert_eq!(relative_to("core", "core/types.h"), "types.h");
        assert_eq!(relative_to("", "types.h"), "types.h");
        assert!(!relative_to("apps", "apps/main.h").contains('/'));
    }

    #[test]
    fn relative_to_sibling_dir() {
        assert_eq!(relative_to("apps", "utils/util.h"), "../utils/util.h");
    }

    #[test]
    fn relative_to_from_root_dir() {
        assert_eq!(relative_to("", "utils/list.h"), "utils/list.h");
    }

    #[test]
    fn relative_to_deeper_target() {
        assert_eq!(relative_to("core", "core/x11/backend.h"), "x11/backend.h");
    }

    #[test]
    fn relative_to_shared_prefix() {
        assert_eq!(
            relative_to("core/x11", "core/wayland/backend.h"),
            "../wayland/backend.h"
        );
    }

    #[test]
    fn relative_to_round_trips_through_normalize() {
        // Rejoining the computed literal onto the source directory must
        // land exactly on the target.
        for (from_dir, target) in [
            ("apps", "utils/util.h"),
            ("core/x11", "core/wayland/backend.h"),
            ("", "utils/list.h"),
            ("ipc", "ipc/ipc.h"),
        ] {
            let literal = relative_to(from_dir, target);
            assert_eq!(normalize(&join(from_dir, &literal)), target);
        }
    }
}
