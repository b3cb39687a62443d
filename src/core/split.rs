//! Monolith splitting: verbatim line-range extraction, `static` promotion,
//! and shared declaration export.
//!
//! The splitter trusts range curation — each range is assumed to hold one
//! or more whole top-level declarations. It never parses C: promotion is a
//! single anchored qualifier strip, and the signature is just the text up
//! to the first `{`. Ranges are validated for bounds only; overlaps are
//! reported as warnings since duplication may be intentional, and the
//! lines no range covers are reported back so callers can audit coverage.

use crate::descriptor::{self, DescriptorSpec, PatchReport, Substitution};
use crate::error::{Error, Result};
use crate::io;
use crate::log_status;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Banner appended to the shared header ahead of the exported signatures.
pub const DECLARATIONS_BANNER: &str = "// --- Internal Module Functions ---";

/// 1-based inclusive line interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

/// Parsed contents of a split spec file.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitSpec {
    /// The monolithic file to slice, relative to the root.
    pub source: String,
    /// Lines emitted verbatim at the top of every output file (the
    /// canonical include block).
    #[serde(default)]
    pub preamble: Vec<String>,
    /// Output files with their ordered line ranges.
    pub outputs: Vec<OutputSpec>,
    /// Shared header that accumulates promoted signatures, relative to
    /// the root. Append-only; must already exist.
    pub declarations_header: String,
    /// Optional build descriptor patching configuration.
    #[serde(default)]
    pub descriptor: Option<DescriptorSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSpec {
    pub file: String,
    pub ranges: Vec<LineRange>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitWarning {
    pub kind: String,
    pub message: String,
}

/// One generated output file.
#[derive(Debug, Clone, Serialize)]
pub struct OutputFile {
    pub file: String,
    pub ranges: usize,
    pub lines: usize,
}

/// The full result of a split generate pass.
#[derive(Debug)]
pub struct SplitResult {
    pub outputs: Vec<OutputFile>,
    /// Output file → generated content.
    pub contents: BTreeMap<String, String>,
    /// Promoted signatures in extraction order, terminator included.
    pub declarations: Vec<String>,
    pub warnings: Vec<SplitWarning>,
    /// Source lines no range extracts, as maximal intervals.
    pub uncovered: Vec<LineRange>,
    pub descriptor: Option<PatchReport>,
    descriptor_path: Option<PathBuf>,
    pub applied: bool,
}

/// Slice the source into output buffers and collect promoted
/// declarations. No writes.
pub fn generate(spec: &SplitSpec, root: &Path) -> Result<SplitResult> {
    let source = io::read_file(&root.join(&spec.source), &format!("read {}", spec.source))?;
    let lines: Vec<&str> = source.split_inclusive('\n').collect();

    validate_ranges(spec, lines.len())?;
    let warnings = overlap_warnings(spec);
    let uncovered = uncovered_intervals(spec, lines.len());

    let qualifier = Regex::new(r"^static\s+").expect("qualifier pattern is valid");
    let whitespace = Regex::new(r"\s+").expect("whitespace pattern is valid");

    let mut preamble = spec.preamble.join("\n");
    if !preamble.is_empty() {
        preamble.push_str("\n\n");
    }

    let mut outputs = Vec::new();
    let mut contents = BTreeMap::new();
    let mut declarations = Vec::new();

    for output in &spec.outputs {
        let mut content = preamble.clone();
        let mut extracted_lines = 0;

        for range in &output.ranges {
            let mut block: String = lines[range.start - 1..range.end].concat();
            extracted_lines += range.end - range.start + 1;

            if qualifier.is_match(&block) {
                block = qualifier.replace(&block, "").into_owned();
                if let Some(brace) = block.find('{') {
                    let signature = whitespace.replace_all(block[..brace].trim(), " ");
                    declarations.push(format!("{};", signature));
                }
            }

            if !block.ends_with('\n') {
                block.push('\n');
            }
            content.push_str(&block);
            content.push('\n');
        }

        outputs.push(OutputFile {
            file: output.file.clone(),
            ranges: output.ranges.len(),
            lines: extracted_lines,
        });
        contents.insert(output.file.clone(), content);
    }

    let (descriptor, descriptor_path) = match &spec.descriptor {
        Some(dspec) => {
            let path = root.join(&dspec.path);
            let content =
                io::read_file(&path, &format!("read descriptor {}", dspec.path))?;
            let subs = split_substitutions(dspec, spec);
            (Some(descriptor::patch(&content, &subs)), Some(path))
        }
        None => (None, None),
    };

    Ok(SplitResult {
        outputs,
        contents,
        declarations,
        warnings,
        uncovered,
        descriptor,
        descriptor_path,
        applied: false,
    })
}

/// Write the output files, append the promoted declarations to the shared
/// header, and patch the descriptor.
pub fn apply(result: &mut SplitResult, spec: &SplitSpec, root: &Path) -> Result<()> {
    for (file, content) in &result.contents {
        io::write_file(&root.join(file), content, &format!("write {}", file))?;
    }
    log_status!("split", "Wrote {} output files", result.contents.len());

    if !result.declarations.is_empty() {
        let mut appendix = format!("\n{}\n", DECLARATIONS_BANNER);
        for declaration in &result.declarations {
            appendix.push_str(declaration);
            appendix.push('\n');
        }
        io::append_file(
            &root.join(&spec.declarations_header),
            &appendix,
            &format!("append {}", spec.declarations_header),
        )?;
        log_status!(
            "split",
            "Exported {} declarations to {}",
            result.declarations.len(),
            spec.declarations_header
        );
    }

    if let (Some(report), Some(path)) = (&result.descriptor, &result.descriptor_path) {
        if report.changed() {
            io::write_file(path, &report.content, "write descriptor")?;
            log_status!("split", "Patched descriptor {}", path.display());
        }
    }

    result.applied = true;
    Ok(())
}

/// Bounds validation. Overlap and coverage are reported, not rejected.
fn validate_ranges(spec: &SplitSpec, line_count: usize) -> Result<()> {
    for output in &spec.outputs {
        for range in &output.ranges {
            let problem = if range.start == 0 {
                Some("line numbers are 1-based".to_string())
            } else if range.start > range.end {
                Some("start exceeds end".to_string())
            } else if range.end > line_count {
                Some(format!("file has {} lines", line_count))
            } else {
                None
            };
            if let Some(problem) = problem {
                return Err(Error::InvalidRange {
                    file: output.file.clone(),
                    start: range.start,
                    end: range.end,
                    problem,
                });
            }
        }
    }
    Ok(())
}

fn overlap_warnings(spec: &SplitSpec) -> Vec<SplitWarning> {
    let mut tagged: Vec<(&str, &LineRange)> = Vec::new();
    for output in &spec.outputs {
        for range in &output.ranges {
            tagged.push((&output.file, range));
        }
    }

    let mut warnings = Vec::new();
    for (i, (file_a, a)) in tagged.iter().enumerate() {
        for (file_b, b) in &tagged[i + 1..] {
            if a.start <= b.end && b.start <= a.end {
                warnings.push(SplitWarning {
                    kind: "overlapping_ranges".to_string(),
                    message: format!(
                        "lines {}..{} ({}) overlap {}..{} ({}); the shared lines are extracted twice",
                        a.start, a.end, file_a, b.start, b.end, file_b
                    ),
                });
            }
        }
    }
    warnings
}

/// Maximal intervals of source lines not claimed by any range.
fn uncovered_intervals(spec: &SplitSpec, line_count: usize) -> Vec<LineRange> {
    let mut covered = vec![false; line_count + 1];
    for output in &spec.outputs {
        for range in &output.ranges {
            for line in range.start..=range.end.min(line_count) {
                covered[line] = true;
            }
        }
    }

    let mut intervals = Vec::new();
    let mut open: Option<usize> = None;
    for line in 1..=line_count {
        match (covered[line], open) {
            (false, None) => open = Some(line),
            (true, Some(start)) => {
                intervals.push(LineRange {
                    start,
                    end: line - 1,
                });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        intervals.push(LineRange {
            start,
            end: line_count,
        });
    }
    intervals
}

/// Descriptor substitutions for a split: the spec's explicit pairs first,
/// then the monolith reference replaced by the indented output file list.
fn split_substitutions(dspec: &DescriptorSpec, spec: &SplitSpec) -> Vec<Substitution> {
    let mut subs = dspec.substitutions.clone();
    let replacement = spec
        .outputs
        .iter()
        .map(|o| format!("{}{}", dspec.prefix, o.file))
        .collect::<Vec<_>>()
        .join("\n    ");
    subs.push(Substitution {
        find: format!("{}{}", dspec.prefix, spec.source),
        replace: replacement,
    });
    subs
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MONOLITH: &str = "\
#include \"internal.h\"

static void arrange_windows(int workspace,
    int gaps)
{
    layout(workspace, gaps);
}

void handle_map_request(void)
{
    map();
}

/* keep   spacing */
static int debug_dump(void) { return 0; }
";

    fn range(start: usize, end: usize) -> LineRange {
        LineRange { start, end }
    }

    fn base_spec(outputs: Vec<OutputSpec>) -> SplitSpec {
        SplitSpec {
            source: "window_manager.c".to_string(),
            preamble: vec![
                "#include \"internal.h\"".to_string(),
                "#include <stdio.h>".to_string(),
            ],
            outputs,
            declarations_header: "internal.h".to_string(),
            descriptor: None,
        }
    }

    fn setup() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("src");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("window_manager.c"), MONOLITH).unwrap();
        std::fs::write(root.join("internal.h"), "#pragma once\n").unwrap();
        (dir, root)
    }

    #[test]
    fn static_block_is_promoted_and_declared_once() {
        let spec = base_spec(vec![OutputSpec {
            file: "arrange.c".to_string(),
            ranges: vec![range(3, 7)],
        }]);
        let (_dir, root) = setup();

        let result = generate(&spec, &root).unwrap();
        let content = result.contents.get("arrange.c").unwrap();

        assert!(content.contains("void arrange_windows(int workspace,\n    int gaps)\n{"));
        assert!(!content.contains("static void arrange_windows"));
        assert_eq!(
            result.declarations,
            vec!["void arrange_windows(int workspace, int gaps);".to_string()]
        );
    }

    #[test]
    fn non_static_block_is_verbatim_with_no_declaration() {
        let spec = base_spec(vec![OutputSpec {
            file: "events.c".to_string(),
            ranges: vec![range(9, 12)],
        }]);
        let (_dir, root) = setup();

        let result = generate(&spec, &root).unwrap();
        let content = result.contents.get("events.c").unwrap();

        assert!(content.contains("void handle_map_request(void)\n{\n    map();\n}\n"));
        assert!(result.declarations.is_empty());
    }

    #[test]
    fn whitespace_and_comments_inside_ranges_survive() {
        let spec = base_spec(vec![OutputSpec {
            file: "debug.c".to_string(),
            ranges: vec![range(14, 14), range(15, 15)],
        }]);
        let (_dir, root) = setup();

        let result = generate(&spec, &root).unwrap();
        let content = result.contents.get("debug.c").unwrap();

        assert!(content.contains("/* keep   spacing */\n"));
        assert!(content.contains("int debug_dump(void) { return 0; }\n"));
        assert_eq!(result.declarations, vec!["int debug_dump(void);".to_string()]);
    }

    #[test]
    fn qualifier_mid_block_is_not_promoted() {
        // Only a block that begins with the qualifier is promoted; a
        // comment line ahead of it leaves the block verbatim.
        let spec = base_spec(vec![OutputSpec {
            file: "debug.c".to_string(),
            ranges: vec![range(14, 15)],
        }]);
        let (_dir, root) = setup();

        let result = generate(&spec, &root).unwrap();
        let content = result.contents.get("debug.c").unwrap();

        assert!(content.contains("static int debug_dump(void) { return 0; }\n"));
        assert!(result.declarations.is_empty());
    }

    #[test]
    fn preamble_precedes_every_output() {
        let spec = base_spec(vec![
            OutputSpec {
                file: "arrange.c".to_string(),
                ranges: vec![range(3, 7)],
            },
            OutputSpec {
                file: "events.c".to_string(),
                ranges: vec![range(9, 12)],
            },
        ]);
        let (_dir, root) = setup();

        let result = generate(&spec, &root).unwrap();
        for content in result.contents.values() {
            assert!(content.starts_with("#include \"internal.h\"\n#include <stdio.h>\n\n"));
        }
    }

    #[test]
    fn out_of_bounds_range_is_rejected() {
        let spec = base_spec(vec![OutputSpec {
            file: "wm.c".to_string(),
            ranges: vec![range(10, 999)],
        }]);
        let (_dir, root) = setup();

        let err = generate(&spec, &root).unwrap_err();
        assert_eq!(err.code(), "split.invalid_range");
    }

    #[test]
    fn zero_and_inverted_ranges_are_rejected() {
        for bad in [range(0, 5), range(7, 3)] {
            let spec = base_spec(vec![OutputSpec {
                file: "wm.c".to_string(),
                ranges: vec![bad],
            }]);
            let (_dir, root) = setup();
            let err = generate(&spec, &root).unwrap_err();
            assert_eq!(err.code(), "split.invalid_range");
        }
    }

    #[test]
    fn overlapping_ranges_warn_but_extract() {
        let spec = base_spec(vec![OutputSpec {
            file: "wm.c".to_string(),
            ranges: vec![range(3, 7), range(5, 12)],
        }]);
        let (_dir, root) = setup();

        let result = generate(&spec, &root).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, "overlapping_ranges");
        assert!(result.contents.contains_key("wm.c"));
    }

    #[test]
    fn uncovered_lines_are_reported_as_intervals() {
        let spec = base_spec(vec![OutputSpec {
            file: "wm.c".to_string(),
            ranges: vec![range(3, 7)],
        }]);
        let (_dir, root) = setup();

        let result = generate(&spec, &root).unwrap();
        assert_eq!(
            result.uncovered,
            vec![range(1, 2), range(8, MONOLITH.lines().count())]
        );
    }

    #[test]
    fn apply_writes_outputs_and_appends_header_once() {
        let spec = base_spec(vec![OutputSpec {
            file: "arrange.c".to_string(),
            ranges: vec![range(3, 7)],
        }]);
        let (_dir, root) = setup();

        let mut result = generate(&spec, &root).unwrap();
        apply(&mut result, &spec, &root).unwrap();

        assert!(result.applied);
        assert!(root.join("arrange.c").exists());
        // The monolith itself is left in place; only the descriptor stops
        // referencing it.
        assert!(root.join("window_manager.c").exists());

        let header = std::fs::read_to_string(root.join("internal.h")).unwrap();
        assert!(header.starts_with("#pragma once\n"));
        assert_eq!(header.matches(DECLARATIONS_BANNER).count(), 1);
        assert_eq!(
            header
                .matches("void arrange_windows(int workspace, int gaps);")
                .count(),
            1
        );
    }

    #[test]
    fn no_declarations_means_header_untouched() {
        let spec = base_spec(vec![OutputSpec {
            file: "events.c".to_string(),
            ranges: vec![range(9, 12)],
        }]);
        let (_dir, root) = setup();

        let mut result = generate(&spec, &root).unwrap();
        apply(&mut result, &spec, &root).unwrap();

        let header = std::fs::read_to_string(root.join("internal.h")).unwrap();
        assert_eq!(header, "#pragma once\n");
    }

    #[test]
    fn descriptor_monolith_reference_becomes_file_list() {
        let mut spec = base_spec(vec![
            OutputSpec {
                file: "arrange.c".to_string(),
                ranges: vec![range(3, 7)],
            },
            OutputSpec {
                file: "events.c".to_string(),
                ranges: vec![range(9, 12)],
            },
        ]);
        spec.descriptor = Some(DescriptorSpec {
            path: "../CMakeLists.txt".to_string(),
            prefix: "src/".to_string(),
            substitutions: Vec::new(),
        });
        let (dir, root) = setup();
        std::fs::write(
            dir.path().join("CMakeLists.txt"),
            "add_executable(wm\n    src/window_manager.c\n)\n",
        )
        .unwrap();

        let mut result = generate(&spec, &root).unwrap();
        apply(&mut result, &spec, &root).unwrap();

        let cmake = std::fs::read_to_string(dir.path().join("CMakeLists.txt")).unwrap();
        assert_eq!(
            cmake,
            "add_executable(wm\n    src/arrange.c\n    src/events.c\n)\n"
        );
    }
}
