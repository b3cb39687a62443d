use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use resrc::descriptor::Substitution;
use resrc::plan::RelocationSpec;
use resrc::tree::{self, FileMove};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct RelocateArgs {
    /// Source root directory
    #[arg(long)]
    root: PathBuf,

    /// Relocation plan file (JSON)
    #[arg(long)]
    plan: PathBuf,

    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RelocateOutput {
    #[serde(rename = "relocate")]
    Relocate {
        root: String,
        dry_run: bool,
        total_files: usize,
        moved_files: usize,
        rewritten_includes: usize,
        files: Vec<FileMove>,
        #[serde(skip_serializing_if = "Option::is_none")]
        descriptor: Option<DescriptorSummary>,
        applied: bool,
    },
}

#[derive(Serialize)]
pub struct DescriptorSummary {
    pub applied: Vec<Substitution>,
    pub unapplied: Vec<Substitution>,
}

pub fn run(args: RelocateArgs, _global: &GlobalArgs) -> CmdResult<RelocateOutput> {
    let spec: RelocationSpec = crate::commands::read_spec_file(&args.plan)?;

    let mut result = tree::generate(&spec, &args.root)?;
    if args.write {
        tree::apply(&mut result, &args.root)?;
    }

    let moved_files = result
        .files
        .iter()
        .filter(|f| f.old_path != f.new_path)
        .count();
    let rewritten_includes = result.files.iter().map(|f| f.rewrites).sum();

    Ok((
        RelocateOutput::Relocate {
            root: args.root.display().to_string(),
            dry_run: !args.write,
            total_files: result.files.len(),
            moved_files,
            rewritten_includes,
            files: result.files.clone(),
            descriptor: result.descriptor.as_ref().map(|report| DescriptorSummary {
                applied: report.applied.clone(),
                unapplied: report.unapplied.clone(),
            }),
            applied: result.applied,
        },
        0,
    ))
}
