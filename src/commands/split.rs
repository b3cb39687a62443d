use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use resrc::descriptor::Substitution;
use resrc::split::{self, LineRange, OutputFile, SplitSpec, SplitWarning};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct SplitArgs {
    /// Source root directory
    #[arg(long)]
    root: PathBuf,

    /// Split spec file (JSON)
    #[arg(long)]
    spec: PathBuf,

    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum SplitOutput {
    #[serde(rename = "split")]
    Split {
        root: String,
        source: String,
        dry_run: bool,
        outputs: Vec<OutputFile>,
        declarations: Vec<String>,
        warnings: Vec<SplitWarning>,
        uncovered: Vec<LineRange>,
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

pub fn run(args: SplitArgs, _global: &GlobalArgs) -> CmdResult<SplitOutput> {
    let spec: SplitSpec = crate::commands::read_spec_file(&args.spec)?;

    let mut result = split::generate(&spec, &args.root)?;
    if args.write {
        split::apply(&mut result, &spec, &args.root)?;
    }

    Ok((
        SplitOutput::Split {
            root: args.root.display().to_string(),
            source: spec.source.clone(),
            dry_run: !args.write,
            outputs: result.outputs.clone(),
            declarations: result.declarations.clone(),
            warnings: result.warnings.clone(),
            uncovered: result.uncovered.clone(),
            descriptor: result.descriptor.as_ref().map(|report| DescriptorSummary {
                applied: report.applied.clone(),
                unapplied: report.unapplied.clone(),
            }),
            applied: result.applied,
        },
        0,
    ))
}
