use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::GlobalArgs;
use commands::{relocate, split};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "resrc")]
#[command(version = VERSION)]
#[command(about = "One-shot C source tree restructuring: relocate, rewrite includes, split")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relocate source files per a plan and rewrite their includes
    Relocate(relocate::RelocateArgs),
    /// Slice a monolithic source file into new files
    Split(split::SplitArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
