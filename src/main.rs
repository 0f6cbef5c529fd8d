mod config;
mod pipeline;
mod report;
mod shell;
mod step;

use clap::Parser;
use log::{error, info};
use pipeline::PipelineError;
use report::Reporter;
use shell::ShellRunner;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status for a step that printed something or could not start.
const STEP_FAILED: u8 = 1;
/// Exit status for an unusable step file.
const BAD_CONFIG: u8 = 2;
/// Exit status when status lines cannot be written to stdout.
const OUTPUT_FAILED: u8 = 3;

#[derive(Parser, Debug)]
#[command(author, version, about = "Format, lint, test, build and install a Go module", long_about = None)]
struct Cli {
    /// Step file to run instead of the built-in Go steps
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run every step in this directory
    #[arg(short = 'C', long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Print the steps that would run, then exit
    #[arg(long)]
    list: bool,

    /// Disable colored status labels
    #[arg(long)]
    no_color: bool,

    /// Write the built-in steps to a file as a starting point, then exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["config", "list"])]
    write_default: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let color = !cli.no_color && colored::control::SHOULD_COLORIZE.should_colorize();
    ExitCode::from(run(&cli, std::io::stdout().lock(), color))
}

/// Does everything the command line asks for and returns the exit status.
fn run<W: Write>(cli: &Cli, out: W, color: bool) -> u8 {
    let mut reporter = Reporter::new(out, color);

    if let Some(path) = &cli.write_default {
        info!("Writing built-in steps to {}", path.display());
        return match config::export_default(path) {
            Ok(_) => {
                println!("Steps written to '{}'.", path.display());
                0
            }
            Err(e) => {
                error!("Failed to write steps: {}", e);
                eprintln!("{}", e);
                BAD_CONFIG
            }
        };
    }

    let pipeline = match config::resolve(cli.config.as_deref()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to load steps: {}", e);
            eprintln!("{}", e);
            return BAD_CONFIG;
        }
    };

    if cli.list {
        for step in pipeline.steps() {
            if let Err(e) = reporter.plan(step) {
                error!("Failed to print steps: {}", e);
                return OUTPUT_FAILED;
            }
        }
        return 0;
    }

    let runner = match &cli.dir {
        Some(dir) => ShellRunner::in_dir(dir),
        None => ShellRunner::new(),
    };
    match pipeline.run(&runner, &mut reporter) {
        Ok(report) => {
            info!("Passed: {}", report.passed.join(", "));
            0
        }
        Err(PipelineError::StepProducedOutput { label, .. }) => {
            info!("Stopped at step '{}'", label);
            STEP_FAILED
        }
        Err(PipelineError::Report(e)) => {
            error!("Failed to write status: {}", e);
            OUTPUT_FAILED
        }
        Err(e) => {
            error!("{}", e);
            STEP_FAILED
        }
    }
}
