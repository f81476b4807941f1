use std::path::Path;

use anyhow::Result;
use clap::Parser;

use roaring_release::cli::{run_release_workflow, ReleaseWorkflowArgs};
use roaring_release::config::{self, GitBackend};
use roaring_release::error::FAILURE_EXIT_CODE;
use roaring_release::{git, ui};

#[derive(clap::Parser)]
#[command(
    name = "release",
    version,
    about = "Bump the Roaring version header and CMake files for a new release"
)]
struct Args {
    #[arg(value_name = "VERSION", help = "New version, formatted major.minor.revision")]
    target: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, value_enum, help = "Version-control backend to query")]
    backend: Option<GitBackend>,

    #[arg(long, help = "Validate and preview without writing files")]
    dry_run: bool,

    #[arg(short, long, help = "Print debug diagnostics to stderr")]
    verbose: bool,
}

/// Initialize tracing on stderr; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "roaring_release=debug,release=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(FAILURE_EXIT_CODE);
        }
    };

    let backend = args.backend.unwrap_or(config.git.backend);
    let repo = match git::open(backend, Path::new(".")) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(FAILURE_EXIT_CODE);
        }
    };

    let workflow_args = ReleaseWorkflowArgs {
        version: args.target,
        dry_run: args.dry_run,
    };

    if let Err(e) = run_release_workflow(&repo, &workflow_args, &config) {
        ui::display_error(&e.to_string());
        std::process::exit(e.exit_code());
    }

    Ok(())
}
