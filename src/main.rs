//! azd-preflight CLI entry point.

use std::process::ExitCode;

use azd_preflight::cli::{Cli, CommandDispatcher};
use azd_preflight::report::Reporter;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("azd_preflight=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("azd_preflight=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("starting with args: {:?}", cli);

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let project_root = cli
        .project
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let reporter = Reporter::new();
    let dispatcher = CommandDispatcher::new(project_root);

    match dispatcher.dispatch(&cli, &reporter) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            reporter.error(&format!("{}", e));
            ExitCode::from(1)
        }
    }
}
