//! icaclean CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use icaclean::cli::{Cli, CommandContext, CommandDispatcher};
use icaclean::ui::{OutputMode, Theme};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("icaclean=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("icaclean=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("icaclean starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Install root: --dir flag, or the current directory
    let root = cli
        .dir
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let ctx = CommandContext::new(root, output_mode, cli.dry_run);
    let dispatcher = CommandDispatcher;

    match dispatcher.dispatch(&cli, &ctx) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            let theme = Theme::for_terminal();
            eprintln!("{} {}", theme.error.apply_to("Error:"), e);
            ExitCode::from(1)
        }
    }
}
