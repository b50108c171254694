//! jpegli-explorer - jpegli image optimization from the desktop context menu
//!
//! Installs bundled `cjpegli` and `exiftool` binaries into a per-user folder,
//! registers a context menu entry, and converts the files or folders that
//! entry hands over.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod convert;
mod error;
mod files;
mod path_utils;
mod paths;
mod progress;
mod provision;
mod settings;
mod shell;
mod ui;

use cli::{Cli, Commands, InstallArgs};

/// Set up the stderr log subscriber
///
/// `--verbose` forces debug output, otherwise `RUST_LOG` decides with `info`
/// as the fallback.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Keep a console window opened by the file manager visible until a key is pressed
fn wait_for_key() {
    if !console::user_attended() {
        return;
    }
    println!("\nPress any key to exit...");
    let _ = console::Term::stdout().read_key();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Launched without a subcommand means launched from the desktop
    let launched_from_desktop = cli.command.is_none();

    let result = match (cli.command, cli.path) {
        (Some(Commands::Install(args)), _) => commands::install::run(args),
        (Some(Commands::Tools(args)), _) => commands::tools::run(args),
        (Some(Commands::Clean(args)), _) => commands::clean::run(args),
        (Some(Commands::Settings(args)), _) => commands::settings::run(args),
        (Some(Commands::Version), _) => commands::version::run(),
        (Some(Commands::Completions(args)), _) => commands::completions::run(args),
        (None, Some(path)) => commands::convert::run(&path),
        (None, None) => commands::install::run(InstallArgs { yes: false }),
    };

    if let Err(e) = &result {
        eprintln!("Error: {e}");
    }
    if launched_from_desktop {
        wait_for_key();
    }
    if result.is_err() {
        std::process::exit(1);
    }
}
