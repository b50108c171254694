//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// jpegli-explorer - JPEG optimization from the file manager
///
/// Re-encodes images with jpegli and keeps their metadata with exiftool.
#[derive(Parser, Debug)]
#[command(
    name = "jpegli-explorer",
    author,
    version,
    args_conflicts_with_subcommands = true,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Optimize JPEGs with jpegli from the Explorer context menu",
    long_about = "jpegli-explorer installs the bundled cjpegli and exiftool binaries into a \
                  per-user folder, registers an Explorer context menu entry, and converts \
                  images or folders passed to it while keeping their metadata.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  jpegli-explorer install\n    \
                  jpegli-explorer ./photo.png\n    \
                  jpegli-explorer ./holiday-photos\n    \
                  jpegli-explorer settings --distance 1.0\n    \
                  jpegli-explorer tools"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Image file or folder to convert
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the bundled tools and register the context menu
    Install(InstallArgs),

    /// Show the installed tool paths
    Tools(ToolsArgs),

    /// Remove the installation folder
    Clean(CleanArgs),

    /// Show or change settings
    Settings(SettingsArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install interactively:\n    jpegli-explorer install\n\n\
                  Install without confirmation:\n    jpegli-explorer install -y")]
pub struct InstallArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the tools command
#[derive(Parser, Debug)]
pub struct ToolsArgs {
    /// Print the paths as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the settings command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show settings:\n    jpegli-explorer settings\n\n\
                  Use a higher quality:\n    jpegli-explorer settings --distance 0.3")]
pub struct SettingsArgs {
    /// Encoder distance between 0.0 and 25.0, lower is higher quality
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub distance: Option<f64>,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    jpegli-explorer completions bash > ~/.bash_completion.d/jpegli-explorer\n\n\
                  Generate zsh completions:\n    jpegli-explorer completions zsh > ~/.zfunc/_jpegli-explorer\n\n\
                  Generate PowerShell completions:\n    jpegli-explorer completions powershell")]
pub struct CompletionsArgs {
    /// bash, elvish, fish, powershell or zsh
    pub shell: String,
}
