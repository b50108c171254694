//! Version command implementation

use crate::error::Result;
use crate::provision::bundled::BUNDLED_ARCHIVES;

/// Run version command
pub fn run() -> Result<()> {
    println!("jpegli-explorer {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", rustc_version());
    println!("  Profile: {}", build_profile());
    println!("  Bundled archives: {}", bundled_archive_names());

    Ok(())
}

fn rustc_version() -> &'static str {
    env!("CARGO_PKG_RUST_VERSION")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn bundled_archive_names() -> String {
    if BUNDLED_ARCHIVES.is_empty() {
        return "none".to_string();
    }
    BUNDLED_ARCHIVES
        .iter()
        .map(|archive| archive.name)
        .collect::<Vec<_>>()
        .join(", ")
}
