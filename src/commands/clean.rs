//! Clean command: remove the managed directory

use inquire::Confirm;
use walkdir::WalkDir;

use crate::cli::CleanArgs;
use crate::error::{Result, fs as fs_error};
use crate::paths::ManagedDirectory;
use crate::ui::display;

/// Run clean command
pub fn run(args: CleanArgs) -> Result<()> {
    let managed = ManagedDirectory::from_env()?;

    if !managed.path().exists() {
        println!("Nothing to clean at {}", managed.path().display());
        return Ok(());
    }

    println!("Location: {}", managed.path().display());
    println!("Size: {}", display::formatted_size(directory_size(&managed)));

    if !args.yes {
        let confirmed = Confirm::new("Remove the installation folder?")
            .with_default(false)
            .prompt()
            .map_err(|e| fs_error::io_error(format!("Failed to read confirmation: {e}")))?;
        if !confirmed {
            println!("Clean cancelled.");
            return Ok(());
        }
    }

    managed.reset_all()?;
    println!("Removed {}", managed.path().display());
    Ok(())
}

fn directory_size(managed: &ManagedDirectory) -> u64 {
    WalkDir::new(managed.path())
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}
