//! Install command implementation
//!
//! Provisions the bundled tools into the managed directory and registers the
//! Explorer context menu for the copied executable.

use inquire::Confirm;
use tracing::info;

use crate::cli::InstallArgs;
use crate::error::{Result, fs as fs_error};
use crate::paths::ManagedDirectory;
use crate::provision::bundled::BUNDLED_ARCHIVES;
use crate::provision::{Provisioner, relocate};
use crate::shell::ExplorerContextMenu;
use crate::ui::display;

/// Run install command
pub fn run(args: InstallArgs) -> Result<()> {
    let managed = ManagedDirectory::from_env()?;

    if !args.yes && !confirm_install(&managed)? {
        println!("Installation cancelled.");
        return Ok(());
    }

    let executable = relocate::current_executable()?;
    let provisioner = Provisioner::new(&managed, BUNDLED_ARCHIVES, executable);
    let provisioned = provisioner.install(&ExplorerContextMenu)?;

    info!("Installation finished");
    display::display_provisioned(&provisioned);
    Ok(())
}

/// Ask before wiping and rebuilding the managed directory
pub fn confirm_install(managed: &ManagedDirectory) -> Result<bool> {
    println!("\nThe tools will be installed to:");
    println!("  {}", managed.path().display());
    if managed.path().exists() {
        println!("  (existing contents will be replaced)");
    }
    println!();

    Confirm::new("Install jpegli-explorer and add the context menu entry?")
        .with_default(true)
        .with_help_message("Press Enter to confirm, or 'n' to cancel")
        .prompt()
        .map_err(|e| fs_error::io_error(format!("Failed to read confirmation: {e}")))
}
