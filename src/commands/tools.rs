//! Tools command: show where the installed tools are

use crate::cli::ToolsArgs;
use crate::error::Result;
use crate::paths::ManagedDirectory;
use crate::provision;
use crate::ui::display;

/// Run tools command
///
/// Prints whatever was found and fails when either tool is missing.
pub fn run(args: ToolsArgs) -> Result<()> {
    let managed = ManagedDirectory::from_env()?;
    let paths = provision::resolve_tools(&managed);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        display::display_tools(managed.path(), &paths);
    }

    paths.require(managed.path())?;
    Ok(())
}
