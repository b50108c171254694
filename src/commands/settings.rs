//! Settings command: show or update `config.yaml`

use tracing::info;

use crate::cli::SettingsArgs;
use crate::error::Result;
use crate::settings::{self, Settings};
use crate::ui::display;

/// Run settings command
pub fn run(args: SettingsArgs) -> Result<()> {
    let path = settings::settings_path()?;
    let mut current = Settings::load_or_default(&path)?;

    if let Some(distance) = args.distance {
        current.set_distance(distance)?;
        current.save(&path)?;
        info!("Distance set to {distance}");
    }

    display::display_settings(&path, &current);
    Ok(())
}
