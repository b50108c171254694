//! Convert command: the context menu entry point
//!
//! Collects the inputs, resolves the installed tools, reads the settings,
//! then converts every compatible image of the given file or folder. The
//! first failing image stops the batch.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::convert::{self, Job, Summary};
use crate::error::Result;
use crate::files;
use crate::paths::ManagedDirectory;
use crate::progress::ProgressDisplay;
use crate::provision::{self, tools::Toolset};
use crate::settings::{self, Settings};
use crate::ui::display;

/// Run convert command for `input`
pub fn run(input: &Path) -> Result<()> {
    let sources = files::collect_inputs(input)?;
    let jobs = convert::plan(input, sources)?;

    let managed = ManagedDirectory::from_env()?;
    let toolset = provision::resolve_tools(&managed).require(managed.path())?;
    let distance = load_settings().distance;
    info!(
        "Converting {} file(s) with distance {distance}",
        jobs.len()
    );

    let summary = convert_all(&toolset, distance, &jobs)?;
    display::display_summary(&summary);
    Ok(())
}

/// Settings for this run, falling back to defaults when they cannot be read
fn load_settings() -> Settings {
    let loaded = settings::settings_path().and_then(|path| Settings::load_or_default(&path));
    match loaded {
        Ok(settings) => settings,
        Err(e) => {
            warn!("{e}, using default settings");
            Settings::default()
        }
    }
}

/// Convert every job in order, stopping at the first failure
pub fn convert_all(toolset: &Toolset, distance: f64, jobs: &[Job]) -> Result<Summary> {
    let progress = if jobs.len() > 1 {
        ProgressDisplay::new(jobs.len() as u64)
    } else {
        ProgressDisplay::hidden()
    };

    let mut summary = Summary::default();
    for job in jobs {
        progress.start_file(&job.source.display().to_string());
        let stats = match convert::convert(toolset, distance, &job.source, &job.target) {
            Ok(stats) => stats,
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };
        debug!("Saved {} bytes on {}", stats.saved(), job.source.display());
        progress.println(display::converted_line(&job.source, &stats));
        summary.add(stats);
        progress.inc();
    }
    progress.finish();

    Ok(summary)
}
