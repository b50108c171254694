//! Display functions for provisioning and conversion results

use console::Style;
use std::path::Path;

use crate::convert::{ConvertStats, Summary};
use crate::provision::{ArchiveOutcome, Provisioned};
use crate::provision::tools::{ExecutablePaths, Tool};
use crate::settings::Settings;

macro_rules! display_field {
    ($label:expr, $value:expr) => {
        println!("  {} {}", Style::new().bold().apply_to($label), $value)
    };
}

/// Format a byte count as a human-readable string
pub fn formatted_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Print a section header
pub fn header(title: &str) {
    println!("{}", Style::new().bold().green().apply_to(title));
}

/// Print the result of an install
pub fn display_provisioned(provisioned: &Provisioned) {
    header("Installed");
    for outcome in &provisioned.archives {
        display_archive_outcome(outcome);
    }
    display_field!("Executable:", provisioned.self_copy.display());
    display_field!("cjpegli:", provisioned.toolset.cjpegli.display());
    display_field!("exiftool:", provisioned.toolset.exiftool.display());
}

fn display_archive_outcome(outcome: &ArchiveOutcome) {
    match &outcome.result {
        Ok(tree) => println!(
            "  {} {} -> {}",
            Style::new().green().apply_to("✓"),
            outcome.archive,
            tree.display()
        ),
        Err(e) => println!(
            "  {} {}: {e}",
            Style::new().red().apply_to("✗"),
            outcome.archive
        ),
    }
}

/// Print resolved tool paths, marking missing ones
pub fn display_tools(managed: &Path, paths: &ExecutablePaths) {
    header("Tools");
    display_field!("Location:", managed.display());
    for tool in Tool::ALL {
        let label = format!("{tool}:");
        match paths.get(tool) {
            Some(path) => display_field!(label, path.display()),
            None => display_field!(label, Style::new().red().apply_to("not found")),
        }
    }
}

/// Print the current settings
pub fn display_settings(path: &Path, settings: &Settings) {
    header("Settings");
    display_field!("File:", path.display());
    display_field!("Distance:", settings.distance);
}

/// Line describing one converted file
pub fn converted_line(source: &Path, stats: &ConvertStats) -> String {
    format!(
        "Converted {} ({} -> {}, ratio {:.2})",
        source.display(),
        formatted_size(stats.source_size),
        formatted_size(stats.target_size),
        stats.ratio()
    )
}

/// Print the batch totals
pub fn display_summary(summary: &Summary) {
    println!(
        "{} {:.2} MB",
        Style::new().bold().green().apply_to("Total space saved:"),
        summary.saved_mb()
    );
    println!(
        "Original size: {:.2} MB, New size: {:.2} MB",
        summary.original_mb(),
        summary.new_mb()
    );
    println!(
        "Average compression ratio: {:.2}%",
        summary.compression_percent()
    );
}
