//! Executable discovery inside extraction trees
//!
//! Archive layouts differ between releases, so a tool is looked up through an
//! ordered list of strategies: glob patterns from most to least specific, then
//! a full walk of the tree. The first strategy that yields a file wins, and
//! every strategy visits candidates in lexical order.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::path_utils;

use super::tools::{TOOL_SUFFIX, Tool};

/// A single lookup strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Glob relative to the root, e.g. `*/cjpegli.exe`
    Glob(&'static str),
    /// Recursive walk for a file containing `needle` and ending in `.exe`
    Walk { needle: &'static str },
}

impl Strategy {
    /// Run this strategy against `root`
    pub fn find(&self, root: &Path) -> Option<PathBuf> {
        match self {
            Strategy::Glob(pattern) => find_glob(root, pattern),
            Strategy::Walk { needle } => find_walk(root, needle),
        }
    }
}

/// Strategies for `tool`, highest priority first
pub fn strategies(tool: Tool) -> Vec<Strategy> {
    let mut strategies: Vec<Strategy> = tool
        .patterns()
        .iter()
        .map(|pattern| Strategy::Glob(pattern))
        .collect();
    strategies.push(Strategy::Walk {
        needle: tool.file_identifier(),
    });
    strategies
}

/// Find `tool` below `root`
///
/// Returns `None` when no strategy matches. A hit carrying the tool's name
/// marker is renamed on disk and the new path returned.
pub fn locate(root: &Path, tool: Tool) -> Option<PathBuf> {
    let found = strategies(tool).iter().find_map(|strategy| {
        let hit = strategy.find(root)?;
        debug!("{tool}: {strategy:?} matched {}", hit.display());
        Some(hit)
    })?;

    match tool.name_marker() {
        Some(marker) => Some(strip_marker(&found, marker)),
        None => Some(found),
    }
}

/// Check whether a glob pattern matches a relative path
///
/// Paths are normalized to forward slashes so patterns work on every platform.
pub fn matches_glob(pattern: &Glob<'_>, relative: &Path) -> bool {
    let normalized = path_utils::to_forward_slashes(relative);
    pattern
        .matched(&CandidatePath::from(normalized.as_str()))
        .is_some()
}

fn find_glob(root: &Path, pattern: &str) -> Option<PathBuf> {
    let glob = match Glob::new(pattern) {
        Ok(glob) => glob,
        Err(e) => {
            warn!("Invalid glob pattern '{pattern}': {e}");
            return None;
        }
    };
    // Only `*` segments are used, so a pattern only matches at its own depth
    let depth = pattern.split('/').count();

    WalkDir::new(root)
        .min_depth(depth)
        .max_depth(depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .is_ok_and(|relative| matches_glob(&glob, relative))
        })
        .map(walkdir::DirEntry::into_path)
}

fn find_walk(root: &Path, needle: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| {
            let name = entry.file_name().to_string_lossy();
            name.contains(needle) && name.ends_with(TOOL_SUFFIX)
        })
        .map(walkdir::DirEntry::into_path)
}

/// Rename `path` so its file name no longer contains `marker`
///
/// Falls back to the original path when the rename fails.
fn strip_marker(path: &Path, marker: &str) -> PathBuf {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
        return path.to_path_buf();
    };
    if !name.contains(marker) {
        return path.to_path_buf();
    }

    let renamed = path.with_file_name(name.replacen(marker, "", 1));
    match fs::rename(path, &renamed) {
        Ok(()) => {
            info!("Renamed {} to {}", path.display(), renamed.display());
            renamed
        }
        Err(e) => {
            warn!(
                "Failed to rename {} to {}: {e}",
                path.display(),
                renamed.display()
            );
            path.to_path_buf()
        }
    }
}
