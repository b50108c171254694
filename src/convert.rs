//! Image conversion through the provisioned tools
//!
//! Each image is re-encoded by `cjpegli`, then `exiftool` copies the source's
//! metadata onto the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Result, convert as convert_error, fs as fs_error};
use crate::files;
use crate::path_utils;
use crate::provision::tools::Toolset;
use crate::settings::{MAX_DISTANCE, MIN_DISTANCE};

/// Suffix appended to a single converted file's stem
pub const SINGLE_FILE_SUFFIX: &str = ".jpegli.jpg";

/// Suffix appended to a converted folder's name
pub const FOLDER_SUFFIX: &str = "_jpegli-optimized";

/// Distance used when the configured one is not a number
const FALLBACK_DISTANCE: f64 = 1.0;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Sizes of one conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertStats {
    pub source_size: u64,
    pub target_size: u64,
}

impl ConvertStats {
    /// Target size relative to the source size
    pub fn ratio(&self) -> f64 {
        if self.source_size == 0 {
            return 1.0;
        }
        self.target_size as f64 / self.source_size as f64
    }

    /// Bytes saved, negative when the target grew
    pub fn saved(&self) -> i64 {
        self.source_size as i64 - self.target_size as i64
    }
}

/// One source image and where its conversion goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Accumulated statistics over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub source_size: u64,
    pub target_size: u64,
}

impl Summary {
    pub fn add(&mut self, stats: ConvertStats) {
        self.files += 1;
        self.source_size += stats.source_size;
        self.target_size += stats.target_size;
    }

    pub fn saved_mb(&self) -> f64 {
        (self.source_size as f64 - self.target_size as f64) / BYTES_PER_MB
    }

    pub fn original_mb(&self) -> f64 {
        self.source_size as f64 / BYTES_PER_MB
    }

    pub fn new_mb(&self) -> f64 {
        self.target_size as f64 / BYTES_PER_MB
    }

    /// Average size reduction in percent
    pub fn compression_percent(&self) -> f64 {
        if self.source_size == 0 {
            return 0.0;
        }
        (1.0 - self.target_size as f64 / self.source_size as f64) * 100.0
    }
}

/// Clamp a distance into the range `cjpegli` accepts
pub fn clamp_distance(distance: f64) -> f64 {
    if distance.is_nan() {
        return FALLBACK_DISTANCE;
    }
    distance.clamp(MIN_DISTANCE, MAX_DISTANCE)
}

/// Target for a single file: `<dir>/<stem>.jpegli.jpg`
pub fn single_file_target(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    source.with_file_name(format!("{stem}{SINGLE_FILE_SUFFIX}"))
}

/// Output folder for a folder input: `<folder>_jpegli-optimized`
pub fn optimized_folder(folder: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(folder)?;
    let cleaned = path_utils::clean_path(&absolute);
    let name = cleaned
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| convert_error::input_not_found(folder.display().to_string()))?;
    Ok(cleaned.with_file_name(format!("{name}{FOLDER_SUFFIX}")))
}

/// Target for a file inside a converted folder
///
/// JPEG names are kept, other formats get a `.jpg` extension.
pub fn folder_file_target(output_dir: &Path, source: &Path) -> PathBuf {
    let name = source.file_name().unwrap_or_default();
    let target = output_dir.join(name);
    if files::is_jpeg(source) {
        target
    } else {
        target.with_extension("jpg")
    }
}

/// Pair every collected file with its target
///
/// `input` is what the user passed: a folder sends every image into the
/// optimized folder, a file converts next to itself.
pub fn plan(input: &Path, sources: Vec<PathBuf>) -> Result<Vec<Job>> {
    if input.is_dir() {
        let output_dir = optimized_folder(input)?;
        Ok(sources
            .into_iter()
            .map(|source| Job {
                target: folder_file_target(&output_dir, &source),
                source,
            })
            .collect())
    } else {
        Ok(sources
            .into_iter()
            .map(|source| Job {
                target: single_file_target(&source),
                source,
            })
            .collect())
    }
}

/// Convert `source` into `target` and copy its metadata
pub fn convert(
    toolset: &Toolset,
    distance: f64,
    source: &Path,
    target: &Path,
) -> Result<ConvertStats> {
    let source_size = fs::metadata(source)
        .map_err(|_| convert_error::input_not_found(source.display().to_string()))?
        .len();

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            fs_error::create_dir_failed(parent.display().to_string(), e.to_string())
        })?;
    }

    let distance = format!("{:.1}", clamp_distance(distance));
    let mut encode = Command::new(&toolset.cjpegli);
    encode.arg(source).arg(target).args(["-d", &distance]);
    run_tool("cjpegli", &mut encode)?;

    let mut tags = Command::new(&toolset.exiftool);
    tags.args(["-overwrite_original", "-TagsFromFile"])
        .arg(source)
        .arg(target);
    run_tool("exiftool", &mut tags)?;

    let target_size = fs::metadata(target)
        .map_err(|e| {
            convert_error::tool_failed("cjpegli", format!("no output at {}: {e}", target.display()))
        })?
        .len();

    Ok(ConvertStats {
        source_size,
        target_size,
    })
}

fn run_tool(name: &str, command: &mut Command) -> Result<()> {
    debug!("Running {command:?}");
    let output = command
        .output()
        .map_err(|e| convert_error::tool_failed(name, e.to_string()))?;

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(convert_error::tool_failed(
            name,
            format!("{}\nOutput: {}", output.status, combined.trim()),
        ));
    }
    Ok(())
}
