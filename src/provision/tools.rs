//! The two bundled tools and their resolved paths

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, provision};

/// Suffix of the bundled executables (the toolset ships Windows binaries)
pub const TOOL_SUFFIX: &str = ".exe";

/// A tool shipped in the bundled archives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// `cjpegli`, the jpegli encoder
    Cjpegli,
    /// `exiftool`, used to copy metadata to the encoded file
    Exiftool,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Cjpegli, Tool::Exiftool];

    /// Substring of an archive (or extraction tree) name that carries this tool
    pub fn archive_identifier(self) -> &'static str {
        match self {
            Tool::Cjpegli => "jpegli",
            Tool::Exiftool => "exiftool",
        }
    }

    /// Substring every executable of this tool contains
    pub fn file_identifier(self) -> &'static str {
        match self {
            Tool::Cjpegli => "cjpegli",
            Tool::Exiftool => "exiftool",
        }
    }

    /// Variant marker to strip from the shipped file name
    ///
    /// ExifTool's Windows build ships as `exiftool(-k).exe`, which waits for a
    /// key press on exit.
    pub fn name_marker(self) -> Option<&'static str> {
        match self {
            Tool::Cjpegli => None,
            Tool::Exiftool => Some("(-k)"),
        }
    }

    /// Glob patterns relative to an extraction tree, highest priority first
    ///
    /// Parentheses are glob metacharacters and are escaped.
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            Tool::Cjpegli => &[
                "cjpegli.exe",
                "*/cjpegli.exe",
                "*/*/cjpegli.exe",
                "bin/cjpegli.exe",
            ],
            Tool::Exiftool => &[
                "exiftool.exe",
                r"exiftool\(-k\).exe",
                "*/exiftool.exe",
                r"*/exiftool\(-k\).exe",
                "*/*/exiftool.exe",
                r"*/*/exiftool\(-k\).exe",
            ],
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_identifier())
    }
}

/// Resolved tool paths; `None` means not found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutablePaths {
    /// `cjpegli`
    pub image_tool: Option<PathBuf>,
    /// `exiftool`
    pub metadata_tool: Option<PathBuf>,
}

impl ExecutablePaths {
    pub fn get(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Cjpegli => self.image_tool.as_deref(),
            Tool::Exiftool => self.metadata_tool.as_deref(),
        }
    }

    /// Record a path unless one was already found (first found wins)
    pub fn record(&mut self, tool: Tool, path: PathBuf) {
        let slot = match tool {
            Tool::Cjpegli => &mut self.image_tool,
            Tool::Exiftool => &mut self.metadata_tool,
        };
        if slot.is_none() {
            *slot = Some(path);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.image_tool.is_some() && self.metadata_tool.is_some()
    }

    /// Verify both tools were found
    ///
    /// `searched` names the location reported when a tool is missing.
    pub fn require(self, searched: &Path) -> Result<Toolset> {
        let searched = searched.display().to_string();
        let cjpegli = self
            .image_tool
            .ok_or_else(|| provision::tool_not_found(Tool::Cjpegli.to_string(), &searched))?;
        let exiftool = self
            .metadata_tool
            .ok_or_else(|| provision::tool_not_found(Tool::Exiftool.to_string(), &searched))?;
        Ok(Toolset { cjpegli, exiftool })
    }
}

/// Verified pair of tool executables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolset {
    pub cjpegli: PathBuf,
    pub exiftool: PathBuf,
}
