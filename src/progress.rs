//! Progress bar display for batch conversions

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for a batch of images
pub struct ProgressDisplay {
    /// One tick per converted image
    file_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total file count
    pub fn new(total_files: u64) -> Self {
        let file_pb = ProgressBar::new(total_files);
        if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            file_pb.set_style(style.progress_chars("#>-"));
        }

        Self { file_pb }
    }

    /// A display that draws nothing, for single-file runs and tests
    pub fn hidden() -> Self {
        Self {
            file_pb: ProgressBar::hidden(),
        }
    }

    /// Show the file being converted
    pub fn start_file(&self, file_path: &str) {
        // Truncate long paths for display
        let display_path = if file_path.chars().count() > 50 {
            let tail: String = file_path
                .chars()
                .rev()
                .take(47)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{tail}")
        } else {
            file_path.to_string()
        };
        self.file_pb.set_message(display_path);
    }

    /// Print a line above the bar
    pub fn println(&self, line: impl AsRef<str>) {
        self.file_pb.println(line);
    }

    pub fn inc(&self) {
        self.file_pb.inc(1);
    }

    pub fn finish(&self) {
        self.file_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.file_pb.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_display_counts() {
        let display = ProgressDisplay::hidden();
        display.start_file("photo.jpg");
        display.inc();
        display.inc();
        assert_eq!(display.file_pb.position(), 2);
        display.finish();
    }

    #[test]
    fn test_long_path_is_truncated() {
        let display = ProgressDisplay::hidden();
        let long = format!("/{}", "a".repeat(80));
        display.start_file(&long);
        let message = display.file_pb.message();
        assert!(message.starts_with("..."));
        assert_eq!(message.chars().count(), 50);
    }
}
