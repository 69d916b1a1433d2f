//! Batch progress display for multi-image runs

use crate::synthesis::Intensity;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {prefix} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar tracking images written in a batch
pub struct ProgressManager {
    bar: ProgressBar,
    completed: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a hidden progress manager; call [`ProgressManager::initialize`] to show it
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            completed: 0,
        }
    }

    /// Show a bar sized for `image_count` images of one tier
    pub fn initialize(&mut self, image_count: usize, intensity: Intensity) {
        let bar = ProgressBar::new(image_count as u64);
        bar.set_style(BATCH_STYLE.clone());
        bar.set_prefix(intensity.name());
        self.bar = bar;
        self.completed = 0;
    }

    /// Advance by one finished image
    pub fn complete_image(&mut self, path: &Path) {
        self.completed += 1;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        self.bar.set_message(name);
        self.bar.inc(1);
    }

    /// Images finished since the last [`ProgressManager::initialize`]
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Close the bar with a summary message
    pub fn finish(&self) {
        self.bar
            .finish_with_message(format!("{} images written", self.completed));
    }
}
