//! Spinner shown while the runtime is downloaded

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use edge_bundler::BridgeConfig;

/// Spinner driven by the bridge's download hooks
#[derive(Clone)]
pub struct DownloadSpinner {
    pb: ProgressBar,
}

impl DownloadSpinner {
    pub fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let pb = ProgressBar::new_spinner();
        pb.set_style(style);

        Self { pb }
    }

    fn start(&self) {
        self.pb.set_message("Downloading runtime...");
        self.pb.enable_steady_tick(Duration::from_millis(100));
    }

    /// Stop and erase the spinner
    ///
    /// Runs as the after-download hook, and from commands when a download
    /// fails before that hook fires.
    pub fn clear(&self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }

    /// Install the spinner as `config`'s download hooks
    pub fn attach(self, config: BridgeConfig) -> BridgeConfig {
        let before = self.clone();
        config
            .on_before_download(move || before.start())
            .on_after_download(move || self.clear())
    }
}

impl Default for DownloadSpinner {
    fn default() -> Self {
        Self::new()
    }
}
