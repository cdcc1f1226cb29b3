//! Console reporting for mirror runs
//!
//! This module renders the user-facing output: the begin/end banners,
//! per-URL outcome lines, a byte-level progress bar per transfer, and the
//! end-of-run statistics. All of it is informational; diagnostic detail goes
//! through `tracing` instead.

mod stats;

use crate::transfer::Outcome;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;

pub use stats::{print_statistics, MirrorStats};

/// Template for the per-file byte bar
///
/// `━━━━━━━━━━━━━━━━━━━━  1.21 MiB/2.00 MiB  634.22 KiB/s`
const TEMPLATE_BYTES: &str = "{msg:<24} {bar:40.green/black} {bytes:>11}/{total_bytes:<11} {bytes_per_sec:>13}";

/// Template for transfers with an unknown total size
const TEMPLATE_BYTES_UNKNOWN: &str = "{msg:<24} {spinner} {bytes:>11} {bytes_per_sec:>13}";

/// Renders user-facing progress for one mirror run
///
/// When quiet, every line and bar is suppressed; the run is otherwise
/// unaffected.
pub struct Reporter {
    multi: MultiProgress,
    enabled: bool,
}

impl Reporter {
    /// Creates a reporter
    ///
    /// # Arguments
    ///
    /// * `enabled` - Render output; false suppresses everything
    pub fn new(enabled: bool) -> Self {
        let multi = if enabled {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        Self { multi, enabled }
    }

    /// Prints the opening banner
    pub fn run_started(&self, url: &str, dir: &Path) {
        if !self.enabled {
            return;
        }
        println!("=== Mirror run started ===");
        println!("Source: {}", url);
        println!("Target: {}", dir.display());
        println!();
    }

    /// Prints the closing banner and the statistics block
    pub fn run_finished(&self, stats: &MirrorStats) {
        if !self.enabled {
            return;
        }
        println!();
        println!("=== Mirror run complete ===");
        println!();
        print_statistics(stats);
    }

    /// Reports a directory about to be explored
    pub fn exploring(&self, url: &str) {
        if self.enabled {
            println!("Exploring {}", url);
        }
    }

    /// Reports an entry dropped by the exclude filter
    pub fn excluded(&self, url: &str) {
        if self.enabled {
            println!("Skipping {} (excluded)", url);
        }
    }

    /// Reports the outcome of one file transfer
    pub fn outcome(&self, url: &str, outcome: &Outcome) {
        if !self.enabled {
            return;
        }
        match outcome {
            Outcome::Completed => println!("Downloaded {}", url),
            Outcome::AlreadyDownloaded => println!("Already have {}", url),
            Outcome::Failed(reason) => println!("Failed {}: {}", url, reason),
        }
    }

    /// Reports a fully processed directory
    pub fn finished_directory(&self, dir: &Path) {
        if self.enabled {
            println!("Finished directory {}", dir.display());
        }
    }

    /// Creates the byte bar for one file transfer
    ///
    /// # Arguments
    ///
    /// * `name` - Filename shown next to the bar
    /// * `total` - Expected total size; 0 renders a spinner without a total
    /// * `position` - Starting position, nonzero when resuming
    pub fn file_bar(&self, name: &str, total: u64, position: u64) -> ProgressBar {
        let bar = if total > 0 {
            let style = ProgressStyle::default_bar()
                .template(TEMPLATE_BYTES)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━╾─");
            ProgressBar::new(total).with_style(style)
        } else {
            let style = ProgressStyle::default_spinner()
                .template(TEMPLATE_BYTES_UNKNOWN)
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            ProgressBar::new_spinner().with_style(style)
        };

        let bar = self
            .multi
            .add(bar.with_message(name.to_string()).with_position(position));
        if !self.enabled {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar
    }
}
