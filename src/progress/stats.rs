//! Run statistics
//!
//! This module provides the counters accumulated over a mirror run and
//! their end-of-run display.

/// Mirror run statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorStats {
    /// Number of directories explored
    pub directories_explored: u64,

    /// Number of files downloaded to completion this run
    pub files_downloaded: u64,

    /// Number of files whose final copy already existed
    pub files_already_present: u64,

    /// Number of failed transfers
    pub files_failed: u64,

    /// Number of entries dropped by the exclude filter
    pub entries_excluded: u64,

    /// Total size in bytes of the files completed this run
    pub bytes_mirrored: u64,
}

impl MirrorStats {
    /// Returns the number of file entries the run decided on
    pub fn total_files(&self) -> u64 {
        self.files_downloaded + self.files_already_present + self.files_failed
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &MirrorStats) {
    println!("=== Mirror Statistics ===\n");

    println!("Overview:");
    println!("  Directories explored: {}", stats.directories_explored);
    println!("  Files seen: {}", stats.total_files());
    println!("  Excluded entries: {}", stats.entries_excluded);
    println!();

    println!("Transfers:");
    println!("  Downloaded: {}", stats.files_downloaded);
    println!("  Already present: {}", stats.files_already_present);
    println!("  Failed: {}", stats.files_failed);
    println!("  Bytes mirrored: {}", stats.bytes_mirrored);
}
