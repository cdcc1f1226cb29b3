//! Mirror coordinator - main traversal orchestration logic
//!
//! This module walks the remote listing tree and mirrors it locally:
//! - An explicit frame stack replaces per-depth recursion, so a deep remote
//!   tree never threatens the call stack
//! - Each frame pairs the worklist of one remote directory with the local
//!   directory it mirrors into, and that local path travels with the frame
//!   instead of living in a shared mutable field
//! - Classified entries are dispatched: folders push a child frame, files
//!   go to the transfer module, excluded names are dropped
//!
//! No error escapes the traversal once it is running: fetch and filesystem
//! failures degrade to empty listings or failed transfers and the walk
//! continues. Only setup (client construction, configuration) can fail the
//! run as a whole.

use crate::config::{Config, Filters};
use crate::crawler::classifier::classify;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_children;
use crate::progress::{MirrorStats, Reporter};
use crate::transfer::{self, Outcome};
use crate::url::{remote_name, EntryKind};
use crate::MirrorError;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One traversal level: the pending URLs of a remote directory and the
/// local directory they mirror into
struct Frame {
    worklist: VecDeque<String>,
    dir: PathBuf,
}

/// Main mirror coordinator structure
pub struct Coordinator {
    fetcher: Fetcher,
    filters: Filters,
    reporter: Reporter,
    root_url: String,
    root_dir: PathBuf,
    stats: MirrorStats,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The mirror configuration
    /// * `quiet` - Suppress console output
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MirrorError)` - Failed to build the HTTP client
    pub fn new(config: Config, quiet: bool) -> Result<Self, MirrorError> {
        let fetcher = Fetcher::new(config.auth)?;

        let configured = PathBuf::from(&config.job.directory);
        let root_dir = if configured.exists() {
            configured
        } else {
            warn!(
                "Directory {} does not exist, mirroring into the current directory",
                configured.display()
            );
            PathBuf::from(".")
        };

        Ok(Self {
            fetcher,
            filters: config.filters,
            reporter: Reporter::new(!quiet),
            root_url: config.job.url,
            root_dir,
            stats: MirrorStats::default(),
        })
    }

    /// Runs the mirror traversal to completion
    ///
    /// The walk ends when the root frame drains. Individual failures are
    /// reported and counted but never abort the run, so the returned
    /// statistics are the only place partial failure shows up.
    pub async fn run(&mut self) -> Result<MirrorStats, MirrorError> {
        info!("Starting mirror of {}", self.root_url);
        self.reporter.run_started(&self.root_url, &self.root_dir);

        let mut stack = vec![Frame {
            worklist: VecDeque::from([self.root_url.clone()]),
            dir: self.root_dir.clone(),
        }];

        while let Some(frame) = stack.last_mut() {
            let url = match frame.worklist.pop_front() {
                Some(url) => url,
                None => {
                    // Level drained: ascend one directory
                    if let Some(finished) = stack.pop() {
                        self.reporter.finished_directory(&finished.dir);
                    }
                    continue;
                }
            };
            let dir = frame.dir.clone();

            let kind = classify(&self.fetcher, &url, &self.filters).await;
            debug!("Classified {} as {:?}", url, kind);

            match kind {
                EntryKind::Folder => {
                    if let Some(child) = self.explore(&url, &dir).await {
                        stack.push(child);
                    }
                }
                EntryKind::File => self.download(&url, &dir).await,
                EntryKind::ExcludedFile => {
                    self.reporter.excluded(&url);
                    self.stats.entries_excluded += 1;
                }
            }
        }

        info!(
            "Mirror complete: {} directories, {} files downloaded, {} failed",
            self.stats.directories_explored, self.stats.files_downloaded, self.stats.files_failed
        );
        self.reporter.run_finished(&self.stats);

        Ok(self.stats.clone())
    }

    /// Explores one directory and prepares its traversal frame
    ///
    /// Returns None when the listing cannot be fetched; the walk then
    /// continues with the remaining entries instead of descending.
    async fn explore(&mut self, url: &str, dir: &Path) -> Option<Frame> {
        self.reporter.exploring(url);

        let html = match self.fetcher.fetch_listing(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Listing fetch failed for {}: {}", url, e);
                return None;
            }
        };

        let children = extract_children(&html, url, &self.filters);
        self.stats.directories_explored += 1;
        debug!("Found {} entries under {}", children.len(), url);

        let segment = remote_name(url);
        let child_dir = if segment.is_empty() {
            dir.to_path_buf()
        } else {
            dir.join(&segment)
        };

        if let Err(e) = tokio::fs::create_dir_all(&child_dir).await {
            warn!("Cannot create {}: {}", child_dir.display(), e);
        }

        Some(Frame {
            worklist: children.into(),
            dir: child_dir,
        })
    }

    /// Downloads one file and moves it into place on success
    async fn download(&mut self, url: &str, dir: &Path) {
        let mut outcome = transfer::fetch(&self.fetcher, url, dir, &self.reporter).await;

        if outcome == Outcome::Completed {
            let (target, temp) = transfer::target_paths(url, dir);
            match tokio::fs::rename(&temp, &target).await {
                Ok(()) => {
                    if let Ok(meta) = tokio::fs::metadata(&target).await {
                        self.stats.bytes_mirrored += meta.len();
                    }
                }
                Err(e) => {
                    outcome = Outcome::Failed(format!("cannot move into place: {}", e));
                }
            }
        }

        match &outcome {
            Outcome::Completed => self.stats.files_downloaded += 1,
            Outcome::AlreadyDownloaded => self.stats.files_already_present += 1,
            Outcome::Failed(reason) => {
                warn!("Transfer failed for {}: {}", url, reason);
                self.stats.files_failed += 1;
            }
        }

        self.reporter.outcome(url, &outcome);
    }
}

/// Runs a complete mirror operation
///
/// # Arguments
///
/// * `config` - The mirror configuration
/// * `quiet` - Suppress console output
///
/// # Returns
///
/// * `Ok(MirrorStats)` - Traversal finished; statistics for the run
/// * `Err(MirrorError)` - Setup failed before the traversal started
///
/// # Example
///
/// ```no_run
/// use dirmirror::config::load_config;
/// use dirmirror::crawler::mirror;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("mirror.toml"))?;
/// let stats = mirror(config, false).await?;
/// println!("Downloaded {} files", stats.files_downloaded);
/// # Ok(())
/// # }
/// ```
pub async fn mirror(config: Config, quiet: bool) -> Result<MirrorStats, MirrorError> {
    let mut coordinator = Coordinator::new(config, quiet)?;
    coordinator.run().await
}
