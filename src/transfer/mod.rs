//! Resumable file transfer
//!
//! This module downloads one file into the current mirror directory. An
//! interrupted transfer leaves `<name>.tmp` behind; the next run measures
//! it, asks the server for the remainder with a `Range` header, and
//! reconciles the reply against the resume offset:
//! - `206 Partial Content` - the server honored the range, so every
//!   received byte is appended
//! - `200 OK` - the server ignored it and replayed the whole file, so bytes
//!   below the offset are skipped, slicing the chunk that straddles the
//!   boundary
//!
//! The temporary file becomes the final file only when the caller renames it
//! after a `Completed` outcome, so a partial `.tmp` never masquerades as a
//! finished download.

use crate::crawler::Fetcher;
use crate::progress::Reporter;
use crate::url::remote_name;
use crate::{FetchError, FetchResult};
use futures_util::{Stream, StreamExt};
use indicatif::ProgressBar;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tracing::debug;

/// Reserved suffix marking an in-progress download
pub const PART_SUFFIX: &str = ".tmp";

/// Deadline for each chunk read on a streaming transfer
///
/// A transfer GET carries no total deadline so a large file on a slow link
/// is never cut off mid-stream; a peer that stops sending altogether fails
/// the transfer here instead of hanging it.
const STALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a single file transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every byte is in the temporary file, ready to be renamed into place
    Completed,
    /// The final file already exists on disk
    AlreadyDownloaded,
    /// The transfer failed; any partial data is kept for resumption
    Failed(String),
}

/// Returns the final and temporary paths for a URL inside a directory
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dirmirror::transfer::target_paths;
///
/// let (target, temp) = target_paths("https://example.com/d/data.bin", Path::new("mirror"));
/// assert_eq!(target, Path::new("mirror/data.bin"));
/// assert_eq!(temp, Path::new("mirror/data.bin.tmp"));
/// ```
pub fn target_paths(url: &str, dir: &Path) -> (PathBuf, PathBuf) {
    let name = remote_name(url);
    let target = dir.join(&name);
    let temp = dir.join(format!("{}{}", name, PART_SUFFIX));
    (target, temp)
}

/// Downloads one file, resuming a previous partial transfer if present
///
/// Failures never propagate: transport and filesystem errors both collapse
/// into a `Failed` outcome and the crawl moves on. On `Completed` the bytes
/// sit in the temporary path; renaming them into place is the caller's move.
///
/// # Arguments
///
/// * `fetcher` - The shared fetcher
/// * `url` - The file URL
/// * `dir` - The mirror directory the file belongs in
/// * `reporter` - Progress display for the byte bar
pub async fn fetch(fetcher: &Fetcher, url: &str, dir: &Path, reporter: &Reporter) -> Outcome {
    match run(fetcher, url, dir, reporter).await {
        Ok(outcome) => outcome,
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

async fn run(
    fetcher: &Fetcher,
    url: &str,
    dir: &Path,
    reporter: &Reporter,
) -> FetchResult<Outcome> {
    let (target, temp) = target_paths(url, dir);
    let name = remote_name(url);

    // Reachability check and size in one request; identity encoding keeps
    // the total honest against the bytes the GET will stream.
    let total = fetcher.head_size(url).await?;

    let offset = match fs::metadata(&temp).await {
        Ok(meta) => meta.len(),
        Err(_) => 0,
    };

    if fs::metadata(&target).await.is_ok() {
        return Ok(Outcome::AlreadyDownloaded);
    }

    // A temp file that already holds every byte needs no request; asking the
    // server for `bytes=<total>-` would only earn a 416.
    if total > 0 && offset >= total {
        debug!("Temp file for {} already complete at {} bytes", url, offset);
        return Ok(Outcome::Completed);
    }

    let response = fetcher.get_file(url, offset).await?;
    let honored = response.status() == StatusCode::PARTIAL_CONTENT;

    // With a 206 the stream starts at the offset; with a 200 the server
    // replays the file from byte zero and the prefix is already on disk.
    let skip_until = if honored { 0 } else { offset };

    if offset > 0 {
        debug!(
            "Resuming {} at offset {} (range honored: {})",
            url, offset, honored
        );
    }

    let bar = reporter.file_bar(&name, total, if honored { offset } else { 0 });

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&temp)
        .await
        .map_err(|source| FetchError::Io {
            path: temp.display().to_string(),
            source,
        })?;

    let stream = response.bytes_stream();
    write_body(stream, &mut file, &bar, skip_until, STALL_TIMEOUT, url, &temp).await?;

    bar.finish_and_clear();
    Ok(Outcome::Completed)
}

/// Streams the response body into the temp file
///
/// Each chunk read is bounded by `stall`: a peer that goes silent mid-body
/// fails the transfer with what arrived already flushed to disk, so the next
/// run resumes past it.
async fn write_body<S, B>(
    mut stream: S,
    file: &mut fs::File,
    bar: &ProgressBar,
    skip_until: u64,
    stall: Duration,
    url: &str,
    temp: &Path,
) -> FetchResult<()>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut seen: u64 = 0;

    loop {
        let item = match timeout(stall, stream.next()).await {
            Ok(Some(item)) => item,
            Ok(None) => break,
            Err(_) => {
                file.flush().await.map_err(|source| FetchError::Io {
                    path: temp.display().to_string(),
                    source,
                })?;
                return Err(FetchError::Stalled {
                    url: url.to_string(),
                });
            }
        };

        let chunk = item.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        let bytes = chunk.as_ref();

        let start = seen;
        seen += bytes.len() as u64;
        bar.inc(bytes.len() as u64);

        if seen <= skip_until {
            continue;
        }

        // Slice off the part of this chunk that is below the boundary
        let from = skip_until.saturating_sub(start) as usize;
        file.write_all(&bytes[from..])
            .await
            .map_err(|source| FetchError::Io {
                path: temp.display().to_string(),
                source,
            })?;
    }

    file.flush().await.map_err(|source| FetchError::Io {
        path: temp.display().to_string(),
        source,
    })
}
