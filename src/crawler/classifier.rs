//! Entry classification
//!
//! This module combines the filename heuristics with a live HEAD probe.
//! Listing pages name files and directories ambiguously, so the tentative
//! heuristic result is checked against what the server reports:
//! - An autoindex page arrives as compressed HTML, which resolves an
//!   ambiguous name to a folder (or to a file when HTML downloads are wanted)
//! - Any other fully identified 2xx response is a file
//! - A failed probe or missing headers leaves the tentative result in place
//!
//! Marker-pinned folders and excluded names skip the probe entirely; no
//! server response may overturn them.

use crate::config::Filters;
use crate::crawler::fetcher::{Fetcher, ProbeInfo};
use crate::url::{remote_name, tentative_kind, EntryKind};
use tracing::warn;

/// Classifies a URL as folder, file, or excluded file
///
/// Issues at most one HEAD request. Pinned names (empty, folder-marker, or
/// excluded) return without touching the network.
///
/// # Arguments
///
/// * `fetcher` - The shared fetcher for the probe
/// * `url` - The URL to classify
/// * `filters` - Filter configuration
///
/// # Returns
///
/// The final classification of the URL
pub async fn classify(fetcher: &Fetcher, url: &str, filters: &Filters) -> EntryKind {
    let name = remote_name(url);
    let tentative = tentative_kind(&name, filters);

    // Folder markers and exclusions are final; only the ambiguous
    // file-or-folder names are worth a probe.
    if filters.is_folder_name(&name) || tentative == EntryKind::ExcludedFile {
        return tentative;
    }

    match fetcher.head_probe(url).await {
        Ok(probe) => apply_probe(&name, tentative, &probe, filters),
        Err(e) => {
            warn!(
                "Probe failed for {}: {}; keeping tentative {:?}",
                url, e, tentative
            );
            tentative
        }
    }
}

/// Applies the probe verdict to a tentative classification
///
/// The server adjudicates only when it identified the content: the
/// compressed-HTML check needs both the encoding and the type header, and a
/// response without an encoding header keeps the tentative result.
fn apply_probe(
    name: &str,
    tentative: EntryKind,
    probe: &ProbeInfo,
    filters: &Filters,
) -> EntryKind {
    let encoding = match &probe.content_encoding {
        Some(encoding) => encoding,
        None => return tentative,
    };

    if encoding.contains("gzip") {
        let content_type = match &probe.content_type {
            Some(content_type) => content_type,
            None => return tentative,
        };

        if content_type.contains("html") {
            // The autoindex signature
            if filters.download_html || name.contains("htm") {
                return EntryKind::File;
            }
            return EntryKind::Folder;
        }
    }

    EntryKind::File
}
