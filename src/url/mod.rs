//! URL handling module for dirmirror
//!
//! This module provides the mapping from listing URLs to local filenames and
//! the filename-heuristic side of entry classification.

mod segment;

use crate::config::Filters;

// Re-export main functions
pub use segment::remote_name;

/// Entry classification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Directory listing - should be explored
    Folder,
    /// Downloadable file
    File,
    /// File matching an exclude filter - dropped without transfer
    ExcludedFile,
}

impl EntryKind {
    /// Returns true if the entry should be explored as a directory
    pub fn should_descend(&self) -> bool {
        matches!(self, Self::Folder)
    }

    /// Returns true if the entry should be downloaded
    pub fn should_download(&self) -> bool {
        matches!(self, Self::File)
    }
}

/// Classifies a filename without network I/O
///
/// This function checks the name against the filter configuration in the
/// following priority order:
/// 1. Empty name or folder-marker match (highest priority) - Folder
/// 2. Exclude list - ExcludedFile
/// 3. Include list - File on match, or when no include filter is set
/// 4. Folder otherwise
///
/// Results from steps 1 and 2 are final. Results from steps 3 and 4 are
/// tentative: listing pages name files and directories ambiguously, so a
/// HEAD probe may overturn them (see [`crate::crawler::classify`]).
///
/// # Arguments
///
/// * `name` - The candidate filename, from [`remote_name`]
/// * `filters` - The filter configuration
///
/// # Returns
///
/// The tentative classification of the name
///
/// # Examples
///
/// ```
/// use dirmirror::config::Filters;
/// use dirmirror::url::{tentative_kind, EntryKind};
///
/// let filters = Filters::default().with_builtins();
/// assert_eq!(tentative_kind("data.bin", &filters), EntryKind::File);
/// assert_eq!(tentative_kind("", &filters), EntryKind::Folder);
/// ```
pub fn tentative_kind(name: &str, filters: &Filters) -> EntryKind {
    // Priority 1: directory names
    if filters.is_folder_name(name) {
        return EntryKind::Folder;
    }

    // Priority 2: excluded names
    if filters.exclude_extensions.iter().any(|e| name.contains(e)) {
        return EntryKind::ExcludedFile;
    }

    // Priority 3: wanted names
    if filters.is_catch_all() || filters.include_extensions.iter().any(|i| name.contains(i)) {
        return EntryKind::File;
    }

    // Default: a name outside the include list is assumed to be a directory
    EntryKind::Folder
}
