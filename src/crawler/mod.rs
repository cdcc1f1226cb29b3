//! Crawler module for listing traversal and entry classification
//!
//! This module contains the core mirroring logic, including:
//! - HTTP fetching of listing pages and probe metadata
//! - HTML parsing and child link extraction
//! - Folder/file classification of discovered URLs
//! - Overall traversal coordination
//!
//! The traversal itself lives in [`Coordinator`]; [`mirror`] is the
//! one-call entry point built on top of it.

mod classifier;
mod coordinator;
mod fetcher;
mod parser;

pub use classifier::classify;
pub use coordinator::{mirror, Coordinator};
pub use fetcher::{Fetcher, ProbeInfo};
pub use parser::extract_children;
