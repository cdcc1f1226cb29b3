//! Dirmirror: an HTTP directory-listing mirror
//!
//! This crate mirrors Apache/nginx-style autoindex pages onto the local
//! filesystem, classifying discovered links as folders or files, downloading
//! files with byte-range resumption, and recreating the remote tree locally.

pub mod config;
pub mod crawler;
pub mod progress;
pub mod transfer;
pub mod url;

use thiserror::Error;

/// Main error type for mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Network-level errors for a single HEAD or GET
///
/// These never abort a crawl: each use site degrades to a default
/// (empty listing, kept tentative classification, failed transfer).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode body for {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Transfer from {url} stalled")]
    Stalled { url: String },

    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for single-request network operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{mirror, Coordinator};
// `self::` keeps the module from colliding with the url crate
pub use self::url::{remote_name, tentative_kind, EntryKind};
pub use transfer::Outcome;
