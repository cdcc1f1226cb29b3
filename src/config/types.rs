use serde::Deserialize;

/// Parent-directory link emitted at the top of every autoindex page
const PARENT_LINK: &str = "../";

/// Mail links present in some server footers
const MAILTO_LINK: &str = "mailto:";

/// Main configuration structure for dirmirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub job: JobConfig,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub filters: Filters,
}

/// Mirror job configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Root listing URL the mirror starts from
    pub url: String,

    /// Local directory the mirror tree is rooted at
    #[serde(default = "default_directory")]
    pub directory: String,
}

/// HTTP basic authentication, applied to every HEAD and GET
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Filename and link filter configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Filters {
    /// Substrings a filename must contain to be downloaded; empty matches all
    #[serde(default, rename = "include-extensions")]
    pub include_extensions: Vec<String>,

    /// Substrings that mark a filename as unwanted
    #[serde(default, rename = "exclude-extensions")]
    pub exclude_extensions: Vec<String>,

    /// Substrings that force a name to classify as a folder
    #[serde(default, rename = "folder-markers")]
    pub folder_markers: Vec<String>,

    /// Substrings that disqualify a discovered link entirely
    #[serde(default, rename = "skip-substrings")]
    pub skip_substrings: Vec<String>,

    /// Treat HTML pages as downloadable files instead of listings
    #[serde(default, rename = "download-html")]
    pub download_html: bool,
}

impl Filters {
    /// Prepends the built-in filter values to the configured ones
    ///
    /// The parent-directory link always marks a folder and is never followed,
    /// and mail links are never followed. Configured values extend these
    /// built-ins rather than replacing them.
    pub fn with_builtins(mut self) -> Self {
        let mut markers = vec![PARENT_LINK.to_string()];
        markers.append(&mut self.folder_markers);
        self.folder_markers = markers;

        let mut skips = vec![PARENT_LINK.to_string(), MAILTO_LINK.to_string()];
        skips.append(&mut self.skip_substrings);
        self.skip_substrings = skips;

        self
    }

    /// Returns true when no include filter is configured
    ///
    /// Without an include list every non-excluded filename is wanted.
    pub fn is_catch_all(&self) -> bool {
        self.include_extensions.is_empty()
    }

    /// Returns true when a name is pinned as a folder
    ///
    /// Empty names and names containing a folder marker never classify as
    /// files, regardless of what a probe reports.
    pub fn is_folder_name(&self, name: &str) -> bool {
        name.is_empty() || self.folder_markers.iter().any(|marker| name.contains(marker))
    }
}

fn default_directory() -> String {
    "./".to_string()
}
