use url::Url;

/// Extracts the last non-empty path segment of a URL
///
/// This is the candidate local filename for a discovered link. The query and
/// fragment are ignored, and trailing slashes do not produce an empty name:
/// `https://host/data/sub/` maps to `sub`. A URL that fails to parse, or
/// whose path has no non-empty segment, yields an empty string.
///
/// # Arguments
///
/// * `url` - The URL to map
///
/// # Returns
///
/// The last non-empty path segment, or an empty string
///
/// # Examples
///
/// ```
/// use dirmirror::url::remote_name;
///
/// assert_eq!(remote_name("https://example.com/data/file.txt"), "file.txt");
/// assert_eq!(remote_name("https://example.com/data/sub/"), "sub");
/// assert_eq!(remote_name("https://example.com/"), "");
/// ```
pub fn remote_name(url: &str) -> String {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return String::new(),
    };

    parsed
        .path()
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
        .to_string()
}
