//! Listing page parser
//!
//! This module extracts the child URLs of an autoindex page:
//! - Every `<a href="...">` target, in page order
//! - Each href appended to the directory URL with a single separator
//! - Candidates dropped when they would leave the listing tree
//!
//! Resolution is plain string concatenation rather than RFC 3986 joining:
//! the disqualifier check must see parent-directory links (`../`) exactly as
//! they appear in the page, and the scheme-separator guard counts `//`
//! occurrences in the concatenated form. A joining resolver would collapse
//! both before the checks could run.

use crate::config::Filters;
use scraper::{Html, Selector};

/// Extracts the child URLs of a directory listing page
///
/// # Candidate Rules
///
/// **Include:**
/// - `<a href="...">` targets, resolved as `directory URL + href`
///
/// **Exclude:**
/// - Candidates with more than one `//` occurrence (absolute and
///   protocol-relative hrefs that point outside the listing tree)
/// - Candidates containing a disqualifying substring (parent-directory and
///   mail links by default)
///
/// # Arguments
///
/// * `html` - The listing page body
/// * `dir_url` - The URL of the directory the page describes
/// * `filters` - Filter configuration carrying the disqualifying substrings
///
/// # Returns
///
/// Child URLs in page order
///
/// # Example
///
/// ```
/// use dirmirror::config::Filters;
/// use dirmirror::crawler::extract_children;
///
/// let html = r#"<html><body><a href="../">Parent</a><a href="data.bin">data.bin</a></body></html>"#;
/// let filters = Filters::default().with_builtins();
/// let children = extract_children(html, "https://example.com/files/", &filters);
/// assert_eq!(children, vec!["https://example.com/files/data.bin"]);
/// ```
pub fn extract_children(html: &str, dir_url: &str, filters: &Filters) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut base = dir_url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }

    let mut children = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(child) = resolve_child(&base, href, filters) {
                    children.push(child);
                }
            }
        }
    }

    children
}

/// Resolves one href against the listing URL and validates the candidate
///
/// Returns None if the candidate should be dropped:
/// - More than one scheme separator after concatenation
/// - Any disqualifying substring
fn resolve_child(base: &str, href: &str, filters: &Filters) -> Option<String> {
    let candidate = format!("{}{}", base, href);

    if candidate.matches("//").count() != 1 {
        return None;
    }

    if filters
        .skip_substrings
        .iter()
        .any(|skip| candidate.contains(skip))
    {
        return None;
    }

    Some(candidate)
}
