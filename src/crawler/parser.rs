//! Link extraction from fetched pages
//!
//! Every `<a href>` on the page is resolved against the page URL. Pure
//! fragment links, special schemes and unresolvable hrefs are dropped here;
//! follow/exclude rules are applied by the scheduler.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable anchor targets in document order
///
/// Duplicates are kept; the scheduler's visited set takes care of them.
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use seed_harvest::crawler::extract_links;
/// use url::Url;
///
/// let html = Html::parse_document(r##"<a href="/a">A</a><a href="#top">Top</a>"##);
/// let base = Url::parse("https://example.com/index").unwrap();
/// let links = extract_links(&html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/a");
/// ```
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Convenience function for extracting links straight from HTML text
pub fn extract_links_simple(html: &str, base_url: &Url) -> Vec<Url> {
    extract_links(&Html::parse_document(html), base_url)
}
