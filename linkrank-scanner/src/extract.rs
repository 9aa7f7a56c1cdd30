use crate::canonical::{canonicalize, is_http};
use scraper::{Html, Selector};
use url::Url;

/// Maximum number of links taken from a single page.
pub const MAX_LINKS_PER_PAGE: usize = 250;

const NON_NAVIGABLE_SCHEMES: [&str; 3] = ["mailto:", "tel:", "javascript:"];

/// Extract the http(s) link targets of an HTML document, canonicalized and
/// resolved against `base_url`, keeping the first [`MAX_LINKS_PER_PAGE`].
pub fn extract_links(base_url: &str, html: &str) -> Vec<String> {
    extract_links_with_limit(base_url, html, MAX_LINKS_PER_PAGE)
}

/// Same as [`extract_links`] with an explicit per-page cap.
///
/// Links are returned in document order; the cap truncates, it never
/// samples. Repeated links are kept so the cap counts anchors the way they
/// appear on the page.
pub fn extract_links_with_limit(base_url: &str, html: &str, limit: usize) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(&base, href))
        .take(limit)
        .collect()
}

fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || is_non_navigable(href) {
        return None;
    }

    let resolved = base.join(href).ok()?;
    let canonical = canonicalize(resolved.as_str());
    is_http(&canonical).then_some(canonical)
}

fn is_non_navigable(href: &str) -> bool {
    let lowered = href.to_ascii_lowercase();
    NON_NAVIGABLE_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
}
