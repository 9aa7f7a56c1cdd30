use url::Url;

/// Normalize a URL string into the key used for node identity.
///
/// The fragment is dropped and trailing slashes are stripped; scheme, host,
/// path and query are left as they are. Applying it twice gives the same
/// result as applying it once.
pub fn canonicalize(raw: &str) -> String {
    let without_fragment = match raw.find('#') {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    without_fragment.trim_end_matches('/').to_string()
}

/// Canonical key for a seed given as typed.
///
/// Extracted links come out of `Url::join`, which lower-cases the host and
/// drops a default port, so the seed goes through the same serialization
/// before [`canonicalize`]. Unparseable input is canonicalized as is.
pub fn canonicalize_seed(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) => canonicalize(url.as_str()),
        Err(_) => canonicalize(raw),
    }
}

/// Lower-cased host of a canonical URL, or an empty string if it has none.
pub fn domain_of(canonical: &str) -> String {
    Url::parse(canonical)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default()
}

/// True for `http://` and `https://` URLs.
pub fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
