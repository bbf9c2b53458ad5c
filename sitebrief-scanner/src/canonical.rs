// URL identity and domain scoping for the crawl frontier

use crate::error::{Result, ScanError};
use url::Url;

/// Strip the query and fragment from a parsed URL.
pub fn canonical(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url.set_query(None);
    url
}

/// Parse `raw` and return its canonical string form.
///
/// Canonicalizing an already canonical URL returns it unchanged, so two URLs
/// that differ only in query or fragment end up with the same identity.
pub fn canonicalize(raw: &str) -> Result<String> {
    let parsed =
        Url::parse(raw).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))?;
    Ok(canonical(&parsed).to_string())
}

/// `[user[:password]@]host[:port]`, the part of the URL that decides crawl scope.
///
/// Default ports are already dropped by URL parsing, so `https://a.com:443`
/// and `https://a.com` share a network location.
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let mut location = String::new();

    if !url.username().is_empty() || url.password().is_some() {
        location.push_str(url.username());
        if let Some(password) = url.password() {
            location.push(':');
            location.push_str(password);
        }
        location.push('@');
    }

    location.push_str(host);
    if let Some(port) = url.port() {
        location.push_str(&format!(":{}", port));
    }
    Some(location)
}

/// Exact network location match. Subdomains are different sites.
pub fn is_same_site(url: &Url, seed_location: &str) -> bool {
    network_location(url).as_deref() == Some(seed_location)
}

/// Resolve an `href` against the page it was found on.
///
/// Returns `None` for hrefs that never lead to a crawlable page, for links
/// that fail to resolve, and for non-HTTP schemes.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
    {
        return None;
    }

    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(canonical(&resolved)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_strips_query_and_fragment() {
        assert_eq!(
            canonicalize("https://example.com/docs?page=2#top").unwrap(),
            "https://example.com/docs"
        );
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize("https://example.com/a/b?x=1#frag").unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_query_and_fragment_variants_share_identity() {
        let a = canonicalize("https://example.com/page?utm=1").unwrap();
        let b = canonicalize("https://example.com/page#section").unwrap();
        let c = canonicalize("https://example.com/page").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_canonicalize_rejects_relative() {
        assert!(matches!(
            canonicalize("/relative/path"),
            Err(ScanError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_network_location_includes_port() {
        let url = Url::parse("http://127.0.0.1:8080/x").unwrap();
        assert_eq!(network_location(&url).as_deref(), Some("127.0.0.1:8080"));

        let url = Url::parse("https://example.com:443/x").unwrap();
        assert_eq!(network_location(&url).as_deref(), Some("example.com"));
    }

    #[test]
    fn test_network_location_includes_userinfo() {
        let url = Url::parse("https://u:p@example.com:8443/x").unwrap();
        assert_eq!(network_location(&url).as_deref(), Some("u:p@example.com:8443"));

        let url = Url::parse("https://u@example.com/x").unwrap();
        assert_eq!(network_location(&url).as_deref(), Some("u@example.com"));
        assert!(!is_same_site(&url, "example.com"));
    }

    #[test]
    fn test_subdomain_is_not_same_site() {
        let url = Url::parse("https://docs.example.com/").unwrap();
        assert!(!is_same_site(&url, "example.com"));

        let url = Url::parse("https://example.com/docs").unwrap();
        assert!(is_same_site(&url, "example.com"));
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = Url::parse("https://example.com/docs/intro").unwrap();
        let link = resolve_link(&base, "setup?lang=en#install").unwrap();
        assert_eq!(link.as_str(), "https://example.com/docs/setup");
    }

    #[test]
    fn test_resolve_skips_special_hrefs() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(resolve_link(&base, "#section").is_none());
        assert!(resolve_link(&base, "mailto:test@example.com").is_none());
        assert!(resolve_link(&base, "tel:+15555555").is_none());
        assert!(resolve_link(&base, "javascript:void(0)").is_none());
        assert!(resolve_link(&base, "   ").is_none());
        assert!(resolve_link(&base, "ftp://example.com/file").is_none());
    }

    #[test]
    fn test_resolve_skips_malformed() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(resolve_link(&base, "http://[::1").is_none());
    }
}
