// src/identity.rs
//! Canonical source identifiers.
//!
//! A source is identified by a normalized form of the URL it is fetched from,
//! so that `https://example.com/`, `http://WWW.example.com` and
//! `https://example.com:443` all name the same source. The normalization is
//! purely syntactic; no DNS lookups.

use url::Url;

/// Derive the canonical identifier for a source URL.
///
/// Returns `None` when the URL has no host (e.g. `mailto:` or `file:` URLs).
/// Otherwise: host, plus `:port` when an explicit port other than 80/443 is
/// present, plus the path; lowercased as a whole; one trailing `/` stripped;
/// a leading `www.` stripped.
///
/// The port is appended without percent encoding; known gap, kept to match
/// identifiers already in the wild.
pub fn source_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;

    let mut id = String::from(host);

    if let Some(port) = url.port() {
        if port != 80 && port != 443 {
            id.push(':');
            id.push_str(&port.to_string());
        }
    }

    // Path includes the leading "/".
    id.push_str(url.path());

    id = id.to_lowercase();

    if id.ends_with('/') {
        id.pop();
    }

    if let Some(stripped) = id.strip_prefix("www.") {
        id = stripped.to_string();
    }

    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Option<String> {
        source_id(&Url::parse(s).unwrap())
    }

    #[test]
    fn scheme_www_and_trailing_slash_collapse() {
        assert_eq!(id("https://example.com/").unwrap(), "example.com");
        assert_eq!(id("http://WWW.example.com").unwrap(), "example.com");
        assert_eq!(id("https://example.com").unwrap(), "example.com");
    }

    #[test]
    fn explicit_non_default_port_is_kept() {
        assert_eq!(id("https://example.com:8443/foo/").unwrap(), "example.com:8443/foo");
    }

    #[test]
    fn default_ports_are_dropped() {
        assert_eq!(id("https://example.com:443/").unwrap(), "example.com");
        assert_eq!(id("http://example.com:80/apps.json").unwrap(), "example.com/apps.json");
        // 443 on plain http is not that scheme's default, but it is still dropped.
        assert_eq!(id("http://example.com:443/").unwrap(), "example.com");
    }

    #[test]
    fn path_and_case_are_normalized() {
        assert_eq!(id("https://Example.com/Apps/V2/").unwrap(), "example.com/apps/v2");
    }

    #[test]
    fn no_host_yields_none() {
        assert_eq!(id("mailto:someone@example.com"), None);
        assert_eq!(id("file:///tmp/apps.json"), None);
    }

    #[test]
    fn idempotent_when_reparsed() {
        let first = id("https://www.Example.com:8443/foo/").unwrap();
        let again = id(&format!("https://{first}")).unwrap();
        assert_eq!(first, again);
    }
}
