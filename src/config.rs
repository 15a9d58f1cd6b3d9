// src/config.rs
use anyhow::{anyhow, Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::identity::source_id;

const ENV_PATH: &str = "CATALOG_SOURCES_PATH";
const ENV_DEFAULT_URL: &str = "CATALOG_DEFAULT_SOURCE_URL";

/// Optional override for the built-in default source endpoint.
pub fn default_source_url_override() -> Result<Option<Url>> {
    match std::env::var(ENV_DEFAULT_URL) {
        Ok(raw) => {
            let url: Url = raw
                .parse()
                .with_context(|| format!("parsing {ENV_DEFAULT_URL}"))?;
            if source_id(&url).is_none() {
                return Err(anyhow!("{ENV_DEFAULT_URL} must be a URL with a host"));
            }
            Ok(Some(url))
        }
        Err(_) => Ok(None),
    }
}

/// Load the recommended-sources list from an explicit path. Supports TOML or
/// JSON formats.
pub fn load_recommended_sources_from(path: &Path) -> Result<Vec<Url>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading recommended sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load the recommended-sources list using env var + fallbacks:
/// 1) $CATALOG_SOURCES_PATH
/// 2) config/recommended_sources.toml
/// 3) config/recommended_sources.json
pub fn load_recommended_sources_default() -> Result<Vec<Url>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_recommended_sources_from(&pb);
        } else {
            return Err(anyhow!("CATALOG_SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/recommended_sources.toml");
    if toml_p.exists() {
        return load_recommended_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/recommended_sources.json");
    if json_p.exists() {
        return load_recommended_sources_from(&json_p);
    }
    Ok(Vec::new())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<Vec<Url>> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("sources");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return clean_list(v);
        }
    }
    // Try JSON array
    if let Ok(v) = parse_json(s) {
        return clean_list(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return clean_list(v);
        }
    }
    Err(anyhow!("unsupported recommended-sources format"))
}

fn parse_toml(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlSources {
        sources: Vec<String>,
    }
    let v: TomlSources = toml::from_str(s)?;
    Ok(v.sources)
}

fn parse_json(s: &str) -> Result<Vec<String>> {
    let v: Vec<String> = serde_json::from_str(s)?;
    Ok(v)
}

/// Trim entries, require each to be a URL with a host, and deduplicate by
/// canonical identifier (first occurrence wins, order preserved).
fn clean_list(items: Vec<String>) -> Result<Vec<Url>> {
    let mut seen = std::collections::BTreeSet::new();
    let mut out = Vec::new();
    for it in items {
        let t = it.trim();
        if t.is_empty() {
            continue;
        }
        let url: Url = t
            .parse()
            .with_context(|| format!("parsing recommended source `{t}`"))?;
        let id = source_id(&url)
            .ok_or_else(|| anyhow!("recommended source `{t}` has no host"))?;
        if seen.insert(id) {
            out.push(url);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_formats_parse_and_dedup_by_identifier() {
        let toml = r#"sources = [" https://example.com/ ", "http://www.example.com", "https://other.dev/apps.json"]"#;
        let out = parse_sources(toml, "toml").unwrap();
        // example.com twice under different spellings -> one entry.
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].as_str(), "https://example.com/");

        let json = r#"["https://example.com/", ""]"#;
        let out = parse_sources(json, "json").unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn hostless_entries_are_rejected() {
        let json = r#"["file:///tmp/apps.json"]"#;
        assert!(parse_sources(json, "json").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // No files in the temp CWD -> empty.
        let v = load_recommended_sources_default().unwrap();
        assert!(v.is_empty());

        // Fallback TOML in ./config/.
        let cfg_dir = tmp.path().join("config");
        fs::create_dir_all(&cfg_dir).unwrap();
        fs::write(
            cfg_dir.join("recommended_sources.toml"),
            r#"sources = ["https://fallback.example.org/"]"#,
        )
        .unwrap();
        let v1 = load_recommended_sources_default().unwrap();
        assert_eq!(v1[0].host_str(), Some("fallback.example.org"));

        // Env takes precedence over the fallbacks.
        let p_json = tmp.path().join("recommended_sources.json");
        fs::write(&p_json, r#"["https://example.com/"]"#).unwrap();
        env::set_var(ENV_PATH, p_json.display().to_string());
        let v2 = load_recommended_sources_default().unwrap();
        assert_eq!(v2.len(), 1);
        assert_eq!(v2[0].host_str(), Some("example.com"));
        env::remove_var(ENV_PATH);

        // Restore CWD.
        env::set_current_dir(&old).unwrap();
    }

    #[serial_test::serial]
    #[test]
    fn default_url_override_requires_a_host() {
        env::set_var(ENV_DEFAULT_URL, "https://custom.example.org/apps.json");
        let url = default_source_url_override().unwrap().unwrap();
        assert_eq!(url.host_str(), Some("custom.example.org"));

        env::set_var(ENV_DEFAULT_URL, "mailto:nope@example.org");
        assert!(default_source_url_override().is_err());
        env::remove_var(ENV_DEFAULT_URL);
    }
}
