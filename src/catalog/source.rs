// src/catalog/source.rs
//! The `Source` entity: one catalog publisher and its decoded object graph.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use url::Url;

use crate::catalog::{NewsItem, SourceUserInfoKey, StoreApp};
use crate::color::TintColor;
use crate::error::{CatalogError, Result};
use crate::identity::source_id;

/// Endpoint of the built-in default source, by build configuration.
#[cfg(all(feature = "staging", feature = "alpha"))]
pub const DEFAULT_SOURCE_URL: &str =
    "https://cdn.sourcecatalog.dev/staging/sources/alpha/apps-alpha.json";
#[cfg(all(feature = "staging", not(feature = "alpha")))]
pub const DEFAULT_SOURCE_URL: &str = "https://cdn.sourcecatalog.dev/staging/apps-staging.json";
#[cfg(all(feature = "alpha", not(feature = "staging")))]
pub const DEFAULT_SOURCE_URL: &str = "https://alpha.sourcecatalog.dev/";
#[cfg(not(any(feature = "staging", feature = "alpha")))]
pub const DEFAULT_SOURCE_URL: &str = "https://apps.sourcecatalog.dev/";

/// Parsed form of [`DEFAULT_SOURCE_URL`].
pub fn default_source_url() -> &'static Url {
    static URL: Lazy<Url> =
        Lazy::new(|| Url::parse(DEFAULT_SOURCE_URL).expect("default source URL parses"));
    &URL
}

/// Canonical identifier of the built-in default source.
pub fn default_source_identifier() -> &'static str {
    static ID: Lazy<String> =
        Lazy::new(|| source_id(default_source_url()).expect("default source URL has a host"));
    &ID
}

/// A publisher of distributable apps and news items, identified by the
/// canonicalized form of the URL it is fetched from.
///
/// `identifier` is derived, never edited directly; it changes only through
/// [`Source::set_source_url`]. The icon/header/tint fields are private
/// storage with fallback-bearing `effective_*` accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub name: String,
    pub(crate) identifier: String,
    pub(crate) source_url: Url,
    /// Legacy-identifier alias kept so a relocated source keeps continuity.
    pub renaming_id: Option<String>,

    pub subtitle: Option<String>,
    pub website_url: Option<Url>,
    pub localized_description: Option<String>,

    pub(crate) icon_url: Option<Url>,
    pub(crate) header_image_url: Option<Url>,
    pub(crate) tint_color: Option<TintColor>,

    /// Last known validation/fetch failure, kept around for UI surfacing.
    pub error: Option<String>,

    /// Opaque passthrough metadata; not part of the relational schema.
    pub user_info: Option<BTreeMap<SourceUserInfoKey, String>>,

    pub(crate) apps: Vec<StoreApp>,
    pub(crate) news_items: Vec<NewsItem>,

    pub(crate) featured_bundle_ids: Vec<String>,
    pub(crate) has_featured_apps: bool,
}

impl Source {
    pub(crate) fn new(name: impl Into<String>, source_url: Url, identifier: String) -> Self {
        Self {
            name: name.into(),
            identifier,
            source_url,
            renaming_id: None,
            subtitle: None,
            website_url: None,
            localized_description: None,
            icon_url: None,
            header_image_url: None,
            tint_color: None,
            error: None,
            user_info: None,
            apps: Vec::new(),
            news_items: Vec::new(),
            featured_bundle_ids: Vec::new(),
            has_featured_apps: false,
        }
    }

    /// Build the built-in default source. Its identifier doubles as its
    /// renaming ID so it can later be relocated without losing continuity.
    pub fn default_source() -> Self {
        let identifier = default_source_identifier().to_string();
        let mut source = Source::new("Source Catalog", default_source_url().clone(), identifier);
        source.renaming_id = Some(source.identifier.clone());
        source
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    pub fn apps(&self) -> &[StoreApp] {
        &self.apps
    }

    pub fn news_items(&self) -> &[NewsItem] {
        &self.news_items
    }

    // Fallbacks for optional payload values.

    pub fn effective_icon_url(&self) -> Option<&Url> {
        self.icon_url
            .as_ref()
            .or_else(|| self.apps.first().and_then(|app| app.icon_url.as_ref()))
    }

    pub fn effective_header_image_url(&self) -> Option<&Url> {
        self.header_image_url.as_ref().or_else(|| self.effective_icon_url())
    }

    pub fn effective_tint_color(&self) -> Option<TintColor> {
        self.tint_color.or_else(|| self.apps.first().and_then(|app| app.tint_color))
    }

    /// The explicitly featured apps, in their stored order. `None` means no
    /// featured-apps data was ever provided, which is distinct from an
    /// explicitly empty list.
    pub fn featured_apps(&self) -> Option<Vec<&StoreApp>> {
        if !self.has_featured_apps {
            return None;
        }
        Some(
            self.featured_bundle_ids
                .iter()
                .filter_map(|id| self.apps.iter().find(|app| &app.bundle_identifier == id))
                .collect(),
        )
    }

    pub fn has_featured_apps(&self) -> bool {
        self.has_featured_apps
    }

    /// Featured apps with the no-data fallback applied: all apps.
    pub fn effective_featured_apps(&self) -> Vec<&StoreApp> {
        self.featured_apps().unwrap_or_else(|| self.apps.iter().collect())
    }

    /// Replace the featured subset with the apps named by `featured` (bundle
    /// identifiers), or clear it entirely with `None`.
    ///
    /// Sweeps every owned app: an app keeps its "featured by this source"
    /// mark only while the incoming list names it. Detaching before
    /// re-attaching keeps overlapping updates from leaving an app marked by
    /// two sources at once.
    pub fn set_featured_apps(&mut self, featured: Option<Vec<String>>) {
        let identifier = self.identifier.clone();
        for app in &mut self.apps {
            let is_featured = featured
                .as_deref()
                .is_some_and(|ids| ids.iter().any(|id| id == &app.bundle_identifier));
            app.featuring_source = is_featured.then(|| identifier.clone());
        }

        self.has_featured_apps = featured.is_some();

        // Stored list is ordered, deduplicated, and restricted to owned apps.
        let mut kept: Vec<String> = Vec::new();
        for id in featured.unwrap_or_default() {
            if kept.contains(&id) {
                continue;
            }
            if self.apps.iter().any(|app| app.bundle_identifier == id) {
                kept.push(id);
            }
        }
        self.featured_bundle_ids = kept;
    }

    /// Relocate this source to a new URL, recomputing its identifier.
    ///
    /// Fails without touching anything when the URL cannot be normalized;
    /// otherwise updates the identifier and rewrites the back-reference on
    /// every owned app and news item.
    pub fn set_source_url(&mut self, source_url: Url) -> Result<()> {
        let identifier = source_id(&source_url)
            .ok_or(CatalogError::MalformedSourceUrl { url: source_url.clone() })?;

        self.identifier = identifier.clone();
        self.source_url = source_url;

        for app in &mut self.apps {
            app.source_identifier = identifier.clone();
            // The featuring mark refers to this source; keep it in step.
            if app.featuring_source.is_some() {
                app.featuring_source = Some(identifier.clone());
            }
        }

        for item in &mut self.news_items {
            item.source_identifier = identifier.clone();
        }

        Ok(())
    }
}
