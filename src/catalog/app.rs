// src/catalog/app.rs
use serde::{Deserialize, Serialize};
use url::Url;

use crate::color::TintColor;

/// One distributable app as listed by a source.
///
/// The bundle identifier is unique within the owning source (duplicates in a
/// payload keep their list position but lose cross-referencing, first
/// occurrence wins). `source_identifier` always matches the owning source's
/// current identifier; relocation rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreApp {
    pub bundle_identifier: String,
    pub name: String,
    pub developer_name: Option<String>,
    pub subtitle: Option<String>,
    pub localized_description: Option<String>,
    pub icon_url: Option<Url>,
    pub tint_color: Option<TintColor>,
    pub version: Option<String>,

    /// Identifier of the owning source.
    pub source_identifier: String,
    /// Zero-based decode order within the owning source's app list.
    pub sort_index: u32,
    /// Identifier of the source currently featuring this app, if any.
    /// At most one source features an app at a time.
    pub featuring_source: Option<String>,
}

impl StoreApp {
    pub fn is_featured(&self) -> bool {
        self.featuring_source.is_some()
    }
}
