// src/catalog/news.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::color::TintColor;

/// One news entry published by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub identifier: Option<String>,
    pub title: String,
    pub caption: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub tint_color: Option<TintColor>,
    pub image_url: Option<Url>,
    pub url: Option<Url>,
    /// Whether subscribers should be actively notified about this item.
    pub notify: bool,

    /// App bundle identifier as given in the payload, if any.
    pub app_id: Option<String>,
    /// Bundle identifier of the app this item links to, resolved against the
    /// apps decoded in the same batch. Unresolved references are cleared, not
    /// treated as an error.
    pub linked_app: Option<String>,

    /// Identifier of the owning source.
    pub source_identifier: String,
    /// Zero-based decode order within the owning source's news list.
    pub sort_index: u32,
}
