// src/decode/payload.rs
//! Wire shapes of a source payload. Field names follow the published schema,
//! so renames are explicit rather than derived.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
pub(crate) struct SourcePayload {
    pub name: Option<String>,
    /// Legacy-identifier alias; informational only, never used to derive the
    /// canonical identifier.
    #[serde(rename = "identifier")]
    pub renaming_id: Option<String>,
    pub subtitle: Option<String>,
    #[serde(rename = "description")]
    pub localized_description: Option<String>,
    #[serde(rename = "iconURL")]
    pub icon_url: Option<Url>,
    #[serde(rename = "headerURL")]
    pub header_image_url: Option<Url>,
    #[serde(rename = "website")]
    pub website_url: Option<Url>,
    #[serde(rename = "tintColor")]
    pub tint_color: Option<String>,
    pub apps: Option<Vec<AppPayload>>,
    pub news: Option<Vec<NewsPayload>>,
    #[serde(rename = "featuredApps")]
    pub featured_apps: Option<Vec<String>>,
    #[serde(rename = "userInfo")]
    pub user_info: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppPayload {
    #[serde(rename = "bundleIdentifier")]
    pub bundle_identifier: String,
    pub name: String,
    #[serde(rename = "developerName")]
    pub developer_name: Option<String>,
    pub subtitle: Option<String>,
    #[serde(rename = "localizedDescription")]
    pub localized_description: Option<String>,
    #[serde(rename = "iconURL")]
    pub icon_url: Option<Url>,
    #[serde(rename = "tintColor")]
    pub tint_color: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewsPayload {
    pub identifier: Option<String>,
    pub title: String,
    pub caption: Option<String>,
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "tintColor")]
    pub tint_color: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<Url>,
    pub url: Option<Url>,
    #[serde(rename = "appID")]
    pub app_id: Option<String>,
    pub notify: Option<bool>,
}
