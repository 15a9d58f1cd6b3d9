// src/decode/mod.rs
//! Ingestion pipeline: untrusted JSON payload → cross-referenced [`Source`].
//!
//! The build is all-or-nothing. [`build_source`] assembles the complete
//! entity in a scratch value and only a fully built source is ever inserted
//! into the target context, so a failure at any step leaves the context
//! without a trace of the attempt.

mod payload;

use std::collections::HashSet;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::{info, warn};
use url::Url;

use crate::catalog::{NewsItem, Source, SourceUserInfoKey, StoreApp};
use crate::color::TintColor;
use crate::context::handle::SourceHandle;
use crate::context::Context;
use crate::decode::payload::SourcePayload;
use crate::error::{CatalogError, Result};
use crate::identity::source_id;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("catalog_decode_total", "Source payloads decoded successfully.");
        describe_counter!("catalog_decode_failures_total", "Source payloads rejected.");
        describe_counter!(
            "catalog_duplicate_bundle_ids_total",
            "Apps sharing a bundle identifier within one payload."
        );
        describe_counter!(
            "catalog_news_unlinked_total",
            "News items whose appID matched no app in the payload."
        );
    });
}

fn parse_tint(hex: Option<String>) -> Result<Option<TintColor>> {
    match hex {
        None => Ok(None),
        Some(hex) => match TintColor::from_hex(&hex) {
            Some(color) => Ok(Some(color)),
            None => Err(CatalogError::MalformedField {
                field: "tintColor",
                reason: format!("invalid hex color `{hex}`"),
            }),
        },
    }
}

/// Build a complete source from a payload, without touching any context.
///
/// Duplicate bundle identifiers keep their position in the app list, but
/// lose out to the first occurrence for news/featured cross-referencing.
/// News items pointing at an unknown app get their link cleared; featured
/// entries naming an unknown app are dropped. Neither is an error.
pub(crate) fn build_source(payload: serde_json::Value, source_url: Url) -> Result<Source> {
    let payload: SourcePayload = serde_json::from_value(payload)?;

    let name = payload.name.ok_or(CatalogError::MissingRequiredField { field: "name" })?;

    let identifier = source_id(&source_url)
        .ok_or(CatalogError::MalformedSourceUrl { url: source_url.clone() })?;

    let mut source = Source::new(name, source_url, identifier.clone());
    source.renaming_id = payload.renaming_id;
    source.subtitle = payload.subtitle;
    source.localized_description = payload.localized_description;
    source.icon_url = payload.icon_url;
    source.header_image_url = payload.header_image_url;
    source.website_url = payload.website_url;
    source.tint_color = parse_tint(payload.tint_color)?;

    source.user_info = payload.user_info.map(|user_info| {
        user_info
            .into_iter()
            .map(|(key, value)| (SourceUserInfoKey::new(key), value))
            .collect()
    });

    // Apps, in payload order; first occurrence of a bundle identifier wins
    // the cross-referencing lookup.
    let mut known_bundle_ids: HashSet<String> = HashSet::new();
    for (index, app) in payload.apps.unwrap_or_default().into_iter().enumerate() {
        let tint_color = parse_tint(app.tint_color)?;
        if !known_bundle_ids.insert(app.bundle_identifier.clone()) {
            warn!(
                bundle_identifier = %app.bundle_identifier,
                source = %identifier,
                "duplicate bundle identifier in payload; first occurrence wins"
            );
            counter!("catalog_duplicate_bundle_ids_total").increment(1);
        }
        source.apps.push(StoreApp {
            bundle_identifier: app.bundle_identifier,
            name: app.name,
            developer_name: app.developer_name,
            subtitle: app.subtitle,
            localized_description: app.localized_description,
            icon_url: app.icon_url,
            tint_color,
            version: app.version,
            source_identifier: identifier.clone(),
            sort_index: index as u32,
            featuring_source: None,
        });
    }

    for (index, item) in payload.news.unwrap_or_default().into_iter().enumerate() {
        let tint_color = parse_tint(item.tint_color)?;
        let linked_app = match &item.app_id {
            Some(app_id) if known_bundle_ids.contains(app_id) => Some(app_id.clone()),
            Some(app_id) => {
                warn!(
                    app_id = %app_id,
                    source = %identifier,
                    "news item references an app not in this payload; clearing link"
                );
                counter!("catalog_news_unlinked_total").increment(1);
                None
            }
            None => None,
        };
        source.news_items.push(NewsItem {
            identifier: item.identifier,
            title: item.title,
            caption: item.caption,
            date: item.date,
            tint_color,
            image_url: item.image_url,
            url: item.url,
            notify: item.notify.unwrap_or(false),
            app_id: item.app_id,
            linked_app,
            source_identifier: identifier.clone(),
            sort_index: index as u32,
        });
    }

    // An absent key and an empty list are different featured states.
    let featured = payload.featured_apps.map(|bundle_ids| {
        bundle_ids
            .into_iter()
            .filter(|bundle_id| {
                let known = known_bundle_ids.contains(bundle_id);
                if !known {
                    warn!(
                        bundle_id = %bundle_id,
                        source = %identifier,
                        "featured app not in this payload; dropping"
                    );
                }
                known
            })
            .collect::<Vec<_>>()
    });
    source.set_featured_apps(featured);

    Ok(source)
}

/// Decode a payload into `context`, returning a handle to the fully linked
/// source. Runs as a single job on the context's serialized queue; on
/// failure nothing is inserted and the original error is propagated.
///
/// Decoding only registers objects in the context; committing is the
/// caller's responsibility.
pub async fn decode_source(
    context: &Context,
    source_url: Url,
    payload: serde_json::Value,
) -> Result<SourceHandle> {
    ensure_metrics_described();

    let url = source_url.clone();
    let outcome = context
        .perform(move |state| {
            build_source(payload, source_url).map(|source| {
                let counts = (source.apps().len(), source.news_items().len());
                (state.insert_source(source), counts)
            })
        })
        .await;

    match outcome {
        Ok((object_id, (apps, news))) => {
            counter!("catalog_decode_total").increment(1);
            info!(url = %url, apps, news, "decoded source");
            Ok(SourceHandle::new(context.clone(), object_id))
        }
        Err(error) => {
            counter!("catalog_decode_failures_total").increment(1);
            warn!(url = %url, error = %error, "failed to decode source");
            Err(error)
        }
    }
}

/// [`decode_source`] for a raw JSON string.
pub async fn decode_source_json(
    context: &Context,
    source_url: Url,
    payload: &str,
) -> Result<SourceHandle> {
    let payload = serde_json::from_str(payload)?;
    decode_source(context, source_url, payload).await
}
