// tests/featured_apps.rs
use serde_json::json;
use url::Url;

use source_catalog::{decode_source, Store};

#[tokio::test]
async fn featured_sweep_attaches_and_detaches() {
    let store = Store::new();
    let context = store.new_context();
    let url = Url::parse("https://example.com/").unwrap();

    let source = decode_source(
        &context,
        url,
        json!({
            "name": "X",
            "apps": [
                {"bundleIdentifier": "a.b.c", "name": "A"},
                {"bundleIdentifier": "d.e.f", "name": "B"}
            ]
        }),
    )
    .await
    .unwrap();

    source.set_featured_apps(Some(vec!["a.b.c".to_string()])).await;
    source
        .read(|source| {
            assert_eq!(source.apps()[0].featuring_source.as_deref(), Some("example.com"));
            assert_eq!(source.apps()[1].featuring_source, None);
            assert!(source.has_featured_apps());
        })
        .await
        .unwrap();

    // Swapping the set moves the mark in one sweep.
    source.set_featured_apps(Some(vec!["d.e.f".to_string()])).await;
    source
        .read(|source| {
            assert_eq!(source.apps()[0].featuring_source, None);
            assert_eq!(source.apps()[1].featuring_source.as_deref(), Some("example.com"));
        })
        .await
        .unwrap();

    source.set_featured_apps(None).await;
    source
        .read(|source| {
            assert!(source.apps().iter().all(|a| a.featuring_source.is_none()));
            assert!(!source.has_featured_apps());
            assert_eq!(source.featured_apps(), None);
            assert_eq!(source.effective_featured_apps().len(), 2);
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn payload_featured_list_orders_the_subset() {
    let store = Store::new();
    let context = store.new_context();
    let url = Url::parse("https://example.com/").unwrap();

    let source = decode_source(
        &context,
        url,
        json!({
            "name": "X",
            "apps": [
                {"bundleIdentifier": "a.b.c", "name": "A"},
                {"bundleIdentifier": "d.e.f", "name": "B"},
                {"bundleIdentifier": "g.h.i", "name": "C"}
            ],
            "featuredApps": ["g.h.i", "a.b.c"]
        }),
    )
    .await
    .unwrap();

    let featured = source
        .read(|source| {
            source
                .featured_apps()
                .unwrap()
                .iter()
                .map(|a| a.bundle_identifier.clone())
                .collect::<Vec<_>>()
        })
        .await
        .unwrap();
    assert_eq!(featured, vec!["g.h.i", "a.b.c"]);
}
