// tests/decode_rollback.rs
// A failed decode must leave no trace of the attempted source.

use serde_json::json;
use url::Url;

use source_catalog::{decode_source, CatalogError, Store};

#[tokio::test]
async fn missing_name_leaves_context_untouched() {
    let store = Store::new();
    let context = store.new_context();
    let url = Url::parse("https://example.com/apps.json").unwrap();

    let before = context.registered_object_count().await;

    let err = decode_source(
        &context,
        url,
        json!({"apps": [{"bundleIdentifier": "a.b.c", "name": "A"}]}),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CatalogError::MissingRequiredField { field: "name" }));
    assert_eq!(context.registered_object_count().await, before);
    assert_eq!(context.count_sources("example.com/apps.json").await, 0);
}

#[tokio::test]
async fn bad_tint_color_rolls_back_apps_and_news_too() {
    let store = Store::new();
    let context = store.new_context();
    let url = Url::parse("https://example.com/apps.json").unwrap();

    let err = decode_source(
        &context,
        url,
        json!({
            "name": "X",
            "tintColor": "#nothex",
            "apps": [{"bundleIdentifier": "a.b.c", "name": "A"}],
            "news": [{"title": "N"}]
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(err.field(), Some("tintColor"));
    assert_eq!(context.registered_object_count().await, 0);
}

#[tokio::test]
async fn hostless_source_url_is_rejected_with_the_url() {
    let store = Store::new();
    let context = store.new_context();
    let url = Url::parse("mailto:not@a.source").unwrap();

    let err = decode_source(&context, url.clone(), json!({"name": "X"})).await.unwrap_err();

    match err {
        CatalogError::MalformedSourceUrl { url: offending } => assert_eq!(offending, url),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(context.registered_object_count().await, 0);
}

#[tokio::test]
async fn earlier_sources_survive_a_later_failed_decode() {
    let store = Store::new();
    let context = store.new_context();

    decode_source(
        &context,
        Url::parse("https://good.example.com/").unwrap(),
        json!({"name": "Good"}),
    )
    .await
    .unwrap();

    decode_source(
        &context,
        Url::parse("https://bad.example.com/").unwrap(),
        json!({"subtitle": "no name"}),
    )
    .await
    .unwrap_err();

    assert_eq!(context.count_sources("good.example.com").await, 1);
    assert_eq!(context.count_sources("bad.example.com").await, 0);
}
