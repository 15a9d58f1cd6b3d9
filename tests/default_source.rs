// tests/default_source.rs
use source_catalog::bootstrap::{fetch_default_source, is_added, make_default_source};
use source_catalog::{default_source_identifier, Store};

#[tokio::test]
async fn default_source_bootstraps_with_stable_identifier() {
    let store = Store::new();
    let context = store.new_context();

    let source = make_default_source(&context).await;

    source
        .read(|source| {
            assert_eq!(source.identifier(), default_source_identifier());
            // Recorded as its own legacy alias so it can be relocated later.
            assert_eq!(source.renaming_id.as_deref(), Some(default_source_identifier()));
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn is_added_reflects_saved_state_only() {
    let store = Store::new();
    let context = store.new_context();

    let source = make_default_source(&context).await;
    assert!(!is_added(&source).await);

    context.save().await;
    assert!(is_added(&source).await);
}

#[tokio::test]
async fn fetch_default_source_sees_pending_and_committed() {
    let store = Store::new();
    let context = store.new_context();

    assert!(fetch_default_source(&context).await.is_none());

    make_default_source(&context).await;
    assert!(fetch_default_source(&context).await.is_some());

    context.save().await;
    let fresh = store.new_context();
    let fetched = fetch_default_source(&fresh).await.unwrap();
    assert_eq!(fetched.identifier().await.as_deref(), Some(default_source_identifier()));
}
