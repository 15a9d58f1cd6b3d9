// src/bin/catalog_demo.rs
// Decode a source payload from disk and print what the catalog made of it:
//
//   cargo run --bin catalog_demo -- path/to/apps.json [https://example.com/apps.json]
//
// Without a URL the default source endpoint is used (honoring
// CATALOG_DEFAULT_SOURCE_URL).

use anyhow::{anyhow, Context as _, Result};
use url::Url;

use source_catalog::{bootstrap, decode_source_json, Store};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or_else(|| anyhow!("usage: catalog_demo <payload.json> [source-url]"))?;
    let url: Url = match args.next() {
        Some(raw) => raw.parse().context("parsing source URL")?,
        None => source_catalog::config::default_source_url_override()?
            .unwrap_or_else(|| source_catalog::default_source_url().clone()),
    };

    let payload = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;

    let store = Store::new();
    let context = store.new_context();

    let source = decode_source_json(&context, url, &payload).await?;

    let summary = source
        .read(|source| {
            let apps: Vec<String> = source
                .apps()
                .iter()
                .map(|app| format!("  {} {} ({})", app.sort_index, app.name, app.bundle_identifier))
                .collect();
            let news: Vec<String> = source
                .news_items()
                .iter()
                .map(|item| {
                    format!(
                        "  {} {}{}",
                        item.sort_index,
                        item.title,
                        item.linked_app
                            .as_deref()
                            .map(|id| format!(" -> {id}"))
                            .unwrap_or_default()
                    )
                })
                .collect();
            format!(
                "{} [{}]\nfeatured: {:?}\napps:\n{}\nnews:\n{}",
                source.name,
                source.identifier(),
                source
                    .featured_apps()
                    .map(|apps| apps.iter().map(|a| a.bundle_identifier.clone()).collect::<Vec<_>>()),
                apps.join("\n"),
                news.join("\n"),
            )
        })
        .await
        .ok_or_else(|| anyhow!("source vanished from its context"))?;

    println!("{summary}");

    context.save().await;
    println!("saved: {}", bootstrap::is_added(&source).await);

    Ok(())
}
