// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod bootstrap;
pub mod catalog;
pub mod color;
pub mod config;
pub mod context;
pub mod decode;
pub mod error;
pub mod identity;
pub mod managed;

// ---- Re-exports for stable public API ----
pub use crate::catalog::source::{
    default_source_identifier, default_source_url, DEFAULT_SOURCE_URL,
};
pub use crate::catalog::{NewsItem, Source, SourceUserInfoKey, StoreApp};
pub use crate::color::TintColor;
pub use crate::context::handle::SourceHandle;
pub use crate::context::{Context, Store};
pub use crate::decode::{decode_source, decode_source_json};
pub use crate::error::{CatalogError, Result};
pub use crate::managed::{AsyncManaged, Detached, ManagedObject};
