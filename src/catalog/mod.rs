// src/catalog/mod.rs
pub mod app;
pub mod news;
pub mod source;
pub mod user_info;

pub use app::StoreApp;
pub use news::NewsItem;
pub use source::Source;
pub use user_info::SourceUserInfoKey;
