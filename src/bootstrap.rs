// src/bootstrap.rs
//! The built-in default source.

use crate::catalog::source::{default_source_identifier, Source};
use crate::context::handle::SourceHandle;
use crate::context::Context;
use crate::managed::AsyncManaged;

/// Register the built-in default source in `context`. Does not save.
pub async fn make_default_source(context: &Context) -> SourceHandle {
    let source = Source::default_source();
    let object_id = context.perform(move |state| state.insert_source(source)).await;
    SourceHandle::new(context.clone(), object_id)
}

/// Fetch the built-in default source, if it is visible from `context`.
pub async fn fetch_default_source(context: &Context) -> Option<SourceHandle> {
    context.fetch_source(default_source_identifier()).await
}

/// Whether `source` has been saved to the store.
///
/// The source may be owned by a foreground context the caller is not running
/// on, so its identifier is read through the context-confined proxy; the
/// count query then runs against a fresh background context, which only sees
/// committed objects.
pub async fn is_added(source: &SourceHandle) -> bool {
    let identifier = AsyncManaged::new(source.clone())
        .get(|source| source.identifier().to_string())
        .await;
    let Some(identifier) = identifier else {
        return false;
    };

    let background = source.context().store().new_context();
    background.count_sources(&identifier).await > 0
}
