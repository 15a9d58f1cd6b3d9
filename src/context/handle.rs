// src/context/handle.rs
//! Context-bound references to persisted sources.

use url::Url;

use crate::catalog::Source;
use crate::context::{Context, ObjectId};
use crate::error::Result;

/// Reference to a source registered in (or committed through) a context.
///
/// The handle stays valid across relocation: it is keyed by the source's
/// store-assigned object identity, not by its catalog identifier. All
/// operations are scheduled onto the owning context's queue.
#[derive(Clone, Debug)]
pub struct SourceHandle {
    context: Context,
    object_id: ObjectId,
}

impl SourceHandle {
    pub(crate) fn new(context: Context, object_id: ObjectId) -> Self {
        Self { context, object_id }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub(crate) fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// Run a read-only projection against the source on its owning context.
    /// `None` when the source has been deleted from the context.
    pub async fn read<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&Source) -> R + Send + 'static,
        R: Send + 'static,
    {
        let object_id = self.object_id;
        self.context.perform(move |state| state.with_source(object_id, f)).await
    }

    pub async fn identifier(&self) -> Option<String> {
        self.read(|source| source.identifier().to_string()).await
    }

    /// Relocate the source to a new URL. See [`Source::set_source_url`].
    pub async fn set_source_url(&self, source_url: Url) -> Result<()> {
        let object_id = self.object_id;
        self.context
            .perform(move |state| {
                state
                    .update_source(object_id, |source| source.set_source_url(source_url))
                    .unwrap_or(Ok(()))
            })
            .await
    }

    /// Replace the featured subset. See [`Source::set_featured_apps`].
    pub async fn set_featured_apps(&self, featured: Option<Vec<String>>) {
        let object_id = self.object_id;
        self.context
            .perform(move |state| {
                state.update_source(object_id, |source| source.set_featured_apps(featured));
            })
            .await
    }

    /// Record (or clear) the source's last known fetch/validation failure.
    pub async fn set_error(&self, error: Option<String>) {
        let object_id = self.object_id;
        self.context
            .perform(move |state| {
                state.update_source(object_id, |source| source.error = error);
            })
            .await
    }
}

impl PartialEq for SourceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.object_id == other.object_id && self.context == other.context
    }
}

impl Eq for SourceHandle {}
