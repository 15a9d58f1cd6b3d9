// src/managed.rs
//! Context-confined read access.
//!
//! [`AsyncManaged`] wraps a value together with the execution context that
//! owns it, captured at construction. Reads go through an explicit projection
//! closure: when the wrapped value has no owning context the projection runs
//! inline in the caller's flow; otherwise it is scheduled onto the owning
//! context's serialized queue and the caller suspends until the result comes
//! back. Either way, a context-owned entity is only ever read on its owner.

use crate::catalog::Source;
use crate::context::handle::SourceHandle;
use crate::context::{Context, ContextState};

/// A value whose fields can be projected on its owning context.
pub trait ManagedObject: Clone + Send + Sync + 'static {
    /// What projections see.
    type Entity;

    /// The context owning this value right now, if any.
    fn owning_context(&self) -> Option<Context>;

    /// Resolve the entity and apply `f`. `state` is present exactly when the
    /// call runs on an owning context's queue. `None` means there is no
    /// entity to read (missing optional, or deleted from its context).
    fn with_entity<R>(
        &self,
        state: Option<&ContextState>,
        f: impl FnOnce(&Self::Entity) -> R,
    ) -> Option<R>;
}

impl ManagedObject for SourceHandle {
    type Entity = Source;

    fn owning_context(&self) -> Option<Context> {
        Some(self.context().clone())
    }

    fn with_entity<R>(
        &self,
        state: Option<&ContextState>,
        f: impl FnOnce(&Source) -> R,
    ) -> Option<R> {
        state?.with_source(self.object_id(), f)
    }
}

impl<H: ManagedObject> ManagedObject for Option<H> {
    type Entity = H::Entity;

    fn owning_context(&self) -> Option<Context> {
        self.as_ref().and_then(ManagedObject::owning_context)
    }

    fn with_entity<R>(
        &self,
        state: Option<&ContextState>,
        f: impl FnOnce(&Self::Entity) -> R,
    ) -> Option<R> {
        self.as_ref().and_then(|inner| inner.with_entity(state, f))
    }
}

/// A plain value with no owning context; projections run inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detached<T>(pub T);

impl<T: Clone + Send + Sync + 'static> ManagedObject for Detached<T> {
    type Entity = T;

    fn owning_context(&self) -> Option<Context> {
        None
    }

    fn with_entity<R>(
        &self,
        _state: Option<&ContextState>,
        f: impl FnOnce(&T) -> R,
    ) -> Option<R> {
        Some(f(&self.0))
    }
}

/// Wrapper giving any caller safe, possibly-asynchronous read access to a
/// value regardless of which execution context owns it.
pub struct AsyncManaged<H: ManagedObject> {
    value: H,
    context: Option<Context>,
}

impl<H: ManagedObject> AsyncManaged<H> {
    /// Capture `value` together with its current owning context.
    pub fn new(value: H) -> Self {
        let context = value.owning_context();
        Self { value, context }
    }

    /// Direct access to the wrapped value itself (not its fields).
    pub fn value(&self) -> &H {
        &self.value
    }

    /// Replace the wrapped value, re-capturing its owning context.
    pub fn set(&mut self, value: H) {
        self.context = value.owning_context();
        self.value = value;
    }

    /// Apply a read-only projection to the wrapped value's entity.
    ///
    /// Returns `None` only when there is nothing to read: the wrapped value
    /// is an empty optional, or the entity was deleted from its context.
    /// Must not be called from within a job already executing on the same
    /// context (see [`Context::perform`]).
    pub async fn get<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&H::Entity) -> R + Send + 'static,
        R: Send + 'static,
    {
        match &self.context {
            None => self.value.with_entity(None, f),
            Some(context) => {
                let value = self.value.clone();
                context.perform(move |state| value.with_entity(Some(&*state), f)).await
            }
        }
    }
}
