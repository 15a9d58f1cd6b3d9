// src/context/mod.rs
//! Execution contexts for the persisted object graph.
//!
//! Entities live in exactly one [`Context`]. A context is a handle to a
//! spawned worker task that owns the context's state and processes scheduled
//! jobs strictly serially, so no entity field is ever touched from two tasks
//! at once. Contexts created from the same [`Store`] share one committed
//! graph: each context accumulates pending changes locally and publishes them
//! with [`Context::save`]. There is no cross-context atomicity; when two
//! contexts save copies of the same logical source, the last save wins.

pub mod handle;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::catalog::Source;
use crate::context::handle::SourceHandle;

pub(crate) type ObjectId = u64;

type Job = Box<dyn FnOnce(&mut ContextState) + Send>;

#[derive(Default)]
struct CommittedGraph {
    sources: BTreeMap<ObjectId, Source>,
}

/// The shared persistence store: one committed object graph plus the counter
/// that hands out object identities.
#[derive(Clone)]
pub struct Store {
    graph: Arc<Mutex<CommittedGraph>>,
    next_object_id: Arc<AtomicU64>,
    next_context_id: Arc<AtomicU64>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            graph: Arc::new(Mutex::new(CommittedGraph::default())),
            next_object_id: Arc::new(AtomicU64::new(1)),
            next_context_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Create a fresh context over this store. Must be called from within a
    /// tokio runtime; the context's worker task lives until the last handle
    /// to the context is dropped.
    pub fn new_context(&self) -> Context {
        let id = self.next_context_id.fetch_add(1, Ordering::Relaxed);
        let (jobs, mut inbox) = mpsc::unbounded_channel::<Job>();

        let mut state = ContextState {
            graph: Arc::clone(&self.graph),
            next_object_id: Arc::clone(&self.next_object_id),
            pending: BTreeMap::new(),
            tombstones: BTreeSet::new(),
        };

        tokio::spawn(async move {
            while let Some(job) = inbox.recv().await {
                job(&mut state);
            }
        });

        Context { jobs, id, store: self.clone() }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a single-owner execution context.
///
/// Cloning the handle does not clone the context; all clones schedule onto
/// the same serialized queue. Equality is context identity.
#[derive(Clone)]
pub struct Context {
    jobs: mpsc::UnboundedSender<Job>,
    id: u64,
    store: Store,
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Context {}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("id", &self.id).finish()
    }
}

impl Context {
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Schedule `f` onto this context's queue and wait for its result.
    ///
    /// Jobs run strictly in submission order. Do not call `perform` from
    /// within an already-executing job of the same context; the inner call
    /// would wait on a queue that cannot advance past the outer job.
    pub async fn perform<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ContextState) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (done, result) = oneshot::channel();
        let job: Job = Box::new(move |state| {
            let _ = done.send(f(state));
        });
        self.jobs.send(job).expect("execution context terminated");
        result.await.expect("execution context dropped a scheduled job")
    }

    /// Fetch the first source whose identifier equals `identifier`, looking
    /// at this context's pending objects first, then the committed graph.
    pub async fn fetch_source(&self, identifier: &str) -> Option<SourceHandle> {
        let identifier = identifier.to_string();
        let object_id = self.perform(move |state| state.fetch_source_id(&identifier)).await?;
        Some(SourceHandle::new(self.clone(), object_id))
    }

    /// Count sources with the given identifier visible from this context
    /// (pending overlaid on committed).
    pub async fn count_sources(&self, identifier: &str) -> usize {
        let identifier = identifier.to_string();
        self.perform(move |state| state.count_sources(&identifier)).await
    }

    /// Number of sources registered in this context's pending set.
    pub async fn registered_source_count(&self) -> usize {
        self.perform(|state| state.pending.len()).await
    }

    /// Number of objects (sources plus their apps and news items) registered
    /// in this context's pending set.
    pub async fn registered_object_count(&self) -> usize {
        self.perform(|state| {
            state
                .pending
                .values()
                .map(|source| 1 + source.apps().len() + source.news_items().len())
                .sum()
        })
        .await
    }

    /// Publish this context's pending changes into the shared committed
    /// graph. Registered objects stay registered afterwards.
    pub async fn save(&self) {
        self.perform(|state| state.save()).await
    }

    /// Delete a source from this context. Takes effect in the committed
    /// graph at the next save.
    pub async fn delete_source(&self, source: &SourceHandle) {
        let object_id = source.object_id();
        self.perform(move |state| state.delete_source(object_id)).await
    }
}

/// State owned by a context's worker task: the pending object set layered
/// over the shared committed graph.
pub struct ContextState {
    graph: Arc<Mutex<CommittedGraph>>,
    next_object_id: Arc<AtomicU64>,
    pending: BTreeMap<ObjectId, Source>,
    tombstones: BTreeSet<ObjectId>,
}

impl ContextState {
    /// Register a freshly built source in this context.
    pub(crate) fn insert_source(&mut self, source: Source) -> ObjectId {
        let object_id = self.next_object_id.fetch_add(1, Ordering::Relaxed);
        self.pending.insert(object_id, source);
        object_id
    }

    /// Run a read-only projection against a source, wherever it currently
    /// lives. `None` when the object was deleted or never existed.
    pub(crate) fn with_source<R>(
        &self,
        object_id: ObjectId,
        f: impl FnOnce(&Source) -> R,
    ) -> Option<R> {
        if self.tombstones.contains(&object_id) {
            return None;
        }
        if let Some(source) = self.pending.get(&object_id) {
            return Some(f(source));
        }
        let graph = self.graph.lock().expect("catalog graph mutex poisoned");
        graph.sources.get(&object_id).map(f)
    }

    /// Mutate a source. A committed source is first copied into this
    /// context's pending set, so the change stays invisible to other
    /// contexts until the next save.
    pub(crate) fn update_source<R>(
        &mut self,
        object_id: ObjectId,
        f: impl FnOnce(&mut Source) -> R,
    ) -> Option<R> {
        if self.tombstones.contains(&object_id) {
            return None;
        }
        if !self.pending.contains_key(&object_id) {
            let graph = self.graph.lock().expect("catalog graph mutex poisoned");
            let source = graph.sources.get(&object_id)?.clone();
            drop(graph);
            self.pending.insert(object_id, source);
        }
        self.pending.get_mut(&object_id).map(f)
    }

    pub(crate) fn delete_source(&mut self, object_id: ObjectId) {
        if self.pending.remove(&object_id).is_none() {
            warn!(object_id, "deleting a source not registered in this context");
        }
        self.tombstones.insert(object_id);
    }

    fn fetch_source_id(&self, identifier: &str) -> Option<ObjectId> {
        if let Some((&object_id, _)) = self
            .pending
            .iter()
            .find(|(_, source)| source.identifier() == identifier)
        {
            return Some(object_id);
        }
        let graph = self.graph.lock().expect("catalog graph mutex poisoned");
        graph
            .sources
            .iter()
            .find(|(object_id, source)| {
                source.identifier() == identifier
                    && !self.pending.contains_key(object_id)
                    && !self.tombstones.contains(object_id)
            })
            .map(|(&object_id, _)| object_id)
    }

    fn count_sources(&self, identifier: &str) -> usize {
        let pending = self
            .pending
            .values()
            .filter(|source| source.identifier() == identifier)
            .count();
        let graph = self.graph.lock().expect("catalog graph mutex poisoned");
        let committed = graph
            .sources
            .iter()
            .filter(|(object_id, source)| {
                source.identifier() == identifier
                    && !self.pending.contains_key(object_id)
                    && !self.tombstones.contains(object_id)
            })
            .count();
        pending + committed
    }

    fn save(&mut self) {
        let mut graph = self.graph.lock().expect("catalog graph mutex poisoned");
        for object_id in std::mem::take(&mut self.tombstones) {
            graph.sources.remove(&object_id);
        }
        for (&object_id, source) in &self.pending {
            // userInfo is transient passthrough metadata; it never reaches
            // the committed graph.
            let mut snapshot = source.clone();
            snapshot.user_info = None;
            graph.sources.insert(object_id, snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn sample_source(identifier_url: &str) -> Source {
        let url = Url::parse(identifier_url).unwrap();
        let identifier = crate::identity::source_id(&url).unwrap();
        Source::new("Test", url, identifier)
    }

    #[tokio::test]
    async fn jobs_run_serially_in_submission_order() {
        let store = Store::new();
        let context = store.new_context();

        let mut ids = Vec::new();
        for i in 0..10u64 {
            let url = format!("https://example-{i}.com/");
            let source = sample_source(&url);
            ids.push(context.perform(move |state| state.insert_source(source)).await);
        }
        let sorted = {
            let mut s = ids.clone();
            s.sort_unstable();
            s
        };
        assert_eq!(ids, sorted);
        assert_eq!(context.registered_source_count().await, 10);
    }

    #[tokio::test]
    async fn pending_changes_are_invisible_until_save() {
        let store = Store::new();
        let context = store.new_context();

        let source = sample_source("https://example.com/");
        context.perform(move |state| state.insert_source(source)).await;

        let other = store.new_context();
        assert_eq!(other.count_sources("example.com").await, 0);

        context.save().await;
        assert_eq!(other.count_sources("example.com").await, 1);
    }

    #[tokio::test]
    async fn delete_takes_effect_at_save() {
        let store = Store::new();
        let context = store.new_context();

        let source = sample_source("https://example.com/");
        context.perform(move |state| state.insert_source(source)).await;
        context.save().await;

        let handle = context.fetch_source("example.com").await.unwrap();
        context.delete_source(&handle).await;
        assert_eq!(context.count_sources("example.com").await, 0);

        // Other contexts still see the committed copy until we save.
        let other = store.new_context();
        assert_eq!(other.count_sources("example.com").await, 1);

        context.save().await;
        assert_eq!(other.count_sources("example.com").await, 0);
    }
}
