//! # Listener registry - listener identity to handler descriptors.
//!
//! [`ListenerRegistry`] owns the mapping from each registered listener to the
//! descriptors built from its handlers, and hands out immutable
//! [`Snapshot`]s to the dispatcher.
//!
//! ## Architecture
//! ```text
//! register(listener) ──► Listener::handlers(&mut HandlerSet)   (no lock held)
//!                          └─► HandlerDescriptor::from_candidate (shape errors dropped)
//!                                └─► write lock: insert / replace entry
//!
//! unregister(listener) ──► write lock: remove entry
//!
//! snapshot() ──► read lock: clone Arc<ListenerEntry> of every listener
//!                  └─► Dispatcher iterates the copy with no lock held
//! ```
//!
//! ## Rules
//! - Re-registering a listener **replaces** its entry; handlers are never merged.
//! - Unregistering an absent listener is a no-op.
//! - A snapshot is never affected by later register/unregister calls.
//! - Listener code (handler discovery, `Drop`) never runs under the lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::handlers::{ExecutionTier, HandlerDescriptor};
use crate::listeners::{IntoListener, ListenerHandle, ListenerId};

/// A registered listener together with its handler descriptors.
pub struct ListenerEntry {
    listener: ListenerHandle,
    handlers: Arc<[HandlerDescriptor]>,
}

impl ListenerEntry {
    /// Handle of the registered listener.
    pub fn listener(&self) -> &ListenerHandle {
        &self.listener
    }

    /// Descriptors built at registration time, in declaration order.
    pub fn handlers(&self) -> &[HandlerDescriptor] {
        &self.handlers
    }
}

/// Registry of listeners, owned by one dispatcher.
pub struct ListenerRegistry {
    entries: RwLock<HashMap<ListenerId, Arc<ListenerEntry>>>,
    default_tier: ExecutionTier,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    pub fn new(cfg: &Config) -> Self {
        let entries = match cfg.registry_capacity_hint() {
            Some(n) => HashMap::with_capacity(n),
            None => HashMap::new(),
        };
        Self {
            entries: RwLock::new(entries),
            default_tier: cfg.default_tier,
        }
    }

    /// Registers every listener in `listeners`; `None` entries are skipped.
    pub fn register<I>(&self, listeners: I)
    where
        I: IntoIterator,
        I::Item: IntoListener,
    {
        for listener in listeners.into_iter().filter_map(IntoListener::into_listener) {
            self.register_one(listener);
        }
    }

    /// Unregisters every listener in `listeners`; `None` and unknown entries are skipped.
    pub fn unregister<I>(&self, listeners: I)
    where
        I: IntoIterator,
        I::Item: IntoListener,
    {
        for listener in listeners.into_iter().filter_map(IntoListener::into_listener) {
            let removed = self.entries.write().remove(&listener.id());
            if removed.is_some() {
                tracing::debug!(
                    listener = listener.name(),
                    listener_id = %listener.id(),
                    "listener unregistered"
                );
            }
        }
    }

    /// Returns a point-in-time copy of all entries.
    pub fn snapshot(&self) -> Snapshot {
        let entries = self.entries.read().values().cloned().collect();
        Snapshot { entries }
    }

    /// Returns true if the listener is currently registered.
    pub fn contains<L: ?Sized>(&self, listener: &Arc<L>) -> bool {
        self.contains_id(ListenerId::of(listener))
    }

    /// Returns true if a listener with this identity is currently registered.
    pub fn contains_id(&self, id: ListenerId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Total number of descriptors across all listeners.
    pub fn handler_count(&self) -> usize {
        self.entries.read().values().map(|e| e.handlers.len()).sum()
    }

    /// Unregisters every listener.
    pub fn clear(&self) {
        let drained: Vec<Arc<ListenerEntry>> = {
            let mut entries = self.entries.write();
            entries.drain().map(|(_, entry)| entry).collect()
        };
        tracing::debug!(listeners = drained.len(), "registry cleared");
    }

    fn register_one(&self, listener: ListenerHandle) {
        let handlers = self.describe(&listener);
        let id = listener.id();
        let name = listener.name();
        let count = handlers.len();

        let entry = Arc::new(ListenerEntry {
            listener,
            handlers: handlers.into(),
        });
        let previous = self.entries.write().insert(id, entry);
        let replaced = previous.is_some();
        drop(previous);

        tracing::debug!(
            listener = name,
            listener_id = %id,
            handlers = count,
            replaced,
            "listener registered"
        );
    }

    /// Builds descriptors for a listener; candidates with an invalid shape are dropped.
    fn describe(&self, listener: &ListenerHandle) -> Vec<HandlerDescriptor> {
        listener
            .discover(self.default_tier)
            .into_iter()
            .filter_map(|candidate| match HandlerDescriptor::from_candidate(candidate) {
                Ok(descriptor) => Some(descriptor),
                Err(err) => {
                    tracing::debug!(
                        listener = listener.name(),
                        label = err.as_label(),
                        detail = %err.as_message(),
                        "handler candidate excluded"
                    );
                    None
                }
            })
            .collect()
    }
}

/// Immutable point-in-time copy of the registry.
///
/// Cheap to take: entries are shared, not cloned.
#[derive(Clone, Default)]
pub struct Snapshot {
    entries: Vec<Arc<ListenerEntry>>,
}

impl Snapshot {
    /// Iterates over the captured entries. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = &ListenerEntry> {
        self.entries.iter().map(Arc::as_ref)
    }

    /// Number of captured listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was registered at capture time.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
