//! # Listeners and listener handles.
//!
//! A [`Listener`] is an application value that owns handlers. It is shared as
//! `Arc<L>` and identified by the `Arc` allocation: registering the same `Arc`
//! twice targets the same registry entry, two equal but distinct values do not.
//!
//! [`ListenerHandle`] erases the listener type so that listeners of different
//! types can be registered in one call and stored in one registry.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Event, HandlerSet, Listener, ListenerHandle};
//!
//! struct Ping;
//! impl Event for Ping {}
//!
//! struct Pong;
//!
//! impl Listener for Pong {
//!     fn handlers(&self, set: &mut HandlerSet<Self>) {
//!         set.on(|_: &Pong, _: &mut Ping| println!("pong"));
//!     }
//! }
//!
//! let pong = Arc::new(Pong);
//! let handle = ListenerHandle::new(pong.clone());
//! assert_eq!(handle.id(), ListenerHandle::new(pong).id());
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::handlers::{Candidate, ExecutionTier, HandlerSet};

/// Type-erased listener instance.
pub(crate) type ErasedListener = dyn Any + Send + Sync;

/// An owner of event handlers.
///
/// `handlers` is called once per registration. Declare every handler through
/// the given [`HandlerSet`]; re-registering the listener calls it again and
/// replaces the previous handlers.
pub trait Listener: Send + Sync + Sized + 'static {
    /// Declares this listener's handlers.
    fn handlers(&self, set: &mut HandlerSet<Self>);

    /// Name used in logs and failure reports.
    fn listener_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Identity of a registered listener: the address of its `Arc` allocation.
///
/// Stable while the listener is registered, since the registry keeps the
/// allocation alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

impl ListenerId {
    /// Returns the identity of `listener`.
    pub fn of<L: ?Sized>(listener: &Arc<L>) -> Self {
        Self(Arc::as_ptr(listener) as *const () as usize)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Discovery entry point, monomorphized per listener type.
type Discover = fn(&ErasedListener, ExecutionTier) -> Vec<Candidate>;

/// Type-erased, cloneable handle to a listener.
#[derive(Clone)]
pub struct ListenerHandle {
    id: ListenerId,
    name: &'static str,
    instance: Arc<ErasedListener>,
    discover: Discover,
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl ListenerHandle {
    /// Wraps a shared listener.
    pub fn new<L: Listener>(listener: Arc<L>) -> Self {
        let id = ListenerId::of(&listener);
        let name = listener.listener_name();
        Self {
            id,
            name,
            instance: listener,
            discover: discover::<L>,
        }
    }

    /// Identity of the wrapped listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Name of the wrapped listener.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn instance(&self) -> &ErasedListener {
        self.instance.as_ref()
    }

    /// Collects the listener's handler candidates.
    pub(crate) fn discover(&self, default_tier: ExecutionTier) -> Vec<Candidate> {
        (self.discover)(self.instance(), default_tier)
    }
}

impl<L: Listener> From<Arc<L>> for ListenerHandle {
    fn from(listener: Arc<L>) -> Self {
        Self::new(listener)
    }
}

fn discover<L: Listener>(instance: &ErasedListener, default_tier: ExecutionTier) -> Vec<Candidate> {
    let mut set = HandlerSet::<L>::new(default_tier);
    if let Some(listener) = instance.downcast_ref::<L>() {
        listener.handlers(&mut set);
    }
    set.into_candidates()
}

/// Values accepted by [`Dispatcher::register`](crate::Dispatcher::register) and
/// [`Dispatcher::unregister`](crate::Dispatcher::unregister).
///
/// `None` converts to "no listener" and is skipped.
pub trait IntoListener {
    /// Converts into an optional handle.
    fn into_listener(self) -> Option<ListenerHandle>;
}

impl<L: Listener> IntoListener for Arc<L> {
    fn into_listener(self) -> Option<ListenerHandle> {
        Some(ListenerHandle::new(self))
    }
}

impl<L: Listener> IntoListener for &Arc<L> {
    fn into_listener(self) -> Option<ListenerHandle> {
        Some(ListenerHandle::new(Arc::clone(self)))
    }
}

impl<L: Listener> IntoListener for Option<Arc<L>> {
    fn into_listener(self) -> Option<ListenerHandle> {
        self.map(ListenerHandle::new)
    }
}

impl IntoListener for ListenerHandle {
    fn into_listener(self) -> Option<ListenerHandle> {
        Some(self)
    }
}

impl IntoListener for &ListenerHandle {
    fn into_listener(self) -> Option<ListenerHandle> {
        Some(self.clone())
    }
}

impl IntoListener for Option<ListenerHandle> {
    fn into_listener(self) -> Option<ListenerHandle> {
        self
    }
}
