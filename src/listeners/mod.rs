//! Listeners: owners of handlers, registered and unregistered as a unit.
//!
//! ## Contents
//! - [`Listener`] trait implemented by application types
//! - [`ListenerHandle`] type-erased handle stored in the registry
//! - [`ListenerId`] reference identity of a listener
//! - [`IntoListener`] lenient conversion used by `register` / `unregister`

mod listener;

pub(crate) use listener::ErasedListener;
pub use listener::{IntoListener, Listener, ListenerHandle, ListenerId};
