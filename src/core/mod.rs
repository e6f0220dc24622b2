//! Dispatch core: registry, routing and construction.
//!
//! The public entry point is [`Dispatcher`], built directly or through
//! [`DispatcherBuilder`].
//!
//! Internal modules:
//! - [`registry`]: listener identity to handler descriptors, snapshots;
//! - [`dispatcher`]: two-phase, tier-ordered routing with failure isolation;
//! - [`builder`]: wires config and observers into a dispatcher.

mod builder;
mod dispatcher;
mod registry;

pub use builder::DispatcherBuilder;
pub use dispatcher::Dispatcher;
pub use registry::{ListenerEntry, ListenerRegistry, Snapshot};
