//! Events: the published values and their capabilities.
//!
//! ## Contents
//! - [`Event`], [`EventType`], [`BaseEvent`] the event data model and runtime typing
//! - [`Cancellable`] optional capability queried before every handler invocation
//! - `impl_event!` declarative implementation of [`Event`]
//!
//! Events carry no identity beyond their type and fields. The dispatcher only
//! mutates them through the handlers it invokes.

mod cancellable;
mod event;
mod macros;

pub use cancellable::Cancellable;
pub(crate) use event::view_mut;
pub use event::{AsAny, BaseEvent, Event, EventType};
