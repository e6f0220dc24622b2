//! # eventvisor
//!
//! **Eventvisor** is an in-process event dispatch library for Rust.
//!
//! Listener objects declare handlers for event types; callers publish event
//! values which are routed to every interested handler in a deterministic,
//! tier-ordered, cancellation-aware order. A failing handler never affects the
//! publisher or the other handlers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Listener   │   │   Listener   │   │   Listener   │
//!     │  (Arc<L> #1) │   │  (Arc<L> #2) │   │  (Arc<L> #3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ handlers(&mut HandlerSet<L>)        │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher                                                       │
//! │  - ListenerRegistry (ListenerId → [HandlerDescriptor], RwLock)    │
//! │  - ObserverSet (failure reports: LogWriter + user observers)      │
//! │  - Config (default tier, slow-handler threshold)                  │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                │ publish(&mut event)
//!                                ▼
//!                       registry.snapshot()
//!                                │
//!              ┌─────────────────┼─────────────────┐
//!              ▼                 ▼                 ▼
//!         listener #1       listener #2       listener #3
//!     phase 1: base handlers      First ─► Middle ─► Last ─► Monitor
//!     phase 2: typed handlers     First ─► Middle ─► Last ─► Monitor
//!              │
//!              └─► handler failed? ──► HandlerFailure ──► observers
//! ```
//!
//! ### Per-handler decision
//! ```text
//! handler in current tier and phase
//!   ├─ event cancelled && !ignore_cancelled ─► skip
//!   └─ otherwise ─► invoke (panic / Err caught, reported, dispatch continues)
//! ```
//!
//! ## Features
//! | Area              | Description                                                        | Key types / traits                           |
//! |-------------------|--------------------------------------------------------------------|----------------------------------------------|
//! | **Events**        | Event values, ancestry by composition, runtime typing.             | [`Event`], [`EventType`], [`BaseEvent`]      |
//! | **Cancellation**  | Optional flag re-checked before every handler.                     | [`Cancellable`]                              |
//! | **Listeners**     | Owners of handlers, registered and unregistered as a unit.        | [`Listener`], [`ListenerHandle`]             |
//! | **Handlers**      | Typed and base handlers with tier and cancellation options.        | [`HandlerSet`], [`HandlerOptions`]           |
//! | **Dispatch**      | Two-phase, tier-ordered delivery with failure isolation.           | [`Dispatcher`], [`ListenerRegistry`]         |
//! | **Observers**     | Hook into handler failures (logging, metrics, alerting).           | [`Observe`], [`LogWriter`]                   |
//! | **Errors**        | Typed errors for handler invocation and registration.             | [`HandlerError`], [`RegistrationError`]      |
//! | **Configuration** | Centralize dispatcher settings.                                    | [`Config`]                                   |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventvisor::{
//!     Cancellable, Config, Dispatcher, ExecutionTier, HandlerOptions, HandlerSet, Listener,
//!     impl_event,
//! };
//!
//! #[derive(Default)]
//! struct Login { user: String, cancelled: bool }
//!
//! impl Cancellable for Login {
//!     fn is_cancelled(&self) -> bool { self.cancelled }
//!     fn set_cancelled(&mut self, cancelled: bool) { self.cancelled = cancelled; }
//! }
//!
//! impl_event!(Login: cancellable);
//!
//! #[derive(Default)]
//! struct Gate { admitted: AtomicUsize }
//!
//! impl Listener for Gate {
//!     fn handlers(&self, set: &mut HandlerSet<Self>) {
//!         set.on_with(
//!             HandlerOptions::new().tier(ExecutionTier::First),
//!             |_: &Gate, login: &mut Login| {
//!                 if login.user.is_empty() {
//!                     login.cancel();
//!                 }
//!             },
//!         );
//!         set.on(|gate: &Gate, _: &mut Login| {
//!             gate.admitted.fetch_add(1, Ordering::Relaxed);
//!         });
//!     }
//! }
//!
//! let dispatcher = Dispatcher::builder(Config::default()).build();
//! let gate = Arc::new(Gate::default());
//! dispatcher.register([&gate]);
//!
//! dispatcher.publish(&mut Login { user: "ada".into(), ..Login::default() });
//! dispatcher.publish(&mut Login::default());
//! assert_eq!(gate.admitted.load(Ordering::Relaxed), 1);
//! ```
mod config;
mod core;
mod error;
mod events;
mod handlers;
mod listeners;
mod observers;

// ---- Public re-exports ----

pub use crate::core::{Dispatcher, DispatcherBuilder, ListenerEntry, ListenerRegistry, Snapshot};
pub use config::Config;
pub use error::{HandlerError, RegistrationError};
pub use events::{AsAny, BaseEvent, Cancellable, Event, EventType};
pub use handlers::{ExecutionTier, HandlerDescriptor, HandlerOptions, HandlerSet, IntoHandlerResult};
pub use listeners::{IntoListener, Listener, ListenerHandle, ListenerId};
pub use observers::{HandlerFailure, LogWriter, ObserverSet, Observe};
