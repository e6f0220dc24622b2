//! # Failure observer trait.
//!
//! Provides [`Observe`], the extension point that receives a
//! [`HandlerFailure`] every time a handler fails during dispatch.
//!
//! ## Architecture
//! ```text
//! Dispatcher::invoke ──► catch_unwind(handler)
//!                          ├─ Ok(Ok(()))  → next handler
//!                          └─ Err / panic → HandlerFailure ──► ObserverSet::emit
//!                                                                ├─► LogWriter (tracing)
//!                                                                └─► custom observers
//! ```
//!
//! ## Rules
//! - Observers run synchronously on the publishing thread, between two handlers.
//! - Observer panics are caught and logged; they never reach the publisher.
//! - Keep observers cheap: they delay the rest of the dispatch.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventvisor::{HandlerFailure, Observe};
//!
//! #[derive(Default)]
//! struct FailureCounter(AtomicUsize);
//!
//! impl Observe for FailureCounter {
//!     fn on_failure(&self, _failure: &HandlerFailure) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

use std::sync::Arc;

use crate::error::HandlerError;
use crate::handlers::ExecutionTier;
use crate::listeners::ListenerId;

/// Report of one failed handler invocation.
#[derive(Clone, Debug)]
pub struct HandlerFailure {
    /// Name of the listener owning the handler.
    pub listener: &'static str,
    /// Identity of the listener owning the handler.
    pub listener_id: ListenerId,
    /// Name of the handler.
    pub handler: Arc<str>,
    /// Name of the event being dispatched.
    pub event: &'static str,
    /// Tier the handler ran in.
    pub tier: ExecutionTier,
    /// What went wrong.
    pub error: HandlerError,
}

/// Receiver of handler failure reports.
pub trait Observe: Send + Sync + 'static {
    /// Handles one failure report.
    fn on_failure(&self, failure: &HandlerFailure);

    /// Returns the observer name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
