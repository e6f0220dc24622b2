//! # ObserverSet: fan-out of failure reports
//!
//! [`ObserverSet`] delivers each [`HandlerFailure`] to every observer, in
//! registration order, on the calling thread.
//!
//! ## What it guarantees
//! - Every observer sees every report.
//! - A panicking observer is isolated: the panic is caught, logged, and the
//!   remaining observers still run.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if an observer uses `Mutex<T>` and panics while holding the lock.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::panic_message;
use crate::observers::{HandlerFailure, Observe};

/// Composite fan-out over failure observers.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn Observe>>,
}

impl ObserverSet {
    /// Creates a set from the given observers.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>) -> Self {
        Self { observers }
    }

    /// Delivers one report to all observers.
    pub fn emit(&self, failure: &HandlerFailure) {
        for observer in &self.observers {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer.on_failure(failure)));
            if let Err(panic_err) = delivered {
                tracing::error!(
                    observer = observer.name(),
                    info = %panic_message(&*panic_err),
                    "observer panicked while handling a failure report"
                );
            }
        }
    }

    /// True if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }
}
