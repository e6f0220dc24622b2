//! # Cancellation capability.
//!
//! [`Cancellable`] is implemented by event types that can be cancelled while
//! they are being dispatched. Cancellation is a flag on the event, not a
//! control-flow signal: the dispatch itself always runs to completion.
//!
//! ## Rules
//! - Before **every** handler invocation the dispatcher reads the current flag.
//! - A handler with `ignore_cancelled = false` is skipped while the flag is set.
//! - A handler with `ignore_cancelled = true` runs regardless.
//! - Handlers may clear the flag again; later handlers observe the new value.
//!
//! ```text
//! First  h1 ── cancel ──────────┐
//! Middle h2 (ignore=false)  skip│
//! Middle h3 (ignore=true)   run ── un-cancel
//! Last   h4 (ignore=false)  run
//! ```

/// Capability of events carrying a mutable cancelled flag.
pub trait Cancellable {
    /// Returns `true` if the event is currently cancelled.
    fn is_cancelled(&self) -> bool;

    /// Sets the cancelled flag.
    fn set_cancelled(&mut self, cancelled: bool);

    /// Shorthand for `set_cancelled(true)`.
    fn cancel(&mut self) {
        self.set_cancelled(true);
    }
}
