//! # LogWriter: failure reports through `tracing`
//!
//! Installed by default (see [`Config::log_failures`](crate::Config::log_failures)).
//! Every report becomes one `ERROR` record with structured fields.
//!
//! ## Example output
//! ```text
//! ERROR eventvisor::observers::log: an event handler encountered an unhandled failure during its execution
//!     listener="app::Audit" listener_id=0x6000021c4010 handler="app::Audit::on_click"
//!     event="app::ClickEvent" tier="first" label="handler_panicked" detail="panic: boom"
//! ```

use crate::observers::{HandlerFailure, Observe};

/// Failure observer writing to `tracing`.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Observe for LogWriter {
    fn on_failure(&self, f: &HandlerFailure) {
        tracing::error!(
            listener = f.listener,
            listener_id = %f.listener_id,
            handler = %f.handler,
            event = f.event,
            tier = f.tier.as_label(),
            label = f.error.as_label(),
            detail = %f.error.as_message(),
            "an event handler encountered an unhandled failure during its execution"
        );
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
