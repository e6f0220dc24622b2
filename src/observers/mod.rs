//! # Failure observers.
//!
//! Handler failures never reach the publisher. They are turned into
//! [`HandlerFailure`] reports and delivered to the dispatcher's observers.
//!
//! ## Observer types
//! - [`LogWriter`] built-in, writes every report through `tracing`
//! - custom implementations of [`Observe`] (metrics, alerting, test probes)

mod log;
mod observer;
mod set;

pub use log::LogWriter;
pub use observer::{HandlerFailure, Observe};
pub use set::ObserverSet;
