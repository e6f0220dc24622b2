//! Error types used by the dispatcher and its handlers.
//!
//! This module defines two error enums:
//!
//! - [`HandlerError`]: failures raised while invoking a single handler.
//! - [`RegistrationError`]: handler candidates rejected while a listener is registered.
//!
//! Neither type ever reaches the caller of [`Dispatcher::publish`](crate::Dispatcher::publish)
//! or [`Dispatcher::register`](crate::Dispatcher::register): handler errors are reported to
//! observers, registration errors are logged and the offending candidate is dropped.
//! Both provide `as_label` / `as_message` helpers for logs.

use std::any::Any;

use thiserror::Error;

/// # Errors produced by handler invocation.
///
/// Every variant is contained by the dispatcher: it is wrapped into a
/// [`HandlerFailure`](crate::HandlerFailure), delivered to the observers and dispatch
/// continues with the next handler.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// Handler returned an error value.
    #[error("handler failed: {error}")]
    Failed {
        /// The rendered error returned by the handler.
        error: String,
    },

    /// Handler panicked; the unwind was caught at the invocation boundary.
    #[error("handler panicked: {message}")]
    Panicked {
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The listener or event could not be viewed as the type the handler was declared for.
    #[error("cannot view argument as {expected}")]
    ViewMismatch {
        /// Type name the handler expected.
        expected: &'static str,
    },
}

impl HandlerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventvisor::HandlerError;
    ///
    /// let err = HandlerError::Failed { error: "boom".into() };
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
            HandlerError::ViewMismatch { .. } => "handler_view_mismatch",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { error } => format!("error: {error}"),
            HandlerError::Panicked { message } => format!("panic: {message}"),
            HandlerError::ViewMismatch { expected } => format!("expected: {expected}"),
        }
    }

    /// Returns `true` if the failure came from a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, HandlerError::Panicked { .. })
    }
}

/// # Errors produced while turning handler candidates into descriptors.
///
/// A listener registers handlers through [`HandlerSet`](crate::HandlerSet). Candidates
/// whose shape cannot be dispatched are excluded from the listener's descriptor list;
/// the error is logged and never returned to the caller of `register`.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A typed handler was declared for the concrete [`BaseEvent`](crate::BaseEvent).
    ///
    /// Base handlers receive every event and must take `&mut dyn Event`
    /// (see [`HandlerSet::on_any`](crate::HandlerSet::on_any)).
    #[error("handler `{handler}` takes the concrete base event; use `on_any` instead")]
    ConcreteBaseParameter {
        /// Name of the rejected handler.
        handler: String,
    },
}

impl RegistrationError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistrationError::ConcreteBaseParameter { .. } => "registration_concrete_base",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistrationError::ConcreteBaseParameter { handler } => {
                format!("handler={handler} takes BaseEvent by type")
            }
        }
    }
}

/// Renders a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
