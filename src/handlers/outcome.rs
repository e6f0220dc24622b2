//! Conversion of handler return values into a dispatch outcome.
//!
//! Handlers have no return value in the dispatch sense. They may return `()`,
//! or a `Result<(), E>` where `E: Display` to signal failure without panicking.
//! An `Err` is reported exactly like a panic: logged, then dispatch moves on.

use std::fmt;

use crate::error::HandlerError;

/// Return types accepted from handler closures.
pub trait IntoHandlerResult {
    /// Converts the value into the dispatcher's outcome.
    fn into_handler_result(self) -> Result<(), HandlerError>;
}

impl IntoHandlerResult for () {
    #[inline]
    fn into_handler_result(self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl<E: fmt::Display> IntoHandlerResult for Result<(), E> {
    fn into_handler_result(self) -> Result<(), HandlerError> {
        self.map_err(|e| HandlerError::Failed {
            error: e.to_string(),
        })
    }
}
