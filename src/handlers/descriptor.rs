//! # Handler descriptors.
//!
//! A [`HandlerDescriptor`] is the immutable record of one handler: the event type
//! it accepts, its [`ExecutionTier`], its cancellation policy and the stored
//! invocation closure. Descriptors are built once, when a listener is
//! registered, from the candidates collected by a [`HandlerSet`](crate::HandlerSet).
//!
//! ## Rules
//! - `accepts` is [`EventType::Base`] or a concrete event type; a typed handler
//!   for the concrete [`BaseEvent`](crate::BaseEvent) is rejected at registration.
//! - Matching and eligibility are pure reads; the descriptor never changes.

use std::fmt;
use std::sync::Arc;

use crate::error::{HandlerError, RegistrationError};
use crate::events::{Event, EventType};
use crate::handlers::ExecutionTier;
use crate::handlers::set::{Candidate, Param};
use crate::listeners::ErasedListener;

/// Stored invocation: `(listener, event) -> outcome`.
pub(crate) type Invoke =
    Arc<dyn Fn(&ErasedListener, &mut dyn Event) -> Result<(), HandlerError> + Send + Sync>;

/// Immutable record of a single event handler.
#[derive(Clone)]
pub struct HandlerDescriptor {
    name: Arc<str>,
    accepts: EventType,
    tier: ExecutionTier,
    ignore_cancelled: bool,
    invoke: Invoke,
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("name", &self.name)
            .field("accepts", &self.accepts.name())
            .field("tier", &self.tier)
            .field("ignore_cancelled", &self.ignore_cancelled)
            .field("invoke", &"<fn>")
            .finish()
    }
}

impl HandlerDescriptor {
    /// Builds a descriptor from a registration candidate.
    pub(crate) fn from_candidate(candidate: Candidate) -> Result<Self, RegistrationError> {
        let accepts = match candidate.param {
            Param::Dyn => EventType::Base,
            Param::Typed(ty) if ty.is_base() => {
                return Err(RegistrationError::ConcreteBaseParameter {
                    handler: candidate.name.into_owned(),
                });
            }
            Param::Typed(ty) => ty,
        };

        Ok(Self {
            name: Arc::from(candidate.name.as_ref()),
            accepts,
            tier: candidate.tier,
            ignore_cancelled: candidate.ignore_cancelled,
            invoke: candidate.invoke,
        })
    }

    /// Handler name used in failure reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Event type this handler accepts.
    pub fn accepts(&self) -> EventType {
        self.accepts
    }

    /// Tier the handler runs in.
    pub fn tier(&self) -> ExecutionTier {
        self.tier
    }

    /// Whether the handler also runs for cancelled events.
    pub fn ignore_cancelled(&self) -> bool {
        self.ignore_cancelled
    }

    /// Returns `true` if this is a base handler (sees every event).
    #[inline]
    pub fn is_base(&self) -> bool {
        self.accepts.is_base()
    }

    /// Returns `true` if the handler accepts an event of `runtime` type with the
    /// given ancestors.
    pub(crate) fn matches(&self, runtime: EventType, ancestors: &[EventType]) -> bool {
        self.accepts.is_base() || self.accepts == runtime || ancestors.contains(&self.accepts)
    }

    /// Cancellation rule, evaluated against the event's current state.
    #[inline]
    pub(crate) fn should_run(&self, event: &dyn Event) -> bool {
        self.ignore_cancelled || !event.is_cancelled()
    }

    #[inline]
    pub(crate) fn invoke(
        &self,
        listener: &ErasedListener,
        event: &mut dyn Event,
    ) -> Result<(), HandlerError> {
        (self.invoke)(listener, event)
    }
}
