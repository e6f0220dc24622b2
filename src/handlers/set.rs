//! # Handler registration builder.
//!
//! [`HandlerSet`] is how a listener declares its handlers. The dispatcher
//! creates one per registration, passes it to
//! [`Listener::handlers`](crate::Listener::handlers) and turns the collected
//! candidates into [`HandlerDescriptor`](crate::HandlerDescriptor)s.
//!
//! ## Handler shapes
//! ```text
//! on::<E>(|listener: &L, event: &mut E| ..)        typed: E, or any event embedding E
//! on_any(|listener: &L, event: &mut dyn Event| ..) base: every event
//! ```
//!
//! ## Defaults
//! - tier: the dispatcher's [`Config::default_tier`](crate::Config::default_tier)
//!   (`Middle` unless configured)
//! - `ignore_cancelled`: `false`
//! - name: the Rust type name of the handler (readable for `fn` items such as
//!   `Self::on_click`, override with [`HandlerOptions::named`] for closures)

use std::any::type_name;
use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::events::{Event, EventType, view_mut};
use crate::handlers::descriptor::Invoke;
use crate::handlers::{ExecutionTier, IntoHandlerResult};
use crate::listeners::ErasedListener;

/// Declared parameter of a handler candidate.
pub(crate) enum Param {
    /// `&mut dyn Event`.
    Dyn,
    /// A concrete event type.
    Typed(EventType),
}

/// Handler as declared by a listener, before shape validation.
pub(crate) struct Candidate {
    pub(crate) name: Cow<'static, str>,
    pub(crate) param: Param,
    pub(crate) tier: ExecutionTier,
    pub(crate) ignore_cancelled: bool,
    pub(crate) invoke: Invoke,
}

/// Per-handler options; the counterpart of a handler attribute.
///
/// ## Example
/// ```rust
/// use eventvisor::{ExecutionTier, HandlerOptions};
///
/// let opts = HandlerOptions::new()
///     .tier(ExecutionTier::Monitor)
///     .ignore_cancelled(true)
///     .named("audit");
/// ```
#[derive(Clone, Debug, Default)]
pub struct HandlerOptions {
    tier: Option<ExecutionTier>,
    ignore_cancelled: bool,
    name: Option<Cow<'static, str>>,
}

impl HandlerOptions {
    /// Options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the execution tier.
    pub fn tier(mut self, tier: ExecutionTier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Runs the handler even when the event is cancelled.
    pub fn ignore_cancelled(mut self, ignore: bool) -> Self {
        self.ignore_cancelled = ignore;
        self
    }

    /// Overrides the handler name used in failure reports.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Collects the handlers of one listener of type `L`.
pub struct HandlerSet<L> {
    default_tier: ExecutionTier,
    candidates: Vec<Candidate>,
    _listener: PhantomData<fn(&L)>,
}

impl<L: Send + Sync + 'static> HandlerSet<L> {
    pub(crate) fn new(default_tier: ExecutionTier) -> Self {
        Self {
            default_tier,
            candidates: Vec::new(),
            _listener: PhantomData,
        }
    }

    /// Registers a handler for events of type `E` with default options.
    pub fn on<E, F, R>(&mut self, handler: F) -> &mut Self
    where
        E: Event,
        F: Fn(&L, &mut E) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        self.on_with(HandlerOptions::default(), handler)
    }

    /// Registers a handler for events of type `E`.
    ///
    /// The handler also receives events that embed `E` as an ancestor; it is
    /// then handed the embedded `E`.
    pub fn on_with<E, F, R>(&mut self, options: HandlerOptions, handler: F) -> &mut Self
    where
        E: Event,
        F: Fn(&L, &mut E) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        let invoke: Invoke = Arc::new(
            move |listener: &ErasedListener,
                  event: &mut dyn Event|
                  -> Result<(), HandlerError> {
                let listener = listener
                    .downcast_ref::<L>()
                    .ok_or(HandlerError::ViewMismatch {
                        expected: type_name::<L>(),
                    })?;
                let event = view_mut::<E>(event).ok_or(HandlerError::ViewMismatch {
                    expected: type_name::<E>(),
                })?;
                handler(listener, event).into_handler_result()
            },
        );
        self.push(
            options,
            type_name::<F>(),
            Param::Typed(EventType::of::<E>()),
            invoke,
        )
    }

    /// Registers a base handler, invoked for every event, with default options.
    pub fn on_any<F, R>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&L, &mut dyn Event) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        self.on_any_with(HandlerOptions::default(), handler)
    }

    /// Registers a base handler, invoked for every event.
    ///
    /// Base handlers run in the first dispatch phase, before any typed handler
    /// of the same listener.
    pub fn on_any_with<F, R>(&mut self, options: HandlerOptions, handler: F) -> &mut Self
    where
        F: Fn(&L, &mut dyn Event) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        let invoke: Invoke = Arc::new(
            move |listener: &ErasedListener,
                  event: &mut dyn Event|
                  -> Result<(), HandlerError> {
                let listener = listener
                    .downcast_ref::<L>()
                    .ok_or(HandlerError::ViewMismatch {
                        expected: type_name::<L>(),
                    })?;
                handler(listener, event).into_handler_result()
            },
        );
        self.push(options, type_name::<F>(), Param::Dyn, invoke)
    }

    /// Number of handlers declared so far.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub(crate) fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }

    fn push(
        &mut self,
        options: HandlerOptions,
        fallback_name: &'static str,
        param: Param,
        invoke: Invoke,
    ) -> &mut Self {
        self.candidates.push(Candidate {
            name: options.name.unwrap_or(Cow::Borrowed(fallback_name)),
            param,
            tier: options.tier.unwrap_or(self.default_tier),
            ignore_cancelled: options.ignore_cancelled,
            invoke,
        });
        self
    }
}
