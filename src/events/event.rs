//! # Event values and their runtime type.
//!
//! An [`Event`] is any `'static` value published through a
//! [`Dispatcher`](crate::Dispatcher). The dispatcher routes by the event's
//! **runtime type** and by the **ancestor types** the event declares.
//!
//! ## Type model
//! ```text
//! EventType::Base          every handler registered with `on_any`
//!     ▲
//!     │  (implicit: every event is a base event)
//! InputEvent               ancestor, embedded as a field
//!     ▲
//!     │  upcast_mut(TypeId::of::<InputEvent>())
//! ClickEvent               runtime type of the published value
//! ```
//!
//! Ancestors are modelled by composition: a `ClickEvent` embeds an
//! `InputEvent` and hands out a mutable view of it on request. The
//! [`impl_event!`](crate::impl_event) macro writes that plumbing.
//!
//! [`BaseEvent`] is the concrete base event. Publishing it only reaches base
//! handlers.

use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};

use crate::events::Cancellable;

/// Access to `Any` for every sized `'static` type.
///
/// Supertrait of [`Event`] so that `dyn Event` can be downcast.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A value that can be published to a [`Dispatcher`](crate::Dispatcher).
///
/// Every method has a default, so a plain event is `impl Event for Ping {}`.
/// Use [`impl_event!`](crate::impl_event) for cancellable events and for events
/// that embed an ancestor event.
///
/// ### Capabilities
/// - **Cancellable**: override [`as_cancellable`](Self::as_cancellable) and
///   [`as_cancellable_mut`](Self::as_cancellable_mut). The dispatcher queries the
///   capability before every handler invocation.
/// - **Ancestry**: override [`ancestors`](Self::ancestors) and
///   [`upcast_mut`](Self::upcast_mut). Handlers registered for an ancestor type
///   receive the embedded ancestor view.
pub trait Event: AsAny + Send + 'static {
    /// Name used in logs and failure reports.
    fn event_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the cancellation capability, if this event supports it.
    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        None
    }

    /// Mutable counterpart of [`as_cancellable`](Self::as_cancellable).
    fn as_cancellable_mut(&mut self) -> Option<&mut dyn Cancellable> {
        None
    }

    /// Ancestor event types, nearest first. Does not include the runtime type
    /// itself nor [`EventType::Base`].
    fn ancestors(&self) -> Vec<EventType> {
        Vec::new()
    }

    /// Returns the embedded ancestor of type `target`, if any.
    fn upcast_mut(&mut self, _target: TypeId) -> Option<&mut dyn Event> {
        None
    }
}

impl dyn Event {
    /// Returns `true` if the runtime type is `E`.
    #[inline]
    pub fn is<E: Event>(&self) -> bool {
        self.as_any().is::<E>()
    }

    /// Downcasts to the runtime type `E`.
    #[inline]
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    /// Downcasts to the runtime type `E`.
    #[inline]
    pub fn downcast_mut<E: Event>(&mut self) -> Option<&mut E> {
        self.as_any_mut().downcast_mut::<E>()
    }

    /// Returns the [`EventType`] of the runtime value.
    pub fn event_type(&self) -> EventType {
        if self.is::<BaseEvent>() {
            EventType::Base
        } else {
            EventType::Concrete {
                id: self.as_any().type_id(),
                name: self.event_name(),
            }
        }
    }

    /// Returns `true` if the event currently carries a cancelled flag.
    ///
    /// Events without the capability are never cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.as_cancellable().is_some_and(|c| c.is_cancelled())
    }
}

/// Resolves a mutable view of `event` as `E`: the value itself when the runtime
/// type is `E`, otherwise the embedded ancestor of type `E`.
pub(crate) fn view_mut<E: Event>(event: &mut dyn Event) -> Option<&mut E> {
    if event.is::<E>() {
        return event.downcast_mut::<E>();
    }
    event.upcast_mut(TypeId::of::<E>())?.downcast_mut::<E>()
}

/// Type accepted by a handler, or the runtime type of a published event.
///
/// Equality and hashing use the type id only; `name` is for logs and may come
/// from an overridden [`Event::event_name`].
#[derive(Clone, Copy, Debug)]
pub enum EventType {
    /// The generic base type: handlers accepting it see every event.
    Base,
    /// A concrete event type.
    Concrete {
        /// Rust type id.
        id: TypeId,
        /// Rust type name, for logs.
        name: &'static str,
    },
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id_opt() == other.type_id_opt()
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id_opt().hash(state);
    }
}

impl EventType {
    fn type_id_opt(&self) -> Option<TypeId> {
        match self {
            EventType::Base => None,
            EventType::Concrete { id, .. } => Some(*id),
        }
    }

    /// Returns the event type of `E`; [`BaseEvent`] maps to [`EventType::Base`].
    pub fn of<E: Event>() -> Self {
        if TypeId::of::<E>() == TypeId::of::<BaseEvent>() {
            EventType::Base
        } else {
            EventType::Concrete {
                id: TypeId::of::<E>(),
                name: std::any::type_name::<E>(),
            }
        }
    }

    /// Returns `true` for [`EventType::Base`].
    #[inline]
    pub fn is_base(&self) -> bool {
        matches!(self, EventType::Base)
    }

    /// Returns the type name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            EventType::Base => std::any::type_name::<BaseEvent>(),
            EventType::Concrete { name, .. } => name,
        }
    }
}

/// The concrete base event.
///
/// Publishing a `BaseEvent` reaches base handlers only; the specific-type phase
/// is skipped entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseEvent;

impl Event for BaseEvent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Input {
        cancelled: bool,
        seen: u32,
    }

    impl Cancellable for Input {
        fn is_cancelled(&self) -> bool {
            self.cancelled
        }

        fn set_cancelled(&mut self, cancelled: bool) {
            self.cancelled = cancelled;
        }
    }

    #[derive(Debug, Default)]
    struct Key {
        input: Input,
        code: u32,
    }

    #[derive(Debug, Default)]
    struct Shortcut {
        key: Key,
    }

    #[derive(Debug)]
    struct Tick;

    impl Event for Tick {}

    crate::impl_event!(Input: cancellable);
    crate::impl_event!(Key: extends Input => input);
    crate::impl_event!(Shortcut: extends Key => key);

    #[test]
    fn test_event_type_of_base_is_base() {
        assert_eq!(EventType::of::<BaseEvent>(), EventType::Base);
        assert!(!EventType::of::<Tick>().is_base());
        assert_eq!(
            (&BaseEvent as &dyn Event).event_type(),
            EventType::Base
        );
        assert_eq!((&Tick as &dyn Event).event_type(), EventType::of::<Tick>());
    }

    struct Renamed;

    impl Event for Renamed {
        fn event_name(&self) -> &'static str {
            "app.renamed"
        }
    }

    #[test]
    fn test_overridden_name_keeps_type_identity() {
        let runtime = (&Renamed as &dyn Event).event_type();
        assert_eq!(runtime, EventType::of::<Renamed>());
        assert_eq!(runtime.name(), "app.renamed");
        assert_ne!(runtime, EventType::of::<Tick>());

        let mut seen = std::collections::HashSet::new();
        seen.insert(EventType::of::<Renamed>());
        assert!(seen.contains(&runtime));
    }

    #[test]
    fn test_ancestors_follow_embedding_chain() {
        let shortcut = Shortcut::default();
        assert_eq!(
            shortcut.ancestors(),
            vec![EventType::of::<Key>(), EventType::of::<Input>()]
        );
        assert!(Tick.ancestors().is_empty());
    }

    #[test]
    fn test_view_mut_resolves_self_and_ancestors() {
        let mut shortcut = Shortcut::default();
        let ev: &mut dyn Event = &mut shortcut;

        view_mut::<Key>(ev).expect("key view").code = 7;
        view_mut::<Input>(ev).expect("input view").seen += 1;
        assert!(view_mut::<Shortcut>(ev).is_some());
        assert!(view_mut::<Tick>(ev).is_none());

        assert_eq!(shortcut.key.code, 7);
        assert_eq!(shortcut.key.input.seen, 1);
    }

    #[test]
    fn test_cancellable_is_delegated_to_ancestor() {
        let mut key = Key::default();
        assert!(!(&key as &dyn Event).is_cancelled());

        key.as_cancellable_mut().expect("capability").set_cancelled(true);
        assert!(key.input.cancelled);
        assert!((&key as &dyn Event).is_cancelled());
        assert!(Tick.as_cancellable().is_none());
    }
}
