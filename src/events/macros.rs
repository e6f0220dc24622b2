//! Macros for declaring events.
//!
//! [`impl_event!`](crate::impl_event) implements [`Event`](crate::Event) for a type,
//! optionally wiring the [`Cancellable`](crate::Cancellable) capability and an
//! embedded ancestor event.

/// Implement [`Event`](crate::Event) for a type.
///
/// # Forms
/// - `impl_event!(Ping)`: plain event
/// - `impl_event!(Click: cancellable)`: the type implements [`Cancellable`](crate::Cancellable)
/// - `impl_event!(Click: extends Input => input)`: `input: Input` is an ancestor event;
///   the cancellation capability is taken from the ancestor
/// - `impl_event!(Click: extends Input => input, cancellable)`: ancestor plus the
///   type's own `Cancellable` impl
///
/// # Examples
///
/// ```rust
/// use eventvisor::{Cancellable, Event, EventType, impl_event};
///
/// #[derive(Default)]
/// struct Input { cancelled: bool }
///
/// impl Cancellable for Input {
///     fn is_cancelled(&self) -> bool { self.cancelled }
///     fn set_cancelled(&mut self, cancelled: bool) { self.cancelled = cancelled; }
/// }
///
/// #[derive(Default)]
/// struct Click { input: Input, button: u8 }
///
/// impl_event!(Input: cancellable);
/// impl_event!(Click: extends Input => input);
///
/// let click = Click::default();
/// assert_eq!(click.ancestors(), vec![EventType::of::<Input>()]);
/// assert!(click.as_cancellable().is_some());
/// ```
#[macro_export]
macro_rules! impl_event {
    // impl_event!(Type: extends Parent => field, cancellable)
    ($ty:ty : extends $parent:ty => $field:ident, cancellable) => {
        impl $crate::Event for $ty {
            fn as_cancellable(&self) -> ::std::option::Option<&dyn $crate::Cancellable> {
                ::std::option::Option::Some(self)
            }

            fn as_cancellable_mut(
                &mut self,
            ) -> ::std::option::Option<&mut dyn $crate::Cancellable> {
                ::std::option::Option::Some(self)
            }

            $crate::__event_ancestry!($parent, $field);
        }
    };

    // impl_event!(Type: extends Parent => field)
    ($ty:ty : extends $parent:ty => $field:ident) => {
        impl $crate::Event for $ty {
            fn as_cancellable(&self) -> ::std::option::Option<&dyn $crate::Cancellable> {
                $crate::Event::as_cancellable(&self.$field)
            }

            fn as_cancellable_mut(
                &mut self,
            ) -> ::std::option::Option<&mut dyn $crate::Cancellable> {
                $crate::Event::as_cancellable_mut(&mut self.$field)
            }

            $crate::__event_ancestry!($parent, $field);
        }
    };

    // impl_event!(Type: cancellable)
    ($ty:ty : cancellable) => {
        impl $crate::Event for $ty {
            fn as_cancellable(&self) -> ::std::option::Option<&dyn $crate::Cancellable> {
                ::std::option::Option::Some(self)
            }

            fn as_cancellable_mut(
                &mut self,
            ) -> ::std::option::Option<&mut dyn $crate::Cancellable> {
                ::std::option::Option::Some(self)
            }
        }
    };

    // impl_event!(Type)
    ($ty:ty) => {
        impl $crate::Event for $ty {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __event_ancestry {
    ($parent:ty, $field:ident) => {
        fn ancestors(&self) -> ::std::vec::Vec<$crate::EventType> {
            let mut chain = ::std::vec![$crate::EventType::of::<$parent>()];
            chain.extend($crate::Event::ancestors(&self.$field));
            chain
        }

        fn upcast_mut(
            &mut self,
            target: ::std::any::TypeId,
        ) -> ::std::option::Option<&mut dyn $crate::Event> {
            if target == ::std::any::TypeId::of::<$parent>() {
                return ::std::option::Option::Some(&mut self.$field as &mut dyn $crate::Event);
            }
            $crate::Event::upcast_mut(&mut self.$field, target)
        }
    };
}
