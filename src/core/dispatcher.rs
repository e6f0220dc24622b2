//! # Dispatcher: routes published events to listener handlers.
//!
//! The [`Dispatcher`] owns a [`ListenerRegistry`], the failure [`ObserverSet`]
//! and the runtime [`Config`]. Publishing runs every matching handler on the
//! calling thread, in a fixed order, with each invocation isolated.
//!
//! ## High-level architecture
//! ```text
//! publish(&mut event)
//!   │
//!   ├─► registry.snapshot()                       (read lock, released at once)
//!   ├─► runtime = event.event_type(), ancestors = event.ancestors()
//!   │
//!   └─► for each listener in the snapshot (order unspecified):
//!         selected = handlers accepting Base | runtime | an ancestor
//!         │
//!         ├─ phase 1: base handlers      First ─► Middle ─► Last ─► Monitor
//!         └─ phase 2: typed handlers     First ─► Middle ─► Last ─► Monitor
//!                     (skipped when the runtime type is BaseEvent)
//!
//! per handler:
//!   ignore_cancelled || !event.is_cancelled() ?
//!     ├─ no  → skip
//!     └─ yes → catch_unwind(invoke)
//!                ├─ Ok(Ok(()))        → next
//!                └─ Ok(Err) / panic   → HandlerFailure ──► ObserverSet::emit
//! ```
//!
//! ## Rules
//! - Tiers are visited in their fixed order; registration order only breaks
//!   ties inside one tier.
//! - Cancellation is re-read before **every** handler, so handlers may cancel
//!   and un-cancel mid-dispatch.
//! - No lock is held while handlers run: handlers may publish, register and
//!   unregister. Changes apply to the next publish, never the in-flight one.
//! - `publish` never fails and never panics because of a handler.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Dispatcher, Event, HandlerSet, Listener};
//!
//! struct Greeting(&'static str);
//! impl Event for Greeting {}
//!
//! struct Printer;
//!
//! impl Listener for Printer {
//!     fn handlers(&self, set: &mut HandlerSet<Self>) {
//!         set.on(|_: &Printer, g: &mut Greeting| println!("{}", g.0));
//!     }
//! }
//!
//! let dispatcher = Dispatcher::default();
//! dispatcher.register([Arc::new(Printer)]);
//! dispatcher.publish(&mut Greeting("hello"));
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::{
    config::Config,
    error::{HandlerError, panic_message},
    events::Event,
    handlers::{ExecutionTier, HandlerDescriptor},
    listeners::IntoListener,
    observers::{HandlerFailure, ObserverSet},
};

use super::builder::DispatcherBuilder;
use super::registry::{ListenerEntry, ListenerRegistry};

/// Dispatch phase of a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Handlers accepting every event.
    Base,
    /// Handlers accepting the runtime type or one of its ancestors.
    Typed,
}

impl Phase {
    #[inline]
    fn admits(self, handler: &HandlerDescriptor) -> bool {
        match self {
            Phase::Base => handler.is_base(),
            Phase::Typed => !handler.is_base(),
        }
    }
}

/// Publishes events to registered listeners.
///
/// Cheap to share: wrap it in an `Arc` to publish from several threads or to
/// let handlers publish follow-up events.
pub struct Dispatcher {
    cfg: Config,
    registry: ListenerRegistry,
    observers: ObserverSet,
}

impl Dispatcher {
    /// Creates a dispatcher with the given configuration and no user observers.
    pub fn new(cfg: Config) -> Self {
        DispatcherBuilder::new(cfg).build()
    }

    /// Returns a builder for attaching observers.
    pub fn builder(cfg: Config) -> DispatcherBuilder {
        DispatcherBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, observers: ObserverSet) -> Self {
        let registry = ListenerRegistry::new(&cfg);
        Self {
            cfg,
            registry,
            observers,
        }
    }

    /// Registers listeners; each one replaces any previous registration of itself.
    ///
    /// Accepts any iterable of `Arc<L>`, `&Arc<L>`, `ListenerHandle` or their
    /// `Option` forms. `None` entries and empty input are ignored.
    pub fn register<I>(&self, listeners: I)
    where
        I: IntoIterator,
        I::Item: IntoListener,
    {
        self.registry.register(listeners);
    }

    /// Unregisters listeners. Unknown and `None` entries are ignored.
    pub fn unregister<I>(&self, listeners: I)
    where
        I: IntoIterator,
        I::Item: IntoListener,
    {
        self.registry.unregister(listeners);
    }

    /// The listener registry.
    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// The failure observers, including the built-in log writer when enabled.
    pub fn observers(&self) -> &ObserverSet {
        &self.observers
    }

    /// Publishes `event` to every matching handler.
    ///
    /// Returns once every listener in the registry snapshot went through both
    /// phases. The event is left in the state the handlers put it in.
    pub fn publish<E: Event>(&self, event: &mut E) {
        self.publish_dyn(event);
    }

    /// Type-erased form of [`publish`](Self::publish).
    pub fn publish_dyn(&self, event: &mut dyn Event) {
        let snapshot = self.registry.snapshot();
        if snapshot.is_empty() {
            return;
        }

        let runtime = event.event_type();
        let ancestors = event.ancestors();
        tracing::trace!(
            event = runtime.name(),
            listeners = snapshot.len(),
            "dispatching event"
        );

        for entry in snapshot.iter() {
            let selected: Vec<&HandlerDescriptor> = entry
                .handlers()
                .iter()
                .filter(|h| h.matches(runtime, &ancestors))
                .collect();
            if selected.is_empty() {
                continue;
            }

            self.run_phase(entry, &selected, Phase::Base, event);
            if !runtime.is_base() {
                self.run_phase(entry, &selected, Phase::Typed, event);
            }
        }
    }

    fn run_phase(
        &self,
        entry: &ListenerEntry,
        selected: &[&HandlerDescriptor],
        phase: Phase,
        event: &mut dyn Event,
    ) {
        for tier in ExecutionTier::ALL {
            for handler in selected
                .iter()
                .copied()
                .filter(|h| h.tier() == tier && phase.admits(h))
            {
                if !handler.should_run(event) {
                    tracing::trace!(
                        listener = entry.listener().name(),
                        handler = handler.name(),
                        tier = tier.as_label(),
                        "handler skipped: event cancelled"
                    );
                    continue;
                }
                self.invoke(entry, handler, event);
            }
        }
    }

    fn invoke(&self, entry: &ListenerEntry, handler: &HandlerDescriptor, event: &mut dyn Event) {
        let listener = entry.listener();
        let started = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            handler.invoke(listener.instance(), &mut *event)
        }));
        let result = match outcome {
            Ok(result) => result,
            Err(panic_err) => Err(HandlerError::Panicked {
                message: panic_message(&*panic_err),
            }),
        };

        if let Some(threshold) = self.cfg.slow_handler_threshold() {
            let elapsed = started.elapsed();
            if elapsed > threshold {
                tracing::warn!(
                    listener = listener.name(),
                    handler = handler.name(),
                    event = event.event_name(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    threshold_ms = threshold.as_millis() as u64,
                    "slow event handler"
                );
            }
        }

        if let Err(error) = result {
            self.observers.emit(&HandlerFailure {
                listener: listener.name(),
                listener_id: listener.id(),
                handler: handler.shared_name(),
                event: event.event_name(),
                tier: handler.tier(),
                error,
            });
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::*;
    use crate::events::{BaseEvent, Cancellable};
    use crate::handlers::{HandlerOptions, HandlerSet};
    use crate::listeners::{Listener, ListenerHandle, ListenerId};
    use crate::observers::Observe;

    #[derive(Debug, Default)]
    struct Input {
        cancelled: bool,
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
    struct Click {
        input: Input,
        button: u8,
    }

    struct Tick;

    impl Event for Tick {}

    crate::impl_event!(Input: cancellable);
    crate::impl_event!(Click: extends Input => input);

    type Script = fn(&mut HandlerSet<Scripted>);

    /// Listener whose handlers are supplied by a swappable function.
    struct Scripted {
        journal: Mutex<Vec<&'static str>>,
        script: Mutex<Script>,
    }

    impl Scripted {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                journal: Mutex::new(Vec::new()),
                script: Mutex::new(script),
            })
        }

        fn note(&self, entry: &'static str) {
            self.journal.lock().push(entry);
        }

        fn journal(&self) -> Vec<&'static str> {
            self.journal.lock().clone()
        }
    }

    impl Listener for Scripted {
        fn handlers(&self, set: &mut HandlerSet<Self>) {
            let script = *self.script.lock();
            script(set);
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<HandlerFailure>>);

    impl Observe for Recorder {
        fn on_failure(&self, failure: &HandlerFailure) {
            self.0.lock().push(failure.clone());
        }
    }

    fn at(tier: ExecutionTier) -> HandlerOptions {
        HandlerOptions::new().tier(tier)
    }

    fn with(listener: &Arc<Scripted>) -> Dispatcher {
        let dispatcher = Dispatcher::default();
        dispatcher.register([listener]);
        dispatcher
    }

    #[test]
    fn test_base_phase_runs_before_typed_phase() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_with(at(ExecutionTier::First), |l: &Scripted, _: &mut Click| {
                l.note("click:first")
            });
            set.on_any_with(at(ExecutionTier::Monitor), |l: &Scripted, _: &mut dyn Event| {
                l.note("any:monitor")
            });
        }
        let listener = Scripted::new(script);
        with(&listener).publish(&mut Click::default());

        assert_eq!(listener.journal(), ["any:monitor", "click:first"]);
    }

    #[test]
    fn test_tiers_run_in_fixed_order() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_with(at(ExecutionTier::Monitor), |l: &Scripted, _: &mut Click| {
                l.note("monitor")
            });
            set.on_with(at(ExecutionTier::Last), |l: &Scripted, _: &mut Click| l.note("last"));
            set.on_with(at(ExecutionTier::First), |l: &Scripted, _: &mut Click| l.note("first"));
            set.on(|l: &Scripted, _: &mut Click| l.note("middle"));
        }
        let listener = Scripted::new(script);
        with(&listener).publish(&mut Click::default());

        assert_eq!(listener.journal(), ["first", "middle", "last", "monitor"]);
    }

    #[test]
    fn test_same_tier_keeps_declaration_order() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on(|l: &Scripted, _: &mut Tick| l.note("a"));
            set.on_with(at(ExecutionTier::First), |l: &Scripted, _: &mut Tick| l.note("first"));
            set.on(|l: &Scripted, _: &mut Tick| l.note("b"));
        }
        let listener = Scripted::new(script);
        with(&listener).publish(&mut Tick);

        assert_eq!(listener.journal(), ["first", "a", "b"]);
    }

    #[test]
    fn test_base_event_skips_typed_phase() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_any(|l: &Scripted, _: &mut dyn Event| l.note("any"));
            set.on(|l: &Scripted, _: &mut Tick| l.note("tick"));
        }
        let listener = Scripted::new(script);
        with(&listener).publish(&mut BaseEvent);

        assert_eq!(listener.journal(), ["any"]);
    }

    #[test]
    fn test_ancestor_handlers_receive_embedded_view() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_with(at(ExecutionTier::First), |l: &Scripted, e: &mut Input| {
                assert!(!e.cancelled);
                l.note("input");
            });
            set.on(|l: &Scripted, e: &mut Click| {
                assert_eq!(e.button, 2);
                l.note("click");
            });
        }
        let listener = Scripted::new(script);
        let dispatcher = with(&listener);

        dispatcher.publish(&mut Click {
            button: 2,
            ..Click::default()
        });
        assert_eq!(listener.journal(), ["input", "click"]);

        dispatcher.publish(&mut Input::default());
        assert_eq!(listener.journal(), ["input", "click", "input"]);
    }

    #[test]
    fn test_unrelated_events_reach_nobody() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on(|l: &Scripted, _: &mut Click| l.note("click"));
        }
        let listener = Scripted::new(script);
        with(&listener).publish(&mut Tick);

        assert!(listener.journal().is_empty());
    }

    #[test]
    fn test_click_scenario() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_with(at(ExecutionTier::First), |l: &Scripted, e: &mut Click| {
                l.note("h1");
                e.input.cancel();
            });
            set.on_with(
                at(ExecutionTier::Last).ignore_cancelled(true),
                |l: &Scripted, _: &mut Click| l.note("h2"),
            );
            set.on_with(at(ExecutionTier::Last), |l: &Scripted, _: &mut Click| l.note("h3"));
        }
        let listener = Scripted::new(script);
        let mut click = Click::default();
        with(&listener).publish(&mut click);

        assert_eq!(listener.journal(), ["h1", "h2"]);
        assert!(click.input.is_cancelled());
    }

    #[test]
    fn test_uncancel_reenables_later_handlers() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_with(at(ExecutionTier::First), |l: &Scripted, e: &mut Click| {
                l.note("cancel");
                e.input.cancel();
            });
            set.on_with(at(ExecutionTier::Middle), |l: &Scripted, _: &mut Click| {
                l.note("skipped")
            });
            set.on_with(
                at(ExecutionTier::Middle).ignore_cancelled(true),
                |l: &Scripted, e: &mut Click| {
                    l.note("uncancel");
                    e.input.set_cancelled(false);
                },
            );
            set.on_with(at(ExecutionTier::Last), |l: &Scripted, _: &mut Click| l.note("after"));
        }
        let listener = Scripted::new(script);
        let mut click = Click::default();
        with(&listener).publish(&mut click);

        assert_eq!(listener.journal(), ["cancel", "uncancel", "after"]);
        assert!(!click.input.is_cancelled());
    }

    #[test]
    fn test_cancellation_carries_into_typed_phase() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_any_with(at(ExecutionTier::Monitor), |l: &Scripted, e: &mut dyn Event| {
                l.note("any");
                if let Some(c) = e.as_cancellable_mut() {
                    c.cancel();
                }
            });
            set.on_with(at(ExecutionTier::First), |l: &Scripted, _: &mut Click| l.note("click"));
            set.on_with(
                at(ExecutionTier::First).ignore_cancelled(true),
                |l: &Scripted, _: &mut Input| l.note("input"),
            );
        }
        let listener = Scripted::new(script);
        with(&listener).publish(&mut Click::default());

        assert_eq!(listener.journal(), ["any", "input"]);
    }

    #[test]
    fn test_non_cancellable_events_always_run() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_any_with(at(ExecutionTier::First), |l: &Scripted, e: &mut dyn Event| {
                assert!(e.as_cancellable_mut().is_none());
                l.note("any");
            });
            set.on(|l: &Scripted, _: &mut Tick| l.note("tick"));
        }
        let listener = Scripted::new(script);
        with(&listener).publish(&mut Tick);

        assert_eq!(listener.journal(), ["any", "tick"]);
    }

    #[test]
    fn test_failures_are_isolated_and_reported() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_with(
                at(ExecutionTier::First).named("panics"),
                |_: &Scripted, _: &mut Tick| -> () { panic!("boom") },
            );
            set.on_with(
                HandlerOptions::new().named("fails"),
                |_: &Scripted, _: &mut Tick| -> anyhow::Result<()> {
                    Err(anyhow::anyhow!("no route"))
                },
            );
            set.on_with(at(ExecutionTier::Last), |l: &Scripted, _: &mut Tick| l.note("last"));
        }
        fn bystander(set: &mut HandlerSet<Scripted>) {
            set.on(|l: &Scripted, _: &mut Tick| l.note("bystander"));
        }

        let recorder = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::builder(Config::default())
            .with_observer(recorder.clone())
            .build();
        let failing = Scripted::new(script);
        let other = Scripted::new(bystander);
        dispatcher.register([&failing, &other]);

        dispatcher.publish(&mut Tick);

        assert_eq!(failing.journal(), ["last"]);
        assert_eq!(other.journal(), ["bystander"]);

        let failures = recorder.0.lock();
        assert_eq!(failures.len(), 2);
        assert_eq!(&*failures[0].handler, "panics");
        assert_eq!(failures[0].tier, ExecutionTier::First);
        assert!(failures[0].error.is_panic());
        assert_eq!(&*failures[1].handler, "fails");
        assert_eq!(
            failures[1].error,
            HandlerError::Failed {
                error: "no route".into()
            }
        );
        assert_eq!(failures[1].listener_id, ListenerId::of(&failing));
        assert_eq!(failures[1].event, std::any::type_name::<Tick>());
    }

    #[test]
    fn test_reregistration_replaces_handlers() {
        fn before(set: &mut HandlerSet<Scripted>) {
            set.on(|l: &Scripted, _: &mut Tick| l.note("before"));
        }
        fn after(set: &mut HandlerSet<Scripted>) {
            set.on(|l: &Scripted, _: &mut Tick| l.note("after"));
        }
        let listener = Scripted::new(before);
        let dispatcher = with(&listener);
        dispatcher.publish(&mut Tick);

        *listener.script.lock() = after;
        dispatcher.register([&listener]);
        dispatcher.publish(&mut Tick);

        assert_eq!(listener.journal(), ["before", "after"]);
        assert_eq!(dispatcher.registry().len(), 1);
    }

    #[test]
    fn test_unregister_stops_delivery_and_tolerates_unknown() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on(|l: &Scripted, _: &mut Tick| l.note("tick"));
        }
        let listener = Scripted::new(script);
        let stranger = Scripted::new(script);
        let dispatcher = with(&listener);

        dispatcher.unregister([&stranger]);
        dispatcher.unregister([None::<ListenerHandle>]);
        dispatcher.publish(&mut Tick);

        dispatcher.unregister([&listener]);
        dispatcher.unregister([&listener]);
        dispatcher.publish(&mut Tick);

        assert_eq!(listener.journal(), ["tick"]);
        assert!(stranger.journal().is_empty());
    }

    #[test]
    fn test_misshapen_handler_is_excluded() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on(|l: &Scripted, _: &mut BaseEvent| l.note("typed-base"));
            set.on_any(|l: &Scripted, _: &mut dyn Event| l.note("any"));
        }
        let listener = Scripted::new(script);
        let dispatcher = with(&listener);
        dispatcher.publish(&mut BaseEvent);

        assert_eq!(dispatcher.registry().handler_count(), 1);
        assert_eq!(listener.journal(), ["any"]);
    }

    /// Unregisters its victims, itself included, from inside its first handler.
    struct Janitor {
        dispatcher: Arc<Dispatcher>,
        victims: Mutex<Vec<ListenerHandle>>,
        journal: Mutex<Vec<&'static str>>,
    }

    impl Listener for Janitor {
        fn handlers(&self, set: &mut HandlerSet<Self>) {
            set.on_with(at(ExecutionTier::First), |j: &Janitor, _: &mut Tick| {
                j.journal.lock().push("first");
                let victims = std::mem::take(&mut *j.victims.lock());
                j.dispatcher.unregister(victims);
            });
            set.on_with(at(ExecutionTier::Last), |j: &Janitor, _: &mut Tick| {
                j.journal.lock().push("last");
            });
        }
    }

    #[test]
    fn test_unregister_during_dispatch_keeps_snapshot() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_with(at(ExecutionTier::Monitor), |l: &Scripted, _: &mut Tick| {
                l.note("victim")
            });
        }
        let dispatcher = Arc::new(Dispatcher::default());
        let victim = Scripted::new(script);
        let janitor = Arc::new(Janitor {
            dispatcher: Arc::clone(&dispatcher),
            victims: Mutex::new(Vec::new()),
            journal: Mutex::new(Vec::new()),
        });
        janitor
            .victims
            .lock()
            .extend([ListenerHandle::new(victim.clone()), ListenerHandle::new(janitor.clone())]);
        dispatcher.register([ListenerHandle::new(victim.clone()), ListenerHandle::new(janitor.clone())]);

        dispatcher.publish(&mut Tick);
        assert_eq!(*janitor.journal.lock(), ["first", "last"]);
        assert_eq!(victim.journal(), ["victim"]);
        assert!(dispatcher.registry().is_empty());

        dispatcher.publish(&mut Tick);
        assert_eq!(*janitor.journal.lock(), ["first", "last"]);
        assert_eq!(victim.journal(), ["victim"]);
    }

    /// Publishes a `Tick` from inside a `Click` handler.
    struct Relay {
        dispatcher: Arc<Dispatcher>,
        ticks: AtomicUsize,
    }

    impl Listener for Relay {
        fn handlers(&self, set: &mut HandlerSet<Self>) {
            set.on(|r: &Relay, _: &mut Click| r.dispatcher.publish(&mut Tick));
            set.on(|r: &Relay, _: &mut Tick| {
                r.ticks.fetch_add(1, Ordering::SeqCst);
            });
        }
    }

    #[test]
    fn test_handlers_may_publish() {
        let dispatcher = Arc::new(Dispatcher::default());
        let relay = Arc::new(Relay {
            dispatcher: Arc::clone(&dispatcher),
            ticks: AtomicUsize::new(0),
        });
        dispatcher.register([&relay]);

        dispatcher.publish(&mut Click::default());
        dispatcher.unregister([&relay]);

        assert_eq!(relay.ticks.load(Ordering::SeqCst), 1);
    }

    #[derive(Default)]
    struct Counting {
        hits: AtomicUsize,
    }

    impl Listener for Counting {
        fn handlers(&self, set: &mut HandlerSet<Self>) {
            set.on(|c: &Counting, _: &mut Tick| {
                c.hits.fetch_add(1, Ordering::SeqCst);
            });
        }
    }

    #[test]
    fn test_concurrent_publish_and_registration() {
        const PUBLISHERS: usize = 4;
        const ROUNDS: usize = 250;

        let dispatcher = Dispatcher::default();
        let stable = Arc::new(Counting::default());
        dispatcher.register([&stable]);

        thread::scope(|s| {
            for _ in 0..PUBLISHERS {
                s.spawn(|| {
                    for _ in 0..ROUNDS {
                        dispatcher.publish(&mut Tick);
                    }
                });
            }
            s.spawn(|| {
                for _ in 0..ROUNDS {
                    let churn = Arc::new(Counting::default());
                    dispatcher.register([&churn]);
                    dispatcher.unregister([&churn]);
                }
            });
        });

        assert_eq!(stable.hits.load(Ordering::SeqCst), PUBLISHERS * ROUNDS);
        assert_eq!(dispatcher.registry().len(), 1);
    }

    #[test]
    fn test_publish_dyn_routes_by_runtime_type() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on(|l: &Scripted, _: &mut Click| l.note("click"));
            set.on(|l: &Scripted, _: &mut Tick| l.note("tick"));
        }
        let listener = Scripted::new(script);
        let dispatcher = with(&listener);

        let mut events: Vec<Box<dyn Event>> = vec![Box::new(Tick), Box::new(Click::default())];
        for event in &mut events {
            dispatcher.publish_dyn(event.as_mut());
        }

        assert_eq!(listener.journal(), ["tick", "click"]);
    }

    /// Counts `WARN` records emitted by this crate.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let meta = event.metadata();
            if *meta.level() == tracing::Level::WARN && meta.target().starts_with("eventvisor") {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn warnings_while(slow_handler: Duration, sleep: Duration) -> usize {
        use tracing_subscriber::layer::SubscriberExt;

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));

        let dispatcher = Dispatcher::new(Config {
            slow_handler,
            ..Config::default()
        });
        let sleeper = Arc::new(Sleeper(sleep));
        dispatcher.register([&sleeper]);
        tracing::subscriber::with_default(subscriber, || dispatcher.publish(&mut Tick));

        warnings.load(Ordering::SeqCst)
    }

    struct Sleeper(Duration);

    impl Listener for Sleeper {
        fn handlers(&self, set: &mut HandlerSet<Self>) {
            set.on(|s: &Sleeper, _: &mut Tick| thread::sleep(s.0));
        }
    }

    #[test]
    fn test_slow_handler_emits_warning() {
        assert_eq!(
            warnings_while(Duration::from_micros(1), Duration::from_millis(5)),
            1
        );
    }

    #[test]
    fn test_fast_handler_emits_no_warning() {
        assert_eq!(warnings_while(Duration::from_secs(3600), Duration::ZERO), 0);
        assert_eq!(warnings_while(Duration::ZERO, Duration::from_millis(2)), 0);
    }

    struct Renamed;

    impl Event for Renamed {
        fn event_name(&self) -> &'static str {
            "app.renamed"
        }
    }

    #[test]
    fn test_overridden_event_name_still_routes() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on(|l: &Scripted, _: &mut Renamed| l.note("renamed"));
        }
        let listener = Scripted::new(script);
        with(&listener).publish(&mut Renamed);

        assert_eq!(listener.journal(), ["renamed"]);
    }

    #[test]
    fn test_base_failures_do_not_stop_typed_phase() {
        fn script(set: &mut HandlerSet<Scripted>) {
            set.on_any_with(
                HandlerOptions::new().named("any-panics"),
                |_: &Scripted, _: &mut dyn Event| -> () { panic!("base down") },
            );
            set.on_any_with(
                at(ExecutionTier::Monitor).named("any-fails"),
                |_: &Scripted, _: &mut dyn Event| -> anyhow::Result<()> {
                    anyhow::bail!("base refused")
                },
            );
            set.on_with(at(ExecutionTier::First), |l: &Scripted, _: &mut Click| {
                l.note("click")
            });
        }
        let recorder = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::builder(Config::default())
            .with_observer(recorder.clone())
            .build();
        let listener = Scripted::new(script);
        dispatcher.register([&listener]);

        dispatcher.publish(&mut Click::default());

        assert_eq!(listener.journal(), ["click"]);
        let failures = recorder.0.lock();
        let labels: Vec<_> = failures.iter().map(|f| f.error.as_label()).collect();
        assert_eq!(labels, ["handler_panicked", "handler_failed"]);
        assert_eq!(&*failures[1].handler, "any-fails");
    }

    #[test]
    fn test_publish_without_listeners_is_noop() {
        let dispatcher = Dispatcher::default();
        let mut click = Click::default();
        dispatcher.publish(&mut click);
        assert!(!click.input.is_cancelled());
    }
}
