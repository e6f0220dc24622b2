//! # Example: click
//!
//! Demonstrates tier ordering and cancellation on a small UI-style event tree.
//!
//! Shows how to:
//! - Declare an ancestor event (`InputEvent`) embedded in `ClickEvent`.
//! - Cancel an event in [`ExecutionTier::First`] and keep observing it in
//!   [`ExecutionTier::Monitor`] with `ignore_cancelled`.
//! - Count every event with a base handler.
//!
//! ## Flow
//! ```text
//! publish(ClickEvent)
//!   phase 1 (base):   Metrics::count           (Middle)
//!   phase 2 (typed):  Guard::block_right_click (First, may cancel)
//!                     Button::press            (Middle, skipped when cancelled)
//!                     Button::audit            (Monitor, ignore_cancelled)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventvisor=debug cargo run --example click
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use eventvisor::{
    Cancellable, Config, Dispatcher, Event, ExecutionTier, HandlerOptions, HandlerSet, Listener,
    impl_event,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct InputEvent {
    cancelled: bool,
}

impl Cancellable for InputEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

#[derive(Debug)]
enum Button {
    Left,
    Right,
}

#[derive(Debug)]
struct ClickEvent {
    input: InputEvent,
    button: Button,
    x: i32,
    y: i32,
}

impl ClickEvent {
    fn new(button: Button, x: i32, y: i32) -> Self {
        Self {
            input: InputEvent::default(),
            button,
            x,
            y,
        }
    }
}

impl_event!(InputEvent: cancellable);
impl_event!(ClickEvent: extends InputEvent => input);

/// Rejects right clicks before anybody else sees them.
struct Guard;

impl Listener for Guard {
    fn handlers(&self, set: &mut HandlerSet<Self>) {
        set.on_with(
            HandlerOptions::new()
                .tier(ExecutionTier::First)
                .named("Guard::block_right_click"),
            |_: &Guard, click: &mut ClickEvent| {
                if matches!(click.button, Button::Right) {
                    println!("[guard]  right click at ({}, {}) blocked", click.x, click.y);
                    click.input.cancel();
                }
            },
        );
    }
}

/// Reacts to accepted clicks; audits every click.
#[derive(Default)]
struct ButtonWidget {
    presses: AtomicUsize,
}

impl ButtonWidget {
    fn press(&self, click: &mut ClickEvent) {
        let n = self.presses.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[button] pressed with {:?} (#{n})", click.button);
    }

    fn audit(&self, click: &mut ClickEvent) {
        println!(
            "[audit]  {:?} click at ({}, {}) cancelled={}",
            click.button,
            click.x,
            click.y,
            click.input.is_cancelled()
        );
    }
}

impl Listener for ButtonWidget {
    fn handlers(&self, set: &mut HandlerSet<Self>) {
        set.on(Self::press);
        set.on_with(
            HandlerOptions::new()
                .tier(ExecutionTier::Monitor)
                .ignore_cancelled(true),
            Self::audit,
        );
    }
}

/// Counts every published event, whatever its type.
#[derive(Default)]
struct Metrics {
    seen: AtomicUsize,
}

impl Listener for Metrics {
    fn handlers(&self, set: &mut HandlerSet<Self>) {
        set.on_any_with(
            HandlerOptions::new().ignore_cancelled(true),
            |m: &Metrics, event: &mut dyn Event| {
                m.seen.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(event = event.event_name(), "event seen");
            },
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("eventvisor=info".parse()?))
        .init();

    let dispatcher = Dispatcher::builder(Config::default()).build();

    let widget = Arc::new(ButtonWidget::default());
    let metrics = Arc::new(Metrics::default());
    dispatcher.register([Arc::new(Guard)]);
    dispatcher.register([&widget]);
    dispatcher.register([&metrics]);

    let mut clicks = [
        ClickEvent::new(Button::Left, 10, 20),
        ClickEvent::new(Button::Right, 30, 40),
        ClickEvent::new(Button::Left, 50, 60),
    ];
    for click in &mut clicks {
        dispatcher.publish(click);
    }

    dispatcher.publish(&mut InputEvent::default());

    println!(
        "presses={} events_seen={} right_click_cancelled={}",
        widget.presses.load(Ordering::Relaxed),
        metrics.seen.load(Ordering::Relaxed),
        clicks[1].input.is_cancelled()
    );
    Ok(())
}
