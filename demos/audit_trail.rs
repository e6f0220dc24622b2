//! # Example: audit_trail
//!
//! Demonstrates failure isolation, custom observers and listener lifecycle.
//!
//! Shows how to:
//! - Return `anyhow::Result<()>` from handlers; an `Err` is reported, not propagated.
//! - Survive a panicking handler.
//! - Implement [`Observe`] to collect failure reports next to the built-in `LogWriter`.
//! - Replace a listener's handlers by registering it again, then unregister it.
//!
//! ## Flow
//! ```text
//! publish(OrderPlaced)
//!   phase 1: AuditTrail::record   (Monitor, base handler, sees every event)
//!   phase 2: Ledger::book         (First, Err on non-positive amounts)
//!            Notifier::send       (Middle, panics while "offline")
//!            Ledger::total        (Last, OrderEvent ancestor view)
//!
//! failures ──► LogWriter (tracing ERROR) + AlertBoard (collected)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example audit_trail
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use eventvisor::{
    BaseEvent, Config, Dispatcher, Event, ExecutionTier, HandlerFailure, HandlerOptions,
    HandlerSet, Listener, Observe, impl_event,
};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct OrderEvent {
    order_id: u64,
}

#[derive(Debug)]
struct OrderPlaced {
    order: OrderEvent,
    amount_cents: i64,
}

#[derive(Debug)]
struct OrderShipped {
    order: OrderEvent,
}

impl_event!(OrderEvent);
impl_event!(OrderPlaced: extends OrderEvent => order);
impl_event!(OrderShipped: extends OrderEvent => order);

fn placed(order_id: u64, amount_cents: i64) -> OrderPlaced {
    OrderPlaced {
        order: OrderEvent { order_id },
        amount_cents,
    }
}

/// Books placed orders; rejects invalid amounts with an error.
#[derive(Default)]
struct Ledger {
    balance: AtomicI64,
    orders: AtomicI64,
}

impl Ledger {
    fn book(&self, order: &mut OrderPlaced) -> anyhow::Result<()> {
        anyhow::ensure!(
            order.amount_cents > 0,
            "order {} has non-positive amount {}",
            order.order.order_id,
            order.amount_cents
        );
        self.balance.fetch_add(order.amount_cents, Ordering::Relaxed);
        Ok(())
    }

    fn total(&self, _order: &mut OrderEvent) {
        self.orders.fetch_add(1, Ordering::Relaxed);
    }
}

impl Listener for Ledger {
    fn handlers(&self, set: &mut HandlerSet<Self>) {
        set.on_with(
            HandlerOptions::new()
                .tier(ExecutionTier::First)
                .named("Ledger::book"),
            Self::book,
        );
        set.on_with(
            HandlerOptions::new()
                .tier(ExecutionTier::Last)
                .named("Ledger::total"),
            Self::total,
        );
    }
}

/// Sends notifications; panics while its upstream is offline.
struct Notifier {
    online: AtomicBool,
}

impl Listener for Notifier {
    fn handlers(&self, set: &mut HandlerSet<Self>) {
        set.on_with(
            HandlerOptions::new().named("Notifier::send"),
            |n: &Notifier, order: &mut OrderPlaced| {
                if !n.online.load(Ordering::Relaxed) {
                    panic!("notification upstream offline");
                }
                println!("[notify] order {} confirmed", order.order.order_id);
            },
        );
    }
}

/// Records every event the dispatcher sees.
#[derive(Default)]
struct AuditTrail {
    lines: Mutex<Vec<String>>,
}

impl Listener for AuditTrail {
    fn handlers(&self, set: &mut HandlerSet<Self>) {
        set.on_any_with(
            HandlerOptions::new()
                .tier(ExecutionTier::Monitor)
                .named("AuditTrail::record"),
            |a: &AuditTrail, event: &mut dyn Event| {
                a.lines.lock().push(event.event_name().to_string());
            },
        );
    }
}

/// Collects failure reports for later inspection.
#[derive(Default)]
struct AlertBoard {
    alerts: Mutex<Vec<String>>,
}

impl Observe for AlertBoard {
    fn on_failure(&self, f: &HandlerFailure) {
        self.alerts.lock().push(format!(
            "{} in {} ({}): {}",
            f.error.as_label(),
            f.handler,
            f.tier.as_label(),
            f.error.as_message()
        ));
    }

    fn name(&self) -> &'static str {
        "alert-board"
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("eventvisor=info".parse()?))
        .init();

    let cfg = Config {
        slow_handler: Duration::from_millis(50),
        ..Config::default()
    };
    let alerts = Arc::new(AlertBoard::default());
    let dispatcher = Dispatcher::builder(cfg)
        .with_observer(alerts.clone())
        .build();

    let ledger = Arc::new(Ledger::default());
    let notifier = Arc::new(Notifier {
        online: AtomicBool::new(false),
    });
    let audit = Arc::new(AuditTrail::default());
    dispatcher.register([&ledger, &ledger]);
    dispatcher.register([Some(notifier.clone()), None]);
    dispatcher.register([&audit]);
    println!(
        "[setup] listeners={} handlers={}",
        dispatcher.registry().len(),
        dispatcher.registry().handler_count()
    );

    dispatcher.publish(&mut placed(1, 1_250));
    dispatcher.publish(&mut placed(2, -5));

    notifier.online.store(true, Ordering::Relaxed);
    dispatcher.publish(&mut placed(3, 990));
    dispatcher.publish(&mut OrderShipped {
        order: OrderEvent { order_id: 1 },
    });

    dispatcher.unregister([&notifier]);
    dispatcher.publish(&mut placed(4, 100));
    dispatcher.publish(&mut BaseEvent);

    println!(
        "[ledger] balance={} orders={}",
        ledger.balance.load(Ordering::Relaxed),
        ledger.orders.load(Ordering::Relaxed)
    );
    for line in audit.lines.lock().iter() {
        println!("[audit]  {line}");
    }
    for alert in alerts.alerts.lock().iter() {
        println!("[alert]  {alert}");
    }
    Ok(())
}
