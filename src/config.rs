//! # Dispatcher configuration.
//!
//! Provides [`Config`], centralized settings for a [`Dispatcher`](crate::Dispatcher).
//!
//! Config is used in two ways:
//! 1. **Dispatcher creation**: `Dispatcher::builder(config).build()`
//! 2. **Handler defaults**: handlers registered without an explicit tier get
//!    [`Config::default_tier`].
//!
//! ## Sentinel values
//! - `slow_handler = 0s` → no slow-handler warnings
//! - `registry_capacity = 0` → the registry grows on demand

use std::time::Duration;

use crate::handlers::ExecutionTier;

/// Configuration for a dispatcher instance.
///
/// ## Field semantics
/// - `default_tier`: Tier assigned to handlers that do not name one
/// - `log_failures`: Install the built-in [`LogWriter`](crate::LogWriter) observer
/// - `slow_handler`: Warn when a single invocation takes longer (`0s` = off)
/// - `registry_capacity`: Pre-size the listener map (`0` = no pre-allocation)
///
/// All fields are public. Prefer the helper accessors over checking the `0`
/// sentinels by hand.
#[derive(Clone, Debug)]
pub struct Config {
    /// Tier used when a handler registration omits one.
    pub default_tier: ExecutionTier,

    /// Whether handler failures are written through `tracing`.
    ///
    /// Failures are always delivered to user observers; this only controls the
    /// built-in log observer.
    pub log_failures: bool,

    /// Invocation time after which a handler is reported as slow.
    ///
    /// Handlers run on the publishing thread, so a slow handler delays every
    /// handler after it and the publisher itself.
    pub slow_handler: Duration,

    /// Expected number of listeners.
    pub registry_capacity: usize,
}

impl Config {
    /// Returns the slow-handler threshold as an `Option`.
    ///
    /// - `None` → warnings disabled
    /// - `Some(d)` → invocations longer than `d` are logged at `warn`
    #[inline]
    pub fn slow_handler_threshold(&self) -> Option<Duration> {
        if self.slow_handler == Duration::ZERO {
            None
        } else {
            Some(self.slow_handler)
        }
    }

    /// Returns the registry pre-allocation as an `Option`.
    #[inline]
    pub fn registry_capacity_hint(&self) -> Option<usize> {
        if self.registry_capacity == 0 {
            None
        } else {
            Some(self.registry_capacity)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `default_tier = ExecutionTier::Middle`
    /// - `log_failures = true`
    /// - `slow_handler = 0s` (disabled)
    /// - `registry_capacity = 0` (grow on demand)
    fn default() -> Self {
        Self {
            default_tier: ExecutionTier::default(),
            log_failures: true,
            slow_handler: Duration::ZERO,
            registry_capacity: 0,
        }
    }
}
