//! # Execution tiers.
//!
//! [`ExecutionTier`] buckets handlers by priority. Dispatch visits tiers in a
//! fixed ascending order, never in registration order:
//!
//! ```text
//! First ──► Middle ──► Last ──► Monitor
//! ```
//!
//! - [`ExecutionTier::First`] runs before anything else; natural place to cancel.
//! - [`ExecutionTier::Middle`] default for handlers that do not pick a tier.
//! - [`ExecutionTier::Last`] reacts after the ordinary handlers had their say.
//! - [`ExecutionTier::Monitor`] observes the final state of the event.

/// Fixed-order priority bucket of a handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExecutionTier {
    /// Runs first.
    First,
    /// Default tier.
    #[default]
    Middle,
    /// Runs after `Middle`.
    Last,
    /// Runs after every other tier.
    Monitor,
}

impl ExecutionTier {
    /// All tiers in dispatch order.
    pub const ALL: [ExecutionTier; 4] = [
        ExecutionTier::First,
        ExecutionTier::Middle,
        ExecutionTier::Last,
        ExecutionTier::Monitor,
    ];

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecutionTier::First => "first",
            ExecutionTier::Middle => "middle",
            ExecutionTier::Last => "last",
            ExecutionTier::Monitor => "monitor",
        }
    }
}
