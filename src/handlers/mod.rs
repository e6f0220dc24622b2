//! Handlers: how listeners declare reactions to events.
//!
//! ## Contents
//! - [`HandlerSet`], [`HandlerOptions`] registration builder used by listeners
//! - [`HandlerDescriptor`] immutable record built from each accepted candidate
//! - [`ExecutionTier`] fixed-order priority buckets
//! - [`IntoHandlerResult`] return types accepted from handlers
//!
//! ## Quick wiring
//! ```text
//! Listener::handlers(&self, &mut HandlerSet<Self>)
//!      └─► candidates ─► HandlerDescriptor::from_candidate
//!                           ├─ Ok  → stored in the registry
//!                           └─ Err → logged, excluded
//! ```

mod descriptor;
mod outcome;
mod set;
mod tier;

pub use descriptor::HandlerDescriptor;
pub use outcome::IntoHandlerResult;
pub(crate) use set::Candidate;
pub use set::{HandlerOptions, HandlerSet};
pub use tier::ExecutionTier;
