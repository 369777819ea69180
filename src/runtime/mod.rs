//! The effect-draining runtime.
//!
//! ```text
//! dispatch(a) ──→ channel ──→ worker ──→ Scheduler::apply(Action a)
//!      ↑                         │            │
//!      │                         │       publish model
//!      │                         ↓
//!      └──── effect.run ←── Scheduler::apply(EffectsExecuted)
//! ```
//!
//! Guarantees: models are updated in dispatch order and effects are invoked
//! in enqueue order. Completion order of asynchronous effects is not
//! guaranteed, and superseded effects are not cancelled; wrap them with
//! `Effect::cancellable` when that matters.

mod scheduler;
mod store;

pub use scheduler::{Msg, Phase, Scheduler};
pub use store::{RuntimeError, RuntimeStats, Store};
