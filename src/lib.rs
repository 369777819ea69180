//! Effect-driven reducer runtime.
//!
//! State transitions are pure `(Model, Action) -> (Model, Effect)` functions,
//! side effects are deferred [`effect::Effect`] values, and a single worker
//! per [`runtime::Store`] drains queued effects in order. Child state
//! machines are embedded into parents through [`optics`] and [`compose`].

pub mod alert;
pub mod briefing;
pub mod compose;
pub mod config;
pub mod deferred;
pub mod effect;
pub mod logging;
pub mod optics;
pub mod reducer;
pub mod runtime;
