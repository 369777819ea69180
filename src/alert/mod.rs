//! User-visible banner channel shared by every workflow.

mod action;
mod reducer;
mod state;

pub use action::AlertAction;
pub use reducer::AlertReducer;
pub use state::{Alert, AlertKind, AlertModel};
