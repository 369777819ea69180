mod action;
mod reducer;
mod state;

pub use action::WizardAction;
pub use reducer::WizardReducer;
pub use state::{merge_defaults, WizardState, WizardStep};
