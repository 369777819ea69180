//! Safety-briefing wizard, the worked example built on the kernel.
//!
//! ```text
//! BriefingModel
//! ├── wizard: Deferred<Result<WizardState, ApiError>>   (optional child)
//! └── alerts: AlertModel                                (lens child)
//! ```
//!
//! Initialization fetches the draft, its location, and the previous
//! briefings, then either seeds the wizard or raises an error alert.

pub mod api;
pub mod http;
pub mod init;
pub mod wizard;
pub mod workflow;

pub use api::{
    ApiError, BriefingApi, BriefingRecord, Draft, Location, LogSessionHandler, RequestError,
    SessionHandler,
};
pub use http::HttpBriefingApi;
pub use init::{decode_started_at, load_init_data, InitData, InitParams};
pub use wizard::{WizardAction, WizardReducer, WizardState, WizardStep};
pub use workflow::{
    alerts_lens, wizard_optional, BriefingAction, BriefingEnv, BriefingModel, BriefingWorkflow,
};
