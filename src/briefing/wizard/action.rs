use crate::briefing::api::{ApiError, BriefingRecord, Draft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Complete the current step and move to the next one.
    Next,
    Back,
    SetField { key: String, value: String },
    /// Result of persisting the draft.
    Saved(Result<Draft, ApiError>),
    /// Submit the briefing. Only honoured on the review step.
    Submit,
    Submitted(Result<BriefingRecord, ApiError>),
}
