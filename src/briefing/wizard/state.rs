use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::briefing::api::{BriefingRecord, Draft, Location};
use crate::briefing::init::{encode_started_at, InitData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Details,
    Hazards,
    Controls,
    Review,
}

impl WizardStep {
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Details => Some(Self::Hazards),
            Self::Hazards => Some(Self::Controls),
            Self::Controls => Some(Self::Review),
            Self::Review => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Details => None,
            Self::Hazards => Some(Self::Details),
            Self::Controls => Some(Self::Hazards),
            Self::Review => Some(Self::Controls),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub draft_id: Option<String>,
    pub location: Option<Location>,
    pub started_at: SystemTime,
    pub step: WizardStep,
    pub values: BTreeMap<String, String>,
    /// Values changed since the last successful save.
    pub dirty: bool,
    pub saving: bool,
    pub submitting: bool,
    /// Id of the submitted briefing. Once set the wizard is read-only.
    pub submitted: Option<String>,
    /// Set when the last action moved the wizard forward a step.
    pub advanced: bool,
}

impl WizardState {
    pub fn from_init(data: InitData) -> Self {
        let values = merge_defaults(
            data.draft.as_ref(),
            data.last_submitted.as_ref(),
            data.last_adhoc.as_ref(),
        );
        Self {
            draft_id: data.draft.and_then(|d| d.id),
            location: data.location,
            started_at: data.started_at,
            step: WizardStep::Details,
            values,
            dirty: false,
            saving: false,
            submitting: false,
            submitted: None,
            advanced: false,
        }
    }

    pub fn to_draft(&self) -> Draft {
        Draft {
            id: self.draft_id.clone(),
            location_id: self.location.as_ref().map(|l| l.id.clone()),
            started_at: Some(encode_started_at(self.started_at)),
            values: self.values.clone(),
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted.is_some()
    }
}

/// Field values to start from. Draft values win, then the last briefing
/// submitted for the location, then the last ad-hoc briefing.
pub fn merge_defaults(
    draft: Option<&Draft>,
    last_submitted: Option<&BriefingRecord>,
    last_adhoc: Option<&BriefingRecord>,
) -> BTreeMap<String, String> {
    let mut values = draft.map(|d| d.values.clone()).unwrap_or_default();
    for fallback in [last_submitted, last_adhoc].into_iter().flatten() {
        for (key, value) in &fallback.values {
            values.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
    values
}
