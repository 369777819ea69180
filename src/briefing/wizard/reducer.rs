use std::sync::Arc;

use crate::briefing::api::BriefingApi;
use crate::briefing::init::InitData;
use crate::briefing::wizard::action::WizardAction;
use crate::briefing::wizard::state::{WizardState, WizardStep};
use crate::effect::Effect;
use crate::reducer::Reducer;

/// Reducer for the briefing wizard steps.
#[derive(Clone)]
pub struct WizardReducer {
    api: Arc<dyn BriefingApi>,
}

impl WizardReducer {
    pub fn new(api: Arc<dyn BriefingApi>) -> Self {
        Self { api }
    }

    /// Seeds the wizard. A briefing without a stored draft gets one created
    /// straight away.
    pub fn init(&self, data: InitData) -> (WizardState, Effect<WizardAction>) {
        let mut state = WizardState::from_init(data);
        if state.draft_id.is_some() {
            return (state, Effect::none());
        }
        let effect = self.save_effect(&state);
        state.saving = true;
        (state, effect)
    }

    /// Persists the current values.
    pub fn save_effect(&self, state: &WizardState) -> Effect<WizardAction> {
        let api = Arc::clone(&self.api);
        let draft = state.to_draft();
        Effect::task(async move { api.save_draft(&draft).await }, WizardAction::Saved)
    }
}

impl Reducer for WizardReducer {
    type Model = WizardState;
    type Action = WizardAction;

    fn update(
        &self,
        mut state: WizardState,
        action: WizardAction,
    ) -> (WizardState, Effect<WizardAction>) {
        if state.is_submitted()
            && !matches!(action, WizardAction::Saved(_) | WizardAction::Submitted(_))
        {
            tracing::debug!("wizard already submitted, ignoring input");
            return (state, Effect::none());
        }

        state.advanced = false;
        match action {
            WizardAction::Next => {
                if let Some(next) = state.step.next() {
                    state.step = next;
                    state.advanced = true;
                }
                (state, Effect::none())
            }
            WizardAction::Back => {
                if let Some(previous) = state.step.previous() {
                    state.step = previous;
                }
                (state, Effect::none())
            }
            WizardAction::SetField { key, value } => {
                state.values.insert(key, value);
                state.dirty = true;
                (state, Effect::none())
            }
            WizardAction::Saved(Ok(draft)) => {
                state.saving = false;
                if state.draft_id.is_none() {
                    state.draft_id = draft.id;
                }
                // Edits made while the save was in flight are still unsaved.
                if draft.values == state.values {
                    state.dirty = false;
                }
                (state, Effect::none())
            }
            WizardAction::Saved(Err(err)) => {
                tracing::warn!(error = %err, "draft save failed");
                state.saving = false;
                (state, Effect::none())
            }
            WizardAction::Submit => {
                if state.step != WizardStep::Review || state.submitting {
                    return (state, Effect::none());
                }
                state.submitting = true;
                let api = Arc::clone(&self.api);
                let draft = state.to_draft();
                let effect =
                    Effect::task(async move { api.submit(&draft).await }, WizardAction::Submitted);
                (state, effect)
            }
            WizardAction::Submitted(Ok(record)) => {
                state.submitting = false;
                state.dirty = false;
                state.submitted = Some(record.id);
                (state, Effect::none())
            }
            WizardAction::Submitted(Err(err)) => {
                tracing::warn!(error = %err, "briefing submission failed");
                state.submitting = false;
                (state, Effect::none())
            }
        }
    }
}
