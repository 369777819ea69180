//! The briefing workflow: wizard child plus alert channel under one parent.

use std::sync::Arc;
use std::time::Duration;

use crate::alert::{AlertAction, AlertModel, AlertReducer};
use crate::briefing::api::{ApiError, BriefingApi, RequestError, SessionHandler};
use crate::briefing::init::{load_init_data, InitData, InitParams};
use crate::briefing::wizard::{WizardAction, WizardReducer, WizardState};
use crate::compose::{update_child_model, update_optional_child_model_effect_watch};
use crate::deferred::Deferred;
use crate::effect::Effect;
use crate::optics::{Lens, Optional};
use crate::reducer::Reducer;

#[derive(Debug, Clone, PartialEq)]
pub struct BriefingModel {
    /// Stays `InProgress` after a request failure; other failures resolve
    /// to `Err` since retrying would not help.
    pub wizard: Deferred<Result<WizardState, ApiError>>,
    pub alerts: AlertModel,
}

impl BriefingModel {
    pub fn loading() -> Self {
        Self {
            wizard: Deferred::InProgress,
            alerts: AlertModel::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BriefingAction {
    Initialized(Result<InitData, ApiError>),
    Wizard(WizardAction),
    Alert(AlertAction),
}

/// Collaborators the workflow's effects talk to.
#[derive(Clone)]
pub struct BriefingEnv {
    pub api: Arc<dyn BriefingApi>,
    pub session: Arc<dyn SessionHandler>,
    /// Upper bound for the whole initialization chain.
    pub init_timeout: Duration,
}

type WizardUpdate =
    Box<dyn Fn(BriefingModel, WizardAction) -> (BriefingModel, Effect<BriefingAction>) + Send + Sync>;
type AlertUpdate = Box<dyn Fn(BriefingModel, AlertAction) -> BriefingModel + Send + Sync>;

pub struct BriefingWorkflow {
    env: BriefingEnv,
    wizard: WizardReducer,
    update_wizard: WizardUpdate,
    update_alerts: AlertUpdate,
}

/// Focus on the wizard once it has loaded successfully.
pub fn wizard_optional() -> Optional<BriefingModel, WizardState> {
    Optional::new(
        |model: &BriefingModel| model.wizard.ok(),
        |model, wizard| BriefingModel {
            wizard: Deferred::Resolved(Ok(wizard)),
            ..model
        },
    )
}

pub fn alerts_lens() -> Lens<BriefingModel, AlertModel> {
    Lens::new(
        |model: &BriefingModel| &model.alerts,
        |model, alerts| BriefingModel { alerts, ..model },
    )
}

impl BriefingWorkflow {
    pub fn new(env: BriefingEnv) -> Self {
        let wizard = WizardReducer::new(Arc::clone(&env.api));

        let child = wizard.clone();
        let watcher = wizard.clone();
        let session = Arc::clone(&env.session);
        let update_wizard = update_optional_child_model_effect_watch(
            wizard_optional(),
            BriefingAction::Wizard,
            move |state: WizardState, action: WizardAction| child.update(state, action),
            move |model: BriefingModel, action: &WizardAction| {
                watch_wizard(&watcher, &session, model, action)
            },
        );
        let update_alerts = update_child_model(alerts_lens(), AlertReducer::reduce);

        Self {
            env,
            wizard,
            update_wizard: Box::new(update_wizard),
            update_alerts: Box::new(update_alerts),
        }
    }

    /// The model to mount with and the effect that starts loading.
    pub fn init(&self, params: InitParams) -> (BriefingModel, Effect<BriefingAction>) {
        let api = Arc::clone(&self.env.api);
        let effect = Effect::timeout(
            self.env.init_timeout,
            load_init_data(api, params),
            BriefingAction::Initialized,
            || BriefingAction::Initialized(Err(ApiError::Request(RequestError::Timeout))),
        );
        (BriefingModel::loading(), effect)
    }

    fn initialized(
        &self,
        mut model: BriefingModel,
        result: Result<InitData, ApiError>,
    ) -> (BriefingModel, Effect<BriefingAction>) {
        match result {
            Ok(data) => {
                if model.wizard.is_resolved() {
                    tracing::debug!("briefing already initialized, ignoring stale result");
                    return (model, Effect::none());
                }
                let (wizard, effect) = self.wizard.init(data);
                model.wizard = Deferred::Resolved(Ok(wizard));
                (model, effect.map(BriefingAction::Wizard))
            }
            Err(err) => {
                tracing::warn!(error = %err, "briefing initialization failed");
                let effect = failure_effect(&self.env.session, &err);
                if !err.is_request() {
                    model.wizard = Deferred::Resolved(Err(err));
                }
                (model, effect)
            }
        }
    }
}

impl Reducer for BriefingWorkflow {
    type Model = BriefingModel;
    type Action = BriefingAction;

    fn update(
        &self,
        model: BriefingModel,
        action: BriefingAction,
    ) -> (BriefingModel, Effect<BriefingAction>) {
        match action {
            BriefingAction::Initialized(result) => self.initialized(model, result),
            BriefingAction::Wizard(action) => (self.update_wizard)(model, action),
            BriefingAction::Alert(action) => ((self.update_alerts)(model, action), Effect::none()),
        }
    }
}

/// Parent-level reactions to wizard actions: persist after a step is
/// completed and surface save/submit outcomes as alerts.
fn watch_wizard(
    wizard: &WizardReducer,
    session: &Arc<dyn SessionHandler>,
    model: BriefingModel,
    action: &WizardAction,
) -> (BriefingModel, Effect<BriefingAction>) {
    match action {
        WizardAction::Next => {
            let Some(state) = model.wizard.ok() else {
                return (model, Effect::none());
            };
            let needs_save = state.dirty || state.draft_id.is_none();
            if !state.advanced || state.saving || state.is_submitted() || !needs_save {
                return (model, Effect::none());
            }
            let effect = wizard.save_effect(state).map(BriefingAction::Wizard);
            let model = wizard_optional().modify(model, |mut state| {
                state.saving = true;
                state
            });
            (model, effect)
        }
        WizardAction::Saved(Err(err)) | WizardAction::Submitted(Err(err)) => {
            (model, failure_effect(session, err))
        }
        WizardAction::Submitted(Ok(_)) => (
            model,
            Effect::action(BriefingAction::Alert(AlertAction::success(
                "Briefing submitted",
            ))),
        ),
        _ => (model, Effect::none()),
    }
}

/// One error alert, plus re-authentication when the session has expired.
fn failure_effect(session: &Arc<dyn SessionHandler>, err: &ApiError) -> Effect<BriefingAction> {
    let alert = Effect::action(BriefingAction::Alert(AlertAction::error(err.user_message())));
    if !err.is_session_expired() {
        return alert;
    }
    let session = Arc::clone(session);
    Effect::batch([
        alert,
        Effect::task_(async move { session.reauthenticate().await }),
    ])
}
