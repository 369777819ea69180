use crate::alert::action::AlertAction;
use crate::alert::state::AlertModel;
use crate::effect::Effect;
use crate::reducer::Reducer;

pub struct AlertReducer;

impl AlertReducer {
    /// Pure transition; alerts never produce effects.
    pub fn reduce(mut model: AlertModel, action: AlertAction) -> AlertModel {
        match action {
            AlertAction::Show(alert) => {
                // Re-showing an identical message replaces the older banner.
                model
                    .alerts
                    .retain(|a| !(a.kind == alert.kind && a.message == alert.message));
                model.alerts.push(alert);
            }
            AlertAction::Dismiss(id) => model.alerts.retain(|a| a.id != id),
            AlertAction::DismissAll => model.alerts.clear(),
        }
        model
    }
}

impl Reducer for AlertReducer {
    type Model = AlertModel;
    type Action = AlertAction;

    fn update(&self, model: AlertModel, action: AlertAction) -> (AlertModel, Effect<AlertAction>) {
        (Self::reduce(model, action), Effect::none())
    }
}
