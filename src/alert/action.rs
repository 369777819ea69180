use uuid::Uuid;

use crate::alert::state::{Alert, AlertKind};

/// Requests against the alert banner channel.
///
/// Any nested reducer can ask for a banner by producing one of these,
/// without knowing how banners are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertAction {
    Show(Alert),
    Dismiss(Uuid),
    DismissAll,
}

impl AlertAction {
    pub fn show(kind: AlertKind, message: impl Into<String>) -> Self {
        Self::Show(Alert {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::show(AlertKind::Error, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::show(AlertKind::Success, message)
    }
}
