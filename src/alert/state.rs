use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: Uuid,
    pub kind: AlertKind,
    pub message: String,
}

/// Banners currently on screen, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlertModel {
    pub alerts: Vec<Alert>,
}

impl AlertModel {
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| a.kind == AlertKind::Error)
    }
}
