//! The remote API boundary the briefing workflow talks to.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A briefing in progress, as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    /// Seconds since the Unix epoch, as sent by the server.
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
}

/// A briefing that has been submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingRecord {
    pub id: String,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("session expired")]
    SessionExpired,
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
}

/// Closed set of failures an API call can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },
    #[error("request failed: {0}")]
    Request(#[from] RequestError),
    #[error("{resource} not found")]
    NotFound { resource: String },
}

impl ApiError {
    /// User-friendly message for the alert banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Decode { .. } => "The briefing data could not be read".to_string(),
            ApiError::Request(RequestError::SessionExpired) => {
                "Your session has expired, please sign in again".to_string()
            }
            ApiError::Request(RequestError::Timeout) => {
                "The briefing service took too long to respond".to_string()
            }
            ApiError::Request(RequestError::Network(_)) => {
                "Could not reach the briefing service".to_string()
            }
            ApiError::Request(RequestError::Status { status, .. }) => {
                format!("The briefing service returned an error ({})", status)
            }
            ApiError::NotFound { resource } => format!("Could not find {}", resource),
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self, ApiError::Request(_))
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::Request(RequestError::SessionExpired))
    }
}

#[async_trait]
pub trait BriefingApi: Send + Sync {
    async fn fetch_draft(&self, id: &str) -> Result<Draft, ApiError>;

    async fn fetch_location(&self, id: &str) -> Result<Location, ApiError>;

    /// Most recent briefing submitted for the location, if any.
    async fn last_submitted(&self, location_id: &str) -> Result<Option<BriefingRecord>, ApiError>;

    /// Most recent ad-hoc briefing, regardless of location.
    async fn last_adhoc(&self) -> Result<Option<BriefingRecord>, ApiError>;

    /// Creates the draft when it has no id yet, updates it otherwise.
    async fn save_draft(&self, draft: &Draft) -> Result<Draft, ApiError>;

    async fn submit(&self, draft: &Draft) -> Result<BriefingRecord, ApiError>;
}

/// Hook for the re-authentication flow, which lives outside the workflow.
#[async_trait]
pub trait SessionHandler: Send + Sync {
    async fn reauthenticate(&self);
}

/// Session handler for headless use: records that sign-in is required.
pub struct LogSessionHandler;

#[async_trait]
impl SessionHandler for LogSessionHandler {
    async fn reauthenticate(&self) {
        tracing::warn!("session expired, re-authentication required");
    }
}
