//! The multi-resource initialization chain.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::briefing::api::{ApiError, BriefingApi, BriefingRecord, Draft, Location};

/// What the workflow was opened with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitParams {
    pub draft_id: Option<String>,
    pub location_id: Option<String>,
}

/// Everything the wizard needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitData {
    pub draft: Option<Draft>,
    pub started_at: SystemTime,
    pub location: Option<Location>,
    pub last_submitted: Option<BriefingRecord>,
    pub last_adhoc: Option<BriefingRecord>,
}

/// Fetches, in order: the draft (if any), its location (if any), the last
/// briefing submitted there, and the last ad-hoc briefing. The first failure
/// ends the chain.
pub async fn load_init_data(
    api: Arc<dyn BriefingApi>,
    params: InitParams,
) -> Result<InitData, ApiError> {
    let draft = match &params.draft_id {
        Some(id) => Some(api.fetch_draft(id).await?),
        None => None,
    };
    let started_at = decode_started_at(draft.as_ref().and_then(|d| d.started_at.as_deref()));

    // An explicit location wins over the one remembered by the draft.
    let location_id = params
        .location_id
        .clone()
        .or_else(|| draft.as_ref().and_then(|d| d.location_id.clone()));
    let location = match &location_id {
        Some(id) => Some(api.fetch_location(id).await?),
        None => None,
    };

    let last_submitted = match &location {
        Some(location) => api.last_submitted(&location.id).await?,
        None => None,
    };
    let last_adhoc = api.last_adhoc().await?;

    tracing::debug!(
        has_draft = draft.is_some(),
        has_location = location.is_some(),
        "briefing init data loaded"
    );

    Ok(InitData {
        draft,
        started_at,
        location,
        last_submitted,
        last_adhoc,
    })
}

/// Parses a Unix-seconds timestamp. Missing or malformed input means "now".
pub fn decode_started_at(raw: Option<&str>) -> SystemTime {
    let Some(raw) = raw else {
        return SystemTime::now();
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) => UNIX_EPOCH + Duration::from_secs(secs),
        Err(err) => {
            tracing::warn!(raw, error = %err, "draft timestamp unreadable, using current time");
            SystemTime::now()
        }
    }
}

pub fn encode_started_at(at: SystemTime) -> String {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_epoch_seconds() {
        let at = decode_started_at(Some("1700000000"));
        assert_eq!(at, UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert_eq!(encode_started_at(at), "1700000000");
    }

    #[test]
    fn malformed_timestamp_falls_back_to_now() {
        let before = SystemTime::now();
        let at = decode_started_at(Some("yesterday"));
        assert!(at >= before);
    }

    #[test]
    fn missing_timestamp_falls_back_to_now() {
        let before = SystemTime::now();
        assert!(decode_started_at(None) >= before);
    }
}
