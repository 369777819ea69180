//! Shared test utilities and stub collaborators.

#![allow(dead_code)]

pub mod mock_server;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use async_trait::async_trait;
use effectloop::briefing::{
    ApiError, BriefingApi, BriefingRecord, Draft, InitData, Location, SessionHandler,
};
use effectloop::config::RuntimeConfig;
use effectloop::effect::{Dispatch, Effect};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub type Seen<A> = Arc<Mutex<Vec<A>>>;

/// A dispatch that records every action it receives.
pub fn recorder<A: Send + 'static>() -> (Dispatch<A>, Seen<A>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let seen = Arc::clone(&seen);
        Dispatch::new(move |action| seen.lock().push(action))
    };
    (sink, seen)
}

/// Runs `effect` and returns what it dispatched synchronously.
pub fn collect_sync<A: Clone + Send + 'static>(effect: Effect<A>) -> Vec<A> {
    let (dispatch, seen) = recorder();
    effect.run(dispatch);
    let out = seen.lock().clone();
    out
}

/// Polls `seen` until it holds `count` actions or two seconds pass.
pub async fn wait_for_len<A>(seen: &Seen<A>, count: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while seen.lock().len() < count {
        if tokio::time::Instant::now() > deadline {
            panic!("expected {} actions, saw {}", count, seen.lock().len());
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

pub fn runtime_config() -> RuntimeConfig {
    RuntimeConfig { max_sync_chain: 8 }
}

pub fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn location() -> Location {
    Location {
        id: "loc-1".to_string(),
        name: "North Yard".to_string(),
    }
}

pub fn draft() -> Draft {
    Draft {
        id: Some("draft-7".to_string()),
        location_id: Some("loc-1".to_string()),
        started_at: Some("1700000000".to_string()),
        values: values(&[("supervisor", "Kim")]),
    }
}

pub fn record(id: &str, pairs: &[(&str, &str)]) -> BriefingRecord {
    BriefingRecord {
        id: id.to_string(),
        location_id: Some("loc-1".to_string()),
        values: values(pairs),
    }
}

pub fn init_data() -> InitData {
    InitData {
        draft: Some(draft()),
        started_at: UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        location: Some(location()),
        last_submitted: Some(record("b-1", &[("supervisor", "Lee"), ("crew", "4")])),
        last_adhoc: None,
    }
}

/// In-memory `BriefingApi` that records calls and fails on request.
#[derive(Default)]
pub struct StubApi {
    pub draft: Option<Draft>,
    pub location: Option<Location>,
    pub last_submitted: Option<BriefingRecord>,
    pub last_adhoc: Option<BriefingRecord>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    calls: Mutex<Vec<String>>,
    /// Operations that wait for a notification before answering.
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
}

impl StubApi {
    pub fn with_fixtures() -> Self {
        Self {
            draft: Some(draft()),
            location: Some(location()),
            last_submitted: Some(record("b-1", &[("supervisor", "Lee"), ("crew", "4")])),
            last_adhoc: Some(record("adhoc-1", &[("weather", "clear")])),
            ..Self::default()
        }
    }

    /// Makes the named operation fail with `err`.
    pub fn failing(self, operation: &'static str, err: ApiError) -> Self {
        self.failures.lock().insert(operation, err);
        self
    }

    /// Makes the named operation block until `gate` is notified.
    pub fn gated(self, operation: &'static str, gate: Arc<Notify>) -> Self {
        self.gates.lock().insert(operation, gate);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    async fn record_call(&self, operation: &'static str, arg: &str) -> Result<(), ApiError> {
        self.calls.lock().push(format!("{}:{}", operation, arg));
        let gate = self.gates.lock().get(operation).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.failures.lock().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BriefingApi for StubApi {
    async fn fetch_draft(&self, id: &str) -> Result<Draft, ApiError> {
        self.record_call("fetch_draft", id).await?;
        self.draft.clone().ok_or_else(|| ApiError::NotFound {
            resource: format!("draft {}", id),
        })
    }

    async fn fetch_location(&self, id: &str) -> Result<Location, ApiError> {
        self.record_call("fetch_location", id).await?;
        self.location.clone().ok_or_else(|| ApiError::NotFound {
            resource: format!("location {}", id),
        })
    }

    async fn last_submitted(&self, location_id: &str) -> Result<Option<BriefingRecord>, ApiError> {
        self.record_call("last_submitted", location_id).await?;
        Ok(self.last_submitted.clone())
    }

    async fn last_adhoc(&self) -> Result<Option<BriefingRecord>, ApiError> {
        self.record_call("last_adhoc", "").await?;
        Ok(self.last_adhoc.clone())
    }

    async fn save_draft(&self, draft: &Draft) -> Result<Draft, ApiError> {
        self.record_call("save_draft", draft.id.as_deref().unwrap_or("new"))
            .await?;
        let mut saved = draft.clone();
        saved.id.get_or_insert_with(|| "draft-new".to_string());
        Ok(saved)
    }

    async fn submit(&self, draft: &Draft) -> Result<BriefingRecord, ApiError> {
        self.record_call("submit", draft.id.as_deref().unwrap_or("new")).await?;
        Ok(BriefingRecord {
            id: "briefing-1".to_string(),
            location_id: draft.location_id.clone(),
            values: draft.values.clone(),
        })
    }
}

/// Counts re-authentication requests.
#[derive(Default)]
pub struct CountingSession {
    pub count: Mutex<u32>,
}

#[async_trait]
impl SessionHandler for CountingSession {
    async fn reauthenticate(&self) {
        *self.count.lock() += 1;
    }
}
