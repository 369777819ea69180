//! `BriefingApi` over HTTP/JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::briefing::api::{ApiError, BriefingApi, BriefingRecord, Draft, Location, RequestError};
use crate::config::ApiConfig;

/// Longest slice of an error body carried into `RequestError::Status`.
const MAX_ERROR_BODY: usize = 200;

pub struct HttpBriefingApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBriefingApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .build()
            .map_err(|e| RequestError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> Result<T, ApiError> {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        tracing::debug!(resource, status, bytes = body.len(), "briefing api response");

        if let Some(err) = status_error(status, &body, resource) {
            return Err(err);
        }

        // 204 and empty bodies decode as JSON null, i.e. `None` for optional resources.
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Decode {
            what: resource.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl BriefingApi for HttpBriefingApi {
    async fn fetch_draft(&self, id: &str) -> Result<Draft, ApiError> {
        let request = self.client.get(self.url(&format!("/drafts/{}", id)));
        self.send(request, &format!("draft {}", id)).await
    }

    async fn fetch_location(&self, id: &str) -> Result<Location, ApiError> {
        let request = self.client.get(self.url(&format!("/locations/{}", id)));
        self.send(request, &format!("location {}", id)).await
    }

    async fn last_submitted(&self, location_id: &str) -> Result<Option<BriefingRecord>, ApiError> {
        let path = format!("/locations/{}/briefings/last-submitted", location_id);
        let request = self.client.get(self.url(&path));
        self.send(request, "last submitted briefing").await
    }

    async fn last_adhoc(&self) -> Result<Option<BriefingRecord>, ApiError> {
        let request = self.client.get(self.url("/briefings/last-adhoc"));
        self.send(request, "last ad-hoc briefing").await
    }

    async fn save_draft(&self, draft: &Draft) -> Result<Draft, ApiError> {
        let request = match &draft.id {
            Some(id) => self.client.put(self.url(&format!("/drafts/{}", id))),
            None => self.client.post(self.url("/drafts")),
        };
        self.send(request.json(draft), "draft").await
    }

    async fn submit(&self, draft: &Draft) -> Result<BriefingRecord, ApiError> {
        let request = self.client.post(self.url("/briefings")).json(draft);
        self.send(request, "briefing submission").await
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        RequestError::Timeout.into()
    } else {
        RequestError::Network(err.to_string()).into()
    }
}

/// Maps a non-success status to the error taxonomy. `None` for 2xx.
fn status_error(status: u16, body: &str, resource: &str) -> Option<ApiError> {
    match status {
        200..=299 => None,
        401 | 403 => Some(RequestError::SessionExpired.into()),
        404 => Some(ApiError::NotFound {
            resource: resource.to_string(),
        }),
        _ => Some(
            RequestError::Status {
                status,
                message: body.trim().chars().take(MAX_ERROR_BODY).collect(),
            }
            .into(),
        ),
    }
}
