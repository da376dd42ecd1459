//! CMR ingest client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use ummvar_common::{UmmVarRecord, UMM_VAR_VERSION};

use crate::config::CmrConfig;
use crate::error::{IngestError, IngestResult};
use crate::token::Credentials;

/// Result of submitting one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    Accepted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        concept_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revision_id: Option<u64>,
    },
    Rejected {
        reason: String,
    },
    /// Worth retrying: timeouts, throttling, server errors and network
    /// failures.
    TransientFailure {
        reason: String,
    },
}

impl IngestOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, IngestOutcome::Accepted { .. })
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, IngestOutcome::TransientFailure { .. })
    }
}

/// Trait for catalogs that accept variable records.
#[async_trait]
pub trait IngestClient: Send + Sync {
    /// ShortName of the collection identified by `collection` (concept-id).
    async fn short_name(&self, collection: &str, credentials: &Credentials) -> IngestResult<String>;

    /// Submit one record against `collection`.
    async fn submit(
        &self,
        record: &UmmVarRecord,
        collection: &str,
        credentials: &Credentials,
    ) -> IngestOutcome;
}

/// Native id of a record: `{ShortName}-{name}`, with the leading slash of
/// nested names stripped and remaining slashes turned into underscores.
pub fn native_id(short_name: &str, record_name: &str) -> String {
    let name = match record_name.strip_prefix('/') {
        Some(nested) => nested.replace('/', "_"),
        None => record_name.to_string(),
    };
    format!("{}-{}", short_name, name)
}

/// Content type of a UMM-Var ingest body.
pub fn umm_var_content_type() -> String {
    format!("application/vnd.nasa.cmr.umm+json;version={}", UMM_VAR_VERSION)
}

#[derive(Debug, Deserialize)]
struct IngestAccepted {
    #[serde(rename = "concept-id")]
    concept_id: Option<String>,
    #[serde(rename = "revision-id")]
    revision_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct IngestErrors {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// Map an ingest response onto an outcome.
pub fn classify_response(status: StatusCode, body: &str) -> IngestOutcome {
    if status.is_success() {
        let accepted: Option<IngestAccepted> = serde_json::from_str(body).ok();
        return IngestOutcome::Accepted {
            concept_id: accepted.as_ref().and_then(|a| a.concept_id.clone()),
            revision_id: accepted.and_then(|a| a.revision_id),
        };
    }

    let reason = error_reason(status, body);
    if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        IngestOutcome::TransientFailure { reason }
    } else {
        IngestOutcome::Rejected { reason }
    }
}

fn error_reason(status: StatusCode, body: &str) -> String {
    let errors = serde_json::from_str::<IngestErrors>(body)
        .map(|e| e.errors)
        .unwrap_or_default();
    if errors.is_empty() {
        return format!("HTTP {}", status);
    }
    errors
        .iter()
        .map(|e| match e.as_str() {
            Some(text) => text.to_string(),
            None => e.to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// HTTP client for the CMR search and ingest APIs.
pub struct CmrIngestClient {
    client: Client,
    base_url: String,
    short_names: RwLock<HashMap<String, String>>,
}

impl CmrIngestClient {
    pub fn new(config: &CmrConfig) -> IngestResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(config.concurrency)
            .build()?;

        Ok(Self {
            client,
            base_url: config.environment.base_url(),
            short_names: RwLock::new(HashMap::new()),
        })
    }

    /// Point the client at a different CMR root, e.g. a local proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/search/concepts/{}.umm_json", self.base_url, collection)
    }

    pub fn ingest_url(&self, collection: &str, native_id: &str) -> String {
        format!(
            "{}/ingest/collections/{}/variables/{}",
            self.base_url, collection, native_id
        )
    }

    async fn fetch_short_name(&self, collection: &str, credentials: &Credentials) -> IngestResult<String> {
        let response = self
            .client
            .get(self.collection_url(collection))
            .header(header::AUTHORIZATION, credentials.token())
            .send()
            .await
            .map_err(|e| IngestError::collection_lookup(collection, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::collection_lookup(
                collection,
                format!("HTTP {}", status),
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| IngestError::collection_lookup(collection, e))?;
        body.get("ShortName")
            .and_then(|s| s.as_str())
            .map(str::to_string)
            .ok_or_else(|| IngestError::collection_lookup(collection, "no ShortName in response"))
    }
}

#[async_trait]
impl IngestClient for CmrIngestClient {
    #[instrument(skip(self, credentials))]
    async fn short_name(&self, collection: &str, credentials: &Credentials) -> IngestResult<String> {
        if let Some(cached) = self.short_names.read().await.get(collection) {
            return Ok(cached.clone());
        }

        let short_name = self.fetch_short_name(collection, credentials).await?;
        debug!(short_name = %short_name, "Resolved collection ShortName");
        self.short_names
            .write()
            .await
            .insert(collection.to_string(), short_name.clone());
        Ok(short_name)
    }

    #[instrument(skip(self, record, credentials), fields(name = %record.name))]
    async fn submit(
        &self,
        record: &UmmVarRecord,
        collection: &str,
        credentials: &Credentials,
    ) -> IngestOutcome {
        let short_name = match self.short_name(collection, credentials).await {
            Ok(short_name) => short_name,
            Err(e) => {
                return IngestOutcome::TransientFailure {
                    reason: e.to_string(),
                }
            }
        };

        let body = match serde_json::to_vec(record) {
            Ok(body) => body,
            Err(e) => {
                return IngestOutcome::Rejected {
                    reason: e.to_string(),
                }
            }
        };

        let url = self.ingest_url(collection, &native_id(&short_name, &record.name));
        let response = self
            .client
            .put(&url)
            .header(header::AUTHORIZATION, credentials.token())
            .header(header::CONTENT_TYPE, umm_var_content_type())
            .header(header::ACCEPT, "application/json")
            .body(body)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                debug!(url = %url, status = %status, "Ingest response");
                classify_response(status, &text)
            }
            Err(e) => IngestOutcome::TransientFailure {
                reason: e.to_string(),
            },
        }
    }
}
