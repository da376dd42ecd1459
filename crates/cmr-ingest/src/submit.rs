//! Concurrent submission of a record set.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, instrument, warn};
use ummvar_common::UmmVarRecord;

use crate::client::{native_id, IngestClient, IngestOutcome};
use crate::config::CmrConfig;
use crate::error::IngestResult;
use crate::token::Credentials;

/// Outcome of one record, with the native id it was submitted under.
#[derive(Debug, Clone, Serialize)]
pub struct RecordResult {
    pub native_id: String,
    #[serde(flatten)]
    pub outcome: IngestOutcome,
}

/// Per-record results of one submission run, keyed by record name.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub collection: String,
    pub short_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub accepted: usize,
    pub rejected: usize,
    pub transient: usize,
    pub results: BTreeMap<String, RecordResult>,
}

impl IngestReport {
    fn new(
        collection: &str,
        short_name: String,
        started_at: DateTime<Utc>,
        results: BTreeMap<String, RecordResult>,
    ) -> Self {
        let count = |f: fn(&IngestOutcome) -> bool| results.values().filter(|r| f(&r.outcome)).count();
        let accepted = count(IngestOutcome::is_accepted);
        let transient = count(IngestOutcome::is_transient);

        Self {
            collection: collection.to_string(),
            short_name,
            started_at,
            finished_at: Utc::now(),
            accepted,
            rejected: results.len() - accepted - transient,
            transient,
            results,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Outcome for the record named `name`.
    pub fn outcome(&self, name: &str) -> Option<&IngestOutcome> {
        self.results.get(name).map(|r| &r.outcome)
    }

    /// Every record was accepted.
    pub fn is_clean(&self) -> bool {
        self.accepted == self.results.len()
    }

    pub fn to_json(&self) -> IngestResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Submit every record against `collection` with at most
/// `config.concurrency` requests in flight. Transient failures are retried
/// with exponential backoff; rejections are reported and never stop the
/// remaining submissions. A record whose native id was already claimed by an
/// earlier record is rejected without being sent.
///
/// Fails only when the collection's ShortName cannot be resolved.
#[instrument(skip_all, fields(collection = %collection, records = records.len()))]
pub async fn submit_all<C>(
    client: &C,
    records: &[UmmVarRecord],
    collection: &str,
    credentials: &Credentials,
    config: &CmrConfig,
) -> IngestResult<IngestReport>
where
    C: IngestClient + ?Sized,
{
    let started_at = Utc::now();
    let short_name = client.short_name(collection, credentials).await?;

    let mut results = BTreeMap::new();
    let mut claimed: HashMap<String, &str> = HashMap::new();
    let mut pending = Vec::with_capacity(records.len());
    for record in records {
        let nid = native_id(&short_name, &record.name);
        match claimed.get(&nid) {
            Some(first) => {
                let reason = format!("native id {} collides with {}", nid, first);
                warn!(name = %record.name, reason = %reason, "Record rejected");
                results.insert(
                    record.name.clone(),
                    RecordResult {
                        native_id: nid,
                        outcome: IngestOutcome::Rejected { reason },
                    },
                );
            }
            None => {
                claimed.insert(nid.clone(), record.name.as_str());
                pending.push((record, nid));
            }
        }
    }

    let submitted: Vec<(String, RecordResult)> = stream::iter(pending)
        .map(|(record, nid)| async move {
            let outcome = submit_with_retry(client, record, collection, credentials, config).await;
            match &outcome {
                IngestOutcome::Accepted { concept_id, .. } => {
                    info!(native_id = %nid, concept_id = ?concept_id, "Record accepted")
                }
                IngestOutcome::Rejected { reason } => {
                    warn!(native_id = %nid, reason = %reason, "Record rejected")
                }
                IngestOutcome::TransientFailure { reason } => {
                    warn!(native_id = %nid, reason = %reason, "Record not ingested after retries")
                }
            }
            (
                record.name.clone(),
                RecordResult {
                    native_id: nid,
                    outcome,
                },
            )
        })
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;
    results.extend(submitted);

    let report = IngestReport::new(collection, short_name, started_at, results);
    info!(
        accepted = report.accepted,
        rejected = report.rejected,
        transient = report.transient,
        "Ingest finished"
    );
    Ok(report)
}

async fn submit_with_retry<C>(
    client: &C,
    record: &UmmVarRecord,
    collection: &str,
    credentials: &Credentials,
    config: &CmrConfig,
) -> IngestOutcome
where
    C: IngestClient + ?Sized,
{
    let mut delay = config.initial_retry_delay;
    let mut attempt = 0;

    loop {
        let outcome = client.submit(record, collection, credentials).await;
        if !outcome.is_transient() || attempt >= config.max_retries {
            return outcome;
        }

        attempt += 1;
        warn!(
            name = %record.name,
            retry = attempt,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            "Transient ingest failure, retrying"
        );
        tokio::time::sleep(delay).await;
        delay = std::cmp::min(delay * 2, config.max_retry_delay);
    }
}
