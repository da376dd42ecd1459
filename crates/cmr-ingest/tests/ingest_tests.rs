//! Submission runs against an in-memory catalog.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use cmr_ingest::{
    read_launchpad_token, submit_all, CmrConfig, CmrEnvironment, Credentials, IngestClient,
    IngestError, IngestOutcome, IngestResult,
};
use test_utils::{cmr, temp_test_dir, write_fixture};
use ummvar_common::{MetadataSpecification, UmmVarRecord, VariableSet};

fn record(name: &str) -> UmmVarRecord {
    UmmVarRecord {
        name: name.to_string(),
        long_name: name.to_string(),
        definition: name.to_string(),
        standard_name: None,
        units: None,
        data_type: "float".to_string(),
        dimensions: Vec::new(),
        fill_values: Vec::new(),
        scale: None,
        offset: None,
        valid_ranges: Vec::new(),
        variable_type: None,
        variable_sub_type: None,
        index_ranges: None,
        additional_identifiers: Vec::new(),
        sets: vec![VariableSet::general(name.rsplit('/').next().unwrap_or(name))],
        metadata_specification: MetadataSpecification::default(),
    }
}

/// In-memory catalog. Records whose name is listed in `reject` are
/// rejected; records in `flaky` fail transiently that many times first.
#[derive(Default)]
struct FakeCatalog {
    reject: Vec<&'static str>,
    flaky: Mutex<HashMap<String, usize>>,
    unknown_collection: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl IngestClient for FakeCatalog {
    async fn short_name(&self, collection: &str, _credentials: &Credentials) -> IngestResult<String> {
        if self.unknown_collection {
            return Err(IngestError::collection_lookup(collection, "HTTP 404 Not Found"));
        }
        Ok(cmr::SHORT_NAME.to_string())
    }

    async fn submit(
        &self,
        record: &UmmVarRecord,
        _collection: &str,
        _credentials: &Credentials,
    ) -> IngestOutcome {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if let Some(remaining) = self.flaky.lock().unwrap().get_mut(&record.name) {
            if *remaining > 0 {
                *remaining -= 1;
                return IngestOutcome::TransientFailure {
                    reason: "HTTP 503 Service Unavailable".to_string(),
                };
            }
        }

        if self.reject.contains(&record.name.as_str()) {
            return IngestOutcome::Rejected {
                reason: "#/DataType: bad value".to_string(),
            };
        }

        IngestOutcome::Accepted {
            concept_id: Some(format!("V{}-POCLOUD", 1_200_000_000 + call)),
            revision_id: Some(1),
        }
    }
}

fn fast_config() -> CmrConfig {
    CmrConfig {
        concurrency: 3,
        initial_retry_delay: Duration::from_millis(1),
        max_retry_delay: Duration::from_millis(4),
        ..CmrConfig::default()
    }
}

fn credentials() -> Credentials {
    Credentials::new("lp-token-0123456789")
}

#[tokio::test]
async fn test_all_records_accepted() {
    let records = vec![record("/geophysical_data/sst"), record("lat"), record("lon")];
    let catalog = FakeCatalog::default();

    let report = submit_all(&catalog, &records, cmr::COLLECTION_ID, &credentials(), &fast_config())
        .await
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.total(), 3);
    assert_eq!(report.short_name, cmr::SHORT_NAME);
    let native_ids: Vec<&str> = report.results.values().map(|r| r.native_id.as_str()).collect();
    assert_eq!(
        native_ids,
        [
            "MODIS_A-JPL-L2P-v2019.0-geophysical_data_sst",
            "MODIS_A-JPL-L2P-v2019.0-lat",
            "MODIS_A-JPL-L2P-v2019.0-lon",
        ]
    );
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_rejection_does_not_stop_other_records() {
    let records = vec![record("a"), record("b"), record("c"), record("d")];
    let catalog = FakeCatalog {
        reject: vec!["b"],
        ..FakeCatalog::default()
    };

    let report = submit_all(&catalog, &records, cmr::COLLECTION_ID, &credentials(), &fast_config())
        .await
        .unwrap();

    assert_eq!(report.accepted, 3);
    assert_eq!(report.rejected, 1);
    assert!(!report.is_clean());
    assert!(matches!(
        report.outcome("b"),
        Some(IngestOutcome::Rejected { .. })
    ));
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let records = vec![record("flaky"), record("hopeless")];
    let catalog = FakeCatalog::default();
    catalog.flaky.lock().unwrap().insert("flaky".to_string(), 2);
    catalog.flaky.lock().unwrap().insert("hopeless".to_string(), 100);

    let config = CmrConfig {
        max_retries: 3,
        ..fast_config()
    };
    let report = submit_all(&catalog, &records, cmr::COLLECTION_ID, &credentials(), &config)
        .await
        .unwrap();

    assert!(report.outcome("flaky").is_some_and(IngestOutcome::is_accepted));
    assert!(report.outcome("hopeless").is_some_and(IngestOutcome::is_transient));
    assert_eq!(report.transient, 1);
    // flaky: 3 calls, hopeless: 1 + 3 retries
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn test_unknown_collection_is_fatal() {
    let catalog = FakeCatalog {
        unknown_collection: true,
        ..FakeCatalog::default()
    };

    let err = submit_all(&catalog, &[record("a")], "C0-NONE", &credentials(), &fast_config())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::CollectionLookup { .. }));
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_report_json() {
    let catalog = FakeCatalog::default();
    let report = submit_all(&catalog, &[record("sst")], cmr::COLLECTION_ID, &credentials(), &fast_config())
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["collection"], cmr::COLLECTION_ID);
    assert_eq!(json["accepted"], 1);
    assert_eq!(json["results"]["sst"]["status"], "accepted");
    assert_eq!(json["results"]["sst"]["native_id"], "MODIS_A-JPL-L2P-v2019.0-sst");
}

#[tokio::test]
async fn test_colliding_native_ids_are_not_overwritten() {
    // Both map to MODIS_A-JPL-L2P-v2019.0-g_sst
    let records = vec![record("g_sst"), record("/g/sst"), record("lat")];
    let catalog = FakeCatalog::default();

    let report = submit_all(&catalog, &records, cmr::COLLECTION_ID, &credentials(), &fast_config())
        .await
        .unwrap();

    assert_eq!(report.total(), 3);
    assert_eq!(report.accepted + report.rejected + report.transient, records.len());
    assert_eq!(report.accepted, 2);
    assert!(report.outcome("g_sst").is_some_and(IngestOutcome::is_accepted));
    match report.outcome("/g/sst") {
        Some(IngestOutcome::Rejected { reason }) => {
            assert_eq!(reason, "native id MODIS_A-JPL-L2P-v2019.0-g_sst collides with g_sst")
        }
        other => panic!("expected a rejection, got {:?}", other),
    }
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_read_token_from_explicit_file() {
    let dir = temp_test_dir();
    let path = write_fixture(dir.path(), "launchpad_token_ngap_uat.json", cmr::TOKEN_JSON_WITH_EMPTY_VALUE);

    let credentials = read_launchpad_token(Some(&path), CmrEnvironment::Uat)
        .await
        .unwrap();
    assert_eq!(credentials.token(), "lp-token-0123456789");
}

#[tokio::test]
async fn test_missing_token_file() {
    let dir = temp_test_dir();
    let path = dir.path().join("absent.json");

    let err = read_launchpad_token(Some(&path), CmrEnvironment::Ops)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::TokenUnavailable(_)));
}

#[tokio::test]
async fn test_token_file_without_token() {
    let dir = temp_test_dir();
    let path = write_fixture(dir.path(), "token.json", r#"{"sm_token": "abc"}"#);

    let err = read_launchpad_token(Some(&path), CmrEnvironment::Ops)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::InvalidToken { .. }));
}
