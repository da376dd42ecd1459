//! One generator run: read, map, write, and optionally ingest.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use cf_vocabulary::load_or_empty;
use cmr_ingest::{read_launchpad_token, submit_all, CmrIngestClient, Credentials, IngestClient, IngestReport};
use netcdf_parser::read_granule;
use tracing::{error, info, warn};
use ummvar_mapping::{generate, RecordSet, TraversalError};

use crate::config::{GeneratorConfig, IngestConfig};

/// What a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub records: usize,
    pub partial: usize,
    pub diagnostics: usize,
    pub ingest: Option<IngestReport>,
}

/// Read the granule and build its records, narrowed to the requested
/// variable. Fails when the granule cannot be traversed or when no record
/// at all is produced.
pub async fn generate_records(config: &GeneratorConfig) -> Result<RecordSet> {
    let path = config.granule.clone();
    let source = path.display().to_string();
    let granule = tokio::task::spawn_blocking(move || read_granule(&path))
        .await
        .context("Granule reader task failed")?
        .map_err(|e| TraversalError::unreadable(source.clone(), e))?;

    let vocabulary = load_or_empty(&config.cf_table).await;
    let records = generate(&granule, &vocabulary, &config.aliases)?;

    let records = match &config.variable {
        Some(name) => records
            .select_variable(name)
            .with_context(|| format!("No variable named '{}' in {}", name, source))?,
        None => records,
    };

    if records.is_empty() {
        bail!("No UMM-Var records could be produced from {}", source);
    }
    Ok(records)
}

/// Write the records to `out` and the diagnostics to their file, if any.
pub async fn write_outputs<W: Write>(config: &GeneratorConfig, records: &RecordSet, out: &mut W) -> Result<()> {
    let json = records.to_json(config.pretty)?;
    out.write_all(json.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;

    if let Some(path) = &config.diagnostics {
        write_file(path, &records.diagnostics_json()?).await?;
        info!(path = %path.display(), count = records.diagnostics().len(), "Wrote diagnostics");
    }
    Ok(())
}

/// Submit the records through `client` and write the report file, if any.
pub async fn publish<C>(
    ingest: &IngestConfig,
    client: &C,
    credentials: &Credentials,
    records: &RecordSet,
) -> Result<IngestReport>
where
    C: IngestClient + ?Sized,
{
    let report = submit_all(client, records.records(), &ingest.collection, credentials, &ingest.cmr).await?;

    if let Some(path) = &ingest.report {
        write_file(path, &report.to_json()?).await?;
        info!(path = %path.display(), "Wrote ingest report");
    }
    Ok(report)
}

/// The full run. Ingest problems are logged and never fail the run.
pub async fn run<W: Write>(config: &GeneratorConfig, out: &mut W) -> Result<RunSummary> {
    let records = generate_records(config).await?;
    write_outputs(config, &records, out).await?;

    let ingest = match &config.ingest {
        Some(ingest) => ingest_with_cmr(ingest, &records).await,
        None => None,
    };

    Ok(RunSummary {
        records: records.len(),
        partial: records.partial_count(),
        diagnostics: records.diagnostics().len(),
        ingest,
    })
}

async fn ingest_with_cmr(ingest: &IngestConfig, records: &RecordSet) -> Option<IngestReport> {
    let credentials = match read_launchpad_token(ingest.cmr.token_file.as_deref(), ingest.cmr.environment).await {
        Ok(credentials) => credentials,
        Err(e) => {
            warn!(error = %e, "Skipping CMR ingest");
            return None;
        }
    };

    let client = match CmrIngestClient::new(&ingest.cmr) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create CMR client");
            return None;
        }
    };

    match publish(ingest, &client, &credentials, records).await {
        Ok(report) => Some(report),
        Err(e) => {
            error!(error = %e, collection = %ingest.collection, "CMR ingest failed");
            None
        }
    }
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
