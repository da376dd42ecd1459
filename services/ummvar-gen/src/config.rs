//! Run configuration resolved from the command line and environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cf_vocabulary::VocabularySource;
use cmr_ingest::{CmrConfig, CmrEnvironment};
use ummvar_mapping::AliasTable;

use crate::cli::Args;

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub granule: PathBuf,
    pub variable: Option<String>,
    pub cf_table: VocabularySource,
    pub aliases: AliasTable,
    pub pretty: bool,
    pub diagnostics: Option<PathBuf>,
    pub ingest: Option<IngestConfig>,
}

/// Ingest settings, present only when a target collection was given.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub collection: String,
    pub cmr: CmrConfig,
    pub report: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Builds a config for `granule` with defaults everywhere else.
    pub fn for_granule(granule: impl Into<PathBuf>, cf_table: VocabularySource) -> Self {
        Self {
            granule: granule.into(),
            variable: None,
            cf_table,
            aliases: AliasTable::default(),
            pretty: false,
            diagnostics: None,
            ingest: None,
        }
    }

    pub fn from_args(args: &Args) -> Result<Self> {
        let aliases = match &args.alias_table {
            Some(path) => AliasTable::from_yaml_file(path)
                .with_context(|| format!("Failed to load alias table {}", path.display()))?,
            None => AliasTable::default(),
        };

        let ingest = match &args.collection {
            Some(collection) => {
                let environment: CmrEnvironment = args
                    .environment
                    .parse()
                    .context("Invalid --environment")?;
                let cmr = CmrConfig {
                    environment,
                    token_file: args.token_file.clone(),
                    concurrency: args.ingest_concurrency,
                    request_timeout: Duration::from_secs(args.request_timeout_secs),
                    ..CmrConfig::from_env()
                };
                cmr.validate()?;
                Some(IngestConfig {
                    collection: collection.trim().to_string(),
                    cmr,
                    report: args.ingest_report.clone(),
                })
            }
            None => None,
        };

        Ok(Self {
            granule: args.granule.clone(),
            variable: args.variable.clone(),
            cf_table: VocabularySource::parse(&args.cf_table),
            aliases,
            pretty: args.pretty,
            diagnostics: args.diagnostics.clone(),
            ingest,
        })
    }
}
