//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Bundled copy of the CF standard-name table.
pub const BUNDLED_CF_TABLE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/resources/cf-standard-name-table.xml"
);

/// Generate UMM-Var records in JSON format and optionally ingest them to CMR
#[derive(Parser, Debug, Clone)]
#[command(name = "ummvar-gen")]
#[command(about = "Generate UMM-Var records from a netCDF granule and ingest them to CMR")]
pub struct Args {
    /// The source granule (netCDF4/HDF5, or a CDL header with extension .cdl)
    pub granule: PathBuf,

    /// Target collection in CMR, by concept-id; enables ingest
    #[arg(short, long, env = "UMMVAR_COLLECTION")]
    pub collection: Option<String>,

    /// Keep only the record for this variable
    #[arg(short, long)]
    pub variable: Option<String>,

    /// Target CMR environment: ops, uat or sit
    #[arg(short, long, default_value = "ops", env = "CMR_ENVIRONMENT")]
    pub environment: String,

    /// CF standard-name table, by path or URL
    #[arg(long, default_value = BUNDLED_CF_TABLE, env = "UMMVAR_CF_TABLE")]
    pub cf_table: String,

    /// YAML file replacing the built-in attribute alias table
    #[arg(long, env = "UMMVAR_ALIAS_TABLE")]
    pub alias_table: Option<PathBuf>,

    /// Launchpad token file (default locations are searched when unset)
    #[arg(long, env = "LAUNCHPAD_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Maximum number of concurrent ingest requests
    #[arg(long, default_value_t = 4, env = "INGEST_CONCURRENCY")]
    pub ingest_concurrency: usize,

    /// CMR request timeout in seconds
    #[arg(long, default_value_t = 60, env = "CMR_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Write the per-variable diagnostics to this file as JSON
    #[arg(long)]
    pub diagnostics: Option<PathBuf>,

    /// Write the ingest report to this file as JSON
    #[arg(long, env = "UMMVAR_INGEST_REPORT")]
    pub ingest_report: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ummvar-gen", "granule.nc"]).unwrap();
        assert_eq!(args.granule, PathBuf::from("granule.nc"));
        assert!(args.cf_table.ends_with("resources/cf-standard-name-table.xml"));
        assert_eq!(args.ingest_concurrency, 4);
        assert!(!args.pretty);
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "ummvar-gen",
            "granule.nc",
            "-c",
            "C1234567890-POCLOUD",
            "-v",
            "sst",
            "-e",
            "uat",
        ])
        .unwrap();
        assert_eq!(args.collection.as_deref(), Some("C1234567890-POCLOUD"));
        assert_eq!(args.variable.as_deref(), Some("sst"));
        assert_eq!(args.environment, "uat");
    }

    #[test]
    fn test_granule_is_required() {
        assert!(Args::try_parse_from(["ummvar-gen"]).is_err());
    }
}
