//! ummvar-gen
//!
//! Generates UMM-Var records in JSON format from a netCDF granule and
//! optionally ingests them into a CMR collection.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use ummvar_gen::{run, Args, GeneratorConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr; stdout carries only the records
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(granule = %args.granule.display(), "Starting UMM-Var generation");

    let config = match GeneratorConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    match run(&config, &mut stdout).await {
        Ok(summary) => {
            info!(
                records = summary.records,
                partial = summary.partial,
                diagnostics = summary.diagnostics,
                ingested = summary.ingest.as_ref().map(|r| r.accepted),
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "UMM-Var generation failed");
            ExitCode::FAILURE
        }
    }
}
