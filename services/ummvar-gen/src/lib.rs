//! UMM-Var record generator.
//!
//! Reads a granule's structure, maps every variable onto a UMM-Var record
//! and optionally submits the records to CMR.

pub mod cli;
pub mod config;
pub mod run;

pub use cli::Args;
pub use config::{GeneratorConfig, IngestConfig};
pub use run::{generate_records, publish, run, write_outputs, RunSummary};
