//! Submission of UMM-Var records to NASA's Common Metadata Repository.
//!
//! [`IngestClient`] is the seam the generator submits through;
//! [`CmrIngestClient`] implements it over the CMR search and ingest HTTP
//! APIs, authenticated with a Launchpad token.

pub mod client;
pub mod config;
pub mod error;
pub mod submit;
pub mod token;

pub use client::{classify_response, native_id, CmrIngestClient, IngestClient, IngestOutcome};
pub use config::{CmrConfig, CmrEnvironment};
pub use error::{IngestError, IngestResult};
pub use submit::{submit_all, IngestReport, RecordResult};
pub use token::{read_launchpad_token, Credentials};
