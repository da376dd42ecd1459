//! Launchpad token loading.
//!
//! The token file is JSON written by the credential rotation job. Some
//! rotations leave lines like `"session_maxtimeout":,` behind; those lines
//! are dropped and the document parsed again before giving up.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::CmrEnvironment;
use crate::error::{IngestError, IngestResult};

/// Default token locations, searched in order.
pub const DEFAULT_TOKEN_PATHS: [&str; 2] = [
    "/launchpad_token_ngap_ops.json",
    "/home/podaacdev/certs/launchpad_token_ngap_ops.json",
];

/// Bearer credentials for CMR. The token is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Token file for `environment`: an explicit path is used as given, default
/// locations get their `ops` suffix swapped for the environment's.
pub fn resolve_token_path(explicit: Option<&Path>, environment: CmrEnvironment) -> IngestResult<PathBuf> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(IngestError::TokenUnavailable(format!(
                "{} does not exist",
                path.display()
            )))
        };
    }

    DEFAULT_TOKEN_PATHS
        .iter()
        .map(|path| environment_path(path, environment))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            IngestError::TokenUnavailable(format!(
                "none of the default token files exist for {}",
                environment
            ))
        })
}

fn environment_path(path: &str, environment: CmrEnvironment) -> PathBuf {
    PathBuf::from(path.replace("ops.json", &format!("{}.json", environment.as_str())))
}

/// Extract the `token` field from a token file's contents.
pub fn parse_token(text: &str) -> Result<String, String> {
    let document: serde_json::Value = match serde_json::from_str(text) {
        Ok(document) => document,
        Err(first) => {
            debug!(error = %first, "Token file is not valid JSON, dropping empty-valued lines");
            let cleaned: Vec<&str> = text
                .lines()
                .filter(|line| {
                    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
                    !compact.contains("\":,")
                })
                .collect();
            serde_json::from_str(&cleaned.join("\n")).map_err(|e| e.to_string())?
        }
    };

    document
        .get("token")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| "no \"token\" field".to_string())
}

/// Locate and read the Launchpad token for `environment`.
pub async fn read_launchpad_token(
    explicit: Option<&Path>,
    environment: CmrEnvironment,
) -> IngestResult<Credentials> {
    let path = resolve_token_path(explicit, environment)?;
    let text = tokio::fs::read_to_string(&path).await?;

    match parse_token(&text) {
        Ok(token) => {
            info!(path = %path.display(), "Loaded launchpad token");
            Ok(Credentials::new(token))
        }
        Err(reason) => {
            warn!(path = %path.display(), reason = %reason, "Unusable launchpad token file");
            Err(IngestError::invalid_token(path, reason))
        }
    }
}
