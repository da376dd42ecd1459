//! Loading the standard-name table from disk or over HTTP.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::error::{VocabularyLoadError, VocabularyResult};
use crate::parser::parse_table;
use crate::table::Vocabulary;

/// Where to read the standard-name table from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularySource {
    File(PathBuf),
    Url(String),
}

impl VocabularySource {
    /// `http://` and `https://` locations are URLs, anything else a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            VocabularySource::Url(location.to_string())
        } else {
            VocabularySource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for VocabularySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularySource::File(path) => write!(f, "{}", path.display()),
            VocabularySource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Timeout for fetching the table over HTTP.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Load and parse the table.
#[instrument(skip_all, fields(source = %source))]
pub async fn load(source: &VocabularySource) -> VocabularyResult<Vocabulary> {
    let xml = match source {
        VocabularySource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| VocabularyLoadError::unreachable(source.to_string(), e))?,
        VocabularySource::Url(url) => fetch(url).await?,
    };

    let vocabulary = parse_table(&xml)?;
    info!(
        version = vocabulary.version().unwrap_or("unknown"),
        entries = vocabulary.len(),
        "Loaded standard-name table"
    );
    Ok(vocabulary)
}

/// Load the table, falling back to an empty vocabulary on failure.
///
/// Standard-name resolution then degrades to "absent" for every variable.
pub async fn load_or_empty(source: &VocabularySource) -> Vocabulary {
    match load(source).await {
        Ok(vocabulary) => vocabulary,
        Err(e) => {
            warn!(error = %e, "Continuing with an empty standard-name vocabulary");
            Vocabulary::empty()
        }
    }
}

async fn fetch(url: &str) -> VocabularyResult<String> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| VocabularyLoadError::unreachable(url, e))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| VocabularyLoadError::unreachable(url, e))?;

    if !response.status().is_success() {
        return Err(VocabularyLoadError::unreachable(
            url,
            format!("HTTP {}", response.status()),
        ));
    }

    response
        .text()
        .await
        .map_err(|e| VocabularyLoadError::unreachable(url, e))
}
