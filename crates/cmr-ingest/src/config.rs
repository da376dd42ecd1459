//! Ingest configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::IngestError;

/// CMR deployment to submit records to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CmrEnvironment {
    #[default]
    Ops,
    Uat,
    Sit,
}

impl CmrEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmrEnvironment::Ops => "ops",
            CmrEnvironment::Uat => "uat",
            CmrEnvironment::Sit => "sit",
        }
    }

    pub fn host(&self) -> &'static str {
        match self {
            CmrEnvironment::Ops => "cmr.earthdata.nasa.gov",
            CmrEnvironment::Uat => "cmr.uat.earthdata.nasa.gov",
            CmrEnvironment::Sit => "cmr.sit.earthdata.nasa.gov",
        }
    }

    pub fn base_url(&self) -> String {
        format!("https://{}", self.host())
    }
}

impl FromStr for CmrEnvironment {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ops" | "prod" => Ok(CmrEnvironment::Ops),
            "uat" => Ok(CmrEnvironment::Uat),
            "sit" => Ok(CmrEnvironment::Sit),
            other => Err(IngestError::Config(format!(
                "unknown CMR environment '{}', expected ops, uat or sit",
                other
            ))),
        }
    }
}

impl fmt::Display for CmrEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for submitting records to CMR.
#[derive(Debug, Clone, PartialEq)]
pub struct CmrConfig {
    pub environment: CmrEnvironment,
    /// Explicit Launchpad token file; the default locations are searched
    /// when unset.
    pub token_file: Option<PathBuf>,
    /// Maximum number of in-flight ingest requests
    pub concurrency: usize,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Retries for transient failures
    pub max_retries: u32,
    /// Initial retry delay (doubles each retry)
    pub initial_retry_delay: Duration,
    /// Maximum retry delay
    pub max_retry_delay: Duration,
}

impl Default for CmrConfig {
    fn default() -> Self {
        Self {
            environment: CmrEnvironment::Ops,
            token_file: None,
            concurrency: 4,
            request_timeout: Duration::from_secs(60),
            max_retries: 3,
            initial_retry_delay: Duration::from_secs(2),
            max_retry_delay: Duration::from_secs(30),
        }
    }
}

impl CmrConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup, falling back to defaults for
    /// missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("CMR_ENVIRONMENT") {
            match val.parse() {
                Ok(environment) => config.environment = environment,
                Err(e) => warn!(error = %e, "Ignoring CMR_ENVIRONMENT"),
            }
        }

        if let Some(val) = lookup("LAUNCHPAD_TOKEN_FILE") {
            if !val.trim().is_empty() {
                config.token_file = Some(PathBuf::from(val));
            }
        }

        if let Some(val) = lookup("INGEST_CONCURRENCY") {
            if let Ok(n) = val.parse() {
                config.concurrency = n;
            }
        }

        if let Some(val) = lookup("CMR_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(val) = lookup("CMR_MAX_RETRIES") {
            if let Ok(n) = val.parse() {
                config.max_retries = n;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.concurrency == 0 {
            return Err(IngestError::Config("concurrency must be > 0".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(IngestError::Config("request timeout must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_hosts() {
        assert_eq!(CmrEnvironment::Ops.host(), "cmr.earthdata.nasa.gov");
        assert_eq!(CmrEnvironment::Uat.base_url(), "https://cmr.uat.earthdata.nasa.gov");
        assert_eq!("SIT".parse::<CmrEnvironment>().unwrap(), CmrEnvironment::Sit);
        assert!("dev".parse::<CmrEnvironment>().is_err());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = CmrConfig::from_lookup(lookup(&[
            ("CMR_ENVIRONMENT", "uat"),
            ("LAUNCHPAD_TOKEN_FILE", "/tmp/token.json"),
            ("INGEST_CONCURRENCY", "8"),
            ("CMR_REQUEST_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.environment, CmrEnvironment::Uat);
        assert_eq!(config.token_file, Some(PathBuf::from("/tmp/token.json")));
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = CmrConfig::from_lookup(lookup(&[
            ("CMR_ENVIRONMENT", "moon"),
            ("INGEST_CONCURRENCY", "many"),
        ]));
        assert_eq!(config, CmrConfig::default());
    }

    #[test]
    fn test_validate() {
        assert!(CmrConfig::default().validate().is_ok());
        let config = CmrConfig {
            concurrency: 0,
            ..CmrConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
