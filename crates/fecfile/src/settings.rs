//! Service settings shared by all commands.

use anyhow::{Context, Result};
use clap::Args;
use fecfile_core::Config;
use fecfile_webload::{ClientConfig, DEFAULT_ENDPOINT};
use std::time::Duration;

#[derive(Clone, Args)]
pub struct ServiceArgs {
    /// Webload SOAP endpoint
    #[arg(long, env = "FEC_WEBLOAD_URL", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Vendor API key issued by the FEC
    #[arg(long, env = "FEC_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Agency identifier sent with uploads
    #[arg(long, env = "FEC_AGENCY_ID", global = true)]
    pub agency_id: Option<String>,

    /// Milliseconds between status checks
    #[arg(long, env = "FEC_POLL_INTERVAL_MS", default_value_t = 5000, global = true)]
    pub poll_interval_ms: u64,

    /// Hours to keep polling a submission that is still processing
    #[arg(long, env = "FEC_POLL_DEADLINE_HOURS", default_value_t = 8, global = true)]
    pub poll_deadline_hours: u64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "FEC_REQUEST_TIMEOUT_SECS", default_value_t = 1800, global = true)]
    pub request_timeout_secs: u64,
}

impl ServiceArgs {
    pub fn client_config(&self) -> Result<ClientConfig> {
        let config = ClientConfig::new(&self.endpoint)
            .with_context(|| format!("Invalid webload endpoint: {}", self.endpoint))?;
        Ok(config.with_request_timeout(Duration::from_secs(self.request_timeout_secs)))
    }

    /// Builds the core configuration. Uploads need the API key and agency id;
    /// status checks do not.
    pub fn core_config(&self, for_upload: bool) -> Result<Config> {
        let api_key = self.api_key.clone().unwrap_or_default();
        let agency_id = self.agency_id.clone().unwrap_or_default();
        if for_upload {
            anyhow::ensure!(!api_key.is_empty(), "An API key is required (--api-key or FEC_API_KEY)");
            anyhow::ensure!(
                !agency_id.is_empty(),
                "An agency id is required (--agency-id or FEC_AGENCY_ID)"
            );
        }

        Config::builder(api_key, agency_id)
            .poll_interval(Duration::from_millis(self.poll_interval_ms))
            .poll_deadline(Duration::from_secs(self.poll_deadline_hours * 60 * 60))
            .build()
            .context("Invalid polling settings")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args() -> ServiceArgs {
        ServiceArgs {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            agency_id: None,
            poll_interval_ms: 5000,
            poll_deadline_hours: 8,
            request_timeout_secs: 60,
        }
    }

    #[test]
    fn test_upload_requires_credentials() {
        assert!(args().core_config(true).is_err());
        assert!(args().core_config(false).is_ok());

        let mut with_key = args();
        with_key.api_key = Some("key".to_string());
        with_key.agency_id = Some("agency".to_string());
        let config = with_key.core_config(true).unwrap();
        assert_eq!(config.poll_deadline(), Duration::from_secs(28_800));
    }

    #[test]
    fn test_client_config() {
        let config = args().client_config().unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(60));

        let mut bad = args();
        bad.endpoint = "not a url".to_string();
        assert!(bad.client_config().is_err());
    }
}
