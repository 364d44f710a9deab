//! Submission configuration.

use crate::error::{Error, Result};
use crate::submission::REDACTION_MARKER;
use std::fmt;
use std::time::Duration;

/// Default time between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Default ceiling on how long a submission is polled.
pub const DEFAULT_POLL_DEADLINE: Duration = Duration::from_secs(8 * 60 * 60);

/// Process-wide settings shared by every submission.
///
/// Built through [`ConfigBuilder`], which guarantees a non-zero polling
/// interval.
#[derive(Clone)]
pub struct Config {
    api_key: String,
    agency_id: String,
    poll_interval: Duration,
    poll_deadline: Duration,
}

impl Config {
    /// Creates a configuration with default polling settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>, agency_id: impl Into<String>) -> Self {
        Self::builder(api_key, agency_id).build_unchecked()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(api_key: impl Into<String>, agency_id: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(api_key, agency_id)
    }

    /// API key issued by the FEC to the filing software vendor.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Agency identifier sent with every upload.
    #[must_use]
    pub fn agency_id(&self) -> &str {
        &self.agency_id
    }

    /// Time between status checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// How long to keep polling a submission that is still processing.
    #[must_use]
    pub const fn poll_deadline(&self) -> Duration {
        self.poll_deadline
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &REDACTION_MARKER)
            .field("agency_id", &self.agency_id)
            .field("poll_interval", &self.poll_interval)
            .field("poll_deadline", &self.poll_deadline)
            .finish()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    api_key: String,
    agency_id: String,
    poll_interval: Duration,
    poll_deadline: Duration,
}

impl ConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(api_key: impl Into<String>, agency_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            agency_id: agency_id.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_deadline: DEFAULT_POLL_DEADLINE,
        }
    }

    /// Sets the time between status checks.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the polling deadline.
    #[must_use]
    pub const fn poll_deadline(mut self, deadline: Duration) -> Self {
        self.poll_deadline = deadline;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the polling interval is zero.
    pub fn build(self) -> Result<Config> {
        if self.poll_interval.is_zero() {
            return Err(Error::Config("Polling interval must be positive".to_string()));
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> Config {
        Config {
            api_key: self.api_key,
            agency_id: self.agency_id,
            poll_interval: self.poll_interval,
            poll_deadline: self.poll_deadline,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = Config::new("key", "agency");
        assert_eq!(config.api_key(), "key");
        assert_eq!(config.agency_id(), "agency");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.poll_deadline(), Duration::from_secs(28_800));
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder("key", "agency")
            .poll_interval(Duration::from_secs(1))
            .poll_deadline(Duration::from_secs(60))
            .build()
            .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.poll_deadline(), Duration::from_secs(60));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = Config::builder("key", "agency")
            .poll_interval(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let debug = format!("{:?}", Config::new("secret-api-key", "agency"));
        assert!(!debug.contains("secret-api-key"));
        assert!(debug.contains("agency"));
    }
}
