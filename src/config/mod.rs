//! # Config Module
//!
//! Immutable run configuration, validated once at startup and passed
//! explicitly into every operation.

use crate::error::ConfigError;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Default timeout for every Immich API call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Validated configuration for a cleaner run
#[derive(Clone, Serialize)]
pub struct CleanerConfig {
    /// Base URL of the Immich server, without trailing slash
    pub server_url: String,
    /// API key sent as `x-api-key`
    #[serde(skip)]
    pub api_key: String,
    /// Delete lower-quality duplicates after album sync
    pub auto_delete: bool,
    /// Preview mode - log intended writes and deletions only
    pub dry_run: bool,
    /// Skip the confirmation prompt before deleting
    pub assume_yes: bool,
    /// Log album assignments and winner details
    pub verbose: bool,
    /// Timeout applied to each API call
    pub timeout: Duration,
}

impl std::fmt::Debug for CleanerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanerConfig")
            .field("server_url", &self.server_url)
            .field("api_key", &"<redacted>")
            .field("auto_delete", &self.auto_delete)
            .field("dry_run", &self.dry_run)
            .field("assume_yes", &self.assume_yes)
            .field("verbose", &self.verbose)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CleanerConfig {
    /// Start building a configuration
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }
}

/// Builder for [`CleanerConfig`]
///
/// Missing URL or API key is reported by [`CleanerConfigBuilder::build`]
/// rather than at parse time so both surface as configuration errors.
#[derive(Debug, Clone)]
pub struct CleanerConfigBuilder {
    server_url: Option<String>,
    api_key: Option<String>,
    auto_delete: bool,
    dry_run: bool,
    assume_yes: bool,
    verbose: bool,
    timeout: Duration,
}

impl Default for CleanerConfigBuilder {
    fn default() -> Self {
        Self {
            server_url: None,
            api_key: None,
            auto_delete: false,
            dry_run: false,
            assume_yes: false,
            verbose: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CleanerConfigBuilder {
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn auto_delete(mut self, enabled: bool) -> Self {
        self.auto_delete = enabled;
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn assume_yes(mut self, enabled: bool) -> Self {
        self.assume_yes = enabled;
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> Result<CleanerConfig, ConfigError> {
        let raw_url = self
            .server_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        let api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let parsed = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidUrl {
            url: raw_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: raw_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(CleanerConfig {
            server_url: raw_url.trim_end_matches('/').to_string(),
            api_key,
            auto_delete: self.auto_delete,
            dry_run: self.dry_run,
            assume_yes: self.assume_yes,
            verbose: self.verbose,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_builds() {
        let config = CleanerConfig::builder()
            .server_url("http://localhost:2283")
            .api_key("test-key")
            .build()
            .unwrap();

        assert_eq!(config.server_url, "http://localhost:2283");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.auto_delete);
    }

    #[test]
    fn trailing_slash_is_removed() {
        let config = CleanerConfig::builder()
            .server_url("http://localhost:2283/")
            .api_key("test-key")
            .build()
            .unwrap();

        assert_eq!(config.server_url, "http://localhost:2283");
    }

    #[test]
    fn missing_url_is_rejected() {
        let result = CleanerConfig::builder().api_key("test-key").build();
        assert!(matches!(result, Err(ConfigError::MissingUrl)));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let result = CleanerConfig::builder()
            .server_url("http://localhost:2283")
            .api_key("   ")
            .build();
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let result = CleanerConfig::builder()
            .server_url("ftp://photos.local")
            .api_key("test-key")
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = CleanerConfig::builder()
            .server_url("http://localhost:2283")
            .api_key("super-secret")
            .build()
            .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
