//! # Error Module
//!
//! User-friendly error types for the duplicate cleaner.
//!
//! ## Design Principles
//! - **Never panic** on remote data - return errors instead
//! - **Include context** - endpoints, status codes, what went wrong
//! - **Scope matters** - the same gateway error is fatal for the group listing
//!   but only skips one asset or album inside a group

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Immich API error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),
}

/// Errors that occur while talking to the Immich server
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected HTTP {status} from {endpoint}: {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

/// Errors in the run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("--url is required (or set IMMICH_URL)")]
    MissingUrl,

    #[error("--api-key is required (or set IMMICH_API_KEY)")]
    MissingApiKey,

    #[error("Invalid server URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("API key contains characters that cannot be sent in a header")]
    InvalidApiKey,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors while choosing which duplicate to keep
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("No eligible asset among {candidates} candidates in group {group_id} (missing file size)")]
    NoEligibleCandidate { group_id: String, candidates: usize },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, CleanerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_includes_code_and_body() {
        let error = GatewayError::UnexpectedStatus {
            endpoint: "/api/duplicates".to_string(),
            status: 401,
            body: "Invalid API key".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Invalid API key"));
        assert!(message.contains("/api/duplicates"));
    }

    #[test]
    fn missing_settings_suggest_env_vars() {
        assert!(ConfigError::MissingUrl.to_string().contains("IMMICH_URL"));
        assert!(ConfigError::MissingApiKey.to_string().contains("IMMICH_API_KEY"));
    }

    #[test]
    fn selection_error_wraps_into_cleaner_error() {
        let error: CleanerError = SelectionError::NoEligibleCandidate {
            group_id: "dup-1".to_string(),
            candidates: 3,
        }
        .into();
        assert!(matches!(error, CleanerError::Selection(_)));
        assert!(error.to_string().contains("dup-1"));
    }
}
