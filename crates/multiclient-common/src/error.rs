use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MulticlientError {
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config contains no liteservers")]
    NoLiteServers,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No eligible liteserver for request")]
    NoEligibleWorkers,

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Multiclient has shut down")]
    Shutdown,
}

impl MulticlientError {
    /// Whether the error is a transient condition a caller may retry.
    ///
    /// Startup and contract errors are permanent; an empty route, a probe
    /// timeout or a connection failure may clear up on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MulticlientError::NoEligibleWorkers
                | MulticlientError::Timeout(_)
                | MulticlientError::Client(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MulticlientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(MulticlientError::NoEligibleWorkers.is_retryable());
        assert!(MulticlientError::Timeout(5000).is_retryable());
        assert!(MulticlientError::Client("connection reset".to_string()).is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!MulticlientError::NoLiteServers.is_retryable());
        assert!(!MulticlientError::InvalidRequest("bad".to_string()).is_retryable());
        assert!(!MulticlientError::InvalidConfig("bad".to_string()).is_retryable());
        assert!(!MulticlientError::Shutdown.is_retryable());
    }

    #[test]
    fn test_config_read_message_includes_path() {
        let err = MulticlientError::ConfigRead {
            path: PathBuf::from("/etc/ton/global.config.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/ton/global.config.json"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(
            MulticlientError::Timeout(250).to_string(),
            "Request timeout after 250ms"
        );
    }
}
