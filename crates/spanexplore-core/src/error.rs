//! Error types for SpanExplore

use thiserror::Error;

/// Result type alias using SpanExplore's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SpanExplore operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// An aggregate query param carried JSON that could not be parsed
    #[error("Malformed JSON in `{key}` query param: {source}")]
    MalformedAggregate {
        /// Query key holding the bad payload
        key: &'static str,
        /// Underlying parse failure
        #[source]
        source: serde_json::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed aggregate error for the given query key
    pub fn malformed_aggregate(key: &'static str, source: serde_json::Error) -> Self {
        Self::MalformedAggregate { key, source }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedAggregate { .. } | Self::Validation(_))
    }
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(Error::malformed_aggregate("visualize", parse_err).is_client_error());
        assert!(Error::validation("bad").is_client_error());

        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        assert!(!Error::from(io_err).is_client_error());
        assert!(!Error::Config("missing".to_string()).is_client_error());
    }
}
