//! Error taxonomy shared by every store backend.

use thiserror::Error;

/// Failure reported by a store operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The server could not be reached or the database could not be selected.
    #[error("connectivity error: {message}")]
    Connectivity { message: String },

    /// The server rejected a collection, index or document operation.
    #[error("persistence error: {message}")]
    Persistence { message: String },

    #[error("invalid analysis id '{id}'")]
    InvalidId { id: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl StoreError {
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Connectivity { .. } => "connectivity_error",
            StoreError::Persistence { .. } => "persistence_error",
            StoreError::InvalidId { .. } => "invalid_id",
            StoreError::Configuration { .. } => "configuration_error",
        }
    }

    /// Process exit status following the sysexits convention.
    pub fn exit_code(&self) -> u8 {
        match self {
            StoreError::Connectivity { .. } => 69,
            StoreError::Persistence { .. } | StoreError::InvalidId { .. } => 74,
            StoreError::Configuration { .. } => 78,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_exit_statuses_are_distinct_per_class() {
        let connectivity = StoreError::connectivity("server selection timed out");
        let persistence = StoreError::persistence("not authorized on sentiment_analysis");
        let config = StoreError::configuration("bad uri");

        assert_eq!(connectivity.code(), "connectivity_error");
        assert_eq!(connectivity.exit_code(), 69);
        assert_eq!(persistence.code(), "persistence_error");
        assert_eq!(persistence.exit_code(), 74);
        assert_eq!(config.exit_code(), 78);
    }

    #[test]
    fn display_carries_message() {
        let error = StoreError::invalid_id("zzz");
        assert_eq!(error.to_string(), "invalid analysis id 'zzz'");
        assert_eq!(error.exit_code(), 74);
    }
}
