//! Error types for hsx-core

use thiserror::Error;

/// Result type alias using hsx-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for hsx
#[derive(Error, Debug)]
pub enum Error {
    /// A role, deployment, service, or extension record does not exist
    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },

    /// An extension record with this id is already registered
    #[error("Extension id already registered: {id}")]
    DuplicateId { id: String },

    /// Every id in the rotation pool is still referenced by the configuration
    #[error(
        "No free extension id for {kind} in scope {scope}: all {pool_size} rotation slots are in use"
    )]
    PoolExhausted {
        scope: String,
        kind: String,
        pool_size: usize,
    },

    /// A candidate id is held by a record of a different extension kind
    #[error("Extension id {id} is held by {found}, refusing to replace it with {expected}")]
    TypeConflict {
        id: String,
        expected: String,
        found: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The management channel rejected or failed a call
    #[error("Management channel error: {message}")]
    Channel { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }

    /// Create a duplicate id error
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a pool exhausted error
    pub fn pool_exhausted(
        scope: impl Into<String>,
        kind: impl Into<String>,
        pool_size: usize,
    ) -> Self {
        Self::PoolExhausted {
            scope: scope.into(),
            kind: kind.into(),
            pool_size,
        }
    }

    /// Create a type conflict error
    pub fn type_conflict(
        id: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeConflict {
            id: id.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a channel error
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// True for errors that mean "the thing asked for is absent"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("role", "WebRole3");
        assert_eq!(err.to_string(), "role not found: WebRole3");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pool_exhausted_message() {
        let err = Error::pool_exhausted("Default", "Microsoft.Windows.Azure.Extensions.RDP", 2);
        let msg = err.to_string();
        assert!(msg.contains("scope Default"));
        assert!(msg.contains("all 2 rotation slots"));
        assert!(!err.is_not_found());
    }
}
