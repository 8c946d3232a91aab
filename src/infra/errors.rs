// src/infra/errors.rs — Error types for visitlog

use thiserror::Error;

/// Expected, recoverable outcomes of registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Session '{session_id}' not found")]
    NotFound { session_id: String },

    #[error("Session '{session_id}' has no visits yet")]
    Empty { session_id: String },
}

impl RegistryError {
    pub fn not_found(session_id: &str) -> Self {
        RegistryError::NotFound {
            session_id: session_id.to_string(),
        }
    }

    pub fn empty(session_id: &str) -> Self {
        RegistryError::Empty {
            session_id: session_id.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}
