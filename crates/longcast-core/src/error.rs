//! Error types for longcast-core.
//!
//! Classification, quota evaluation and draft migration never fail. The
//! errors here belong to the edges: loading configuration, parsing names
//! typed by a user, and reading draft files.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// A setting has a value longcast cannot use.
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        /// Name of the offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised when resolving plan names.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    /// An unknown tier name was provided.
    #[error("unknown tier: {name}. Use: {available}")]
    UnknownTier {
        /// The tier name that was requested.
        name: String,
        /// Comma-separated list of available tier names.
        available: String,
    },
}

/// Result type alias using [`PlanError`].
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can occur when reading or writing draft files.
#[derive(Error, Debug)]
pub enum DraftError {
    /// The draft file could not be read or written.
    #[error("failed to access draft file {path}")]
    Io {
        /// Path of the draft file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The draft file is not a JSON array of draft objects.
    #[error("draft file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`DraftError`].
pub type DraftResult<T> = Result<T, DraftError>;
