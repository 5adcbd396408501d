//! Error types for txsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by a [`crate::store::TranslationStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested object does not exist in the store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The store answered with a non-success status.
    #[error("store API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("store transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("failed to decode store response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Errors from loading settings or credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `TRANSIFEX_API_TOKEN` nor `~/.transifexrc` provided a token.
    #[error(
        "no auth token found; set TRANSIFEX_API_TOKEN or add a password to the \
         [https://www.transifex.com] section of ~/.transifexrc"
    )]
    AuthenticationMissing,

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file exists but is not valid YAML for [`crate::config::SyncSettings`].
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
