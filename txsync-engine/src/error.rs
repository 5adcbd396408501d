//! Error types for txsync-engine.

use thiserror::Error;

use txsync_core::{ProjectSlug, StoreError};

/// Errors that abort a sync run.
///
/// Recoverable per-unit failures (language provisioning, release resource
/// resolution) never surface here; they are collected in the run report.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The main or release project could not be resolved.
    #[error("project {slug} could not be resolved: {source}")]
    ProjectResolution {
        slug: ProjectSlug,
        #[source]
        source: StoreError,
    },

    /// Any other store failure while reading or writing a sync unit.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
