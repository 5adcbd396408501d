//! Metadata merge decision for one matched entry pair.
//!
//! Rules:
//! 1. Content differs → no-op. Review flags only travel with identical text.
//! 2. Only positive main-side flags propagate; a release flag is never cleared.
//! 3. Dry-run computes the same payload but marks it as not to be submitted.

use txsync_core::{MetadataUpdate, TranslationEntry};

/// Why a pair produced no update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// `strings` differ between main and release.
    ContentDiverged,
    /// Content matches and release already carries every main flag.
    AlreadyInSync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    NoOp(NoOpReason),
    /// Payload must be submitted.
    Update,
    /// Payload computed for reporting only.
    UpdateDryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeDecision {
    pub status: MergeStatus,
    pub payload: MetadataUpdate,
}

impl MergeDecision {
    fn no_op(reason: NoOpReason) -> Self {
        Self {
            status: MergeStatus::NoOp(reason),
            payload: MetadataUpdate::default(),
        }
    }
}

/// Decide whether `release` should take metadata from `main`.
pub fn decide(main: &TranslationEntry, release: &TranslationEntry, dry_run: bool) -> MergeDecision {
    let identity = release.identity();

    if main.strings != release.strings {
        tracing::info!("{identity} has different translations; will not update it");
        return MergeDecision::no_op(NoOpReason::ContentDiverged);
    }

    let payload = MetadataUpdate {
        reviewed: propagate(main.reviewed, release.reviewed),
        proofread: propagate(main.proofread, release.proofread),
    };

    if payload.is_empty() {
        return MergeDecision::no_op(NoOpReason::AlreadyInSync);
    }

    if dry_run {
        tracing::info!("[dry-run] {identity} {payload}");
        MergeDecision {
            status: MergeStatus::UpdateDryRun,
            payload,
        }
    } else {
        tracing::info!("{identity} {payload}");
        MergeDecision {
            status: MergeStatus::Update,
            payload,
        }
    }
}

fn propagate(main: bool, release: bool) -> Option<bool> {
    (main && main != release).then_some(main)
}
