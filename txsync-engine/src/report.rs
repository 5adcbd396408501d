//! Run reports returned by the sync pipeline.

use chrono::{DateTime, Utc};

use txsync_core::{LanguageId, Project, Resource, ResourceSlug, StoreError, TranslationUpdate};

use crate::tags::TagReport;

/// A main resource and its equivalently-slugged release resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePair {
    pub main: Resource,
    pub release: Resource,
}

/// A main resource with no usable release counterpart.
#[derive(Debug)]
pub struct SkippedResource {
    pub slug: ResourceSlug,
    pub error: StoreError,
}

/// Outcome of adding one missing language to the release project.
#[derive(Debug)]
pub struct LanguageProvisioning {
    pub language: LanguageId,
    /// `Ok` in dry-run too; nothing was attempted then.
    pub result: Result<(), StoreError>,
}

/// Translation metadata outcome for one (resource pair, language) unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    pub language: LanguageId,
    /// Release entries with a main counterpart.
    pub matched: usize,
    /// Release entries with no main counterpart; left alone.
    pub unmatched: usize,
    /// Matched entries whose content differs; left alone.
    pub diverged: usize,
    /// Updates staged for this unit, submitted iff `applied`.
    pub updates: Vec<TranslationUpdate>,
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairReport {
    pub pair: ResourcePair,
    pub languages: Vec<LanguageReport>,
    pub tags: TagReport,
}

impl PairReport {
    pub fn update_count(&self) -> usize {
        self.languages.iter().map(|l| l.updates.len()).sum()
    }
}

/// Everything a run decided and did.
#[derive(Debug)]
pub struct RunReport {
    pub main: Project,
    pub release: Project,
    pub dry_run: bool,
    pub languages: Vec<LanguageId>,
    pub provisioning: Vec<LanguageProvisioning>,
    pub skipped: Vec<SkippedResource>,
    pub pairs: Vec<PairReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn update_count(&self) -> usize {
        self.pairs.iter().map(PairReport::update_count).sum()
    }

    pub fn tag_overwrite_count(&self) -> usize {
        self.pairs.iter().map(|p| p.tags.overwrites.len()).sum()
    }

    /// `true` when something was skipped or failed without aborting the run.
    pub fn has_notices(&self) -> bool {
        !self.skipped.is_empty() || self.provisioning.iter().any(|p| p.result.is_err())
    }
}
