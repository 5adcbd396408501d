//! # txsync-engine
//!
//! Reconciles review metadata and tags from a main translation project into
//! a release project forked from it.
//!
//! Call [`pipeline::run`] for a full sync, or [`pipeline::plan`] to resolve
//! projects and resource pairs without touching translations.

pub mod error;
pub mod matcher;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod tags;

pub use error::SyncError;
pub use merge::{decide, MergeDecision, MergeStatus, NoOpReason};
pub use pipeline::{plan, run, SyncPlan, SyncRequest};
pub use report::{
    LanguageProvisioning, LanguageReport, PairReport, ResourcePair, RunReport, SkippedResource,
};
pub use tags::{plan_tag_overwrites, reconcile_tags, TagOverwrite, TagReport};
