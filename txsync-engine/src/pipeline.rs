//! Sync orchestration: resource pairs × languages, then tags per pair.
//!
//! ## `run` protocol
//!
//! 1. Resolve main and release projects (fatal on failure).
//! 2. Pick languages: the requested one, or every main language.
//! 3. Best-effort add of main languages missing on release (logged, never fatal).
//! 4. Pair main resources with same-slug release resources (missing → notice).
//! 5. Per pair, per language: match → decide → one bulk update.
//! 6. Per pair: reconcile tags once.
//!
//! Every decision is logged before the write it leads to. With `dry_run` no
//! mutating store call is made.

use chrono::Utc;

use txsync_core::{
    LanguageId, Project, ProjectSlug, ResourceSlug, StoreError, SyncSettings, TranslationStore,
    TranslationUpdate,
};

use crate::error::SyncError;
use crate::matcher::{self, MatchedPair};
use crate::merge::{self, MergeStatus, NoOpReason};
use crate::report::{
    LanguageProvisioning, LanguageReport, PairReport, ResourcePair, RunReport, SkippedResource,
};
use crate::tags;

/// What to sync and how.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub settings: SyncSettings,
    /// Release name, e.g. `redwood`; case-insensitive.
    pub release_name: String,
    /// Restrict to one resource slug (case-insensitive).
    pub resource: Option<String>,
    /// Restrict to one language.
    pub language: Option<LanguageId>,
    pub dry_run: bool,
}

impl SyncRequest {
    pub fn new(settings: SyncSettings, release_name: impl Into<String>) -> Self {
        Self {
            settings,
            release_name: release_name.into(),
            resource: None,
            language: None,
            dry_run: false,
        }
    }
}

/// Resolved projects, languages and resource pairs; no translation data yet.
#[derive(Debug)]
pub struct SyncPlan {
    pub main: Project,
    pub release: Project,
    pub languages: Vec<LanguageId>,
    /// Languages in `languages` that main has and the release project lacks.
    pub missing_languages: Vec<LanguageId>,
    pub pairs: Vec<ResourcePair>,
    pub skipped: Vec<SkippedResource>,
}

// ---------------------------------------------------------------------------
// plan
// ---------------------------------------------------------------------------

/// Resolve everything `run` needs without reading translations or writing.
pub fn plan<S: TranslationStore>(store: &S, request: &SyncRequest) -> Result<SyncPlan, SyncError> {
    let main = resolve_project(store, &request.settings.main_project)?;
    let release = resolve_project(
        store,
        &request.settings.release_project(&request.release_name),
    )?;

    let main_languages = store.list_languages(&main)?;
    let languages = match &request.language {
        Some(language) => vec![language.clone()],
        None => main_languages.clone(),
    };
    tracing::info!(
        "languages: {}",
        languages.iter().map(LanguageId::code).collect::<Vec<_>>().join(", ")
    );

    // Only languages main actually carries are ever added to release.
    let release_languages = store.list_languages(&release)?;
    let missing_languages = languages
        .iter()
        .filter(|l| main_languages.contains(l) && !release_languages.contains(l))
        .cloned()
        .collect();

    tracing::info!("verifying sync plan...");
    let resolutions: Vec<(ResourceSlug, Result<_, StoreError>)> = store
        .list_resources(&main)?
        .into_iter()
        .filter(|main_resource| match &request.resource {
            Some(wanted) => main_resource.slug.matches(wanted),
            None => true,
        })
        .map(|main_resource| {
            let slug = main_resource.slug.clone();
            let resolved = store
                .get_resource(&release, &main_resource.slug)
                .map(|release_resource| ResourcePair {
                    main: main_resource,
                    release: release_resource,
                });
            (slug, resolved)
        })
        .collect();

    let mut pairs = Vec::new();
    let mut skipped = Vec::new();
    for (slug, resolved) in resolutions {
        match resolved {
            Ok(pair) => {
                tracing::info!("planning to sync \"{}\" --> \"{}\"", pair.main.id, pair.release.id);
                pairs.push(pair);
            }
            Err(error) => {
                tracing::warn!(
                    "NOTICE: skipping resource {slug} because it does not exist in \"{}\": {error}",
                    release.slug
                );
                skipped.push(SkippedResource { slug, error });
            }
        }
    }

    Ok(SyncPlan {
        main,
        release,
        languages,
        missing_languages,
        pairs,
        skipped,
    })
}

fn resolve_project<S: TranslationStore>(store: &S, slug: &ProjectSlug) -> Result<Project, SyncError> {
    store.get_project(slug).map_err(|source| {
        tracing::error!("project not found: {slug}: {source}");
        SyncError::ProjectResolution {
            slug: slug.clone(),
            source,
        }
    })
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Plan and execute a full sync.
pub fn run<S: TranslationStore>(store: &S, request: &SyncRequest) -> Result<RunReport, SyncError> {
    let started_at = Utc::now();
    let plan = plan(store, request)?;
    let dry_run = request.dry_run;

    let provisioning = provision_languages(store, &plan.release, &plan.missing_languages, dry_run);

    let mut pairs = Vec::with_capacity(plan.pairs.len());
    for pair in plan.pairs {
        pairs.push(sync_pair(store, pair, &plan.languages, dry_run)?);
    }

    Ok(RunReport {
        main: plan.main,
        release: plan.release,
        dry_run,
        languages: plan.languages,
        provisioning,
        skipped: plan.skipped,
        pairs,
        started_at,
        finished_at: Utc::now(),
    })
}

/// Add each missing language to `release`, collecting every outcome.
pub fn provision_languages<S: TranslationStore>(
    store: &S,
    release: &Project,
    missing: &[LanguageId],
    dry_run: bool,
) -> Vec<LanguageProvisioning> {
    missing
        .iter()
        .map(|language| {
            if dry_run {
                tracing::info!("[dry-run] would add missing language {language} to {}", release.slug);
                return LanguageProvisioning {
                    language: language.clone(),
                    result: Ok(()),
                };
            }
            tracing::info!("adding missing language {language} to {}", release.slug);
            let result = store.create_language(release, language);
            if let Err(err) = &result {
                tracing::warn!("could not add language {language} to {}: {err}", release.slug);
            }
            LanguageProvisioning {
                language: language.clone(),
                result,
            }
        })
        .collect()
}

/// Sync every language of one resource pair, then its tags.
pub fn sync_pair<S: TranslationStore>(
    store: &S,
    pair: ResourcePair,
    languages: &[LanguageId],
    dry_run: bool,
) -> Result<PairReport, SyncError> {
    tracing::info!("syncing {} --> {}...", pair.main.name, pair.release.name);

    let mut reports = Vec::with_capacity(languages.len());
    for language in languages {
        reports.push(sync_language(store, &pair, language, dry_run)?);
    }

    tracing::info!("syncing tags...");
    let tags = tags::reconcile_tags(store, &pair.main, &pair.release, dry_run)?;

    Ok(PairReport {
        pair,
        languages: reports,
        tags,
    })
}

/// Propagate review metadata for one (resource pair, language) unit.
///
/// Both sides are fetched before any write; all `Update` payloads go out in
/// a single bulk call.
pub fn sync_language<S: TranslationStore>(
    store: &S,
    pair: &ResourcePair,
    language: &LanguageId,
    dry_run: bool,
) -> Result<LanguageReport, StoreError> {
    tracing::info!(" syncing {language} ...");

    let main_index = matcher::index(store.get_translations(&pair.main, language)?);
    let matched = matcher::match_entries(
        &main_index,
        store.get_translations(&pair.release, language)?,
    );

    let mut report = LanguageReport {
        language: language.clone(),
        matched: matched.pairs.len(),
        unmatched: matched.unmatched,
        diverged: 0,
        updates: Vec::new(),
        applied: false,
    };

    for MatchedPair { release, main } in matched.pairs {
        let decision = merge::decide(&main, &release, dry_run);
        match decision.status {
            MergeStatus::NoOp(NoOpReason::ContentDiverged) => report.diverged += 1,
            MergeStatus::NoOp(NoOpReason::AlreadyInSync) => {}
            MergeStatus::Update | MergeStatus::UpdateDryRun => report.updates.push(TranslationUpdate {
                id: release.id,
                attributes: decision.payload,
            }),
        }
    }

    if !report.updates.is_empty() && !dry_run {
        store.bulk_update_translations(&report.updates)?;
        report.applied = true;
    }

    tracing::info!(" finished {language}");
    Ok(report)
}
