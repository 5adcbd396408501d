//! `txsync sync`: propagate review metadata and tags into a release project.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use txsync_core::TranslationStore;
use txsync_engine::{pipeline, RunReport, SyncRequest};

use super::TargetArgs;

/// Arguments for `txsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Report what would change without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let (settings, client) = super::connect()?;
        let request = self.target.request(settings, self.dry_run);
        let report = execute(&client, &request)?;

        if self.json {
            let view = RunView::from(&report);
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

fn execute<S: TranslationStore>(store: &S, request: &SyncRequest) -> Result<RunReport> {
    pipeline::run(store, request).with_context(|| {
        format!(
            "sync failed for release '{}'",
            request.release_name
        )
    })
}

// ---------------------------------------------------------------------------
// JSON view
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct RunView {
    main_project: String,
    release_project: String,
    dry_run: bool,
    languages: Vec<String>,
    summary: SummaryView,
    provisioning: Vec<ProvisioningView>,
    skipped: Vec<SkippedView>,
    resources: Vec<PairView>,
    started_at: chrono::DateTime<chrono::Utc>,
    finished_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
struct SummaryView {
    resources: usize,
    updates: usize,
    tag_overwrites: usize,
    skipped: usize,
    completed_with_notices: bool,
}

#[derive(Debug, Serialize)]
struct ProvisioningView {
    language: String,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct SkippedView {
    resource: String,
    reason: String,
}

#[derive(Debug, Serialize)]
struct PairView {
    main: String,
    release: String,
    languages: Vec<LanguageView>,
    tag_overwrites: Vec<TagView>,
}

#[derive(Debug, Serialize)]
struct LanguageView {
    language: String,
    matched: usize,
    unmatched: usize,
    diverged: usize,
    updates: usize,
    applied: bool,
}

#[derive(Debug, Serialize)]
struct TagView {
    string: String,
    from: Vec<String>,
    to: Vec<String>,
}

impl From<&RunReport> for RunView {
    fn from(report: &RunReport) -> Self {
        RunView {
            main_project: report.main.slug.to_string(),
            release_project: report.release.slug.to_string(),
            dry_run: report.dry_run,
            languages: report.languages.iter().map(ToString::to_string).collect(),
            summary: SummaryView {
                resources: report.pairs.len(),
                updates: report.update_count(),
                tag_overwrites: report.tag_overwrite_count(),
                skipped: report.skipped.len(),
                completed_with_notices: report.has_notices(),
            },
            provisioning: report
                .provisioning
                .iter()
                .map(|p| ProvisioningView {
                    language: p.language.to_string(),
                    error: p.result.as_ref().err().map(ToString::to_string),
                })
                .collect(),
            skipped: report
                .skipped
                .iter()
                .map(|s| SkippedView {
                    resource: s.slug.to_string(),
                    reason: s.error.to_string(),
                })
                .collect(),
            resources: report
                .pairs
                .iter()
                .map(|p| PairView {
                    main: p.pair.main.id.clone(),
                    release: p.pair.release.id.clone(),
                    languages: p
                        .languages
                        .iter()
                        .map(|l| LanguageView {
                            language: l.language.to_string(),
                            matched: l.matched,
                            unmatched: l.unmatched,
                            diverged: l.diverged,
                            updates: l.updates.len(),
                            applied: l.applied,
                        })
                        .collect(),
                    tag_overwrites: p
                        .tags
                        .overwrites
                        .iter()
                        .map(|o| TagView {
                            string: o.string.to_string(),
                            from: o.from.clone(),
                            to: o.to.clone(),
                        })
                        .collect(),
                })
                .collect(),
            started_at: report.started_at,
            finished_at: report.finished_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Human output
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct PairRow {
    #[tabled(rename = "resource")]
    resource: String,
    #[tabled(rename = "languages")]
    languages: usize,
    #[tabled(rename = "updates")]
    updates: usize,
    #[tabled(rename = "diverged")]
    diverged: usize,
    #[tabled(rename = "tag overwrites")]
    tag_overwrites: usize,
}

fn print_report(report: &RunReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    println!(
        "{prefix}{} '{}' --> '{}'",
        "sync".bold(),
        report.main.slug,
        report.release.slug
    );

    for p in &report.provisioning {
        match &p.result {
            Ok(()) if report.dry_run => println!("  ~  would add language {}", p.language),
            Ok(()) => println!("  {}  added language {}", "+".green(), p.language),
            Err(err) => println!(
                "  {}  could not add language {}: {err}",
                "!".yellow(),
                p.language
            ),
        }
    }

    for s in &report.skipped {
        println!(
            "  {}  NOTICE: skipped {} ({})",
            "·".dimmed(),
            s.slug,
            s.error
        );
    }

    if report.pairs.is_empty() {
        println!("{prefix}{} nothing to sync", "✓".green());
        print_notices(report);
        return;
    }

    let rows: Vec<PairRow> = report
        .pairs
        .iter()
        .map(|p| PairRow {
            resource: p.pair.release.slug.to_string(),
            languages: p.languages.len(),
            updates: p.update_count(),
            diverged: p.languages.iter().map(|l| l.diverged).sum(),
            tag_overwrites: p.tags.overwrites.len(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    for p in &report.pairs {
        for o in &p.tags.overwrites {
            println!(
                "  {}  {} tags {:?} -> {:?}",
                "✎".cyan(),
                o.string,
                o.from,
                o.to
            );
        }
    }

    let verb = if report.dry_run { "would update" } else { "updated" };
    let elapsed = report.finished_at - report.started_at;
    println!(
        "{prefix}{} {verb} {} translations and {} tag sets in {}ms",
        "✓".green(),
        report.update_count(),
        report.tag_overwrite_count(),
        elapsed.num_milliseconds()
    );
    print_notices(report);
}

fn print_notices(report: &RunReport) {
    if let Some(line) = notice_summary(report) {
        println!("{}", line.as_str().yellow());
    }
}

/// Closing line for a run that finished but skipped or failed some units.
fn notice_summary(report: &RunReport) -> Option<String> {
    if !report.has_notices() {
        return None;
    }
    let failed = report
        .provisioning
        .iter()
        .filter(|p| p.result.is_err())
        .count();
    Some(format!(
        "completed with notices: {} resource(s) skipped, {failed} language(s) not added",
        report.skipped.len()
    ))
}
