//! `txsync plan`: show what a sync would touch without reading translations.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use txsync_engine::{pipeline, SyncPlan};

use super::TargetArgs;

/// Arguments for `txsync plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let (settings, client) = super::connect()?;
        let request = self.target.request(settings, true);
        let plan = pipeline::plan(&client, &request).with_context(|| {
            format!("could not plan release '{}'", request.release_name)
        })?;
        for line in render(&plan) {
            println!("{line}");
        }
        Ok(())
    }
}

fn render(plan: &SyncPlan) -> Vec<String> {
    let mut lines = vec![format!(
        "{} '{}' --> '{}'",
        "plan".bold(),
        plan.main.slug,
        plan.release.slug
    )];

    let languages: Vec<String> = plan.languages.iter().map(ToString::to_string).collect();
    lines.push(format!("  languages: {}", languages.join(", ")));
    if !plan.missing_languages.is_empty() {
        let missing: Vec<String> = plan
            .missing_languages
            .iter()
            .map(ToString::to_string)
            .collect();
        lines.push(format!(
            "  {}  missing on release: {}",
            "+".yellow(),
            missing.join(", ")
        ));
    }

    for pair in &plan.pairs {
        lines.push(format!("  ~  {} --> {}", pair.main.id, pair.release.id));
    }
    for skipped in &plan.skipped {
        lines.push(format!(
            "  {}  NOTICE: skipped {} ({})",
            "·".dimmed(),
            skipped.slug,
            skipped.error
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use txsync_core::{MemoryStore, ProjectSlug, SyncSettings};
    use txsync_engine::SyncRequest;

    #[test]
    fn render_lists_pairs_missing_languages_and_notices() {
        colored::control::set_override(false);

        let store = MemoryStore::new("open-edx");
        store.add_project("main", &["ar", "fr"]);
        store.add_project("main-teak", &["ar"]);
        store.add_resource("main", "frontend-app-learning");
        store.add_resource("main", "AudioXBlock");
        store.add_resource("main-teak", "frontend-app-learning");

        let settings = SyncSettings {
            main_project: ProjectSlug::from("main"),
            release_project_template: "main-{release_name}".to_string(),
            ..SyncSettings::default()
        };
        let plan = pipeline::plan(&store, &SyncRequest::new(settings, "teak")).unwrap();
        let lines = render(&plan);

        assert_eq!(lines[0], "plan 'main' --> 'main-teak'");
        assert_eq!(lines[1], "  languages: ar, fr");
        assert_eq!(lines[2], "  +  missing on release: fr");
        assert!(lines[3].contains("frontend-app-learning"));
        assert!(lines[4].contains("NOTICE: skipped AudioXBlock"));
        assert_eq!(lines.len(), 5);
    }
}
