//! Subcommand implementations.

pub mod plan;
pub mod sync;

use anyhow::{Context, Result};
use clap::Args;

use txsync_core::{config, credentials, LanguageId, SyncSettings};
use txsync_engine::SyncRequest;
use txsync_transifex::TransifexClient;

/// Arguments shared by `sync` and `plan`.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Release name in lower case, e.g. `redwood`.
    pub release_name: String,

    /// Only this resource slug, e.g. `frontend-app-learning` (case-insensitive).
    #[arg(long)]
    pub resource: Option<String>,

    /// Only this language code, e.g. `ar` or `zh_CN`.
    #[arg(long)]
    pub language: Option<String>,
}

impl TargetArgs {
    pub fn request(&self, settings: SyncSettings, dry_run: bool) -> SyncRequest {
        let mut request = SyncRequest::new(settings, self.release_name.to_lowercase());
        request.resource = self.resource.clone().filter(|r| !r.is_empty());
        request.language = self
            .language
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(LanguageId::parse);
        request.dry_run = dry_run;
        request
    }
}

/// Load settings and credentials, and build the Transifex client.
pub fn connect() -> Result<(SyncSettings, TransifexClient)> {
    let settings = config::load().context("failed to load ~/.txsync/config.yaml")?;
    let token = credentials::resolve_token().context("cannot authenticate with Transifex")?;
    let client = TransifexClient::new(&settings, token);
    Ok((settings, client))
}
