//! # txsync-transifex
//!
//! [`TransifexClient`] implements [`txsync_core::TranslationStore`] over the
//! Transifex REST API v3 (JSON:API, bearer token, blocking `ureq`).
//!
//! ```rust,no_run
//! use txsync_core::{credentials, SyncSettings, TranslationStore};
//! use txsync_transifex::TransifexClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SyncSettings::default();
//! let client = TransifexClient::new(&settings, credentials::resolve_token()?);
//! let main = client.get_project(&settings.main_project)?;
//! println!("{} languages", client.list_languages(&main)?.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
mod jsonapi;

pub use client::{TransifexClient, BULK_LIMIT};
