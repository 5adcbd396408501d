//! txsync core library: domain types, the store capability, settings, errors.
//!
//! - [`types`]: newtypes and domain structs
//! - [`store`]: [`TranslationStore`], the remote store seen by the engine
//! - [`memory`]: [`MemoryStore`], an in-memory store for tests
//! - [`config`] / [`credentials`]: settings file and API token lookup
//! - [`error`]: [`StoreError`], [`ConfigError`]

pub mod config;
pub mod credentials;
pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use config::SyncSettings;
pub use error::{ConfigError, StoreError};
pub use memory::{MemoryStore, StoreWrite};
pub use store::TranslationStore;
pub use types::{
    EntryIdentity, LanguageId, MetadataUpdate, Project, ProjectSlug, Resource, ResourceSlug,
    ResourceString, ResourceStringId, StringHash, TranslationEntry, TranslationId,
    TranslationUpdate,
};
