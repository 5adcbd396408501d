//! The remote translation-store capability consumed by the sync engine.

use crate::error::StoreError;
use crate::types::{
    LanguageId, Project, ProjectSlug, Resource, ResourceSlug, ResourceString, ResourceStringId,
    TranslationEntry, TranslationUpdate,
};

/// Read and write operations the reconciliation engine needs from a store.
///
/// Calls are blocking. Implementations that keep state take care of their own
/// interior mutability; the engine only ever holds a shared reference.
pub trait TranslationStore {
    fn get_project(&self, slug: &ProjectSlug) -> Result<Project, StoreError>;

    fn get_resource(&self, project: &Project, slug: &ResourceSlug) -> Result<Resource, StoreError>;

    fn list_resources(&self, project: &Project) -> Result<Vec<Resource>, StoreError>;

    fn list_languages(&self, project: &Project) -> Result<Vec<LanguageId>, StoreError>;

    /// Every translation of `resource` in `language`, in store order.
    fn get_translations(
        &self,
        resource: &Resource,
        language: &LanguageId,
    ) -> Result<Vec<TranslationEntry>, StoreError>;

    /// Apply metadata-only updates. Content is never part of the payload.
    fn bulk_update_translations(&self, updates: &[TranslationUpdate]) -> Result<(), StoreError>;

    fn list_resource_strings(&self, resource: &Resource) -> Result<Vec<ResourceString>, StoreError>;

    /// Replace the tag set of one source string.
    fn update_resource_string_tags(
        &self,
        string: &ResourceStringId,
        tags: &[String],
    ) -> Result<(), StoreError>;

    fn create_language(&self, project: &Project, language: &LanguageId) -> Result<(), StoreError>;
}
