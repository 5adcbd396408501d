//! In-memory [`TranslationStore`] for tests and offline runs.
//!
//! Writes are applied to the held state, so a second sync observes the first
//! one's effect, and are also recorded in order as [`StoreWrite`]s.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;
use crate::store::TranslationStore;
use crate::types::{
    LanguageId, Project, ProjectSlug, Resource, ResourceSlug, ResourceString, ResourceStringId,
    TranslationEntry, TranslationUpdate,
};

/// A mutating call received by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    BulkUpdate(Vec<TranslationUpdate>),
    Tags {
        string: ResourceStringId,
        tags: Vec<String>,
    },
    CreateLanguage {
        project: ProjectSlug,
        language: LanguageId,
    },
}

#[derive(Debug, Default)]
struct ResourceState {
    resource: Option<Resource>,
    translations: BTreeMap<LanguageId, Vec<TranslationEntry>>,
    strings: Vec<ResourceString>,
}

#[derive(Debug)]
struct ProjectState {
    project: Project,
    languages: Vec<LanguageId>,
    resources: Vec<ResourceState>,
}

#[derive(Debug, Default)]
struct State {
    projects: BTreeMap<ProjectSlug, ProjectState>,
    writes: Vec<StoreWrite>,
    fail_language_creation: bool,
}

#[derive(Debug)]
pub struct MemoryStore {
    organization: String,
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new(organization: &str) -> Self {
        Self {
            organization: organization.to_string(),
            state: Mutex::new(State::default()),
        }
    }

    /// Register a project with its configured languages (`ar` or `l:ar`).
    pub fn add_project(&self, slug: &str, languages: &[&str]) -> Project {
        let slug = ProjectSlug::from(slug);
        let project = Project {
            id: Project::api_id(&self.organization, &slug),
            slug: slug.clone(),
            name: slug.0.clone(),
        };
        self.lock().projects.insert(
            slug,
            ProjectState {
                project: project.clone(),
                languages: languages.iter().map(|l| LanguageId::parse(l)).collect(),
                resources: Vec::new(),
            },
        );
        project
    }

    /// Register a resource under an existing project.
    ///
    /// # Panics
    /// If `project` was never added.
    pub fn add_resource(&self, project: &str, slug: &str) -> Resource {
        let project = ProjectSlug::from(project);
        let slug = ResourceSlug::from(slug);
        let resource = Resource {
            id: Resource::api_id(&self.organization, &project, &slug),
            slug: slug.clone(),
            name: slug.0.clone(),
            project: project.clone(),
        };
        let mut state = self.lock();
        let project_state = state
            .projects
            .get_mut(&project)
            .unwrap_or_else(|| panic!("unknown project {project}"));
        project_state.resources.push(ResourceState {
            resource: Some(resource.clone()),
            ..ResourceState::default()
        });
        resource
    }

    pub fn set_translations(
        &self,
        resource: &Resource,
        language: &str,
        entries: Vec<TranslationEntry>,
    ) {
        let mut state = self.lock();
        if let Some(res) = find_resource_mut(&mut state, &resource.id) {
            res.translations.insert(LanguageId::parse(language), entries);
        }
    }

    pub fn set_strings(&self, resource: &Resource, strings: Vec<ResourceString>) {
        let mut state = self.lock();
        if let Some(res) = find_resource_mut(&mut state, &resource.id) {
            res.strings = strings;
        }
    }

    /// Make every subsequent `create_language` call fail.
    pub fn fail_language_creation(&self) {
        self.lock().fail_language_creation = true;
    }

    /// Every write received so far, in call order.
    pub fn writes(&self) -> Vec<StoreWrite> {
        self.lock().writes.clone()
    }

    /// Current translations of `resource` in `language`.
    pub fn translations(&self, resource: &Resource, language: &str) -> Vec<TranslationEntry> {
        let mut state = self.lock();
        find_resource_mut(&mut state, &resource.id)
            .and_then(|res| res.translations.get(&LanguageId::parse(language)).cloned())
            .unwrap_or_default()
    }

    /// Current source strings of `resource`.
    pub fn strings(&self, resource: &Resource) -> Vec<ResourceString> {
        let mut state = self.lock();
        find_resource_mut(&mut state, &resource.id)
            .map(|res| res.strings.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn find_resource_mut<'a>(state: &'a mut State, resource_id: &str) -> Option<&'a mut ResourceState> {
    state
        .projects
        .values_mut()
        .flat_map(|p| p.resources.iter_mut())
        .find(|r| r.resource.as_ref().is_some_and(|res| res.id == resource_id))
}

impl TranslationStore for MemoryStore {
    fn get_project(&self, slug: &ProjectSlug) -> Result<Project, StoreError> {
        self.lock()
            .projects
            .get(slug)
            .map(|p| p.project.clone())
            .ok_or_else(|| StoreError::not_found("project", Project::api_id(&self.organization, slug)))
    }

    fn get_resource(&self, project: &Project, slug: &ResourceSlug) -> Result<Resource, StoreError> {
        let id = Resource::api_id(&self.organization, &project.slug, slug);
        self.lock()
            .projects
            .get(&project.slug)
            .and_then(|p| {
                p.resources
                    .iter()
                    .filter_map(|r| r.resource.as_ref())
                    .find(|r| r.id == id)
                    .cloned()
            })
            .ok_or_else(|| StoreError::not_found("resource", id))
    }

    fn list_resources(&self, project: &Project) -> Result<Vec<Resource>, StoreError> {
        let state = self.lock();
        let project_state = state
            .projects
            .get(&project.slug)
            .ok_or_else(|| StoreError::not_found("project", project.id.clone()))?;
        Ok(project_state
            .resources
            .iter()
            .filter_map(|r| r.resource.clone())
            .collect())
    }

    fn list_languages(&self, project: &Project) -> Result<Vec<LanguageId>, StoreError> {
        self.lock()
            .projects
            .get(&project.slug)
            .map(|p| p.languages.clone())
            .ok_or_else(|| StoreError::not_found("project", project.id.clone()))
    }

    fn get_translations(
        &self,
        resource: &Resource,
        language: &LanguageId,
    ) -> Result<Vec<TranslationEntry>, StoreError> {
        let mut state = self.lock();
        let res = find_resource_mut(&mut state, &resource.id)
            .ok_or_else(|| StoreError::not_found("resource", resource.id.clone()))?;
        Ok(res.translations.get(language).cloned().unwrap_or_default())
    }

    fn bulk_update_translations(&self, updates: &[TranslationUpdate]) -> Result<(), StoreError> {
        let mut state = self.lock();
        for update in updates {
            let entry = state
                .projects
                .values_mut()
                .flat_map(|p| p.resources.iter_mut())
                .flat_map(|r| r.translations.values_mut())
                .flat_map(|entries| entries.iter_mut())
                .find(|e| e.id == update.id)
                .ok_or_else(|| StoreError::not_found("resource translation", update.id.0.clone()))?;
            if let Some(reviewed) = update.attributes.reviewed {
                entry.reviewed = reviewed;
            }
            if let Some(proofread) = update.attributes.proofread {
                entry.proofread = proofread;
            }
        }
        state.writes.push(StoreWrite::BulkUpdate(updates.to_vec()));
        Ok(())
    }

    fn list_resource_strings(&self, resource: &Resource) -> Result<Vec<ResourceString>, StoreError> {
        let mut state = self.lock();
        let res = find_resource_mut(&mut state, &resource.id)
            .ok_or_else(|| StoreError::not_found("resource", resource.id.clone()))?;
        Ok(res.strings.clone())
    }

    fn update_resource_string_tags(
        &self,
        string: &ResourceStringId,
        tags: &[String],
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        let target = state
            .projects
            .values_mut()
            .flat_map(|p| p.resources.iter_mut())
            .flat_map(|r| r.strings.iter_mut())
            .find(|s| &s.id == string)
            .ok_or_else(|| StoreError::not_found("resource string", string.0.clone()))?;
        target.tags = tags.to_vec();
        state.writes.push(StoreWrite::Tags {
            string: string.clone(),
            tags: tags.to_vec(),
        });
        Ok(())
    }

    fn create_language(&self, project: &Project, language: &LanguageId) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.fail_language_creation {
            return Err(StoreError::Api {
                status: 403,
                message: format!("cannot add {} to {}", language.api_id(), project.id),
            });
        }
        let project_state = state
            .projects
            .get_mut(&project.slug)
            .ok_or_else(|| StoreError::not_found("project", project.id.clone()))?;
        if !project_state.languages.contains(language) {
            project_state.languages.push(language.clone());
        }
        state.writes.push(StoreWrite::CreateLanguage {
            project: project.slug.clone(),
            language: language.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StringHash, TranslationId};

    fn entry(id: &str) -> TranslationEntry {
        TranslationEntry {
            id: TranslationId::from(id),
            context: String::new(),
            key: id.to_string(),
            strings: None,
            reviewed: false,
            proofread: false,
        }
    }

    #[test]
    fn unknown_project_is_not_found() {
        let store = MemoryStore::new("acme");
        let err = store.get_project(&ProjectSlug::from("nope")).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("o:acme:p:nope"));
    }

    #[test]
    fn bulk_update_applies_and_records() {
        let store = MemoryStore::new("acme");
        store.add_project("main", &["ar"]);
        let resource = store.add_resource("main", "res");
        store.set_translations(&resource, "ar", vec![entry("t1")]);

        let update = TranslationUpdate {
            id: TranslationId::from("t1"),
            attributes: crate::types::MetadataUpdate {
                reviewed: Some(true),
                proofread: None,
            },
        };
        store.bulk_update_translations(&[update.clone()]).unwrap();

        assert!(store.translations(&resource, "ar")[0].reviewed);
        assert_eq!(store.writes(), vec![StoreWrite::BulkUpdate(vec![update])]);
    }

    #[test]
    fn tag_update_replaces_tags() {
        let store = MemoryStore::new("acme");
        store.add_project("main", &[]);
        let resource = store.add_resource("main", "res");
        store.set_strings(
            &resource,
            vec![ResourceString {
                id: ResourceStringId::from("s1"),
                string_hash: StringHash::from("h1"),
                tags: vec!["old".into()],
            }],
        );
        store
            .update_resource_string_tags(&ResourceStringId::from("s1"), &["new".into()])
            .unwrap();
        assert_eq!(store.strings(&resource)[0].tags, vec!["new".to_string()]);
    }

    #[test]
    fn failing_language_creation_records_nothing() {
        let store = MemoryStore::new("acme");
        let project = store.add_project("release", &[]);
        store.fail_language_creation();
        assert!(store.create_language(&project, &LanguageId::parse("ar")).is_err());
        assert!(store.writes().is_empty());
    }
}
