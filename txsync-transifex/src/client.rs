//! Blocking Transifex REST API v3 client.

use serde::de::DeserializeOwned;
use serde_json::Value;

use txsync_core::{
    LanguageId, Project, ProjectSlug, Resource, ResourceSlug, ResourceString, ResourceStringId,
    StoreError, SyncSettings, TranslationEntry, TranslationStore, TranslationUpdate,
};

use crate::jsonapi::{
    self, Document, LanguageData, ProjectData, ResourceData, ResourceStringData, TranslationData,
};

const JSON_API: &str = "application/vnd.api+json";
const JSON_API_BULK: &str = "application/vnd.api+json;profile=\"bulk\"";

/// Largest number of items accepted by one bulk request.
pub const BULK_LIMIT: usize = 150;

/// [`TranslationStore`] backed by the Transifex REST API.
pub struct TransifexClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
    organization: String,
}

impl TransifexClient {
    pub fn new(settings: &SyncSettings, token: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("txsync/", env!("CARGO_PKG_VERSION")))
                .build(),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            organization: settings.organization.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", JSON_API)
    }

    /// GET one document; 404 becomes `NotFound { kind, id }`.
    fn get_one<T: DeserializeOwned>(
        &self,
        path: &str,
        kind: &'static str,
        id: &str,
    ) -> Result<T, StoreError> {
        let url = self.url(path);
        tracing::debug!("GET {url}");
        let response = self
            .request("GET", &url)
            .call()
            .map_err(|e| map_error(e, kind, id))?;
        let doc: Document<T> = decode(response)?;
        Ok(doc.data)
    }

    /// GET every page of a collection, following `links.next`.
    ///
    /// `kind`/`id` name the object the collection hangs off, for errors.
    fn get_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        kind: &'static str,
        id: &str,
        mut each: impl FnMut(Document<Vec<T>>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let first = self.url(path);
        tracing::debug!("GET {first}");
        let mut request = self.request("GET", &first);
        for (name, value) in query {
            request = request.query(name, value);
        }
        let mut response = request.call().map_err(|e| map_error(e, kind, id))?;

        loop {
            let doc: Document<Vec<T>> = decode(response)?;
            let next = doc.links.next.clone();
            each(doc)?;
            let Some(next) = next else {
                return Ok(());
            };
            tracing::debug!("GET {next}");
            response = self
                .request("GET", &next)
                .call()
                .map_err(|e| map_error(e, kind, id))?;
        }
    }

    fn send(
        &self,
        method: &str,
        path: &str,
        content_type: &str,
        body: &Value,
        kind: &'static str,
        id: &str,
    ) -> Result<(), StoreError> {
        let url = self.url(path);
        tracing::debug!("{method} {url}");
        self.request(method, &url)
            .set("Content-Type", content_type)
            .send_string(&body.to_string())
            .map_err(|e| map_error(e, kind, id))?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, StoreError> {
    response
        .into_json()
        .map_err(|e| StoreError::Decode(e.to_string()))
}

fn map_error(err: ureq::Error, kind: &'static str, id: &str) -> StoreError {
    match err {
        ureq::Error::Status(404, _) => StoreError::not_found(kind, id),
        ureq::Error::Status(status, response) => StoreError::Api {
            status,
            message: response
                .into_string()
                .unwrap_or_else(|e| format!("<unreadable body: {e}>")),
        },
        ureq::Error::Transport(transport) => StoreError::Transport(transport.to_string()),
    }
}

impl TranslationStore for TransifexClient {
    fn get_project(&self, slug: &ProjectSlug) -> Result<Project, StoreError> {
        let id = Project::api_id(&self.organization, slug);
        let data: ProjectData = self.get_one(&format!("/projects/{id}"), "project", &id)?;
        Ok(data.into())
    }

    fn get_resource(&self, project: &Project, slug: &ResourceSlug) -> Result<Resource, StoreError> {
        let id = Resource::api_id(&self.organization, &project.slug, slug);
        tracing::info!("getting resource id: {id}");
        let data: ResourceData = self.get_one(&format!("/resources/{id}"), "resource", &id)?;
        Ok(data.into_resource(&project.slug))
    }

    fn list_resources(&self, project: &Project) -> Result<Vec<Resource>, StoreError> {
        let mut resources = Vec::new();
        self.get_pages(
            "/resources",
            &[("filter[project]", project.id.as_str())],
            "project",
            &project.id,
            |doc: Document<Vec<ResourceData>>| {
                resources.extend(doc.data.into_iter().map(|r| r.into_resource(&project.slug)));
                Ok(())
            },
        )?;
        Ok(resources)
    }

    fn list_languages(&self, project: &Project) -> Result<Vec<LanguageId>, StoreError> {
        let mut languages = Vec::new();
        self.get_pages(
            &format!("/projects/{}/languages", project.id),
            &[],
            "project",
            &project.id,
            |doc: Document<Vec<LanguageData>>| {
                languages.extend(doc.data.into_iter().map(LanguageId::from));
                Ok(())
            },
        )?;
        Ok(languages)
    }

    fn get_translations(
        &self,
        resource: &Resource,
        language: &LanguageId,
    ) -> Result<Vec<TranslationEntry>, StoreError> {
        let language_id = language.api_id();
        let mut entries = Vec::new();
        self.get_pages(
            "/resource_translations",
            &[
                ("filter[resource]", resource.id.as_str()),
                ("filter[language]", language_id.as_str()),
                ("include", "resource_string"),
            ],
            "resource",
            &resource.id,
            |doc: Document<Vec<TranslationData>>| {
                entries.extend(jsonapi::translations_from_page(doc)?);
                Ok(())
            },
        )?;
        Ok(entries)
    }

    fn bulk_update_translations(&self, updates: &[TranslationUpdate]) -> Result<(), StoreError> {
        for chunk in updates.chunks(BULK_LIMIT) {
            self.send(
                "PATCH",
                "/resource_translations",
                JSON_API_BULK,
                &jsonapi::bulk_update_body(chunk),
                "resource translation",
                "bulk",
            )?;
        }
        Ok(())
    }

    fn list_resource_strings(&self, resource: &Resource) -> Result<Vec<ResourceString>, StoreError> {
        let mut strings = Vec::new();
        self.get_pages(
            "/resource_strings",
            &[("filter[resource]", resource.id.as_str())],
            "resource",
            &resource.id,
            |doc: Document<Vec<ResourceStringData>>| {
                strings.extend(doc.data.into_iter().map(ResourceString::from));
                Ok(())
            },
        )?;
        Ok(strings)
    }

    fn update_resource_string_tags(
        &self,
        string: &ResourceStringId,
        tags: &[String],
    ) -> Result<(), StoreError> {
        self.send(
            "PATCH",
            &format!("/resource_strings/{string}"),
            JSON_API,
            &jsonapi::tags_body(string, tags),
            "resource string",
            string.as_str(),
        )
    }

    fn create_language(&self, project: &Project, language: &LanguageId) -> Result<(), StoreError> {
        self.send(
            "POST",
            &format!("/projects/{}/relationships/languages", project.id),
            JSON_API,
            &jsonapi::language_body(language),
            "project",
            &project.id,
        )
    }
}
