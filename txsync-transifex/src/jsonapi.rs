//! JSON:API documents exchanged with the Transifex REST API v3.
//!
//! Response shapes are decoded into `txsync-core` domain types here; request
//! bodies for the three write endpoints are built here too.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::{json, Value};

use txsync_core::{
    LanguageId, Project, ProjectSlug, Resource, ResourceSlug, ResourceString, ResourceStringId,
    StoreError, StringHash, TranslationEntry, TranslationId, TranslationUpdate,
};

/// A top-level response document.
#[derive(Debug, Deserialize)]
pub(crate) struct Document<T> {
    pub data: T,
    #[serde(default)]
    pub included: Vec<Included>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Links {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Relationship {
    pub data: Option<Identifier>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Identifier {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Projects, resources, languages
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectData {
    pub id: String,
    pub attributes: NamedAttributes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceData {
    pub id: String,
    pub attributes: NamedAttributes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedAttributes {
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LanguageData {
    pub id: String,
}

impl From<ProjectData> for Project {
    fn from(data: ProjectData) -> Self {
        Project {
            id: data.id,
            slug: ProjectSlug::from(data.attributes.slug),
            name: data.attributes.name,
        }
    }
}

impl ResourceData {
    pub fn into_resource(self, project: &ProjectSlug) -> Resource {
        Resource {
            id: self.id,
            slug: ResourceSlug::from(self.attributes.slug),
            name: self.attributes.name,
            project: project.clone(),
        }
    }
}

impl From<LanguageData> for LanguageId {
    fn from(data: LanguageData) -> Self {
        LanguageId::parse(&data.id)
    }
}

// ---------------------------------------------------------------------------
// Translations and source strings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct TranslationData {
    pub id: String,
    pub attributes: TranslationAttributes,
    pub relationships: TranslationRelationships,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranslationAttributes {
    #[serde(default)]
    pub strings: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default)]
    pub proofread: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranslationRelationships {
    pub resource_string: Relationship,
}

/// A compound-document member. Only `resource_strings` are requested.
#[derive(Debug, Deserialize)]
pub(crate) struct Included {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub attributes: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceStringData {
    pub id: String,
    pub attributes: ResourceStringAttributes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceStringAttributes {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub key: String,
    pub string_hash: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<ResourceStringData> for ResourceString {
    fn from(data: ResourceStringData) -> Self {
        ResourceString {
            id: ResourceStringId::from(data.id),
            string_hash: StringHash::from(data.attributes.string_hash),
            tags: data.attributes.tags,
        }
    }
}

/// Join one page of `resource_translations` with its included source strings.
pub(crate) fn translations_from_page(
    doc: Document<Vec<TranslationData>>,
) -> Result<Vec<TranslationEntry>, StoreError> {
    let mut sources: HashMap<String, ResourceStringAttributes> = HashMap::new();
    for included in doc.included {
        if included.kind != "resource_strings" {
            continue;
        }
        let attributes: ResourceStringAttributes = serde_json::from_value(included.attributes)
            .map_err(|e| StoreError::Decode(format!("resource string {}: {e}", included.id)))?;
        sources.insert(included.id, attributes);
    }

    doc.data
        .into_iter()
        .map(|item| -> Result<TranslationEntry, StoreError> {
            let source_id = item
                .relationships
                .resource_string
                .data
                .map(|d| d.id)
                .ok_or_else(|| {
                    StoreError::Decode(format!("translation {} has no resource string", item.id))
                })?;
            let source = sources.get(&source_id).ok_or_else(|| {
                StoreError::Decode(format!(
                    "translation {} references missing resource string {source_id}",
                    item.id
                ))
            })?;
            Ok(TranslationEntry {
                id: TranslationId::from(item.id),
                context: source.context.clone().unwrap_or_default(),
                key: source.key.clone(),
                strings: item.attributes.strings,
                reviewed: item.attributes.reviewed,
                proofread: item.attributes.proofread,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

pub(crate) fn bulk_update_body(updates: &[TranslationUpdate]) -> Value {
    let data: Vec<Value> = updates
        .iter()
        .map(|u| {
            json!({
                "type": "resource_translations",
                "id": u.id,
                "attributes": u.attributes,
            })
        })
        .collect();
    json!({ "data": data })
}

pub(crate) fn tags_body(string: &ResourceStringId, tags: &[String]) -> Value {
    json!({
        "data": {
            "type": "resource_strings",
            "id": string,
            "attributes": { "tags": tags },
        }
    })
}

pub(crate) fn language_body(language: &LanguageId) -> Value {
    json!({
        "data": [{ "type": "languages", "id": language.api_id() }]
    })
}
