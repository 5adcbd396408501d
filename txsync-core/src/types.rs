//! Domain types shared by the store adapters and the reconciliation engine.
//!
//! Identifiers are newtypes over `String`; store-side ids (`o:<org>:p:<project>`)
//! are built here so every adapter renders them the same way.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

string_newtype!(
    /// Slug of a project inside the organization, e.g. `openedx-translations`.
    ProjectSlug
);
string_newtype!(
    /// Slug of a resource inside a project, e.g. `frontend-app-learning`.
    ResourceSlug
);
string_newtype!(
    /// Store-assigned id of one translation record.
    TranslationId
);
string_newtype!(
    /// Store-assigned id of one source string.
    ResourceStringId
);
string_newtype!(
    /// Content-derived identity of a source string.
    StringHash
);
string_newtype!(
    /// Cross-project identity of a translation entry: `context:<context>:key:<key>`.
    EntryIdentity
);

impl EntryIdentity {
    pub fn new(context: &str, key: &str) -> Self {
        Self(format!("context:{context}:key:{key}"))
    }
}

impl ResourceSlug {
    /// Case-insensitive slug comparison used by the `--resource` filter.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

/// A language code such as `ar` or `zh_CN`.
///
/// The store refers to languages as `l:<code>`; [`LanguageId::parse`] accepts
/// both forms and [`LanguageId::api_id`] renders the prefixed one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(String);

impl LanguageId {
    pub fn parse(raw: &str) -> Self {
        let code = raw.strip_prefix("l:").unwrap_or(raw);
        Self(code.to_owned())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn api_id(&self) -> String {
        format!("l:{}", self.0)
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for LanguageId {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Projects and resources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub slug: ProjectSlug,
    pub name: String,
}

impl Project {
    /// `o:<org>:p:<project>`
    pub fn api_id(organization: &str, slug: &ProjectSlug) -> String {
        format!("o:{organization}:p:{slug}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: String,
    pub slug: ResourceSlug,
    pub name: String,
    pub project: ProjectSlug,
}

impl Resource {
    /// `o:<org>:p:<project>:r:<resource>`
    pub fn api_id(organization: &str, project: &ProjectSlug, slug: &ResourceSlug) -> String {
        format!("o:{organization}:p:{project}:r:{slug}")
    }
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

/// Rendered translation content keyed by plural form (`one`, `other`, ...).
pub type Strings = BTreeMap<String, String>;

/// One language-specific translation of one source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub id: TranslationId,
    pub context: String,
    pub key: String,
    /// `None` when the string is untranslated.
    pub strings: Option<Strings>,
    pub reviewed: bool,
    pub proofread: bool,
}

impl TranslationEntry {
    pub fn identity(&self) -> EntryIdentity {
        EntryIdentity::new(&self.context, &self.key)
    }
}

/// Metadata-only attributes staged for a release-side translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proofread: Option<bool>,
}

impl MetadataUpdate {
    pub fn is_empty(&self) -> bool {
        self.reviewed.is_none() && self.proofread.is_none()
    }
}

impl fmt::Display for MetadataUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(v) = self.reviewed {
            parts.push(format!("reviewed={v}"));
        }
        if let Some(v) = self.proofread {
            parts.push(format!("proofread={v}"));
        }
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// One item of a bulk translation update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUpdate {
    pub id: TranslationId,
    pub attributes: MetadataUpdate,
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Tag set attached to a source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceString {
    pub id: ResourceStringId,
    pub string_hash: StringHash,
    pub tags: Vec<String>,
}

impl ResourceString {
    pub fn tag_set(&self) -> BTreeSet<&str> {
        self.tags.iter().map(String::as_str).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
