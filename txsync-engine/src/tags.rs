//! Tag reconciliation between a main and a release resource.
//!
//! Language independent: tags hang off source strings, matched by
//! `string_hash`. Main is the source of truth and a differing release tag set
//! is replaced wholesale; there is no content gate here.

use std::collections::HashMap;

use txsync_core::{
    Resource, ResourceString, ResourceStringId, StringHash, StoreError, TranslationStore,
};

/// A staged replacement of one release string's tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOverwrite {
    pub string: ResourceStringId,
    pub string_hash: StringHash,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

/// Tag reconciliation outcome for one resource pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagReport {
    pub overwrites: Vec<TagOverwrite>,
    /// Release strings whose hash is unknown on main.
    pub unmatched: usize,
    /// `true` once every overwrite was submitted.
    pub applied: bool,
}

/// Compute the overwrites that make release tags equal main tags.
///
/// Returns the overwrites in release order plus the count of release strings
/// with no main counterpart.
pub fn plan_tag_overwrites(
    main: &[ResourceString],
    release: &[ResourceString],
) -> (Vec<TagOverwrite>, usize) {
    let main_tags: HashMap<&StringHash, &ResourceString> =
        main.iter().map(|s| (&s.string_hash, s)).collect();

    let mut overwrites = Vec::new();
    let mut unmatched = 0;
    for release_string in release {
        // Main not synced yet for this string.
        let Some(main_string) = main_tags.get(&release_string.string_hash) else {
            unmatched += 1;
            continue;
        };
        if main_string.tags.is_empty() && release_string.tags.is_empty() {
            continue;
        }
        if main_string.tags.len() != release_string.tags.len()
            || main_string.tag_set() != release_string.tag_set()
        {
            overwrites.push(TagOverwrite {
                string: release_string.id.clone(),
                string_hash: release_string.string_hash.clone(),
                from: release_string.tags.clone(),
                to: main_string.tags.clone(),
            });
        }
    }
    (overwrites, unmatched)
}

/// Fetch both resources' strings, log each difference, and submit the
/// overwrites one by one unless `dry_run`.
pub fn reconcile_tags<S: TranslationStore>(
    store: &S,
    main: &Resource,
    release: &Resource,
    dry_run: bool,
) -> Result<TagReport, StoreError> {
    let main_strings = store.list_resource_strings(main)?;
    let release_strings = store.list_resource_strings(release)?;
    let (overwrites, unmatched) = plan_tag_overwrites(&main_strings, &release_strings);

    for overwrite in &overwrites {
        tracing::info!(
            "{}found tag difference for {}. overwriting: {:?} with {:?}",
            if dry_run { "[dry-run] " } else { "" },
            overwrite.string_hash,
            overwrite.from,
            overwrite.to,
        );
    }

    if dry_run {
        return Ok(TagReport {
            overwrites,
            unmatched,
            applied: false,
        });
    }

    for overwrite in &overwrites {
        store.update_resource_string_tags(&overwrite.string, &overwrite.to)?;
    }

    Ok(TagReport {
        applied: !overwrites.is_empty(),
        overwrites,
        unmatched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(id: &str, hash: &str, tags: &[&str]) -> ResourceString {
        ResourceString {
            id: ResourceStringId::from(id),
            string_hash: StringHash::from(hash),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn same_set_in_different_order_is_a_no_op() {
        let (overwrites, _) = plan_tag_overwrites(
            &[string("m", "h", &["a", "b"])],
            &[string("r", "h", &["b", "a"])],
        );
        assert!(overwrites.is_empty());
    }

    #[test]
    fn subset_is_replaced_in_full() {
        let (overwrites, _) = plan_tag_overwrites(
            &[string("m", "h", &["a", "b"])],
            &[string("r", "h", &["a"])],
        );
        assert_eq!(overwrites.len(), 1);
        assert_eq!(overwrites[0].string.as_str(), "r");
        assert_eq!(overwrites[0].to, vec!["a", "b"]);
    }

    #[test]
    fn main_without_tags_clears_release_tags() {
        let (overwrites, _) = plan_tag_overwrites(
            &[string("m", "h", &[])],
            &[string("r", "h", &["stale"])],
        );
        assert_eq!(overwrites.len(), 1);
        assert!(overwrites[0].to.is_empty());
    }

    #[test]
    fn both_empty_is_skipped() {
        let (overwrites, unmatched) =
            plan_tag_overwrites(&[string("m", "h", &[])], &[string("r", "h", &[])]);
        assert!(overwrites.is_empty());
        assert_eq!(unmatched, 0);
    }

    #[test]
    fn unknown_hash_is_skipped_and_counted() {
        let (overwrites, unmatched) = plan_tag_overwrites(
            &[string("m", "h1", &["a"])],
            &[string("r", "h2", &["b"])],
        );
        assert!(overwrites.is_empty());
        assert_eq!(unmatched, 1);
    }

    #[test]
    fn duplicate_release_tags_differ_by_size() {
        let (overwrites, _) = plan_tag_overwrites(
            &[string("m", "h", &["a"])],
            &[string("r", "h", &["a", "a"])],
        );
        assert_eq!(overwrites.len(), 1);
    }
}
