//! Entry matching across the main and release projects.
//!
//! Entries are recognised as the same logical string by their
//! [`EntryIdentity`] (`context:<context>:key:<key>`), never by store id.

use std::collections::HashMap;

use txsync_core::{EntryIdentity, TranslationEntry};

/// Main-side entries of one (resource, language) keyed by identity.
pub type EntryIndex = HashMap<EntryIdentity, TranslationEntry>;

/// A release entry and the main entry sharing its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub release: TranslationEntry,
    pub main: TranslationEntry,
}

/// Outcome of matching one release-side fetch against a main-side index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Matched pairs, in release fetch order.
    pub pairs: Vec<MatchedPair>,
    /// Release entries with no main counterpart; dropped.
    pub unmatched: usize,
}

/// Build the identity lookup for one fetch.
///
/// Duplicate identities: the later entry replaces the earlier one.
pub fn index(entries: Vec<TranslationEntry>) -> EntryIndex {
    let mut lookup = HashMap::with_capacity(entries.len());
    for entry in entries {
        lookup.insert(entry.identity(), entry);
    }
    lookup
}

/// Resolve every release entry against `main`.
pub fn match_entries(main: &EntryIndex, release: Vec<TranslationEntry>) -> MatchResult {
    let mut result = MatchResult::default();
    for release_entry in release {
        match main.get(&release_entry.identity()) {
            Some(main_entry) => result.pairs.push(MatchedPair {
                main: main_entry.clone(),
                release: release_entry,
            }),
            None => {
                tracing::debug!("{} has no main counterpart; skipping", release_entry.identity());
                result.unmatched += 1;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use txsync_core::TranslationId;

    fn entry(id: &str, context: &str, key: &str, text: &str) -> TranslationEntry {
        TranslationEntry {
            id: TranslationId::from(id),
            context: context.to_string(),
            key: key.to_string(),
            strings: Some([("other".to_string(), text.to_string())].into()),
            reviewed: false,
            proofread: false,
        }
    }

    #[test]
    fn same_identity_matches_across_projects() {
        let main = index(vec![entry("main-1", "c1", "k1", "Hello")]);
        let result = match_entries(&main, vec![entry("rel-9", "c1", "k1", "Hola")]);
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].main.id.as_str(), "main-1");
        assert_eq!(result.pairs[0].release.id.as_str(), "rel-9");
        assert_eq!(result.unmatched, 0);
    }

    #[test]
    fn context_is_part_of_identity() {
        let main = index(vec![entry("m", "c1", "k1", "Hello")]);
        let result = match_entries(&main, vec![entry("r", "c2", "k1", "Hello")]);
        assert!(result.pairs.is_empty());
        assert_eq!(result.unmatched, 1);
    }

    #[test]
    fn duplicate_identity_keeps_last_entry() {
        let main = index(vec![
            entry("first", "c", "k", "one"),
            entry("second", "c", "k", "two"),
        ]);
        assert_eq!(main.len(), 1);
        assert_eq!(main[&EntryIdentity::new("c", "k")].id.as_str(), "second");
    }

    #[test]
    fn pairs_follow_release_order() {
        let main = index(vec![
            entry("m1", "", "a", "A"),
            entry("m2", "", "b", "B"),
            entry("m3", "", "c", "C"),
        ]);
        let release = vec![
            entry("r3", "", "c", "C"),
            entry("rx", "", "x", "X"),
            entry("r1", "", "a", "A"),
        ];
        let ids: Vec<_> = match_entries(&main, release)
            .pairs
            .iter()
            .map(|p| p.release.id.0.clone())
            .collect();
        assert_eq!(ids, vec!["r3", "r1"]);
    }
}
