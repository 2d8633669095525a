//! Change computation
//!
//! Diffs the current local entries against the baseline and produces the
//! minimal set of upserts and deletions to send to the remote.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::baseline::BaselineState;
use crate::extract::LocalEntry;

/// An entry to create or update on the remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upsert {
    pub key: String,
    pub language: String,
    pub value: String,
    /// Hash the client believes the remote holds; `None` for new entries
    pub base_hash: Option<String>,
}

/// An entry to delete on the remote
///
/// `language: None` deletes the key in every language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletion {
    pub key: String,
    pub language: Option<String>,
}

impl Deletion {
    pub fn language(key: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            language: Some(language.into()),
        }
    }

    pub fn all_languages(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            language: None,
        }
    }
}

/// Upserts and deletions needed to bring the remote in line with local state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub entries: Vec<Upsert>,
    pub deletions: Vec<Deletion>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.deletions.is_empty()
    }

    /// Upserts with no base hash.
    pub fn added(&self) -> impl Iterator<Item = &Upsert> {
        self.entries.iter().filter(|u| u.base_hash.is_none())
    }

    /// Upserts that replace a value recorded in the baseline.
    pub fn modified(&self) -> impl Iterator<Item = &Upsert> {
        self.entries.iter().filter(|u| u.base_hash.is_some())
    }
}

/// Languages a cycle is allowed to touch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncScope {
    #[default]
    All,
    Languages(BTreeSet<String>),
}

impl SyncScope {
    /// Scope limited to the given languages. An empty list means all.
    pub fn languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = languages.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Languages(set)
        }
    }

    pub fn contains(&self, language: &str) -> bool {
        match self {
            Self::All => true,
            Self::Languages(set) => set.contains(language),
        }
    }
}

/// Compute the changeset for all languages.
pub fn compute_push_changes(entries: &[LocalEntry], baseline: Option<&BaselineState>) -> ChangeSet {
    compute_push_changes_in_scope(entries, baseline, &SyncScope::All)
}

/// Compute the changeset, never deleting baseline pairs outside `scope`.
///
/// Entries whose hash equals the baseline hash are skipped; every baseline
/// pair inside the scope with no local entry becomes one deletion.
pub fn compute_push_changes_in_scope(
    entries: &[LocalEntry],
    baseline: Option<&BaselineState>,
    scope: &SyncScope,
) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for entry in entries {
        let stored = baseline.and_then(|b| b.entries.get(&entry.key, &entry.language));
        if stored == Some(entry.content_hash.as_str()) {
            continue;
        }
        changes.entries.push(Upsert {
            key: entry.key.clone(),
            language: entry.language.clone(),
            value: entry.value.clone(),
            base_hash: stored.map(str::to_string),
        });
    }

    if let Some(baseline) = baseline {
        let covered: HashSet<(&str, &str)> = entries
            .iter()
            .map(|e| (e.key.as_str(), e.language.as_str()))
            .collect();

        changes.deletions = baseline
            .entries
            .pairs()
            .filter(|(key, language, _)| scope.contains(language) && !covered.contains(&(*key, *language)))
            .map(|(key, language, _)| Deletion::language(key, language))
            .collect();
    }

    tracing::debug!(
        upserts = changes.entries.len(),
        deletions = changes.deletions.len(),
        "computed push changes"
    );
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::EntryHashes;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn baseline(pairs: &[(&str, &str, &str)]) -> BaselineState {
        BaselineState::new(pairs.iter().copied().collect::<EntryHashes>(), Utc::now())
    }

    #[test]
    fn no_baseline_uploads_everything_as_new() {
        let entries = vec![
            LocalEntry::new("A", "en", "a"),
            LocalEntry::new("B", "en", ""),
        ];

        let changes = compute_push_changes(&entries, None);

        assert_eq!(changes.entries.len(), 2);
        assert!(changes.entries.iter().all(|u| u.base_hash.is_none()));
        assert!(changes.deletions.is_empty());
    }

    #[test]
    fn modified_entry_carries_base_hash() {
        let base = baseline(&[("A", "en", "old")]);
        let entries = vec![LocalEntry::with_hash("A", "en", "new value", "new")];

        let changes = compute_push_changes(&entries, Some(&base));

        assert_eq!(
            changes.entries,
            vec![Upsert {
                key: "A".into(),
                language: "en".into(),
                value: "new value".into(),
                base_hash: Some("old".into()),
            }]
        );
        assert_eq!(changes.modified().count(), 1);
        assert_eq!(changes.added().count(), 0);
    }

    #[test]
    fn removing_one_language_deletes_only_that_language() {
        let base = baseline(&[("A", "en", "h1"), ("A", "fr", "h2")]);
        let entries = vec![LocalEntry::with_hash("A", "en", "a", "h1")];

        let changes = compute_push_changes(&entries, Some(&base));

        assert!(changes.entries.is_empty());
        assert_eq!(changes.deletions, vec![Deletion::language("A", "fr")]);
    }

    #[test]
    fn out_of_scope_pairs_are_not_deleted() {
        let base = baseline(&[("A", "en", "h1"), ("A", "fr", "h2")]);
        let entries = vec![LocalEntry::with_hash("A", "fr", "a", "h2")];

        let changes =
            compute_push_changes_in_scope(&entries, Some(&base), &SyncScope::languages(["fr"]));

        assert!(changes.is_empty());
    }

    #[test]
    fn empty_scope_list_means_all() {
        assert_eq!(SyncScope::languages(Vec::<String>::new()), SyncScope::All);
    }

    #[test]
    fn changeset_serializes_with_null_base_hash() {
        let changes = ChangeSet {
            entries: vec![Upsert {
                key: "A".into(),
                language: "en".into(),
                value: "a".into(),
                base_hash: None,
            }],
            deletions: vec![Deletion::all_languages("B")],
        };
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json["entries"][0]["baseHash"], serde_json::Value::Null);
        assert_eq!(json["deletions"][0]["language"], serde_json::Value::Null);
    }
}
