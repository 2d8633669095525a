//! Baseline: the last-synced state
//!
//! The baseline records, per (key, language), the content hash the client
//! last confirmed was accepted by the remote. It is the only input that
//! tells the merger what changed since the previous cycle.

mod store;

pub use store::{BaselineStore, LoadedBaseline};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::LocalEntry;
use crate::merge::Deletion;

/// Current key-level baseline format version
pub const BASELINE_VERSION: u32 = 2;

/// Two-level ordered map of key -> language -> content hash.
///
/// Keys never map to an empty language table: removing the last language
/// of a key removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryHashes {
    inner: BTreeMap<String, BTreeMap<String, String>>,
}

impl EntryHashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored hash for a pair.
    pub fn get(&self, key: &str, language: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|languages| languages.get(language))
            .map(String::as_str)
    }

    pub fn contains(&self, key: &str, language: &str) -> bool {
        self.get(key, language).is_some()
    }

    /// Set the hash for a pair, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        language: impl Into<String>,
        hash: impl Into<String>,
    ) -> Option<String> {
        self.inner
            .entry(key.into())
            .or_default()
            .insert(language.into(), hash.into())
    }

    /// Remove a single pair, returning its hash.
    pub fn remove(&mut self, key: &str, language: &str) -> Option<String> {
        let languages = self.inner.get_mut(key)?;
        let removed = languages.remove(language);
        if languages.is_empty() {
            self.inner.remove(key);
        }
        removed
    }

    /// Remove a key in every language, returning how many pairs were removed.
    pub fn remove_key(&mut self, key: &str) -> usize {
        self.inner.remove(key).map_or(0, |languages| languages.len())
    }

    /// Overwrite pairs with every pair of `other`.
    pub fn merge(&mut self, other: &EntryHashes) {
        for (key, language, hash) in other.pairs() {
            self.insert(key, language, hash);
        }
    }

    /// Iterate `(key, language, hash)` in key then language order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.inner.iter().flat_map(|(key, languages)| {
            languages
                .iter()
                .map(move |(language, hash)| (key.as_str(), language.as_str(), hash.as_str()))
        })
    }

    /// Number of (key, language) pairs.
    pub fn len(&self) -> usize {
        self.inner.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.inner.len()
    }
}

impl<K, L, H> FromIterator<(K, L, H)> for EntryHashes
where
    K: Into<String>,
    L: Into<String>,
    H: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, L, H)>>(iter: I) -> Self {
        let mut hashes = EntryHashes::new();
        for (key, language, hash) in iter {
            hashes.insert(key, language, hash);
        }
        hashes
    }
}

/// Persisted last-synced state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineState {
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub entries: EntryHashes,
}

impl BaselineState {
    /// Create a baseline in the current format.
    pub fn new(entries: EntryHashes, timestamp: DateTime<Utc>) -> Self {
        Self {
            version: BASELINE_VERSION,
            timestamp,
            entries,
        }
    }

    /// Build the baseline that follows a completed cycle.
    ///
    /// Starts from the prior baseline, drops pairs deleted during the cycle,
    /// overwrites with every hash the remote reported, then records each
    /// local entry the remote did not report under its local hash.
    ///
    /// `entries` must already reflect resolved conflict values.
    pub fn merged(
        prior: Option<&BaselineState>,
        deletions: &[Deletion],
        new_hashes: &EntryHashes,
        entries: &[LocalEntry],
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut merged = prior.map(|p| p.entries.clone()).unwrap_or_default();

        for deletion in deletions {
            match &deletion.language {
                Some(language) => {
                    merged.remove(&deletion.key, language);
                }
                None => {
                    merged.remove_key(&deletion.key);
                }
            }
        }

        merged.merge(new_hashes);

        for entry in entries {
            if !new_hashes.contains(&entry.key, &entry.language) {
                merged.insert(&entry.key, &entry.language, &entry.content_hash);
            }
        }

        Self::new(merged, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removing_last_language_drops_key() {
        let mut hashes: EntryHashes = [("A", "en", "h1")].into_iter().collect();
        assert_eq!(hashes.remove("A", "en").as_deref(), Some("h1"));
        assert!(hashes.is_empty());
        assert_eq!(hashes.key_count(), 0);
    }

    #[test]
    fn remove_key_counts_pairs() {
        let mut hashes: EntryHashes = [("A", "en", "h1"), ("A", "fr", "h2"), ("B", "en", "h3")]
            .into_iter()
            .collect();
        assert_eq!(hashes.remove_key("A"), 2);
        assert_eq!(hashes.remove_key("A"), 0);
        assert_eq!(hashes.len(), 1);
    }

    #[test]
    fn pairs_are_ordered() {
        let hashes: EntryHashes = [("B", "en", "h3"), ("A", "fr", "h2"), ("A", "en", "h1")]
            .into_iter()
            .collect();
        let pairs: Vec<_> = hashes.pairs().collect();
        assert_eq!(
            pairs,
            vec![("A", "en", "h1"), ("A", "fr", "h2"), ("B", "en", "h3")]
        );
    }

    #[test]
    fn serializes_as_nested_object() {
        let hashes: EntryHashes = [("Greeting", "en", "h1")].into_iter().collect();
        let json = serde_json::to_value(&hashes).unwrap();
        assert_eq!(json, serde_json::json!({"Greeting": {"en": "h1"}}));
    }

    #[test]
    fn merged_applies_deletions_then_remote_then_local() {
        let prior = BaselineState::new(
            [("Gone", "en", "h0"), ("Kept", "en", "h1"), ("Changed", "en", "old")]
                .into_iter()
                .collect(),
            Utc::now(),
        );
        let deletions = vec![Deletion::language("Gone", "en")];
        let new_hashes: EntryHashes = [("Changed", "en", "remote")].into_iter().collect();
        let entries = vec![
            LocalEntry::with_hash("Changed", "en", "x", "local-changed"),
            LocalEntry::with_hash("New", "fr", "y", "local-new"),
        ];

        let merged = BaselineState::merged(Some(&prior), &deletions, &new_hashes, &entries, Utc::now());

        assert_eq!(merged.version, BASELINE_VERSION);
        assert_eq!(merged.entries.get("Gone", "en"), None);
        assert_eq!(merged.entries.get("Kept", "en"), Some("h1"));
        assert_eq!(merged.entries.get("Changed", "en"), Some("remote"));
        assert_eq!(merged.entries.get("New", "fr"), Some("local-new"));
    }

    #[test]
    fn merged_wildcard_deletion_drops_every_language() {
        let prior = BaselineState::new(
            [("A", "en", "h1"), ("A", "fr", "h2")].into_iter().collect(),
            Utc::now(),
        );
        let merged = BaselineState::merged(
            Some(&prior),
            &[Deletion::all_languages("A")],
            &EntryHashes::new(),
            &[],
            Utc::now(),
        );
        assert!(merged.entries.is_empty());
    }
}
