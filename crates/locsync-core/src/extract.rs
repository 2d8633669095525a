//! Entry extraction
//!
//! Flattens every language's resource file into hashed [`LocalEntry`]
//! values. Extraction is a pure read of the backend.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::merge::SyncScope;
use crate::resource::{LanguageDescriptor, ResourceBackend};

/// Content hash of a value.
///
/// The same function is used by the reference remote, so a hash reported by
/// the remote for a value equals the hash computed locally for it.
pub fn content_hash(value: &str) -> String {
    locsync_fs::compute_content_checksum(value)
}

/// One (key, language) value present in the local resource files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalEntry {
    pub key: String,
    pub language: String,
    pub value: String,
    pub content_hash: String,
}

impl LocalEntry {
    /// Create an entry, hashing its value.
    pub fn new(key: impl Into<String>, language: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            key: key.into(),
            language: language.into(),
            content_hash: content_hash(&value),
            value,
        }
    }

    /// Create an entry with an explicit hash.
    pub fn with_hash(
        key: impl Into<String>,
        language: impl Into<String>,
        value: impl Into<String>,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            language: language.into(),
            value: value.into(),
            content_hash: content_hash.into(),
        }
    }
}

/// Extract entries for the given languages.
///
/// Languages are visited in the given order and keys in file order.
pub fn extract_entries(
    backend: &dyn ResourceBackend,
    languages: &[LanguageDescriptor],
) -> Result<Vec<LocalEntry>> {
    let mut entries = Vec::new();
    for language in languages {
        let file = backend.read_resource_file(language)?;
        tracing::debug!(
            language = %language.code,
            count = file.entries.len(),
            "extracted resource file"
        );
        entries.extend(
            file.entries
                .into_iter()
                .map(|entry| LocalEntry::new(entry.key, language.code.clone(), entry.value)),
        );
    }
    Ok(entries)
}

/// Discover the backend's languages and extract those inside `scope`.
pub fn extract_in_scope(backend: &dyn ResourceBackend, scope: &SyncScope) -> Result<Vec<LocalEntry>> {
    let languages: Vec<_> = backend
        .discover_languages()?
        .into_iter()
        .filter(|language| scope.contains(&language.code))
        .collect();
    extract_entries(backend, &languages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryBackend;
    use pretty_assertions::assert_eq;

    #[test]
    fn entries_are_flattened_per_language() {
        let backend = MemoryBackend::new()
            .with_language("en", &[("Greeting", "Hello"), ("Farewell", "Bye")])
            .with_language("fr", &[("Greeting", "Bonjour")]);

        let entries = extract_in_scope(&backend, &SyncScope::All).unwrap();

        let pairs: Vec<_> = entries
            .iter()
            .map(|e| (e.key.as_str(), e.language.as_str(), e.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Greeting", "en", "Hello"),
                ("Farewell", "en", "Bye"),
                ("Greeting", "fr", "Bonjour"),
            ]
        );
    }

    #[test]
    fn extraction_is_repeatable() {
        let backend = MemoryBackend::new().with_language("en", &[("A", "a"), ("B", "")]);

        let first = extract_in_scope(&backend, &SyncScope::All).unwrap();
        let second = extract_in_scope(&backend, &SyncScope::All).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn empty_value_is_still_an_entry() {
        let backend = MemoryBackend::new().with_language("en", &[("Empty", "")]);

        let entries = extract_in_scope(&backend, &SyncScope::All).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content_hash, content_hash(""));
    }

    #[test]
    fn scope_filters_languages() {
        let backend = MemoryBackend::new()
            .with_language("en", &[("A", "a")])
            .with_language("fr", &[("A", "a-fr")]);

        let entries = extract_in_scope(&backend, &SyncScope::languages(["fr"])).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].language, "fr");
    }
}
