//! In-memory resource backend

use std::sync::Mutex;

use locsync_fs::NormalizedPath;

use super::{LanguageDescriptor, ResourceBackend, ResourceEntry, ResourceFile};
use crate::{Error, Result};

/// Resource backend holding languages in memory.
///
/// Languages keep their insertion order. Useful for embedding the engine
/// without a filesystem and for tests.
#[derive(Debug)]
pub struct MemoryBackend {
    format: String,
    languages: Mutex<Vec<(String, Vec<ResourceEntry>)>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_format("json")
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            languages: Mutex::new(Vec::new()),
        }
    }

    /// Add (or replace) a language with the given key/value pairs.
    pub fn with_language(self, code: &str, pairs: &[(&str, &str)]) -> Self {
        {
            let mut languages = self.lock();
            let entries = pairs
                .iter()
                .map(|(key, value)| ResourceEntry::new(*key, *value))
                .collect();
            match languages.iter_mut().find(|(c, _)| c == code) {
                Some(slot) => slot.1 = entries,
                None => languages.push((code.to_string(), entries)),
            }
        }
        self
    }

    /// Current value of a key, if present.
    pub fn value(&self, language: &str, key: &str) -> Option<String> {
        self.lock()
            .iter()
            .find(|(code, _)| code == language)
            .and_then(|(_, entries)| entries.iter().find(|e| e.key == key))
            .map(|e| e.value.clone())
    }

    /// Remove a key from one language. Returns whether it existed.
    pub fn remove_key(&self, language: &str, key: &str) -> bool {
        let mut languages = self.lock();
        let Some((_, entries)) = languages.iter_mut().find(|(code, _)| code == language) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.key != key);
        entries.len() != before
    }

    /// Remove a whole language.
    pub fn remove_language(&self, language: &str) {
        self.lock().retain(|(code, _)| code != language);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, Vec<ResourceEntry>)>> {
        self.languages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResourceBackend for MemoryBackend {
    fn format(&self) -> &str {
        &self.format
    }

    fn discover_languages(&self) -> Result<Vec<LanguageDescriptor>> {
        Ok(self
            .lock()
            .iter()
            .enumerate()
            .map(|(idx, (code, _))| LanguageDescriptor {
                code: code.clone(),
                path: NormalizedPath::new(format!("memory/{code}")),
                is_default: idx == 0,
            })
            .collect())
    }

    fn read_resource_file(&self, language: &LanguageDescriptor) -> Result<ResourceFile> {
        self.lock()
            .iter()
            .find(|(code, _)| *code == language.code)
            .map(|(_, entries)| ResourceFile {
                entries: entries.clone(),
            })
            .ok_or_else(|| Error::resource(language.path.as_str(), "language not present"))
    }

    fn write_value(&self, language: &str, key: &str, value: &str) -> Result<()> {
        let mut languages = self.lock();
        let entries = match languages.iter_mut().position(|(code, _)| code == language) {
            Some(idx) => &mut languages[idx].1,
            None => {
                languages.push((language.to_string(), Vec::new()));
                let last = languages.len() - 1;
                &mut languages[last].1
            }
        };
        match entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value.to_string(),
            None => entries.push(ResourceEntry::new(key, value)),
        }
        Ok(())
    }
}
