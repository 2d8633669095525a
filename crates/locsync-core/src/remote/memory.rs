//! In-memory remote store
//!
//! Reference implementation of the remote contract:
//! - an upsert whose value hash already equals the stored hash is a
//!   confirmed match;
//! - otherwise it is applied only if its base hash equals the stored hash,
//!   or if nothing is stored;
//! - anything else is reported as a conflict and left untouched.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{
    KeySyncPushRequest, KeySyncPushResponse, KeySyncResolveRequest, KeySyncResolveResponse,
    ProjectMetadata, RemoteService,
};
use crate::cancel::CancellationToken;
use crate::conflict::{Conflict, ResolutionChoice};
use crate::extract::content_hash;
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    hash: String,
    updated_at: DateTime<Utc>,
}

impl StoredValue {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            hash: content_hash(value),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
struct RemoteState {
    values: BTreeMap<String, BTreeMap<String, StoredValue>>,
    push_calls: usize,
    resolve_calls: usize,
    last_message: Option<String>,
}

impl RemoteState {
    fn get(&self, key: &str, language: &str) -> Option<&StoredValue> {
        self.values.get(key).and_then(|languages| languages.get(language))
    }

    fn put(&mut self, key: &str, language: &str, value: &str) -> String {
        let stored = StoredValue::new(value);
        let hash = stored.hash.clone();
        self.values
            .entry(key.to_string())
            .or_default()
            .insert(language.to_string(), stored);
        hash
    }

    fn delete(&mut self, key: &str, language: &str) -> bool {
        let Some(languages) = self.values.get_mut(key) else {
            return false;
        };
        let removed = languages.remove(language).is_some();
        if languages.is_empty() {
            self.values.remove(key);
        }
        removed
    }
}

/// Remote store kept in memory
#[derive(Debug)]
pub struct MemoryRemote {
    project: ProjectMetadata,
    state: Mutex<RemoteState>,
}

impl MemoryRemote {
    /// Empty JSON project with key sync enabled.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_project(ProjectMetadata {
            name: name.into(),
            format: "json".into(),
            default_language: None,
            languages: Vec::new(),
            key_sync: true,
        })
    }

    pub fn with_project(project: ProjectMetadata) -> Self {
        Self {
            project,
            state: Mutex::new(RemoteState::default()),
        }
    }

    /// Store a value directly, as another client would.
    pub fn set_value(&self, key: &str, language: &str, value: &str) {
        self.lock().put(key, language, value);
    }

    pub fn value(&self, key: &str, language: &str) -> Option<String> {
        self.lock().get(key, language).map(|s| s.value.clone())
    }

    /// Number of stored (key, language) pairs.
    pub fn pair_count(&self) -> usize {
        self.lock().values.values().map(BTreeMap::len).sum()
    }

    pub fn push_calls(&self) -> usize {
        self.lock().push_calls
    }

    pub fn resolve_calls(&self) -> usize {
        self.lock().resolve_calls
    }

    pub fn last_message(&self) -> Option<String> {
        self.lock().last_message.clone()
    }

    fn lock(&self) -> MutexGuard<'_, RemoteState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RemoteService for MemoryRemote {
    fn get_project(&self, cancel: &CancellationToken) -> Result<ProjectMetadata> {
        cancel.check()?;
        Ok(self.project.clone())
    }

    fn key_sync_push(
        &self,
        request: &KeySyncPushRequest,
        cancel: &CancellationToken,
    ) -> Result<KeySyncPushResponse> {
        cancel.check()?;
        let mut state = self.lock();
        state.push_calls += 1;
        state.last_message = request.message.clone();

        let mut response = KeySyncPushResponse::default();

        for upsert in &request.entries {
            let new_hash = content_hash(&upsert.value);
            let conflict = match state.get(&upsert.key, &upsert.language) {
                Some(stored) if stored.hash == new_hash => {
                    response
                        .new_hashes
                        .insert(&upsert.key, &upsert.language, &new_hash);
                    continue;
                }
                Some(stored) if upsert.base_hash.as_deref() != Some(stored.hash.as_str()) => {
                    Some(Conflict {
                        key: upsert.key.clone(),
                        language: upsert.language.clone(),
                        local_value: upsert.value.clone(),
                        remote_value: stored.value.clone(),
                        remote_updated_at: stored.updated_at,
                    })
                }
                _ => None,
            };

            match conflict {
                Some(conflict) => response.conflicts.push(conflict),
                None => {
                    let hash = state.put(&upsert.key, &upsert.language, &upsert.value);
                    response.new_hashes.insert(&upsert.key, &upsert.language, hash);
                    response.applied += 1;
                }
            }
        }

        for deletion in &request.deletions {
            match &deletion.language {
                Some(language) => {
                    if state.delete(&deletion.key, language) {
                        response.deleted += 1;
                    }
                }
                None => {
                    response.deleted += state.values.remove(&deletion.key).map_or(0, |l| l.len());
                }
            }
        }

        Ok(response)
    }

    fn key_sync_resolve(
        &self,
        request: &KeySyncResolveRequest,
        cancel: &CancellationToken,
    ) -> Result<KeySyncResolveResponse> {
        cancel.check()?;

        if let Some(invalid) = request.resolutions.iter().find(|r| {
            r.choice != ResolutionChoice::Remote && r.edited_value.is_none()
        }) {
            return Err(Error::Http {
                status: 400,
                message: format!(
                    "resolution for {}/{} needs an editedValue",
                    invalid.key, invalid.language
                ),
            });
        }

        let mut state = self.lock();
        state.resolve_calls += 1;
        let mut response = KeySyncResolveResponse::default();

        for resolution in &request.resolutions {
            match (resolution.choice, resolution.edited_value.as_deref()) {
                (ResolutionChoice::Remote, _) => {
                    if let Some(stored) = state.get(&resolution.key, &resolution.language) {
                        let hash = stored.hash.clone();
                        response
                            .new_hashes
                            .insert(&resolution.key, &resolution.language, hash);
                    }
                }
                (_, Some(value)) => {
                    let hash = state.put(&resolution.key, &resolution.language, value);
                    response
                        .new_hashes
                        .insert(&resolution.key, &resolution.language, hash);
                    response.applied += 1;
                }
                (_, None) => {}
            }
        }

        Ok(response)
    }
}
