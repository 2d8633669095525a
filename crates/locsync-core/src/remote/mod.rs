//! Remote project store contract
//!
//! The remote must apply compare-and-swap per (key, language): an upsert
//! whose base hash does not match the stored hash is returned as a
//! [`Conflict`] instead of being applied.

mod http;
mod memory;

pub use http::HttpRemote;
pub use memory::MemoryRemote;

use serde::{Deserialize, Serialize};

use crate::baseline::EntryHashes;
use crate::cancel::CancellationToken;
use crate::conflict::{Conflict, Resolution};
use crate::merge::{ChangeSet, Deletion, Upsert};
use crate::{Error, Result};

fn default_true() -> bool {
    true
}

/// Remote project description used for compatibility checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub name: String,
    /// Resource format the remote project stores
    pub format: String,
    #[serde(default)]
    pub default_language: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Whether the project accepts key-level sync calls
    #[serde(default = "default_true")]
    pub key_sync: bool,
}

/// Body of a key-level push
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySyncPushRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub entries: Vec<Upsert>,
    pub deletions: Vec<Deletion>,
}

impl KeySyncPushRequest {
    pub fn from_changes(changes: &ChangeSet, message: Option<String>) -> Self {
        Self {
            message,
            entries: changes.entries.clone(),
            deletions: changes.deletions.clone(),
        }
    }
}

/// Result of a key-level push
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySyncPushResponse {
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
    #[serde(default)]
    pub applied: usize,
    #[serde(default)]
    pub deleted: usize,
    /// Hash now stored for every pair the remote wrote or confirmed
    #[serde(default)]
    pub new_hashes: EntryHashes,
}

/// Body of a conflict resolution call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySyncResolveRequest {
    pub resolutions: Vec<Resolution>,
}

/// Result of a conflict resolution call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySyncResolveResponse {
    #[serde(default)]
    pub applied: usize,
    #[serde(default)]
    pub new_hashes: EntryHashes,
}

/// Blocking request/response access to the remote project store.
///
/// Every call receives the cycle's cancellation token and returns
/// [`Error::Cancelled`] if the token is set when the call starts or when the
/// response arrives. A request already in flight is not interrupted: it runs
/// until the response or the transport timeout (`[remote] timeout_secs`).
pub trait RemoteService {
    fn get_project(&self, cancel: &CancellationToken) -> Result<ProjectMetadata>;

    fn key_sync_push(
        &self,
        request: &KeySyncPushRequest,
        cancel: &CancellationToken,
    ) -> Result<KeySyncPushResponse>;

    fn key_sync_resolve(
        &self,
        request: &KeySyncResolveRequest,
        cancel: &CancellationToken,
    ) -> Result<KeySyncResolveResponse>;
}

/// Verify the remote project can be synchronized with a local backend.
pub fn check_compatibility(project: &ProjectMetadata, local_format: &str) -> Result<()> {
    if !project.format.eq_ignore_ascii_case(local_format) {
        return Err(Error::compatibility(format!(
            "remote project '{}' stores {} resources but local files are {}",
            project.name, project.format, local_format
        )));
    }
    if !project.key_sync {
        return Err(Error::compatibility(format!(
            "remote project '{}' does not accept key-level sync",
            project.name
        )));
    }
    Ok(())
}
