//! Baseline persistence
//!
//! The baseline is a JSON document at `.locsync/baseline.json`. Loading
//! never fails on bad content: a malformed file or a legacy file-hash
//! baseline is reported and the cycle proceeds as a first sync.

use locsync_fs::{NormalizedPath, ProjectPath, io};
use serde_json::Value;

use super::{BASELINE_VERSION, BaselineState};
use crate::{Error, Result};

/// Result of loading the baseline file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedBaseline {
    /// The usable baseline, or `None` when the cycle is a first sync
    pub state: Option<BaselineState>,
    /// The file existed but could not be parsed
    pub was_corrupted: bool,
    /// The file holds the legacy file-hash format
    pub needs_migration: bool,
}

impl LoadedBaseline {
    fn first_sync() -> Self {
        Self::default()
    }

    fn corrupted() -> Self {
        Self {
            was_corrupted: true,
            ..Self::default()
        }
    }

    fn legacy() -> Self {
        Self {
            needs_migration: true,
            ..Self::default()
        }
    }
}

/// Reads and writes the baseline file
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: NormalizedPath,
}

impl BaselineStore {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    /// Store at the fixed location inside a project root.
    pub fn for_project(root: &NormalizedPath) -> Self {
        Self::new(root.join(ProjectPath::BaselineFile.as_str()))
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Load the baseline.
    ///
    /// # Errors
    ///
    /// I/O failures other than a missing file are errors, as is a baseline
    /// written by a newer format version.
    pub fn load(&self) -> Result<LoadedBaseline> {
        let Some(content) = io::read_text_if_exists(&self.path)? else {
            tracing::debug!(path = %self.path, "no baseline, first sync");
            return Ok(LoadedBaseline::first_sync());
        };

        let document = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => document,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path, "baseline is not a JSON object, treating as first sync");
                return Ok(LoadedBaseline::corrupted());
            }
        };

        let version = document.get("version").and_then(Value::as_u64);
        let has_entries = document.contains_key("entries");
        let has_files = document.contains_key("files");

        match version {
            Some(v) if v > u64::from(BASELINE_VERSION) => {
                return Err(Error::compatibility(format!(
                    "baseline {} has format version {v}, newer than supported version {BASELINE_VERSION}",
                    self.path
                )));
            }
            Some(v) if v < u64::from(BASELINE_VERSION) => {
                tracing::warn!(path = %self.path, version = v, "legacy file-level baseline found");
                return Ok(LoadedBaseline::legacy());
            }
            None if has_files && !has_entries => {
                tracing::warn!(path = %self.path, "unversioned file-level baseline found");
                return Ok(LoadedBaseline::legacy());
            }
            _ => {}
        }

        match serde_json::from_value::<BaselineState>(Value::Object(document)) {
            Ok(state) => {
                tracing::debug!(
                    path = %self.path,
                    pairs = state.entries.len(),
                    "loaded baseline"
                );
                Ok(LoadedBaseline {
                    state: Some(state),
                    ..LoadedBaseline::default()
                })
            }
            Err(e) => {
                tracing::warn!(path = %self.path, error = %e, "baseline is malformed, treating as first sync");
                Ok(LoadedBaseline::corrupted())
            }
        }
    }

    /// Persist the baseline in a single atomic write.
    pub fn save(&self, state: &BaselineState) -> Result<()> {
        let mut content = serde_json::to_string_pretty(state)?;
        content.push('\n');
        io::write_text(&self.path, &content)?;
        tracing::info!(path = %self.path, pairs = state.entries.len(), "baseline saved");
        Ok(())
    }
}
