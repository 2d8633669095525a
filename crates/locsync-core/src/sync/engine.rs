//! SyncEngine implementation
//!
//! One push cycle runs these steps in order, each handing its result to the
//! next:
//!
//! 1. fetch project metadata and check compatibility
//! 2. load the baseline (recovering from corrupted or legacy files)
//! 3. extract local entries within the scope
//! 4. compute the changeset
//! 5. push it
//! 6. resolve conflicts through the policy and report resolutions
//! 7. write resolved values back to local files
//! 8. merge and save the baseline, once
//!
//! Any error or cancellation before step 8 leaves the baseline file as it
//! was.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::report::{PushReport, PushStatus, StatusReport};
use crate::Result;
use crate::baseline::{BaselineState, BaselineStore, EntryHashes, LoadedBaseline};
use crate::cancel::CancellationToken;
use crate::conflict::{Conflict, Resolution, ResolutionOutcome, ResolutionPolicy};
use crate::extract::{LocalEntry, extract_in_scope};
use crate::merge::{SyncScope, compute_push_changes_in_scope};
use crate::remote::{KeySyncPushRequest, KeySyncResolveRequest, RemoteService, check_compatibility};
use crate::resource::ResourceBackend;

/// Options for a push cycle
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Message recorded with the push on the remote
    pub message: Option<String>,
    /// Compute and report the changeset without pushing
    pub dry_run: bool,
    /// Languages the cycle may touch
    pub scope: SyncScope,
}

/// Engine for key-level synchronization of one project
pub struct SyncEngine<'a> {
    backend: &'a dyn ResourceBackend,
    store: BaselineStore,
}

/// Result of the conflict resolution step
enum ResolutionStep {
    /// Resolutions reported to the remote, with the hashes it now holds
    Reported {
        resolutions: Vec<Resolution>,
        applied: usize,
        new_hashes: EntryHashes,
    },
    Declined,
    Aborted,
}

impl<'a> SyncEngine<'a> {
    pub fn new(backend: &'a dyn ResourceBackend, store: BaselineStore) -> Self {
        Self { backend, store }
    }

    pub fn store(&self) -> &BaselineStore {
        &self.store
    }

    /// Diff local state against the baseline without contacting the remote.
    pub fn preview(&self, scope: &SyncScope) -> Result<StatusReport> {
        let loaded = self.store.load()?;
        let warnings = self.baseline_warnings(&loaded);
        let entries = extract_in_scope(self.backend, scope)?;
        let changes = compute_push_changes_in_scope(&entries, loaded.state.as_ref(), scope);

        Ok(StatusReport {
            changes,
            first_sync: loaded.state.is_none(),
            warnings,
        })
    }

    /// Run one push cycle.
    ///
    /// Conflicts the policy declines end the cycle as
    /// [`PushStatus::Unresolved`], and an abort as [`PushStatus::Aborted`];
    /// neither writes the baseline.
    ///
    /// # Errors
    ///
    /// Compatibility, transport and resource failures are errors, as is
    /// observing `cancel`. The baseline is untouched in every error case.
    pub fn push(
        &self,
        remote: &dyn RemoteService,
        policy: &mut dyn ResolutionPolicy,
        options: &PushOptions,
        cancel: &CancellationToken,
    ) -> Result<PushReport> {
        cancel.check()?;
        let project = remote.get_project(cancel)?;
        check_compatibility(&project, self.backend.format())?;
        debug!(project = %project.name, "remote project is compatible");

        let loaded = self.store.load()?;
        let warnings = self.baseline_warnings(&loaded);
        let baseline = loaded.state;

        cancel.check()?;
        let entries = extract_in_scope(self.backend, &options.scope)?;
        let changes = compute_push_changes_in_scope(&entries, baseline.as_ref(), &options.scope);

        if changes.is_empty() {
            info!("nothing to sync");
            return Ok(PushReport::new(PushStatus::NothingToSync, changes, warnings));
        }
        if options.dry_run {
            info!(
                upserts = changes.entries.len(),
                deletions = changes.deletions.len(),
                "dry run, changes not pushed"
            );
            return Ok(PushReport::new(PushStatus::Preview, changes, warnings));
        }

        cancel.check()?;
        let request = KeySyncPushRequest::from_changes(&changes, options.message.clone());
        let pushed = remote.key_sync_push(&request, cancel)?;
        info!(
            applied = pushed.applied,
            deleted = pushed.deleted,
            conflicts = pushed.conflicts.len(),
            "changes pushed"
        );

        let mut report = PushReport::new(PushStatus::Pushed, changes, warnings);
        report.applied = pushed.applied;
        report.deleted = pushed.deleted;
        let mut new_hashes = pushed.new_hashes;

        let entries = if pushed.conflicts.is_empty() {
            entries
        } else {
            match self.resolve_conflicts(remote, policy, &pushed.conflicts, cancel)? {
                ResolutionStep::Reported {
                    resolutions,
                    applied,
                    new_hashes: resolved_hashes,
                } => {
                    report.applied += applied;
                    new_hashes.merge(&resolved_hashes);
                    let entries = self.write_back(entries, &pushed.conflicts, &resolutions)?;
                    report.resolved = resolutions;
                    entries
                }
                ResolutionStep::Declined => {
                    report.status = PushStatus::Unresolved;
                    report.conflicts = pushed.conflicts;
                    return Ok(report);
                }
                ResolutionStep::Aborted => {
                    report.status = PushStatus::Aborted;
                    report.conflicts = pushed.conflicts;
                    return Ok(report);
                }
            }
        };

        cancel.check()?;
        let state = BaselineState::merged(
            baseline.as_ref(),
            &report.changes.deletions,
            &new_hashes,
            &entries,
            Utc::now(),
        );
        self.store.save(&state)?;

        Ok(report)
    }

    /// Ask the policy for resolutions and report them to the remote.
    fn resolve_conflicts(
        &self,
        remote: &dyn RemoteService,
        policy: &mut dyn ResolutionPolicy,
        conflicts: &[Conflict],
        cancel: &CancellationToken,
    ) -> Result<ResolutionStep> {
        cancel.check()?;
        let resolutions = match policy.resolve(conflicts)? {
            ResolutionOutcome::Resolved(resolutions) => resolutions,
            ResolutionOutcome::Declined => {
                warn!(count = conflicts.len(), "conflicts left unresolved");
                return Ok(ResolutionStep::Declined);
            }
            ResolutionOutcome::Aborted => {
                info!("conflict resolution aborted");
                return Ok(ResolutionStep::Aborted);
            }
        };

        cancel.check()?;
        let request = KeySyncResolveRequest {
            resolutions: resolutions.clone(),
        };
        let response = remote.key_sync_resolve(&request, cancel)?;
        info!(applied = response.applied, "conflict resolutions reported");

        Ok(ResolutionStep::Reported {
            resolutions,
            applied: response.applied,
            new_hashes: response.new_hashes,
        })
    }

    /// Write remote and edited values to local files and return the entries
    /// as they now stand on disk.
    fn write_back(
        &self,
        mut entries: Vec<LocalEntry>,
        conflicts: &[Conflict],
        resolutions: &[Resolution],
    ) -> Result<Vec<LocalEntry>> {
        for resolution in resolutions {
            let Some(conflict) = conflicts
                .iter()
                .find(|c| c.key == resolution.key && c.language == resolution.language)
            else {
                continue;
            };
            let value = resolution.resolved_value(conflict);
            let Some(entry) = entries
                .iter_mut()
                .find(|e| e.key == resolution.key && e.language == resolution.language)
            else {
                continue;
            };
            if entry.value == value {
                continue;
            }

            debug!(key = %entry.key, language = %entry.language, "writing resolved value");
            self.backend.write_value(&entry.language, &entry.key, value)?;
            *entry = LocalEntry::new(&entry.key, &entry.language, value);
        }
        Ok(entries)
    }

    fn baseline_warnings(&self, loaded: &LoadedBaseline) -> Vec<String> {
        let path = self.store.path();
        let mut warnings = Vec::new();
        if loaded.was_corrupted {
            warnings.push(format!(
                "baseline {path} could not be read; every entry is treated as new"
            ));
        }
        if loaded.needs_migration {
            warnings.push(format!(
                "baseline {path} uses the old file-level format; it will be replaced after this sync"
            ));
        }
        warnings
    }
}
