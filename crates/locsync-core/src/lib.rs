//! Key-level localization sync engine
//!
//! This crate synchronizes per-key localization resources with a remote
//! project store using optimistic concurrency:
//!
//! - **Resource backends**: discover languages and read/write entries per format
//! - **Baseline**: per (key, language) content hashes recorded after each sync
//! - **Merge**: minimal upserts and deletions against the baseline
//! - **Conflicts**: force, report-only and interactive resolution policies
//! - **Remote**: compare-and-swap contract, HTTP client and in-memory store
//! - **SyncEngine**: the push cycle and the offline status preview
//!
//! # Architecture
//!
//! ```text
//!                 locsync-cli
//!                      |
//!                 locsync-core
//!                      |
//!                  locsync-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use locsync_core::{
//!     BaselineStore, CancellationToken, ForcePolicy, JsonBackend, MemoryRemote, PushOptions,
//!     SyncEngine,
//! };
//!
//! let backend = JsonBackend::new(root.join("locales"), Some("en".into()));
//! let engine = SyncEngine::new(&backend, BaselineStore::for_project(&root));
//! let report = engine.push(
//!     &MemoryRemote::new("app"),
//!     &mut ForcePolicy,
//!     &PushOptions::default(),
//!     &CancellationToken::new(),
//! )?;
//! ```

pub mod baseline;
pub mod cancel;
pub mod config;
pub mod conflict;
pub mod error;
pub mod extract;
pub mod merge;
pub mod remote;
pub mod resource;
pub mod sync;

pub use baseline::{BASELINE_VERSION, BaselineState, BaselineStore, EntryHashes, LoadedBaseline};
pub use cancel::CancellationToken;
pub use config::{RemoteSection, ResourcesSection, SyncConfig};
pub use conflict::{
    BatchMode, Conflict, ConflictChoice, ConflictPrompt, ForcePolicy, InteractivePolicy,
    ReportOnlyPolicy, Resolution, ResolutionChoice, ResolutionOutcome, ResolutionPolicy,
    ResolutionTarget, ScriptedPrompt,
};
pub use error::{Error, Result};
pub use extract::{LocalEntry, content_hash, extract_entries, extract_in_scope};
pub use merge::{
    ChangeSet, Deletion, SyncScope, Upsert, compute_push_changes, compute_push_changes_in_scope,
};
pub use remote::{
    HttpRemote, KeySyncPushRequest, KeySyncPushResponse, KeySyncResolveRequest,
    KeySyncResolveResponse, MemoryRemote, ProjectMetadata, RemoteService, check_compatibility,
};
pub use resource::{
    JsonBackend, LanguageDescriptor, MemoryBackend, ResourceBackend, ResourceEntry, ResourceFile,
};
pub use sync::{PushOptions, PushReport, PushStatus, StatusReport, SyncEngine};
