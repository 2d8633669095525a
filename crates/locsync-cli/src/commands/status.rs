//! Status command implementation

use std::path::Path;

use colored::Colorize;
use locsync_core::{BaselineStore, SyncConfig, SyncEngine, SyncScope};

use super::{print_changes, print_warnings};
use crate::context::require_project_root;
use crate::error::Result;

/// Run the status command
///
/// Diffs local resources against the baseline; never contacts the remote.
pub fn run_status(path: &Path, languages: &[String], json: bool) -> Result<()> {
    let root = require_project_root(path)?;
    let config = SyncConfig::load(&root)?;
    let backend = config.open_backend(&root)?;
    let engine = SyncEngine::new(backend.as_ref(), BaselineStore::for_project(&root));

    let report = engine.preview(&SyncScope::languages(languages.iter().cloned()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_warnings(&report.warnings);
    if report.first_sync {
        println!("{}", "No baseline yet; the next push uploads every entry.".dimmed());
    }
    if report.changes.is_empty() {
        println!("{} Everything is in sync", "OK".green().bold());
        return Ok(());
    }

    println!(
        "{} {} change(s), {} deletion(s) pending",
        "=>".blue().bold(),
        report.changes.entries.len(),
        report.changes.deletions.len()
    );
    print_changes(&report.changes);
    Ok(())
}
