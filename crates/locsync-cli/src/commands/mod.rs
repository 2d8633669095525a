//! Command implementations for locsync-cli

pub mod init;
pub mod push;
pub mod status;

pub use init::run_init;
pub use push::run_push;
pub use status::run_status;

use colored::Colorize;
use locsync_core::ChangeSet;

/// Print a changeset grouped as added, modified and deleted pairs.
pub(crate) fn print_changes(changes: &ChangeSet) {
    for upsert in changes.added() {
        println!("  {} {} [{}]", "+".green(), upsert.key, upsert.language);
    }
    for upsert in changes.modified() {
        println!("  {} {} [{}]", "~".yellow(), upsert.key, upsert.language);
    }
    for deletion in &changes.deletions {
        let language = deletion.language.as_deref().unwrap_or("all languages");
        println!("  {} {} [{}]", "-".red(), deletion.key, language);
    }
}

pub(crate) fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
}
