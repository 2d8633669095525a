//! Push command implementation

use std::path::Path;

use colored::Colorize;
use locsync_core::{
    BaselineStore, CancellationToken, Conflict, ForcePolicy, HttpRemote, InteractivePolicy,
    PushOptions, PushReport, PushStatus, ReportOnlyPolicy, ResolutionPolicy, SyncConfig,
    SyncEngine, SyncScope,
};

use super::{print_changes, print_warnings};
use crate::cli::PushArgs;
use crate::context::require_project_root;
use crate::error::{CliError, Result};
use crate::interactive::DialoguerPrompt;

/// Run the push command
///
/// Configuration and credentials are validated before any request.
pub fn run_push(path: &Path, args: &PushArgs) -> Result<()> {
    let root = require_project_root(path)?;
    let config = SyncConfig::load(&root)?;
    let remote_section = config.remote()?;
    let token = args.token.clone().ok_or_else(|| locsync_core::Error::Authentication {
        message: "no access token; pass --token or set LOCSYNC_TOKEN".into(),
    })?;
    let remote = HttpRemote::new(remote_section, token)?;
    let backend = config.open_backend(&root)?;
    let engine = SyncEngine::new(backend.as_ref(), BaselineStore::for_project(&root));

    let options = PushOptions {
        message: args.message.clone(),
        dry_run: args.dry_run,
        scope: SyncScope::languages(args.languages.iter().cloned()),
    };
    let mut policy = policy_for(args);

    println!(
        "{} Pushing to {} ({})...",
        "=>".blue().bold(),
        remote_section.url.cyan(),
        remote_section.project
    );
    let report = engine.push(&remote, policy.as_mut(), &options, &CancellationToken::new())?;

    print_report(&report);
    match report.status {
        PushStatus::Unresolved => Err(CliError::user(format!(
            "{} conflict(s) left unresolved; rerun with --interactive or --force",
            report.conflicts.len()
        ))),
        PushStatus::Aborted => Err(CliError::user("push aborted; baseline left unchanged")),
        _ => Ok(()),
    }
}

fn policy_for(args: &PushArgs) -> Box<dyn ResolutionPolicy> {
    if args.force {
        Box::new(ForcePolicy)
    } else if args.interactive {
        Box::new(InteractivePolicy::new(DialoguerPrompt::new()))
    } else {
        Box::new(ReportOnlyPolicy)
    }
}

fn print_report(report: &PushReport) {
    print_warnings(&report.warnings);

    match report.status {
        PushStatus::NothingToSync => {
            println!("{} Nothing to sync", "OK".green().bold());
        }
        PushStatus::Preview => {
            println!(
                "{} [dry-run] Would push {} change(s) and {} deletion(s)",
                "=>".blue().bold(),
                report.changes.entries.len(),
                report.changes.deletions.len()
            );
            print_changes(&report.changes);
        }
        PushStatus::Pushed => {
            print_changes(&report.changes);
            if !report.resolved.is_empty() {
                println!("   Resolved {} conflict(s)", report.resolved.len());
            }
            println!(
                "{} Applied {}, deleted {}",
                "OK".green().bold(),
                report.applied,
                report.deleted
            );
        }
        PushStatus::Unresolved => {
            println!("{} Conflicts with remote changes:", "!".yellow().bold());
            for conflict in &report.conflicts {
                println!("  {} {}", "~".yellow(), format_conflict(conflict));
            }
        }
        PushStatus::Aborted => {
            println!("{} Push aborted; still in conflict:", "!".yellow().bold());
            for conflict in &report.conflicts {
                println!("  {} {}", "~".yellow(), format_conflict(conflict));
            }
        }
    }
}

/// One conflict line: pair, both values and when the remote changed.
fn format_conflict(conflict: &Conflict) -> String {
    format!(
        "{} [{}]: local {:?}, remote {:?} (remote updated {})",
        conflict.key,
        conflict.language,
        conflict.local_value,
        conflict.remote_value,
        conflict.remote_updated_at.format("%Y-%m-%d %H:%M UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use locsync_test_utils::TestProject;

    fn args(token: Option<&str>) -> PushArgs {
        PushArgs {
            message: None,
            dry_run: false,
            force: false,
            interactive: false,
            languages: Vec::new(),
            token: token.map(str::to_string),
        }
    }

    #[test]
    fn conflict_line_shows_values_and_remote_timestamp() {
        let conflict = Conflict {
            key: "Greeting".into(),
            language: "fr".into(),
            local_value: "Salut".into(),
            remote_value: "Bonjour".into(),
            remote_updated_at: "2026-03-04T05:06:07Z".parse().unwrap(),
        };

        let line = format_conflict(&conflict);

        assert_eq!(
            line,
            "Greeting [fr]: local \"Salut\", remote \"Bonjour\" (remote updated 2026-03-04 05:06 UTC)"
        );
    }

    #[test]
    fn push_without_remote_is_a_configuration_error() {
        let project = TestProject::new();
        project.init(None);

        let result = run_push(project.root(), &args(Some("token")));

        assert!(matches!(
            result,
            Err(CliError::Core(locsync_core::Error::Configuration { .. }))
        ));
    }

    #[test]
    fn push_without_token_is_an_authentication_error() {
        let project = TestProject::new();
        project.init(Some(("http://127.0.0.1:9", "app")));

        let result = run_push(project.root(), &args(None));

        assert!(matches!(
            result,
            Err(CliError::Core(locsync_core::Error::Authentication { .. }))
        ));
    }

    #[test]
    fn unreachable_remote_is_a_network_error() {
        let project = TestProject::new();
        project.init(Some(("http://127.0.0.1:9", "app")));
        project.write_resource("en", &[("A", "a")]);

        let result = run_push(project.root(), &args(Some("token")));

        assert!(matches!(
            result,
            Err(CliError::Core(locsync_core::Error::Network { .. }))
        ));
        project.assert_file_not_exists(".locsync/baseline.json");
    }
}
