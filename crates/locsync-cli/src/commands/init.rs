//! Init command implementation
//!
//! Writes `.locsync/config.toml` and creates the resource directory.

use std::path::Path;

use colored::Colorize;
use locsync_core::{RemoteSection, ResourcesSection, SyncConfig};
use locsync_fs::NormalizedPath;

use crate::cli::InitArgs;
use crate::error::{CliError, Result};

/// Run the init command
pub fn run_init(path: &Path, args: &InitArgs) -> Result<()> {
    let root = NormalizedPath::new(path);
    let config_path = SyncConfig::path(&root);
    if config_path.exists() {
        return Err(CliError::user(format!(
            "{} already exists; edit it instead of re-running init",
            config_path
        )));
    }

    let config = build_config(args);
    config.open_backend(&root)?;
    if config.remote.is_some() {
        config.remote()?;
    }

    let resource_dir = config.resource_dir(&root);
    if !resource_dir.exists() {
        std::fs::create_dir_all(resource_dir.to_native())?;
    }
    config.save(&root)?;

    println!(
        "{} Initialized locsync in {}",
        "OK".green().bold(),
        path.display()
    );
    println!("   Resources: {}", config.resources.path.yellow());
    match &config.remote {
        Some(remote) => println!("   Remote:    {} ({})", remote.url.yellow(), remote.project.cyan()),
        None => println!(
            "   Remote:    {} (add a [remote] section before {})",
            "none".dimmed(),
            "locsync push".cyan()
        ),
    }
    Ok(())
}

fn build_config(args: &InitArgs) -> SyncConfig {
    let remote = match (&args.remote_url, &args.project) {
        (Some(url), Some(project)) => Some(RemoteSection {
            url: url.clone(),
            project: project.clone(),
            timeout_secs: 30,
        }),
        _ => None,
    };

    SyncConfig {
        resources: ResourcesSection {
            path: args.resources.clone(),
            format: args.format.clone(),
            default_language: args.default_language.clone(),
        },
        remote,
    }
}
