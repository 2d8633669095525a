//! Interactive conflict prompts
//!
//! Uses dialoguer for terminal-based selection and editing.

use colored::Colorize;
use dialoguer::{Input, Select};
use locsync_core::{BatchMode, Conflict, ConflictChoice, ConflictPrompt};

const BATCH_MODES: &[&str] = &[
    "Resolve each conflict",
    "Keep all local values",
    "Take all remote values",
    "Abort",
];

const CHOICES: &[&str] = &["Keep local", "Take remote", "Edit", "Abort"];

/// Terminal prompt for conflict resolution
#[derive(Debug, Default)]
pub struct DialoguerPrompt;

impl DialoguerPrompt {
    pub fn new() -> Self {
        Self
    }
}

fn prompt_error(e: dialoguer::Error) -> locsync_core::Error {
    locsync_core::Error::Io(std::io::Error::other(e.to_string()))
}

impl ConflictPrompt for DialoguerPrompt {
    fn choose_batch_mode(&mut self, conflicts: &[Conflict]) -> locsync_core::Result<BatchMode> {
        println!();
        println!(
            "{} {} conflict(s): the remote changed since your last sync",
            "!".yellow().bold(),
            conflicts.len()
        );
        for conflict in conflicts {
            println!("  {} {} [{}]", "~".yellow(), conflict.key.cyan(), conflict.language);
        }
        println!();

        let index = Select::new()
            .with_prompt("How should conflicts be resolved?")
            .items(BATCH_MODES)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        Ok(match index {
            0 => BatchMode::ResolveEach,
            1 => BatchMode::AllLocal,
            2 => BatchMode::AllRemote,
            _ => BatchMode::Abort,
        })
    }

    fn choose(
        &mut self,
        conflict: &Conflict,
        position: usize,
        total: usize,
    ) -> locsync_core::Result<ConflictChoice> {
        println!();
        println!(
            "{} {} [{}]",
            format!("({position}/{total})").dimmed(),
            conflict.key.cyan().bold(),
            conflict.language
        );
        println!("  {}  {}", "local:".green(), conflict.local_value);
        println!(
            "  {} {} {}",
            "remote:".red(),
            conflict.remote_value,
            format!("(updated {})", conflict.remote_updated_at.format("%Y-%m-%d %H:%M UTC")).dimmed()
        );

        let index = Select::new()
            .with_prompt("Keep which value?")
            .items(CHOICES)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        match index {
            0 => Ok(ConflictChoice::Local),
            1 => Ok(ConflictChoice::Remote),
            2 => {
                let value: String = Input::new()
                    .with_prompt("New value")
                    .with_initial_text(conflict.local_value.clone())
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_error)?;
                Ok(ConflictChoice::Edit(value))
            }
            _ => Ok(ConflictChoice::Abort),
        }
    }
}
