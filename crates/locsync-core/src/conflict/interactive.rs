//! Interactive conflict resolution
//!
//! The user first picks a batch mode, then (in per-conflict mode) a choice
//! for each conflict in turn. Aborting at any point discards everything
//! collected so far. Terminal I/O lives behind [`ConflictPrompt`].

use std::collections::VecDeque;

use super::{Conflict, Resolution, ResolutionOutcome, ResolutionPolicy};
use crate::Result;

/// How to handle the whole set of conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    ResolveEach,
    AllLocal,
    AllRemote,
    Abort,
}

/// Decision for a single conflict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictChoice {
    Local,
    Remote,
    Edit(String),
    Abort,
}

/// Source of user decisions
pub trait ConflictPrompt {
    fn choose_batch_mode(&mut self, conflicts: &[Conflict]) -> Result<BatchMode>;

    /// `position` is 1-based.
    fn choose(&mut self, conflict: &Conflict, position: usize, total: usize) -> Result<ConflictChoice>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolverState {
    AwaitingChoice { next: usize },
    Resolved,
    Aborted,
}

/// Policy that asks a [`ConflictPrompt`] for every decision
#[derive(Debug)]
pub struct InteractivePolicy<P> {
    prompt: P,
}

impl<P: ConflictPrompt> InteractivePolicy<P> {
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }

    pub fn into_prompt(self) -> P {
        self.prompt
    }

    fn resolve_each(&mut self, conflicts: &[Conflict]) -> Result<ResolutionOutcome> {
        let total = conflicts.len();
        let mut collected = Vec::with_capacity(total);
        let mut state = ResolverState::AwaitingChoice { next: 0 };

        loop {
            state = match state {
                ResolverState::AwaitingChoice { next } if next == total => ResolverState::Resolved,
                ResolverState::AwaitingChoice { next } => {
                    let conflict = &conflicts[next];
                    let choice = self.prompt.choose(conflict, next + 1, total)?;
                    match to_resolution(choice, conflict) {
                        Some(resolution) => {
                            collected.push(resolution);
                            ResolverState::AwaitingChoice { next: next + 1 }
                        }
                        None => {
                            collected.clear();
                            tracing::info!(at = next + 1, total, "resolution aborted by user");
                            ResolverState::Aborted
                        }
                    }
                }
                ResolverState::Resolved => return Ok(ResolutionOutcome::Resolved(collected)),
                ResolverState::Aborted => return Ok(ResolutionOutcome::Aborted),
            };
        }
    }
}

/// `None` when the user aborted.
fn to_resolution(choice: ConflictChoice, conflict: &Conflict) -> Option<Resolution> {
    match choice {
        ConflictChoice::Local => Some(Resolution::local(conflict)),
        ConflictChoice::Remote => Some(Resolution::remote(conflict)),
        ConflictChoice::Edit(value) => Some(Resolution::edit(conflict, value)),
        ConflictChoice::Abort => None,
    }
}

impl<P: ConflictPrompt> ResolutionPolicy for InteractivePolicy<P> {
    fn resolve(&mut self, conflicts: &[Conflict]) -> Result<ResolutionOutcome> {
        if conflicts.is_empty() {
            return Ok(ResolutionOutcome::Resolved(Vec::new()));
        }

        match self.prompt.choose_batch_mode(conflicts)? {
            BatchMode::AllLocal => Ok(ResolutionOutcome::Resolved(
                conflicts.iter().map(Resolution::local).collect(),
            )),
            BatchMode::AllRemote => Ok(ResolutionOutcome::Resolved(
                conflicts.iter().map(Resolution::remote).collect(),
            )),
            BatchMode::Abort => Ok(ResolutionOutcome::Aborted),
            BatchMode::ResolveEach => self.resolve_each(conflicts),
        }
    }
}

/// Prompt that replays pre-recorded answers.
///
/// Once the script runs out every further question is answered with
/// `Abort`.
#[derive(Debug, Clone)]
pub struct ScriptedPrompt {
    batch_mode: BatchMode,
    choices: VecDeque<ConflictChoice>,
    asked: usize,
}

impl ScriptedPrompt {
    pub fn new(batch_mode: BatchMode, choices: impl IntoIterator<Item = ConflictChoice>) -> Self {
        Self {
            batch_mode,
            choices: choices.into_iter().collect(),
            asked: 0,
        }
    }

    /// Number of per-conflict questions answered.
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl ConflictPrompt for ScriptedPrompt {
    fn choose_batch_mode(&mut self, _conflicts: &[Conflict]) -> Result<BatchMode> {
        Ok(self.batch_mode)
    }

    fn choose(&mut self, _conflict: &Conflict, _position: usize, _total: usize) -> Result<ConflictChoice> {
        self.asked += 1;
        Ok(self.choices.pop_front().unwrap_or(ConflictChoice::Abort))
    }
}
