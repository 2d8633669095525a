//! Conflict resolution
//!
//! The remote reports a conflict when its stored hash for a pair differs
//! from the base hash the client sent. A [`ResolutionPolicy`] turns those
//! conflicts into [`Resolution`]s, declines to resolve them, or aborts.

mod interactive;

pub use interactive::{BatchMode, ConflictChoice, ConflictPrompt, InteractivePolicy, ScriptedPrompt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// A pair whose remote copy advanced since the last sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub key: String,
    pub language: String,
    pub local_value: String,
    pub remote_value: String,
    pub remote_updated_at: DateTime<Utc>,
}

/// Which side of a conflict wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionChoice {
    Local,
    Remote,
    Edit,
}

/// Resource field a resolution applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ResolutionTarget {
    #[default]
    Value,
}

/// The decision taken for one conflict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub key: String,
    pub language: String,
    pub target: ResolutionTarget,
    pub choice: ResolutionChoice,
    /// Value to store; set for `Local` and `Edit`, absent for `Remote`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_value: Option<String>,
}

impl Resolution {
    /// Keep the local value.
    pub fn local(conflict: &Conflict) -> Self {
        Self::build(conflict, ResolutionChoice::Local, Some(conflict.local_value.clone()))
    }

    /// Keep the remote value.
    pub fn remote(conflict: &Conflict) -> Self {
        Self::build(conflict, ResolutionChoice::Remote, None)
    }

    /// Store a value typed by the user.
    pub fn edit(conflict: &Conflict, value: impl Into<String>) -> Self {
        Self::build(conflict, ResolutionChoice::Edit, Some(value.into()))
    }

    fn build(conflict: &Conflict, choice: ResolutionChoice, edited_value: Option<String>) -> Self {
        Self {
            key: conflict.key.clone(),
            language: conflict.language.clone(),
            target: ResolutionTarget::Value,
            choice,
            edited_value,
        }
    }

    /// The value the pair holds once this resolution is applied.
    pub fn resolved_value<'a>(&'a self, conflict: &'a Conflict) -> &'a str {
        match self.choice {
            ResolutionChoice::Remote => &conflict.remote_value,
            ResolutionChoice::Local => self.edited_value.as_deref().unwrap_or(&conflict.local_value),
            ResolutionChoice::Edit => self.edited_value.as_deref().unwrap_or_default(),
        }
    }
}

/// Result of running a policy over a set of conflicts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Every conflict has a resolution
    Resolved(Vec<Resolution>),
    /// Conflicts were reported but not resolved
    Declined,
    /// The user cancelled; nothing collected is kept
    Aborted,
}

/// Strategy for turning conflicts into resolutions
pub trait ResolutionPolicy {
    fn resolve(&mut self, conflicts: &[Conflict]) -> Result<ResolutionOutcome>;
}

/// Resolve every conflict with the local value, without interaction
#[derive(Debug, Clone, Copy, Default)]
pub struct ForcePolicy;

impl ResolutionPolicy for ForcePolicy {
    fn resolve(&mut self, conflicts: &[Conflict]) -> Result<ResolutionOutcome> {
        tracing::info!(count = conflicts.len(), "forcing local values over remote");
        Ok(ResolutionOutcome::Resolved(
            conflicts.iter().map(Resolution::local).collect(),
        ))
    }
}

/// Leave conflicts unresolved so the caller reports them
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOnlyPolicy;

impl ResolutionPolicy for ReportOnlyPolicy {
    fn resolve(&mut self, conflicts: &[Conflict]) -> Result<ResolutionOutcome> {
        tracing::debug!(count = conflicts.len(), "conflicts left for explicit resolution");
        Ok(ResolutionOutcome::Declined)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn conflict(key: &str, language: &str, local: &str, remote: &str) -> Conflict {
        Conflict {
            key: key.into(),
            language: language.into(),
            local_value: local.into(),
            remote_value: remote.into(),
            remote_updated_at: Utc::now(),
        }
    }

    #[test]
    fn force_resolves_every_conflict_locally() {
        let conflicts = vec![conflict("A", "en", "mine", "theirs"), conflict("B", "fr", "moi", "eux")];

        let outcome = ForcePolicy.resolve(&conflicts).unwrap();

        let ResolutionOutcome::Resolved(resolutions) = outcome else {
            panic!("expected resolved outcome");
        };
        assert_eq!(resolutions.len(), 2);
        for (resolution, conflict) in resolutions.iter().zip(&conflicts) {
            assert_eq!(resolution.choice, ResolutionChoice::Local);
            assert_eq!(resolution.edited_value.as_deref(), Some(conflict.local_value.as_str()));
        }
    }

    #[test]
    fn report_only_declines() {
        let outcome = ReportOnlyPolicy
            .resolve(&[conflict("A", "en", "mine", "theirs")])
            .unwrap();
        assert_eq!(outcome, ResolutionOutcome::Declined);
    }

    #[test]
    fn resolved_value_follows_choice() {
        let c = conflict("A", "en", "mine", "theirs");
        assert_eq!(Resolution::local(&c).resolved_value(&c), "mine");
        assert_eq!(Resolution::remote(&c).resolved_value(&c), "theirs");
        assert_eq!(Resolution::edit(&c, "ours").resolved_value(&c), "ours");
        assert_eq!(Resolution::edit(&c, "").resolved_value(&c), "");
    }

    #[test]
    fn remote_resolution_omits_edited_value_on_the_wire() {
        let c = conflict("A", "en", "mine", "theirs");
        let json = serde_json::to_value(Resolution::remote(&c)).unwrap();
        assert_eq!(json["choice"], "remote");
        assert_eq!(json["target"], "value");
        assert!(json.get("editedValue").is_none());
    }
}
