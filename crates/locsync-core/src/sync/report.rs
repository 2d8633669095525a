//! Push and status reports

use serde::{Deserialize, Serialize};

use crate::conflict::{Conflict, Resolution};
use crate::merge::ChangeSet;

/// How a push cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushStatus {
    /// Local state already matches the baseline
    NothingToSync,
    /// Dry run; the changeset was computed but not sent
    Preview,
    /// Changes were pushed and the baseline updated
    Pushed,
    /// The remote reported conflicts that were left unresolved
    Unresolved,
    /// Resolution was aborted by the user
    Aborted,
}

/// Outcome of one push cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushReport {
    pub status: PushStatus,
    /// Changeset computed for this cycle
    pub changes: ChangeSet,
    /// Pairs written by the remote, including resolutions
    pub applied: usize,
    pub deleted: usize,
    pub resolved: Vec<Resolution>,
    /// Conflicts left unresolved; empty unless `status` is `Unresolved` or `Aborted`
    pub conflicts: Vec<Conflict>,
    /// Recovered conditions worth telling the user about
    pub warnings: Vec<String>,
}

impl PushReport {
    pub(crate) fn new(status: PushStatus, changes: ChangeSet, warnings: Vec<String>) -> Self {
        Self {
            status,
            changes,
            applied: 0,
            deleted: 0,
            resolved: Vec::new(),
            conflicts: Vec::new(),
            warnings,
        }
    }

    /// Whether the cycle reached a consistent state.
    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            PushStatus::NothingToSync | PushStatus::Preview | PushStatus::Pushed
        )
    }
}

/// Local changes pending against the baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub changes: ChangeSet,
    /// No usable baseline exists; everything would be uploaded
    pub first_sync: bool,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PushStatus::NothingToSync, true)]
    #[case(PushStatus::Preview, true)]
    #[case(PushStatus::Pushed, true)]
    #[case(PushStatus::Unresolved, false)]
    #[case(PushStatus::Aborted, false)]
    fn success_by_status(#[case] status: PushStatus, #[case] expected: bool) {
        let report = PushReport::new(status, ChangeSet::default(), Vec::new());
        assert_eq!(report.is_success(), expected);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&PushStatus::NothingToSync).unwrap();
        assert_eq!(json, "\"nothing_to_sync\"");
    }
}
