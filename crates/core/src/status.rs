//! Solution lifecycle statuses and the canonical transition table.
//!
//! Every status change in the system is decided here. Callers never
//! hard-code a source/target pair; they ask [`transition`] whether an
//! action is legal from the current status and what it results in.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a solution. Stored as lowercase text in the
/// `solutions.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    Draft,
    PendingReview,
    Approved,
    ReadyToPublish,
    Published,
    Suspended,
    Archived,
    Rejected,
}

impl SolutionStatus {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Approved => "approved",
            Self::ReadyToPublish => "ready_to_publish",
            Self::Published => "published",
            Self::Suspended => "suspended",
            Self::Archived => "archived",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a stored status string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "pending_review" => Some(Self::PendingReview),
            "approved" => Some(Self::Approved),
            "ready_to_publish" => Some(Self::ReadyToPublish),
            "published" => Some(Self::Published),
            "suspended" => Some(Self::Suspended),
            "archived" => Some(Self::Archived),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reviewer decision recorded on a ledger entry. `None` is used for
/// transitions that are not review decisions (submit, publish, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
    None,
}

impl ReviewDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// A status-changing action on a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    SubmitForReview,
    Approve,
    Reject,
    MarkReadyToPublish,
    Publish,
    Suspend,
    Restore,
    Archive,
}

impl LifecycleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitForReview => "submit_for_review",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::MarkReadyToPublish => "mark_ready_to_publish",
            Self::Publish => "publish",
            Self::Suspend => "suspend",
            Self::Restore => "restore",
            Self::Archive => "archive",
        }
    }

    /// Statuses this action may be applied from.
    pub fn allowed_from(&self) -> &'static [SolutionStatus] {
        use SolutionStatus::*;
        match self {
            Self::SubmitForReview => &[Draft, Rejected],
            Self::Approve | Self::Reject => &[PendingReview],
            Self::MarkReadyToPublish => &[Approved],
            Self::Publish => &[ReadyToPublish],
            Self::Suspend => &[Published],
            Self::Restore => &[Suspended],
            Self::Archive => &[Published],
        }
    }

    /// Status this action results in.
    pub fn target(&self) -> SolutionStatus {
        use SolutionStatus::*;
        match self {
            Self::SubmitForReview => PendingReview,
            Self::Approve => Approved,
            Self::Reject => Rejected,
            Self::MarkReadyToPublish => ReadyToPublish,
            Self::Publish => Published,
            Self::Suspend => Suspended,
            Self::Restore => Published,
            Self::Archive => Archived,
        }
    }

    /// Ledger decision recorded for this action.
    pub fn decision(&self) -> ReviewDecision {
        match self {
            Self::Approve => ReviewDecision::Approved,
            Self::Reject => ReviewDecision::Rejected,
            _ => ReviewDecision::None,
        }
    }
}

impl std::fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the target status for applying `action` to a solution currently
/// in `from`. Returns `InvalidState` when the transition table does not
/// allow the pair.
pub fn transition(
    from: SolutionStatus,
    action: LifecycleAction,
) -> Result<SolutionStatus, CoreError> {
    if action.allowed_from().contains(&from) {
        Ok(action.target())
    } else {
        Err(CoreError::InvalidState(format!(
            "cannot {action} a solution in status '{from}' (allowed from: {})",
            action
                .allowed_from()
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn as_str_roundtrips_through_parse() {
        for status in [
            SolutionStatus::Draft,
            SolutionStatus::PendingReview,
            SolutionStatus::Approved,
            SolutionStatus::ReadyToPublish,
            SolutionStatus::Published,
            SolutionStatus::Suspended,
            SolutionStatus::Archived,
            SolutionStatus::Rejected,
        ] {
            assert_eq!(SolutionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SolutionStatus::parse("bogus"), None);
    }

    #[test]
    fn submit_allowed_from_draft_and_rejected() {
        assert_eq!(
            transition(SolutionStatus::Draft, LifecycleAction::SubmitForReview).unwrap(),
            SolutionStatus::PendingReview
        );
        assert_eq!(
            transition(SolutionStatus::Rejected, LifecycleAction::SubmitForReview).unwrap(),
            SolutionStatus::PendingReview
        );
    }

    #[test]
    fn submit_rejected_from_published() {
        assert_matches!(
            transition(SolutionStatus::Published, LifecycleAction::SubmitForReview),
            Err(CoreError::InvalidState(_))
        );
    }

    #[test]
    fn review_transitions_only_from_pending() {
        assert_eq!(
            transition(SolutionStatus::PendingReview, LifecycleAction::Approve).unwrap(),
            SolutionStatus::Approved
        );
        assert_eq!(
            transition(SolutionStatus::PendingReview, LifecycleAction::Reject).unwrap(),
            SolutionStatus::Rejected
        );
        assert_matches!(
            transition(SolutionStatus::Draft, LifecycleAction::Approve),
            Err(CoreError::InvalidState(_))
        );
    }

    #[test]
    fn publish_requires_ready_to_publish() {
        assert_eq!(
            transition(SolutionStatus::ReadyToPublish, LifecycleAction::Publish).unwrap(),
            SolutionStatus::Published
        );
        // APPROVED-direct-publish is not a legal path.
        assert_matches!(
            transition(SolutionStatus::Approved, LifecycleAction::Publish),
            Err(CoreError::InvalidState(_))
        );
    }

    #[test]
    fn publish_on_already_published_is_invalid_state() {
        assert_matches!(
            transition(SolutionStatus::Published, LifecycleAction::Publish),
            Err(CoreError::InvalidState(_))
        );
    }

    #[test]
    fn suspend_restore_archive_chain() {
        assert_eq!(
            transition(SolutionStatus::Published, LifecycleAction::Suspend).unwrap(),
            SolutionStatus::Suspended
        );
        assert_eq!(
            transition(SolutionStatus::Suspended, LifecycleAction::Restore).unwrap(),
            SolutionStatus::Published
        );
        assert_eq!(
            transition(SolutionStatus::Published, LifecycleAction::Archive).unwrap(),
            SolutionStatus::Archived
        );
        assert_matches!(
            transition(SolutionStatus::Suspended, LifecycleAction::Archive),
            Err(CoreError::InvalidState(_))
        );
    }

    #[test]
    fn archived_is_terminal() {
        use LifecycleAction::*;
        for action in [
            SubmitForReview,
            Approve,
            Reject,
            MarkReadyToPublish,
            Publish,
            Suspend,
            Restore,
            Archive,
        ] {
            assert_matches!(
                transition(SolutionStatus::Archived, action),
                Err(CoreError::InvalidState(_))
            );
        }
    }

    #[test]
    fn decisions_recorded_only_for_review_actions() {
        assert_eq!(LifecycleAction::Approve.decision(), ReviewDecision::Approved);
        assert_eq!(LifecycleAction::Reject.decision(), ReviewDecision::Rejected);
        assert_eq!(LifecycleAction::Publish.decision(), ReviewDecision::None);
        assert_eq!(
            LifecycleAction::SubmitForReview.decision(),
            ReviewDecision::None
        );
    }
}
