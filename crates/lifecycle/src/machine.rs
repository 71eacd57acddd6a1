//! The lifecycle state machine: sole authority for status changes.
//!
//! Every transition runs as one transaction that pairs the compare-and-set
//! status update with exactly one review-ledger insert. If either write
//! fails, both roll back; a solution is never observable with a status
//! that has no corresponding ledger entry.

use fabriq_db::models::solution::Solution;
use fabriq_db::models::solution_review::NewSolutionReview;
use fabriq_db::repositories::{SolutionPublishingRepo, SolutionRepo, SolutionReviewRepo, StatusStamp};
use fabriq_db::DbPool;

use fabriq_core::error::CoreError;
use fabriq_core::roles;
use fabriq_core::status::{transition, LifecycleAction, ReviewDecision, SolutionStatus};
use fabriq_core::submission::validate_for_submission;
use fabriq_core::types::DbId;

use crate::error::db_err;

/// The resolved caller: id plus role, as provided by the external
/// identity collaborator.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: DbId,
    pub role: String,
}

/// Single-item lifecycle transitions.
#[derive(Clone)]
pub struct LifecycleMachine {
    pool: DbPool,
}

impl LifecycleMachine {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// DRAFT | REJECTED -> PENDING_REVIEW. Owner-only; the submission
    /// validator reports every violated rule at once.
    pub async fn submit_for_review(
        &self,
        solution_id: DbId,
        actor: &Actor,
    ) -> Result<Solution, CoreError> {
        let solution = self.fetch(solution_id).await?;
        roles::require_owner_or_admin(actor.id, &actor.role, solution.creator_id)?;
        validate_for_submission(&solution.content())?;

        self.apply(&solution, LifecycleAction::SubmitForReview, actor, None)
            .await
    }

    /// PENDING_REVIEW -> APPROVED | REJECTED, per the reviewer's decision.
    pub async fn review(
        &self,
        solution_id: DbId,
        actor: &Actor,
        decision: ReviewDecision,
        comments: Option<String>,
    ) -> Result<Solution, CoreError> {
        roles::require_reviewer(&actor.role)?;
        let action = match decision {
            ReviewDecision::Approved => LifecycleAction::Approve,
            ReviewDecision::Rejected => LifecycleAction::Reject,
            ReviewDecision::None => {
                return Err(CoreError::validation(
                    "review decision must be 'approved' or 'rejected'",
                ))
            }
        };

        let solution = self.fetch(solution_id).await?;
        self.apply(&solution, action, actor, comments).await
    }

    /// APPROVED -> READY_TO_PUBLISH. Requires optimized publishing
    /// metadata unless the caller explicitly skips it.
    pub async fn mark_ready_to_publish(
        &self,
        solution_id: DbId,
        actor: &Actor,
        skip_metadata: bool,
    ) -> Result<Solution, CoreError> {
        let solution = self.fetch(solution_id).await?;
        roles::require_owner_or_admin(actor.id, &actor.role, solution.creator_id)?;

        if !skip_metadata {
            let publishing = SolutionPublishingRepo::find_by_solution(&self.pool, solution_id)
                .await
                .map_err(db_err)?;
            let has_seo_title = publishing
                .as_ref()
                .and_then(|p| p.seo_title.as_deref())
                .is_some_and(|t| !t.trim().is_empty());
            if !has_seo_title {
                return Err(CoreError::validation(
                    "publishing metadata is missing; provide an SEO title or skip explicitly",
                ));
            }
        }

        self.apply(&solution, LifecycleAction::MarkReadyToPublish, actor, None)
            .await
    }

    /// READY_TO_PUBLISH -> PUBLISHED, stamping `published_at`. Admin only.
    pub async fn publish(&self, solution_id: DbId, actor: &Actor) -> Result<Solution, CoreError> {
        roles::require_admin(&actor.role)?;
        let solution = self.fetch(solution_id).await?;
        self.apply(&solution, LifecycleAction::Publish, actor, None)
            .await
    }

    /// PUBLISHED -> SUSPENDED. Admin only.
    pub async fn suspend(&self, solution_id: DbId, actor: &Actor) -> Result<Solution, CoreError> {
        roles::require_admin(&actor.role)?;
        let solution = self.fetch(solution_id).await?;
        self.apply(&solution, LifecycleAction::Suspend, actor, None)
            .await
    }

    /// SUSPENDED -> PUBLISHED. `published_at` keeps its original value.
    pub async fn restore(&self, solution_id: DbId, actor: &Actor) -> Result<Solution, CoreError> {
        roles::require_admin(&actor.role)?;
        let solution = self.fetch(solution_id).await?;
        self.apply(&solution, LifecycleAction::Restore, actor, None)
            .await
    }

    /// PUBLISHED -> ARCHIVED, stamping `archived_at`. Admin only.
    pub async fn archive(&self, solution_id: DbId, actor: &Actor) -> Result<Solution, CoreError> {
        roles::require_admin(&actor.role)?;
        let solution = self.fetch(solution_id).await?;
        self.apply(&solution, LifecycleAction::Archive, actor, None)
            .await
    }

    async fn fetch(&self, solution_id: DbId) -> Result<Solution, CoreError> {
        SolutionRepo::find_by_id(&self.pool, solution_id)
            .await
            .map_err(db_err)?
            .ok_or(CoreError::NotFound {
                entity: "solution",
                id: solution_id,
            })
    }

    /// Execute one transition: resolve the target status from the
    /// transition table, then update + ledger-insert in one transaction.
    async fn apply(
        &self,
        solution: &Solution,
        action: LifecycleAction,
        actor: &Actor,
        comments: Option<String>,
    ) -> Result<Solution, CoreError> {
        let from = solution.status_enum()?;
        let to = transition(from, action)?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let updated = SolutionRepo::transition_status(
            &mut *tx,
            solution.id,
            from.as_str(),
            to.as_str(),
            stamp_for(action),
        )
        .await
        .map_err(db_err)?
        .ok_or_else(|| {
            // The CAS guard missed: someone else transitioned the row
            // between our read and this update.
            CoreError::InvalidState(format!(
                "solution {} was concurrently modified; expected status '{from}'",
                solution.id
            ))
        })?;

        SolutionReviewRepo::insert(
            &mut *tx,
            &NewSolutionReview {
                solution_id: solution.id,
                reviewer_id: actor.id,
                from_status: from.as_str().to_string(),
                to_status: to.as_str().to_string(),
                decision: action.decision().as_str().to_string(),
                comments,
            },
        )
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        tracing::info!(
            solution_id = solution.id,
            actor_id = actor.id,
            %action,
            from = %from,
            to = %to,
            "lifecycle transition applied"
        );
        Ok(updated)
    }
}

/// Which timestamp column a transition stamps.
fn stamp_for(action: LifecycleAction) -> StatusStamp {
    match action {
        LifecycleAction::SubmitForReview => StatusStamp::Submitted,
        LifecycleAction::Approve | LifecycleAction::Reject => StatusStamp::LastReviewed,
        LifecycleAction::Publish => StatusStamp::Published,
        LifecycleAction::Archive => StatusStamp::Archived,
        // Restore deliberately leaves `published_at` untouched.
        LifecycleAction::MarkReadyToPublish
        | LifecycleAction::Suspend
        | LifecycleAction::Restore => StatusStamp::None,
    }
}

/// The source status a batch operation requires (also used by the batch
/// coordinator's pre-checks).
pub fn required_source(action: LifecycleAction) -> Option<SolutionStatus> {
    let sources = action.allowed_from();
    if sources.len() == 1 {
        Some(sources[0])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_does_not_stamp_published_at() {
        assert_eq!(stamp_for(LifecycleAction::Restore), StatusStamp::None);
    }

    #[test]
    fn publish_and_archive_stamp_their_columns() {
        assert_eq!(stamp_for(LifecycleAction::Publish), StatusStamp::Published);
        assert_eq!(stamp_for(LifecycleAction::Archive), StatusStamp::Archived);
        assert_eq!(
            stamp_for(LifecycleAction::SubmitForReview),
            StatusStamp::Submitted
        );
    }

    #[test]
    fn batch_actions_have_a_single_source_status() {
        assert_eq!(
            required_source(LifecycleAction::Publish),
            Some(SolutionStatus::ReadyToPublish)
        );
        assert_eq!(
            required_source(LifecycleAction::Suspend),
            Some(SolutionStatus::Published)
        );
        assert_eq!(
            required_source(LifecycleAction::Restore),
            Some(SolutionStatus::Suspended)
        );
        // Submit has two sources, so no single required status.
        assert_eq!(required_source(LifecycleAction::SubmitForReview), None);
    }
}
