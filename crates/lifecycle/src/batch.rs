//! Batch transition coordinator.
//!
//! Applies one operation (publish, suspend, or restore) to up to
//! [`MAX_BATCH_SIZE`] solutions. Pre-checks are all-or-nothing: a missing
//! id or a record in the wrong source status fails the whole call before
//! anything is applied. Execution is continue-on-error: each item runs in
//! its own transaction through the lifecycle machine, and one item's
//! failure never aborts its siblings.

use serde::{Deserialize, Serialize};

use fabriq_core::error::CoreError;
use fabriq_core::roles;
use fabriq_core::status::SolutionStatus;
use fabriq_core::types::DbId;
use fabriq_db::repositories::SolutionRepo;
use fabriq_db::DbPool;

use crate::error::db_err;
use crate::machine::{Actor, LifecycleMachine};

/// Hard per-call item limit: bounds blast radius and transaction count.
pub const MAX_BATCH_SIZE: usize = 10;

/// The operations available in batch form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOp {
    Publish,
    Suspend,
    Restore,
}

impl BatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Suspend => "suspend",
            Self::Restore => "restore",
        }
    }

    /// Source status every item must be in before execution starts.
    pub fn required_status(&self) -> SolutionStatus {
        match self {
            Self::Publish => SolutionStatus::ReadyToPublish,
            Self::Suspend => SolutionStatus::Published,
            Self::Restore => SolutionStatus::Suspended,
        }
    }
}

impl std::fmt::Display for BatchOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One item that failed during the execution phase.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemFailure {
    pub id: DbId,
    pub error: String,
}

/// Terminal result of a batch call. Partial failure is a valid outcome,
/// not an error.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub success_ids: Vec<DbId>,
    pub failures: Vec<BatchItemFailure>,
}

/// Orchestrates the lifecycle machine across multiple solutions with
/// isolated per-item outcomes.
#[derive(Clone)]
pub struct BatchCoordinator {
    pool: DbPool,
    machine: LifecycleMachine,
}

impl BatchCoordinator {
    pub fn new(pool: DbPool) -> Self {
        let machine = LifecycleMachine::new(pool.clone());
        Self { pool, machine }
    }

    /// Apply `op` to every solution in `ids`.
    ///
    /// Errors on malformed input (empty, over the limit), a non-admin
    /// actor, or a failed pre-check; otherwise always returns a
    /// [`BatchOutcome`], even when every item failed.
    pub async fn run(
        &self,
        ids: &[DbId],
        op: BatchOp,
        actor: &Actor,
    ) -> Result<BatchOutcome, CoreError> {
        roles::require_admin(&actor.role)?;
        validate_batch_size(ids)?;

        // Pre-check 1: every requested id must exist.
        let fetched = SolutionRepo::find_by_ids(&self.pool, ids)
            .await
            .map_err(db_err)?;
        let found_ids: Vec<DbId> = fetched.iter().map(|s| s.id).collect();
        let missing = missing_ids(ids, &found_ids);
        if !missing.is_empty() {
            return Err(CoreError::InvalidState(format!(
                "cannot {op}: solutions not found: {}",
                join_ids(&missing)
            )));
        }

        // Pre-check 2: every record must be in the operation's source
        // status. Advisory only; the per-item CAS still decides.
        let items: Vec<(DbId, Option<SolutionStatus>, String)> = fetched
            .iter()
            .map(|s| (s.id, SolutionStatus::parse(&s.status), s.title.clone()))
            .collect();
        let offending = offending_titles(&items, op.required_status());
        if !offending.is_empty() {
            return Err(CoreError::InvalidState(format!(
                "cannot {op}: not in status '{}': {}",
                op.required_status(),
                offending.join(", ")
            )));
        }

        // Execution: one transaction per item, continue on error.
        let mut outcome = BatchOutcome {
            success_ids: Vec::new(),
            failures: Vec::new(),
        };
        for &id in ids {
            let result = match op {
                BatchOp::Publish => self.machine.publish(id, actor).await,
                BatchOp::Suspend => self.machine.suspend(id, actor).await,
                BatchOp::Restore => self.machine.restore(id, actor).await,
            };
            match result {
                Ok(_) => outcome.success_ids.push(id),
                Err(err) => {
                    tracing::warn!(solution_id = id, %op, error = %err, "batch item failed");
                    outcome.failures.push(BatchItemFailure {
                        id,
                        error: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            %op,
            requested = ids.len(),
            succeeded = outcome.success_ids.len(),
            failed = outcome.failures.len(),
            "batch transition finished"
        );
        Ok(outcome)
    }
}

/// Malformed-input check: 1..=MAX_BATCH_SIZE ids per call.
fn validate_batch_size(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::validation(
            "batch must contain at least one solution id",
        ));
    }
    if ids.len() > MAX_BATCH_SIZE {
        return Err(CoreError::validation(format!(
            "batch is limited to {MAX_BATCH_SIZE} solutions per call (got {})",
            ids.len()
        )));
    }
    Ok(())
}

/// Requested ids with no corresponding fetched record, in request order.
fn missing_ids(requested: &[DbId], found: &[DbId]) -> Vec<DbId> {
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

/// Titles of records not in the required source status.
fn offending_titles(
    items: &[(DbId, Option<SolutionStatus>, String)],
    required: SolutionStatus,
) -> Vec<String> {
    items
        .iter()
        .filter(|(_, status, _)| *status != Some(required))
        .map(|(_, _, title)| format!("'{title}'"))
        .collect()
}

fn join_ids(ids: &[DbId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn batch_size_bounds() {
        assert_matches!(
            validate_batch_size(&[]),
            Err(CoreError::ValidationFailed(_))
        );
        assert!(validate_batch_size(&[1]).is_ok());
        assert!(validate_batch_size(&(1..=10).collect::<Vec<_>>()).is_ok());
        assert_matches!(
            validate_batch_size(&(1..=11).collect::<Vec<_>>()),
            Err(CoreError::ValidationFailed(_))
        );
    }

    #[test]
    fn missing_ids_preserves_request_order() {
        let requested = vec![5, 3, 9];
        let found = vec![3];
        assert_eq!(missing_ids(&requested, &found), vec![5, 9]);
    }

    #[test]
    fn no_missing_ids_when_all_found() {
        let requested = vec![1, 2];
        let found = vec![2, 1];
        assert!(missing_ids(&requested, &found).is_empty());
    }

    #[test]
    fn offending_titles_names_wrong_status_records() {
        let items = vec![
            (1, Some(SolutionStatus::ReadyToPublish), "Bracket".to_string()),
            (2, Some(SolutionStatus::Published), "Tray".to_string()),
            (3, Some(SolutionStatus::ReadyToPublish), "Stand".to_string()),
        ];
        let offending = offending_titles(&items, SolutionStatus::ReadyToPublish);
        assert_eq!(offending, vec!["'Tray'".to_string()]);
    }

    #[test]
    fn unknown_status_counts_as_offending() {
        let items = vec![(1, None, "Mystery".to_string())];
        let offending = offending_titles(&items, SolutionStatus::Published);
        assert_eq!(offending.len(), 1);
    }

    #[test]
    fn op_required_statuses() {
        assert_eq!(
            BatchOp::Publish.required_status(),
            SolutionStatus::ReadyToPublish
        );
        assert_eq!(
            BatchOp::Suspend.required_status(),
            SolutionStatus::Published
        );
        assert_eq!(
            BatchOp::Restore.required_status(),
            SolutionStatus::Suspended
        );
    }

    #[test]
    fn op_serde_uses_snake_case() {
        let op: BatchOp = serde_json::from_str("\"publish\"").unwrap();
        assert_eq!(op, BatchOp::Publish);
        assert_eq!(serde_json::to_string(&BatchOp::Restore).unwrap(), "\"restore\"");
    }
}
