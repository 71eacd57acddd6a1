//! The version store: immutable content snapshots, history, diffing, and
//! forward-only rollback.
//!
//! Version numbers are allocated as `MAX + 1` inside the insert, under the
//! `(solution_id, version_number)` unique constraint. Two concurrent
//! allocations for the same solution cannot both win; the loser's unique
//! violation is retried here, and only surfaced as `Conflict` when retries
//! exhaust.

use fabriq_core::content::SolutionContent;
use fabriq_core::diff::{diff_content, FieldDiff};
use fabriq_core::error::CoreError;
use fabriq_core::roles;
use fabriq_core::types::DbId;
use fabriq_db::models::solution::Solution;
use fabriq_db::models::solution_version::{NewSolutionVersion, SolutionVersion};
use fabriq_db::repositories::{SolutionRepo, SolutionVersionRepo};
use fabriq_db::DbPool;

use crate::error::{db_err, is_version_conflict};
use crate::machine::Actor;

/// Attempts per allocation before surfacing `Conflict`.
const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

/// Append-only version history for solutions. Never touches
/// `solutions.status`.
#[derive(Clone)]
pub struct VersionStore {
    pool: DbPool,
}

impl VersionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Snapshot `content` as the next version of the solution and bump the
    /// live row's current-version pointer. Owner-only.
    pub async fn create_version(
        &self,
        solution_id: DbId,
        content: SolutionContent,
        actor: &Actor,
        change_log: String,
    ) -> Result<SolutionVersion, CoreError> {
        let solution = self.fetch_solution(solution_id).await?;
        roles::require_owner_or_admin(actor.id, &actor.role, solution.creator_id)?;

        let input = NewSolutionVersion {
            solution_id,
            content,
            change_log,
            created_by: actor.id,
        };

        let mut attempt = 1;
        loop {
            match self.try_append(&input).await {
                Ok(version) => {
                    tracing::info!(
                        solution_id,
                        version_number = version.version_number,
                        created_by = actor.id,
                        "version snapshot created"
                    );
                    return Ok(version);
                }
                Err(err) if is_version_conflict(&err) && attempt < MAX_ALLOCATION_ATTEMPTS => {
                    tracing::warn!(
                        solution_id,
                        attempt,
                        "version number allocation raced; retrying"
                    );
                    attempt += 1;
                }
                Err(err) if is_version_conflict(&err) => {
                    return Err(CoreError::Conflict(format!(
                        "could not allocate a version number for solution {solution_id} \
                         after {MAX_ALLOCATION_ATTEMPTS} attempts"
                    )));
                }
                Err(err) => return Err(db_err(err)),
            }
        }
    }

    /// All snapshots for a solution, ordered by version number ascending.
    pub async fn get_version_history(
        &self,
        solution_id: DbId,
    ) -> Result<Vec<SolutionVersion>, CoreError> {
        // Distinguish "no versions yet" from "no such solution".
        self.fetch_solution(solution_id).await?;
        SolutionVersionRepo::list_for_solution(&self.pool, solution_id)
            .await
            .map_err(db_err)
    }

    /// Field-by-field diff between two snapshots of the same solution.
    /// Only fields whose values differ are returned.
    pub async fn compare_versions(
        &self,
        solution_id: DbId,
        v1: i32,
        v2: i32,
    ) -> Result<Vec<FieldDiff>, CoreError> {
        let old = self.fetch_version(solution_id, v1).await?;
        let new = self.fetch_version(solution_id, v2).await?;
        Ok(diff_content(&old.content(), &new.content()))
    }

    /// Roll the live solution back to the content of `target_version` by
    /// appending a new snapshot equal to it. History is never truncated;
    /// rolling back to the current version is an error, not a no-op.
    pub async fn rollback_to_version(
        &self,
        solution_id: DbId,
        target_version: i32,
        actor: &Actor,
    ) -> Result<SolutionVersion, CoreError> {
        let solution = self.fetch_solution(solution_id).await?;
        roles::require_owner_or_admin(actor.id, &actor.role, solution.creator_id)?;

        validate_rollback_target(solution_id, solution.version, target_version)?;

        let target = self.fetch_version(solution_id, target_version).await?;
        let input = NewSolutionVersion {
            solution_id,
            content: target.content(),
            change_log: format!("rollback to version {target_version}"),
            created_by: actor.id,
        };

        let mut attempt = 1;
        loop {
            match self.try_rollback(&input).await {
                Ok(version) => {
                    tracing::info!(
                        solution_id,
                        target_version,
                        new_version = version.version_number,
                        actor_id = actor.id,
                        "rolled back by appending new version"
                    );
                    return Ok(version);
                }
                Err(err) if is_version_conflict(&err) && attempt < MAX_ALLOCATION_ATTEMPTS => {
                    tracing::warn!(
                        solution_id,
                        attempt,
                        "version number allocation raced during rollback; retrying"
                    );
                    attempt += 1;
                }
                Err(err) if is_version_conflict(&err) => {
                    return Err(CoreError::Conflict(format!(
                        "could not allocate a version number for solution {solution_id} \
                         after {MAX_ALLOCATION_ATTEMPTS} attempts"
                    )));
                }
                Err(err) => return Err(db_err(err)),
            }
        }
    }

    /// One transaction: append the snapshot, bump the current-version
    /// pointer on the live row.
    async fn try_append(&self, input: &NewSolutionVersion) -> Result<SolutionVersion, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let version = SolutionVersionRepo::insert(&mut *tx, input).await?;
        SolutionRepo::set_current_version(&mut *tx, input.solution_id, version.version_number)
            .await?;
        tx.commit().await?;
        Ok(version)
    }

    /// One transaction: append the snapshot, overwrite the live row's
    /// content fields to match it.
    async fn try_rollback(
        &self,
        input: &NewSolutionVersion,
    ) -> Result<SolutionVersion, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let version = SolutionVersionRepo::insert(&mut *tx, input).await?;
        SolutionRepo::replace_content(
            &mut *tx,
            input.solution_id,
            &input.content,
            version.version_number,
        )
        .await?;
        tx.commit().await?;
        Ok(version)
    }

    async fn fetch_solution(&self, solution_id: DbId) -> Result<Solution, CoreError> {
        SolutionRepo::find_by_id(&self.pool, solution_id)
            .await
            .map_err(db_err)?
            .ok_or(CoreError::NotFound {
                entity: "solution",
                id: solution_id,
            })
    }

    async fn fetch_version(
        &self,
        solution_id: DbId,
        version_number: i32,
    ) -> Result<SolutionVersion, CoreError> {
        SolutionVersionRepo::find_by_version(&self.pool, solution_id, version_number)
            .await
            .map_err(db_err)?
            .ok_or(CoreError::NotFound {
                entity: "solution version",
                id: version_number as i64,
            })
    }
}

/// Rolling back to the version the solution is already at is an error,
/// not a silent no-op.
fn validate_rollback_target(
    solution_id: DbId,
    current_version: i32,
    target_version: i32,
) -> Result<(), CoreError> {
    if target_version == current_version {
        return Err(CoreError::InvalidState(format!(
            "solution {solution_id} is already at version {target_version}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn rollback_to_current_version_is_invalid_state() {
        assert_matches!(
            validate_rollback_target(1, 4, 4),
            Err(CoreError::InvalidState(_))
        );
    }

    #[test]
    fn rollback_to_other_versions_passes_the_guard() {
        assert!(validate_rollback_target(1, 4, 2).is_ok());
        // Forward targets are permitted by the guard; the snapshot fetch
        // decides whether they exist.
        assert!(validate_rollback_target(1, 4, 5).is_ok());
    }
}
