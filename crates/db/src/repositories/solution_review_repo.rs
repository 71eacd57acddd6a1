//! Repository for the `solution_reviews` ledger.
//!
//! Insert-only. The insert runs on a transaction connection because a
//! ledger entry is only ever written alongside the status update it
//! records.

use sqlx::{PgConnection, PgPool};

use fabriq_core::types::{DbId, Timestamp};

use crate::models::solution_review::{NewSolutionReview, ReviewStatRow, SolutionReview};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, solution_id, reviewer_id, from_status, to_status, decision, comments, reviewed_at";

/// Provides append and read operations for the review ledger.
pub struct SolutionReviewRepo;

impl SolutionReviewRepo {
    /// Append one ledger entry.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &NewSolutionReview,
    ) -> Result<SolutionReview, sqlx::Error> {
        let query = format!(
            "INSERT INTO solution_reviews \
                (solution_id, reviewer_id, from_status, to_status, decision, comments) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SolutionReview>(&query)
            .bind(input.solution_id)
            .bind(input.reviewer_id)
            .bind(&input.from_status)
            .bind(&input.to_status)
            .bind(&input.decision)
            .bind(&input.comments)
            .fetch_one(conn)
            .await
    }

    /// List all ledger entries for a solution, oldest first.
    pub async fn list_for_solution(
        pool: &PgPool,
        solution_id: DbId,
    ) -> Result<Vec<SolutionReview>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solution_reviews \
             WHERE solution_id = $1 \
             ORDER BY reviewed_at ASC, id ASC"
        );
        sqlx::query_as::<_, SolutionReview>(&query)
            .bind(solution_id)
            .fetch_all(pool)
            .await
    }


    /// Aggregate ledger entries by (reviewer, decision), optionally
    /// filtered to one reviewer and/or a time window. Pure read.
    pub async fn statistics(
        pool: &PgPool,
        reviewer_id: Option<DbId>,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Vec<ReviewStatRow>, sqlx::Error> {
        sqlx::query_as::<_, ReviewStatRow>(
            "SELECT reviewer_id, decision, COUNT(*) AS count \
             FROM solution_reviews \
             WHERE ($1::BIGINT IS NULL OR reviewer_id = $1) \
               AND ($2::TIMESTAMPTZ IS NULL OR reviewed_at >= $2) \
               AND ($3::TIMESTAMPTZ IS NULL OR reviewed_at <= $3) \
             GROUP BY reviewer_id, decision \
             ORDER BY reviewer_id ASC, decision ASC",
        )
        .bind(reviewer_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }
}
