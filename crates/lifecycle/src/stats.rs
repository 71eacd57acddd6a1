//! Read-side aggregation over the review ledger. Pure reads, no side
//! effects.

use serde::Serialize;

use fabriq_core::error::CoreError;
use fabriq_core::types::{DbId, Timestamp};
use fabriq_db::models::solution_review::{ReviewStatRow, SolutionReview};
use fabriq_db::repositories::SolutionReviewRepo;
use fabriq_db::DbPool;

use crate::error::db_err;

/// Per-reviewer decision counts within the queried window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerStats {
    pub reviewer_id: DbId,
    pub approved: i64,
    pub rejected: i64,
    /// Transitions with no review decision (submit, publish, etc.).
    pub other: i64,
    pub total: i64,
}

/// Aggregated review statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewStats {
    pub total: i64,
    pub approved: i64,
    pub rejected: i64,
    pub other: i64,
    pub by_reviewer: Vec<ReviewerStats>,
}

/// Read access to the review ledger.
#[derive(Clone)]
pub struct ReviewLedger {
    pool: DbPool,
}

impl ReviewLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Full transition history for one solution, oldest first.
    pub async fn history(&self, solution_id: DbId) -> Result<Vec<SolutionReview>, CoreError> {
        SolutionReviewRepo::list_for_solution(&self.pool, solution_id)
            .await
            .map_err(db_err)
    }

    /// Counts grouped by decision and reviewer, optionally scoped to one
    /// reviewer and/or a time window.
    pub async fn statistics(
        &self,
        reviewer_id: Option<DbId>,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<ReviewStats, CoreError> {
        let rows = SolutionReviewRepo::statistics(&self.pool, reviewer_id, start, end)
            .await
            .map_err(db_err)?;
        Ok(assemble(rows))
    }
}

/// Fold the grouped rows into totals and per-reviewer buckets. Rows are
/// expected ordered by reviewer (the query guarantees it).
fn assemble(rows: Vec<ReviewStatRow>) -> ReviewStats {
    let mut stats = ReviewStats {
        total: 0,
        approved: 0,
        rejected: 0,
        other: 0,
        by_reviewer: Vec::new(),
    };

    for row in rows {
        stats.total += row.count;
        match row.decision.as_str() {
            "approved" => stats.approved += row.count,
            "rejected" => stats.rejected += row.count,
            _ => stats.other += row.count,
        }

        let idx = match stats
            .by_reviewer
            .iter()
            .position(|r| r.reviewer_id == row.reviewer_id)
        {
            Some(idx) => idx,
            None => {
                stats.by_reviewer.push(ReviewerStats {
                    reviewer_id: row.reviewer_id,
                    approved: 0,
                    rejected: 0,
                    other: 0,
                    total: 0,
                });
                stats.by_reviewer.len() - 1
            }
        };
        let reviewer = &mut stats.by_reviewer[idx];
        reviewer.total += row.count;
        match row.decision.as_str() {
            "approved" => reviewer.approved += row.count,
            "rejected" => reviewer.rejected += row.count,
            _ => reviewer.other += row.count,
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(reviewer_id: DbId, decision: &str, count: i64) -> ReviewStatRow {
        ReviewStatRow {
            reviewer_id,
            decision: decision.to_string(),
            count,
        }
    }

    #[test]
    fn empty_rows_yield_zeroed_stats() {
        let stats = assemble(vec![]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_reviewer.is_empty());
    }

    #[test]
    fn totals_sum_across_reviewers_and_decisions() {
        let stats = assemble(vec![
            row(1, "approved", 4),
            row(1, "rejected", 1),
            row(2, "approved", 2),
            row(2, "none", 3),
        ]);
        assert_eq!(stats.total, 10);
        assert_eq!(stats.approved, 6);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.other, 3);
    }

    #[test]
    fn per_reviewer_buckets_are_separate() {
        let stats = assemble(vec![
            row(1, "approved", 4),
            row(1, "rejected", 1),
            row(2, "approved", 2),
        ]);
        assert_eq!(stats.by_reviewer.len(), 2);

        let r1 = &stats.by_reviewer[0];
        assert_eq!(r1.reviewer_id, 1);
        assert_eq!(r1.approved, 4);
        assert_eq!(r1.rejected, 1);
        assert_eq!(r1.total, 5);

        let r2 = &stats.by_reviewer[1];
        assert_eq!(r2.reviewer_id, 2);
        assert_eq!(r2.approved, 2);
        assert_eq!(r2.total, 2);
    }
}
