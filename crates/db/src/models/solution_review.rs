//! Review ledger entry model.

use serde::Serialize;
use sqlx::FromRow;

use fabriq_core::types::{DbId, Timestamp};

/// A row from the `solution_reviews` ledger. Append-only: the only writer
/// is the lifecycle machine, inside the same transaction as the status
/// update it records.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SolutionReview {
    pub id: DbId,
    pub solution_id: DbId,
    pub reviewer_id: DbId,
    pub from_status: String,
    pub to_status: String,
    pub decision: String,
    pub comments: Option<String>,
    pub reviewed_at: Timestamp,
}

/// Input for a new ledger entry.
#[derive(Debug, Clone)]
pub struct NewSolutionReview {
    pub solution_id: DbId,
    pub reviewer_id: DbId,
    pub from_status: String,
    pub to_status: String,
    pub decision: String,
    pub comments: Option<String>,
}

/// One aggregation row from the review-statistics query:
/// count of ledger entries per (reviewer, decision) in the window.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewStatRow {
    pub reviewer_id: DbId,
    pub decision: String,
    pub count: i64,
}
