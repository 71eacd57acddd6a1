//! Handlers for the review ledger: per-solution history, reviewer queue,
//! and aggregate statistics.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use fabriq_core::error::CoreError;
use fabriq_core::roles;
use fabriq_core::status::SolutionStatus;
use fabriq_core::types::{DbId, Timestamp};
use fabriq_db::models::solution::Solution;
use fabriq_db::models::solution_review::SolutionReview;
use fabriq_db::repositories::{SolutionOrder, SolutionRepo};
use fabriq_lifecycle::ReviewStats;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::Pagination;
use crate::state::AppState;

/// Query parameters for `GET /reviews/statistics`.
#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub reviewer_id: Option<DbId>,
    /// RFC 3339 window start, inclusive.
    pub start: Option<Timestamp>,
    /// RFC 3339 window end, inclusive.
    pub end: Option<Timestamp>,
}

/// GET /api/v1/solutions/{id}/reviews
///
/// The solution's full transition history, oldest first.
pub async fn get_review_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<SolutionReview>>> {
    // 404 for unknown solutions rather than an empty list.
    SolutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "solution",
            id,
        })?;
    let history = state.ledger.history(id).await?;
    Ok(Json(history))
}

/// GET /api/v1/reviews/queue
///
/// Solutions awaiting review, oldest submission first. Reviewer-only.
pub async fn get_review_queue(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Solution>>> {
    roles::require_reviewer(&user.role)?;
    let pending = SolutionRepo::list_by_status(
        &state.pool,
        SolutionStatus::PendingReview.as_str(),
        SolutionOrder::OldestSubmittedFirst,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(pending))
}

/// GET /api/v1/reviews/statistics
///
/// Ledger counts grouped by decision and reviewer, optionally scoped to
/// one reviewer and/or a time window. Reviewer-only, pure read.
pub async fn get_review_statistics(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<ReviewStats>> {
    roles::require_reviewer(&user.role)?;
    let stats = state
        .ledger
        .statistics(query.reviewer_id, query.start, query.end)
        .await?;
    Ok(Json(stats))
}
