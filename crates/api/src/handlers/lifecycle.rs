//! Handlers for lifecycle transitions, single-item and batch.
//!
//! All transitions go through the lifecycle machine; nothing here touches
//! `solutions.status` directly.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use fabriq_core::status::ReviewDecision;
use fabriq_core::types::DbId;
use fabriq_db::models::solution::Solution;
use fabriq_lifecycle::{BatchOp, BatchOutcome};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /solutions/{id}/review`.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// `approved` or `rejected`.
    pub decision: String,
    pub comments: Option<String>,
}

/// Request body for `POST /solutions/{id}/ready`.
#[derive(Debug, Default, Deserialize)]
pub struct ReadyRequest {
    /// Skip the publishing-metadata requirement explicitly.
    #[serde(default)]
    pub skip_metadata: bool,
}

/// Request body for `POST /solutions/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub solution_ids: Vec<DbId>,
    pub op: BatchOp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/solutions/{id}/submit
pub async fn submit_for_review(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
) -> AppResult<Json<Solution>> {
    let solution = state.machine.submit_for_review(id, &user.actor()).await?;
    Ok(Json(solution))
}

/// POST /api/v1/solutions/{id}/review
pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
    Json(input): Json<ReviewRequest>,
) -> AppResult<Json<Solution>> {
    let decision = ReviewDecision::parse(&input.decision)
        .ok_or_else(|| AppError::BadRequest(format!("unknown decision '{}'", input.decision)))?;
    let solution = state
        .machine
        .review(id, &user.actor(), decision, input.comments)
        .await?;
    Ok(Json(solution))
}

/// POST /api/v1/solutions/{id}/ready
pub async fn mark_ready_to_publish(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
    input: Option<Json<ReadyRequest>>,
) -> AppResult<Json<Solution>> {
    let skip_metadata = input.map(|Json(r)| r.skip_metadata).unwrap_or(false);
    let solution = state
        .machine
        .mark_ready_to_publish(id, &user.actor(), skip_metadata)
        .await?;
    Ok(Json(solution))
}

/// POST /api/v1/solutions/{id}/publish
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
) -> AppResult<Json<Solution>> {
    let solution = state.machine.publish(id, &user.actor()).await?;
    Ok(Json(solution))
}

/// POST /api/v1/solutions/{id}/suspend
pub async fn suspend(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
) -> AppResult<Json<Solution>> {
    let solution = state.machine.suspend(id, &user.actor()).await?;
    Ok(Json(solution))
}

/// POST /api/v1/solutions/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
) -> AppResult<Json<Solution>> {
    let solution = state.machine.restore(id, &user.actor()).await?;
    Ok(Json(solution))
}

/// POST /api/v1/solutions/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
) -> AppResult<Json<Solution>> {
    let solution = state.machine.archive(id, &user.actor()).await?;
    Ok(Json(solution))
}

/// POST /api/v1/solutions/batch
///
/// Apply one operation to up to 10 solutions. Partial failure is a normal
/// 200 response with per-item outcomes, not an error.
pub async fn batch_transition(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<BatchRequest>,
) -> AppResult<Json<BatchOutcome>> {
    let outcome = state
        .batch
        .run(&input.solution_ids, input.op, &user.actor())
        .await?;
    Ok(Json(outcome))
}
