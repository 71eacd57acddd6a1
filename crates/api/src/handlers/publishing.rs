//! Handlers for the publishing metadata overlay.

use axum::extract::{Path, State};
use axum::Json;

use fabriq_core::error::CoreError;
use fabriq_core::roles;
use fabriq_core::types::DbId;
use fabriq_db::models::solution_publishing::{SolutionPublishing, UpsertSolutionPublishing};
use fabriq_db::repositories::{SolutionPublishingRepo, SolutionRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// PUT /api/v1/solutions/{id}/publishing
///
/// Create or update the publishing overlay. Owner or admin only. The
/// overlay never participates in the state machine.
pub async fn upsert_publishing(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
    Json(input): Json<UpsertSolutionPublishing>,
) -> AppResult<Json<SolutionPublishing>> {
    let solution = SolutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "solution",
            id,
        })?;
    roles::require_owner_or_admin(user.id, &user.role, solution.creator_id)?;

    let publishing = SolutionPublishingRepo::upsert(&state.pool, id, &input).await?;
    Ok(Json(publishing))
}

/// GET /api/v1/solutions/{id}/publishing
pub async fn get_publishing(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Option<SolutionPublishing>>> {
    SolutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "solution",
            id,
        })?;
    let publishing = SolutionPublishingRepo::find_by_solution(&state.pool, id).await?;
    Ok(Json(publishing))
}
