//! Handlers for version history: create, list, compare, rollback.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use fabriq_core::content::SolutionContent;
use fabriq_core::diff::FieldDiff;
use fabriq_core::error::CoreError;
use fabriq_core::types::DbId;
use fabriq_db::models::solution_version::SolutionVersion;
use fabriq_db::repositories::SolutionRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /solutions/{id}/versions`.
///
/// With no explicit content, the solution's current live content is
/// snapshotted.
#[derive(Debug, Default, Deserialize)]
pub struct CreateVersionRequest {
    pub content: Option<SolutionContent>,
    pub change_log: Option<String>,
}

/// Query parameters for `GET /solutions/{id}/versions/compare`.
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub from: i32,
    pub to: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/solutions/{id}/versions
pub async fn create_version(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
    Json(input): Json<CreateVersionRequest>,
) -> AppResult<(StatusCode, Json<SolutionVersion>)> {
    let content = match input.content {
        Some(content) => content,
        None => SolutionRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "solution",
                id,
            })?
            .content(),
    };
    let change_log = input.change_log.unwrap_or_default();

    let version = state
        .versions
        .create_version(id, content, &user.actor(), change_log)
        .await?;
    Ok((StatusCode::CREATED, Json(version)))
}

/// GET /api/v1/solutions/{id}/versions
///
/// Full snapshot history, version numbers ascending.
pub async fn get_version_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<SolutionVersion>>> {
    let history = state.versions.get_version_history(id).await?;
    Ok(Json(history))
}

/// GET /api/v1/solutions/{id}/versions/compare?from=1&to=3
///
/// Field-by-field diff; only differing fields are returned.
pub async fn compare_versions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(query): Query<CompareQuery>,
) -> AppResult<Json<Vec<FieldDiff>>> {
    let diff = state
        .versions
        .compare_versions(id, query.from, query.to)
        .await?;
    Ok(Json(diff))
}

/// POST /api/v1/solutions/{id}/versions/{version}/rollback
///
/// Appends a new version equal to the target snapshot and updates the
/// live record to match. History is never rewritten.
pub async fn rollback_to_version(
    State(state): State<AppState>,
    Path((id, version)): Path<(DbId, i32)>,
    user: AuthUser,
) -> AppResult<(StatusCode, Json<SolutionVersion>)> {
    let new_version = state
        .versions
        .rollback_to_version(id, version, &user.actor())
        .await?;
    Ok((StatusCode::CREATED, Json(new_version)))
}
