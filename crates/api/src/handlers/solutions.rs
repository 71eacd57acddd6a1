//! Handlers for the `/solutions` resource: draft CRUD, lineage, forking.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use fabriq_core::content::{BomItem, SpecEntry};
use fabriq_core::error::CoreError;
use fabriq_core::roles;
use fabriq_core::status::SolutionStatus;
use fabriq_core::types::DbId;
use fabriq_db::models::solution::{CreateSolution, Solution, UpdateSolutionContent};
use fabriq_db::models::solution_publishing::SolutionPublishing;
use fabriq_db::repositories::{SolutionOrder, SolutionPublishingRepo, SolutionRepo};
use fabriq_lifecycle::Lineage;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::Pagination;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /solutions`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSolutionRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specs: Vec<SpecEntry>,
    #[serde(default)]
    pub bom_items: Vec<BomItem>,
}

/// Query parameters for `GET /solutions`.
#[derive(Debug, Deserialize)]
pub struct ListSolutionsQuery {
    pub status: Option<String>,
    pub creator_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /solutions/{id}/fork`.
#[derive(Debug, Default, Deserialize)]
pub struct ForkRequest {
    pub title: Option<String>,
}

/// A solution merged with its publishing overlay (if any).
#[derive(Debug, Serialize)]
pub struct SolutionDetail {
    #[serde(flatten)]
    pub solution: Solution,
    pub publishing: Option<SolutionPublishing>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/solutions
///
/// Create a new draft solution owned by the caller.
pub async fn create_solution(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateSolutionRequest>,
) -> AppResult<(StatusCode, Json<Solution>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let create = CreateSolution {
        title: input.title,
        description: input.description,
        category: input.category,
        price_cents: input.price_cents,
        tags: input.tags,
        images: input.images,
        features: input.features,
        specs: input.specs,
        bom_items: input.bom_items,
    };
    let solution = SolutionRepo::create(&state.pool, user.id, &create).await?;
    Ok((StatusCode::CREATED, Json(solution)))
}

/// GET /api/v1/solutions/{id}
///
/// Fetch a solution with its publishing overlay merged in.
pub async fn get_solution(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SolutionDetail>> {
    let solution = SolutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "solution",
            id,
        })?;
    let publishing = SolutionPublishingRepo::find_by_solution(&state.pool, id).await?;
    Ok(Json(SolutionDetail {
        solution,
        publishing,
    }))
}

/// GET /api/v1/solutions
///
/// List solutions filtered by status or creator. Without a filter, lists
/// published solutions.
pub async fn list_solutions(
    State(state): State<AppState>,
    Query(query): Query<ListSolutionsQuery>,
) -> AppResult<Json<Vec<Solution>>> {
    let page = Pagination {
        limit: query.limit,
        offset: query.offset,
    };
    let (limit, offset) = (page.limit(), page.offset());

    let solutions = if let Some(creator_id) = query.creator_id {
        SolutionRepo::list_by_creator(&state.pool, creator_id, limit, offset).await?
    } else {
        let status = match &query.status {
            Some(s) => SolutionStatus::parse(s)
                .ok_or_else(|| AppError::BadRequest(format!("unknown status '{s}'")))?,
            None => SolutionStatus::Published,
        };
        SolutionRepo::list_by_status(
            &state.pool,
            status.as_str(),
            SolutionOrder::NewestFirst,
            limit,
            offset,
        )
        .await?
    };
    Ok(Json(solutions))
}

/// PATCH /api/v1/solutions/{id}
///
/// Update a solution's content fields. Content writes are independent of
/// status; when any snapshot-relevant field actually changed, a new
/// version is recorded automatically.
pub async fn update_solution(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
    Json(input): Json<UpdateSolutionContent>,
) -> AppResult<Json<Solution>> {
    // 1. Fetch and authorize against the current owner.
    let before = SolutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "solution",
            id,
        })?;
    roles::require_owner_or_admin(user.id, &user.role, before.creator_id)?;

    // 2. Apply the partial update.
    let updated = SolutionRepo::update_content_fields(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "solution",
            id,
        })?;

    // 3. Snapshot a version when content actually changed.
    let changes = fabriq_core::diff::diff_content(&before.content(), &updated.content());
    if !changes.is_empty() {
        let changed_fields: Vec<&str> = changes.iter().map(|c| c.field.as_str()).collect();
        let change_log = format!("updated {}", changed_fields.join(", "));
        state
            .versions
            .create_version(id, updated.content(), &user.actor(), change_log)
            .await?;
    }

    Ok(Json(updated))
}

/// POST /api/v1/solutions/{id}/fork
///
/// Create a new draft derived from this solution.
pub async fn fork_solution(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
    Json(input): Json<ForkRequest>,
) -> AppResult<(StatusCode, Json<Solution>)> {
    let fork = state
        .lineage
        .fork_solution(id, &user.actor(), input.title)
        .await?;
    Ok((StatusCode::CREATED, Json(fork)))
}

/// GET /api/v1/solutions/{id}/lineage
///
/// The solution's fork lineage: its source (if any) and derived forks.
pub async fn get_lineage(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Lineage>> {
    let lineage = state.lineage.get_lineage(id).await?;
    Ok(Json(lineage))
}
