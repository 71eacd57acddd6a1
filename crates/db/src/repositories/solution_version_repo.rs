//! Repository for the `solution_versions` table.
//!
//! Version numbers are allocated as `MAX + 1` inside the insert itself;
//! the `uq_solution_versions_solution_id_version_number` constraint is the
//! arbiter when two callers race, and the lifecycle layer retries on that
//! conflict. Rows are immutable: no update or delete exists here.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use fabriq_core::types::DbId;

use crate::models::solution_version::{NewSolutionVersion, SolutionVersion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, solution_id, version_number, title, description, category, \
    price_cents, images, features, specs, bom_items, change_log, created_by, created_at";

/// Provides append and read operations for solution version snapshots.
pub struct SolutionVersionRepo;

impl SolutionVersionRepo {
    /// Insert a new snapshot at `MAX(version_number) + 1` for the solution.
    ///
    /// Runs on a transaction connection so callers can pair it with the
    /// live-content update (rollback) or the version bump on `solutions`.
    /// Surfaces the raw sqlx error so the caller can classify a unique
    /// violation as an allocation race.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &NewSolutionVersion,
    ) -> Result<SolutionVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO solution_versions \
                (solution_id, version_number, title, description, category, price_cents, \
                 images, features, specs, bom_items, change_log, created_by) \
             VALUES ( \
                $1, \
                (SELECT COALESCE(MAX(version_number), 0) + 1 \
                 FROM solution_versions WHERE solution_id = $1), \
                $2, $3, $4, $5, $6, $7, $8, $9, $10, $11 \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SolutionVersion>(&query)
            .bind(input.solution_id)
            .bind(&input.content.title)
            .bind(&input.content.description)
            .bind(&input.content.category)
            .bind(input.content.price_cents)
            .bind(&input.content.images)
            .bind(&input.content.features)
            .bind(Json(&input.content.specs))
            .bind(Json(&input.content.bom_items))
            .bind(&input.change_log)
            .bind(input.created_by)
            .fetch_one(conn)
            .await
    }

    /// List all snapshots for a solution, ordered by version number
    /// ascending.
    pub async fn list_for_solution(
        pool: &PgPool,
        solution_id: DbId,
    ) -> Result<Vec<SolutionVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solution_versions \
             WHERE solution_id = $1 \
             ORDER BY version_number ASC"
        );
        sqlx::query_as::<_, SolutionVersion>(&query)
            .bind(solution_id)
            .fetch_all(pool)
            .await
    }

    /// Find a specific snapshot by solution ID and version number.
    pub async fn find_by_version(
        pool: &PgPool,
        solution_id: DbId,
        version_number: i32,
    ) -> Result<Option<SolutionVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solution_versions \
             WHERE solution_id = $1 AND version_number = $2"
        );
        sqlx::query_as::<_, SolutionVersion>(&query)
            .bind(solution_id)
            .bind(version_number)
            .fetch_optional(pool)
            .await
    }

}
