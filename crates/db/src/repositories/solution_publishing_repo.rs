//! Repository for the `solution_publishing` overlay table.

use sqlx::types::Json;
use sqlx::PgPool;

use fabriq_core::types::DbId;

use crate::models::solution_publishing::{SolutionPublishing, UpsertSolutionPublishing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, solution_id, seo_title, seo_description, featured, \
    hero_image_url, product_links, created_at, updated_at";

/// Provides upsert and read operations for publishing metadata.
pub struct SolutionPublishingRepo;

impl SolutionPublishingRepo {
    /// Create or update the publishing overlay for a solution. Only
    /// non-`None` fields overwrite existing values.
    pub async fn upsert(
        pool: &PgPool,
        solution_id: DbId,
        input: &UpsertSolutionPublishing,
    ) -> Result<SolutionPublishing, sqlx::Error> {
        let query = format!(
            "INSERT INTO solution_publishing \
                (solution_id, seo_title, seo_description, featured, hero_image_url, product_links) \
             VALUES ($1, $2, $3, COALESCE($4, false), $5, COALESCE($6, '[]'::jsonb)) \
             ON CONFLICT (solution_id) DO UPDATE SET \
                seo_title = COALESCE($2, solution_publishing.seo_title), \
                seo_description = COALESCE($3, solution_publishing.seo_description), \
                featured = COALESCE($4, solution_publishing.featured), \
                hero_image_url = COALESCE($5, solution_publishing.hero_image_url), \
                product_links = COALESCE($6, solution_publishing.product_links), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SolutionPublishing>(&query)
            .bind(solution_id)
            .bind(&input.seo_title)
            .bind(&input.seo_description)
            .bind(input.featured)
            .bind(&input.hero_image_url)
            .bind(input.product_links.as_ref().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Fetch the publishing overlay for a solution, if one exists.
    pub async fn find_by_solution(
        pool: &PgPool,
        solution_id: DbId,
    ) -> Result<Option<SolutionPublishing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solution_publishing WHERE solution_id = $1"
        );
        sqlx::query_as::<_, SolutionPublishing>(&query)
            .bind(solution_id)
            .fetch_optional(pool)
            .await
    }
}
