//! Repository for the `solutions` table.
//!
//! The `status` column is only ever written through [`SolutionRepo::
//! transition_status`], which the lifecycle machine calls inside the same
//! transaction as the ledger insert. Content columns are written
//! independently of status.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use fabriq_core::content::SolutionContent;
use fabriq_core::types::DbId;

use crate::models::solution::{CreateSolution, Solution, UpdateSolutionContent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, category, price_cents, status, version, \
    creator_id, tags, images, features, specs, bom_items, upgraded_from_id, \
    created_at, submitted_at, last_reviewed_at, published_at, archived_at, updated_at";

/// Timestamp column stamped alongside a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStamp {
    /// No timestamp side effect (e.g. restore preserves `published_at`).
    None,
    Submitted,
    LastReviewed,
    Published,
    Archived,
}

impl StatusStamp {
    /// Extra SET clause for the transition UPDATE. Column names are fixed
    /// here, never caller-supplied.
    fn set_clause(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Submitted => ", submitted_at = NOW()",
            Self::LastReviewed => ", last_reviewed_at = NOW()",
            Self::Published => ", published_at = NOW()",
            Self::Archived => ", archived_at = NOW()",
        }
    }
}

/// Sort order for status-filtered listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionOrder {
    /// Newest records first (browse listings).
    NewestFirst,
    /// Oldest submissions first (the review queue). Rows that never went
    /// through submission sort last.
    OldestSubmittedFirst,
}

impl SolutionOrder {
    fn order_clause(self) -> &'static str {
        match self {
            Self::NewestFirst => "ORDER BY created_at DESC",
            Self::OldestSubmittedFirst => "ORDER BY submitted_at ASC NULLS LAST, id ASC",
        }
    }
}

/// Provides CRUD and status-transition operations for solutions.
pub struct SolutionRepo;

impl SolutionRepo {
    /// Insert a new draft solution, returning the created row.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        input: &CreateSolution,
    ) -> Result<Solution, sqlx::Error> {
        let query = format!(
            "INSERT INTO solutions \
                (title, description, category, price_cents, creator_id, \
                 tags, images, features, specs, bom_items) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.price_cents)
            .bind(creator_id)
            .bind(&input.tags)
            .bind(&input.images)
            .bind(&input.features)
            .bind(Json(&input.specs))
            .bind(Json(&input.bom_items))
            .fetch_one(pool)
            .await
    }

    /// Insert a fork of `source`: a new draft pointing back at its origin
    /// via `upgraded_from_id`, content copied from the source row.
    pub async fn create_fork(
        pool: &PgPool,
        source: &Solution,
        creator_id: DbId,
        title: &str,
    ) -> Result<Solution, sqlx::Error> {
        let query = format!(
            "INSERT INTO solutions \
                (title, description, category, price_cents, creator_id, \
                 tags, images, features, specs, bom_items, upgraded_from_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(title)
            .bind(&source.description)
            .bind(&source.category)
            .bind(source.price_cents)
            .bind(creator_id)
            .bind(&source.tags)
            .bind(&source.images)
            .bind(&source.features)
            .bind(&source.specs)
            .bind(&source.bom_items)
            .bind(source.id)
            .fetch_one(pool)
            .await
    }

    /// Find a solution by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Solution>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM solutions WHERE id = $1");
        sqlx::query_as::<_, Solution>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch all solutions matching the given IDs (order unspecified).
    /// Missing IDs are simply absent from the result.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Solution>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM solutions WHERE id = ANY($1)");
        sqlx::query_as::<_, Solution>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List solutions in a given status. Ordering matters to pagination:
    /// the LIMIT/OFFSET window is cut from the ordered result.
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
        order: SolutionOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Solution>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solutions \
             WHERE status = $1 \
             {} \
             LIMIT $2 OFFSET $3",
            order.order_clause()
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List solutions owned by a creator, newest first.
    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Solution>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solutions \
             WHERE creator_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(creator_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List forks derived from a solution (rows whose `upgraded_from_id`
    /// points at it), oldest first.
    pub async fn list_forks(pool: &PgPool, id: DbId) -> Result<Vec<Solution>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM solutions \
             WHERE upgraded_from_id = $1 \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(id)
            .fetch_all(pool)
            .await
    }

    /// Partially update a solution's content fields. Only non-`None`
    /// fields in `input` are applied. Does not touch `status` or `version`.
    pub async fn update_content_fields(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSolutionContent,
    ) -> Result<Option<Solution>, sqlx::Error> {
        let query = format!(
            "UPDATE solutions SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                category = COALESCE($4, category), \
                price_cents = COALESCE($5, price_cents), \
                tags = COALESCE($6, tags), \
                images = COALESCE($7, images), \
                features = COALESCE($8, features), \
                specs = COALESCE($9, specs), \
                bom_items = COALESCE($10, bom_items), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.price_cents)
            .bind(&input.tags)
            .bind(&input.images)
            .bind(&input.features)
            .bind(input.specs.as_ref().map(Json))
            .bind(input.bom_items.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Overwrite all content fields and the current version number in one
    /// statement. Used by rollback inside its transaction.
    pub async fn replace_content(
        conn: &mut PgConnection,
        id: DbId,
        content: &SolutionContent,
        version: i32,
    ) -> Result<Option<Solution>, sqlx::Error> {
        let query = format!(
            "UPDATE solutions SET \
                title = $2, description = $3, category = $4, price_cents = $5, \
                images = $6, features = $7, specs = $8, bom_items = $9, \
                version = $10, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(id)
            .bind(&content.title)
            .bind(&content.description)
            .bind(&content.category)
            .bind(content.price_cents)
            .bind(&content.images)
            .bind(&content.features)
            .bind(Json(&content.specs))
            .bind(Json(&content.bom_items))
            .bind(version)
            .fetch_optional(conn)
            .await
    }

    /// Record that a new snapshot exists: bump the solution's current
    /// version number, monotonically (never downward).
    pub async fn set_current_version(
        conn: &mut PgConnection,
        id: DbId,
        version: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE solutions SET version = GREATEST(version, $2), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(version)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Compare-and-set status transition. The `WHERE status = $2` guard
    /// makes concurrent transitions lose cleanly: the row comes back
    /// `None` instead of being overwritten.
    ///
    /// Runs on a transaction connection so the caller can pair it with the
    /// ledger insert.
    pub async fn transition_status(
        conn: &mut PgConnection,
        id: DbId,
        from: &str,
        to: &str,
        stamp: StatusStamp,
    ) -> Result<Option<Solution>, sqlx::Error> {
        let query = format!(
            "UPDATE solutions SET status = $3, updated_at = NOW(){} \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}",
            stamp.set_clause()
        );
        sqlx::query_as::<_, Solution>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browse_listings_sort_newest_first() {
        assert_eq!(
            SolutionOrder::NewestFirst.order_clause(),
            "ORDER BY created_at DESC"
        );
    }

    #[test]
    fn queue_order_is_oldest_submission_first() {
        // The window is cut after ordering, so page 1 of the queue must
        // be the oldest submissions, not the newest re-sorted.
        assert_eq!(
            SolutionOrder::OldestSubmittedFirst.order_clause(),
            "ORDER BY submitted_at ASC NULLS LAST, id ASC"
        );
    }

    #[test]
    fn restore_stamps_no_timestamp() {
        assert_eq!(StatusStamp::None.set_clause(), "");
        assert_eq!(
            StatusStamp::Published.set_clause(),
            ", published_at = NOW()"
        );
    }
}
