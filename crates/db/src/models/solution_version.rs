//! Solution version snapshot model.
//!
//! Rows are immutable: the repository exposes no update or delete, and
//! rollback appends a new row instead of editing history.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use fabriq_core::content::{BomItem, SolutionContent, SpecEntry};
use fabriq_core::types::{DbId, Timestamp};

/// A row from the `solution_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SolutionVersion {
    pub id: DbId,
    pub solution_id: DbId,
    pub version_number: i32,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub price_cents: i64,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub specs: Json<Vec<SpecEntry>>,
    pub bom_items: Json<Vec<BomItem>>,
    pub change_log: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

impl SolutionVersion {
    /// Reconstruct the snapshot's content fields.
    pub fn content(&self) -> SolutionContent {
        SolutionContent {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            price_cents: self.price_cents,
            images: self.images.clone(),
            features: self.features.clone(),
            specs: self.specs.0.clone(),
            bom_items: self.bom_items.0.clone(),
        }
    }
}

/// Input for inserting a new version snapshot. The version number is
/// allocated by the repository (`MAX + 1` under the unique constraint).
#[derive(Debug, Clone)]
pub struct NewSolutionVersion {
    pub solution_id: DbId,
    pub content: SolutionContent,
    pub change_log: String,
    pub created_by: DbId,
}
