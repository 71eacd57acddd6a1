//! Solution entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use fabriq_core::content::{BomItem, SolutionContent, SpecEntry};
use fabriq_core::error::CoreError;
use fabriq_core::status::SolutionStatus;
use fabriq_core::types::{DbId, Timestamp};

/// A row from the `solutions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Solution {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub price_cents: i64,
    pub status: String,
    /// Highest version number with a corresponding snapshot (0 = none yet).
    pub version: i32,
    pub creator_id: DbId,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub specs: Json<Vec<SpecEntry>>,
    pub bom_items: Json<Vec<BomItem>>,
    /// Fork lineage: the solution this one was derived from, if any.
    pub upgraded_from_id: Option<DbId>,
    pub created_at: Timestamp,
    pub submitted_at: Option<Timestamp>,
    pub last_reviewed_at: Option<Timestamp>,
    pub published_at: Option<Timestamp>,
    pub archived_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl Solution {
    /// Parse the stored status string. An unknown value means the row was
    /// written outside the state machine and is surfaced as internal.
    pub fn status_enum(&self) -> Result<SolutionStatus, CoreError> {
        SolutionStatus::parse(&self.status).ok_or_else(|| {
            CoreError::Internal(format!(
                "solution {} has unknown status '{}'",
                self.id, self.status
            ))
        })
    }

    /// The content fields that participate in version snapshots.
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

/// DTO for creating a new draft solution.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSolution {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    #[serde(default)]
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

/// DTO for updating a solution's content fields. All fields optional;
/// only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSolutionContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub specs: Option<Vec<SpecEntry>>,
    pub bom_items: Option<Vec<BomItem>>,
}
