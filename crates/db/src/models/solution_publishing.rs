//! Publishing overlay model: publish-specific metadata that does not
//! participate in the state machine.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use fabriq_core::types::{DbId, Timestamp};

/// A row from the `solution_publishing` table (one per solution).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SolutionPublishing {
    pub id: DbId,
    pub solution_id: DbId,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub featured: bool,
    pub hero_image_url: Option<String>,
    pub product_links: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or updating the publishing overlay. Upserted on
/// `solution_id`; only non-`None` fields overwrite existing values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertSolutionPublishing {
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub featured: Option<bool>,
    pub hero_image_url: Option<String>,
    pub product_links: Option<Vec<String>>,
}
