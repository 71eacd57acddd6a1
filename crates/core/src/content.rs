//! Typed solution content: the set of fields captured by a version
//! snapshot, plus the structured BOM and spec records.

use serde::{Deserialize, Serialize};

/// One line of a solution's bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
    pub name: String,
    pub quantity: i32,
    /// Unit cost in cents, when known.
    pub unit_cost_cents: Option<i64>,
}

/// One technical specification entry (e.g. "material" -> "6061 aluminum").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecEntry {
    pub label: String,
    pub value: String,
}

/// The content fields of a solution that participate in version snapshots.
///
/// Status, timestamps, and lineage are deliberately absent: versioning
/// tracks content, not lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionContent {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    /// Price in cents.
    pub price_cents: i64,
    /// Asset references (uploaded image/model file paths or URLs).
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub specs: Vec<SpecEntry>,
    pub bom_items: Vec<BomItem>,
}
