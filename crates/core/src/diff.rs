//! Field-by-field diffing of solution content snapshots.
//!
//! Used by version comparison: only fields whose values differ between the
//! two snapshots are reported.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::SolutionContent;

/// One changed field between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
}

/// Compare two content snapshots field by field.
///
/// Returns one [`FieldDiff`] per differing field, in a fixed field order.
/// Identical snapshots produce an empty vec.
pub fn diff_content(old: &SolutionContent, new: &SolutionContent) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();

    push_if_changed(&mut diffs, "title", &old.title, &new.title);
    push_if_changed(&mut diffs, "description", &old.description, &new.description);
    push_if_changed(&mut diffs, "category", &old.category, &new.category);
    push_if_changed(&mut diffs, "price_cents", &old.price_cents, &new.price_cents);
    push_if_changed(&mut diffs, "images", &old.images, &new.images);
    push_if_changed(&mut diffs, "features", &old.features, &new.features);
    push_if_changed(&mut diffs, "specs", &old.specs, &new.specs);
    push_if_changed(&mut diffs, "bom_items", &old.bom_items, &new.bom_items);

    diffs
}

fn push_if_changed<T: PartialEq + Serialize>(
    diffs: &mut Vec<FieldDiff>,
    field: &str,
    old: &T,
    new: &T,
) {
    if old != new {
        diffs.push(FieldDiff {
            field: field.to_string(),
            old_value: serde_json::to_value(old).unwrap_or(Value::Null),
            new_value: serde_json::to_value(new).unwrap_or(Value::Null),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BomItem;

    fn base_content() -> SolutionContent {
        SolutionContent {
            title: "Parametric shelf bracket".to_string(),
            description: "A load-rated bracket with configurable spacing.".to_string(),
            category: Some("hardware".to_string()),
            price_cents: 1500,
            images: vec!["brackets/hero.png".to_string()],
            features: vec!["parametric".to_string()],
            specs: vec![],
            bom_items: vec![BomItem {
                name: "M5 bolt".to_string(),
                quantity: 4,
                unit_cost_cents: Some(12),
            }],
        }
    }

    #[test]
    fn identical_snapshots_produce_empty_diff() {
        let a = base_content();
        assert!(diff_content(&a, &a.clone()).is_empty());
    }

    #[test]
    fn only_changed_fields_are_reported() {
        let old = base_content();
        let mut new = base_content();
        new.title = "Parametric shelf bracket v2".to_string();
        new.price_cents = 1800;

        let diffs = diff_content(&old, &new);
        let fields: Vec<&str> = diffs.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "price_cents"]);
    }

    #[test]
    fn diff_carries_old_and_new_values() {
        let old = base_content();
        let mut new = base_content();
        new.price_cents = 2000;

        let diffs = diff_content(&old, &new);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, "price_cents");
        assert_eq!(diffs[0].old_value, serde_json::json!(1500));
        assert_eq!(diffs[0].new_value, serde_json::json!(2000));
    }

    #[test]
    fn structured_fields_diff_as_json() {
        let old = base_content();
        let mut new = base_content();
        new.bom_items[0].quantity = 8;

        let diffs = diff_content(&old, &new);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, "bom_items");
        assert_eq!(diffs[0].new_value[0]["quantity"], 8);
    }
}
