//! Submission validation for the draft -> pending_review transition.
//!
//! All violated rules are collected and returned together so a creator can
//! fix everything in one pass.

use crate::content::SolutionContent;
use crate::error::CoreError;

/// Minimum title length for submission.
pub const MIN_TITLE_LEN: usize = 5;

/// Minimum description length for submission.
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// Validate that a solution's content meets the minimum bar for review.
///
/// Returns `ValidationFailed` carrying every violated rule, or `Ok(())`
/// when the content is submittable.
pub fn validate_for_submission(content: &SolutionContent) -> Result<(), CoreError> {
    let mut violations = Vec::new();

    if content.title.trim().chars().count() < MIN_TITLE_LEN {
        violations.push(format!(
            "title too short: must be at least {MIN_TITLE_LEN} characters"
        ));
    }

    if content.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
        violations.push(format!(
            "description too short: must be at least {MIN_DESCRIPTION_LEN} characters"
        ));
    }

    if content
        .category
        .as_ref()
        .is_none_or(|c| c.trim().is_empty())
    {
        violations.push("missing category".to_string());
    }

    if content.images.is_empty() {
        violations.push("missing assets: at least one asset reference is required".to_string());
    }

    if content.bom_items.is_empty() {
        violations.push("missing BOM items: at least one BOM item is required".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed(violations))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::content::BomItem;

    fn submittable_content() -> SolutionContent {
        SolutionContent {
            title: "Desk cable tray".to_string(),
            description: "Under-desk cable management tray, tool-free mounting.".to_string(),
            category: Some("organization".to_string()),
            price_cents: 900,
            images: vec!["trays/front.png".to_string()],
            features: vec![],
            specs: vec![],
            bom_items: vec![BomItem {
                name: "Steel tray".to_string(),
                quantity: 1,
                unit_cost_cents: None,
            }],
        }
    }

    #[test]
    fn valid_content_passes() {
        assert!(validate_for_submission(&submittable_content()).is_ok());
    }

    #[test]
    fn all_violations_reported_together() {
        let content = SolutionContent {
            title: "abc".to_string(),
            description: "too short".to_string(),
            category: None,
            price_cents: 0,
            images: vec![],
            features: vec![],
            specs: vec![],
            bom_items: vec![],
        };

        let err = validate_for_submission(&content).unwrap_err();
        let violations = match err {
            CoreError::ValidationFailed(v) => v,
            other => panic!("expected ValidationFailed, got {other:?}"),
        };
        assert_eq!(violations.len(), 5);
        assert!(violations.iter().any(|v| v.contains("title too short")));
        assert!(violations.iter().any(|v| v.contains("description too short")));
        assert!(violations.iter().any(|v| v.contains("missing category")));
        assert!(violations.iter().any(|v| v.contains("missing assets")));
        assert!(violations.iter().any(|v| v.contains("missing BOM items")));
    }

    #[test]
    fn missing_assets_and_bom_both_reported() {
        let mut content = submittable_content();
        content.images.clear();
        content.bom_items.clear();

        let err = validate_for_submission(&content).unwrap_err();
        assert_matches!(err, CoreError::ValidationFailed(ref v) if v.len() == 2);
        let msg = err.to_string();
        assert!(msg.contains("missing assets"));
        assert!(msg.contains("missing BOM items"));
    }

    #[test]
    fn whitespace_only_category_is_missing() {
        let mut content = submittable_content();
        content.category = Some("   ".to_string());
        let err = validate_for_submission(&content).unwrap_err();
        assert!(err.to_string().contains("missing category"));
    }

    #[test]
    fn title_length_counts_chars_not_bytes() {
        let mut content = submittable_content();
        content.title = "héllo".to_string();
        assert!(validate_for_submission(&content).is_ok());
    }
}
