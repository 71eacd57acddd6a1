//! Shared query-string types for list endpoints.

use serde::Deserialize;

/// Default page size for list endpoints.
const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on page size.
const MAX_LIMIT: i64 = 100;

/// Standard pagination parameters (`?limit=&offset=`).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// Effective limit, clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Effective offset, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let p = Pagination {
            limit: None,
            offset: None,
        };
        assert_eq!(p.limit(), 50);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        let p = Pagination {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 0);
    }
}
