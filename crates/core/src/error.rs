use crate::types::DbId;

/// Domain error taxonomy shared by the persistence, lifecycle, and API layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The requested transition or operation is not valid from the
    /// solution's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Submission content is below minimum requirements. Carries every
    /// violated rule, not just the first.
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a single-rule validation failure.
    pub fn validation(rule: impl Into<String>) -> Self {
        Self::ValidationFailed(vec![rule.into()])
    }
}
