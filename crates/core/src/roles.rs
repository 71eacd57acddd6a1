//! Role constants and authorization gates.
//!
//! Identity resolution (who the actor is, which role they hold) happens in
//! the external auth collaborator; this module only answers "may this role
//! perform this action" and "does this actor own this resource".

use crate::error::CoreError;
use crate::types::DbId;

/// Full administrative access, including publish/suspend/archive.
pub const ROLE_ADMIN: &str = "admin";

/// May review pending submissions.
pub const ROLE_REVIEWER: &str = "reviewer";

/// May create, edit, and submit their own solutions.
pub const ROLE_CREATOR: &str = "creator";

/// Whether a role is admin-level.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// Whether a role may record review decisions.
pub fn can_review(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_REVIEWER
}

/// Gate for admin-only operations (publish, suspend, restore, archive).
pub fn require_admin(role: &str) -> Result<(), CoreError> {
    if is_admin(role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "role '{role}' may not perform admin-level lifecycle operations"
        )))
    }
}

/// Gate for reviewer operations.
pub fn require_reviewer(role: &str) -> Result<(), CoreError> {
    if can_review(role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "role '{role}' may not review submissions"
        )))
    }
}

/// Gate for owner-only operations (submit, edit, version, rollback).
/// Admins may act on any solution.
pub fn require_owner_or_admin(
    actor_id: DbId,
    actor_role: &str,
    creator_id: DbId,
) -> Result<(), CoreError> {
    if actor_id == creator_id || is_admin(actor_role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "only the solution's creator may perform this operation".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn admin_gate() {
        assert!(require_admin(ROLE_ADMIN).is_ok());
        assert_matches!(require_admin(ROLE_REVIEWER), Err(CoreError::Forbidden(_)));
        assert_matches!(require_admin(ROLE_CREATOR), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn reviewer_gate_admits_admin_and_reviewer() {
        assert!(require_reviewer(ROLE_ADMIN).is_ok());
        assert!(require_reviewer(ROLE_REVIEWER).is_ok());
        assert_matches!(require_reviewer(ROLE_CREATOR), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn owner_gate() {
        assert!(require_owner_or_admin(7, ROLE_CREATOR, 7).is_ok());
        assert!(require_owner_or_admin(1, ROLE_ADMIN, 7).is_ok());
        assert_matches!(
            require_owner_or_admin(8, ROLE_CREATOR, 7),
            Err(CoreError::Forbidden(_))
        );
    }
}
