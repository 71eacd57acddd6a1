//! Mapping from sqlx errors to the domain taxonomy.

use fabriq_core::error::CoreError;

/// Constraint-name prefix of the version allocation uniqueness guard.
const VERSION_CONFLICT_CONSTRAINT: &str = "uq_solution_versions";

/// Gateway failures surface as opaque internal errors; this layer does
/// not retry them.
pub fn db_err(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("database error: {err}"))
}

/// Whether an error is a unique-constraint violation on
/// `(solution_id, version_number)`, i.e. a lost version-allocation race.
///
/// PostgreSQL reports unique violations as error code 23505.
pub fn is_version_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err
                    .constraint()
                    .is_some_and(|c| c.starts_with(VERSION_CONFLICT_CONSTRAINT))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_conflicts() {
        assert!(!is_version_conflict(&sqlx::Error::RowNotFound));
        assert!(!is_version_conflict(&sqlx::Error::PoolClosed));
    }

    #[test]
    fn db_err_is_opaque_internal() {
        let err = db_err(sqlx::Error::PoolClosed);
        assert!(matches!(err, CoreError::Internal(_)));
    }
}
