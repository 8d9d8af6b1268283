//! Role gate: pure, composable authorization predicates.
//!
//! These functions assume authentication already happened (a `CurrentUser`
//! exists); they only evaluate the role claim. Stacking several checks in a
//! handler fails fast on the first rejection.

use crate::entities::users::UserRole;
use crate::error::AppError;

/// Require the caller's role to be one of `allowed`.
pub fn authorize(role: UserRole, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AppError::forbidden())
    }
}

/// Shorthand for admin-only operations.
pub fn require_admin(role: UserRole) -> Result<(), AppError> {
    authorize(role, &[UserRole::Admin])
}

/// Shorthand for candidate-only operations.
pub fn require_candidate(role: UserRole) -> Result<(), AppError> {
    authorize(role, &[UserRole::Candidate])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_accepts_listed_role() {
        assert!(authorize(UserRole::Admin, &[UserRole::Admin]).is_ok());
        assert!(authorize(UserRole::Candidate, &[UserRole::Admin, UserRole::Candidate]).is_ok());
    }

    #[test]
    fn test_authorize_rejects_unlisted_role_with_forbidden() {
        let result = authorize(UserRole::Candidate, &[UserRole::Admin]);
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn test_shorthands() {
        assert!(require_admin(UserRole::Admin).is_ok());
        assert!(matches!(require_admin(UserRole::Candidate), Err(AppError::Forbidden)));
        assert!(require_candidate(UserRole::Candidate).is_ok());
        assert!(matches!(require_candidate(UserRole::Admin), Err(AppError::Forbidden)));
    }
}
