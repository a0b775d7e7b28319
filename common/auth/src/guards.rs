use tracing::warn;

use crate::claims::Claims;
use crate::roles::Role;
use crate::AuthContext;
use common_http_errors::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    Forbidden,
}

impl From<GuardError> for ApiError {
    fn from(_: GuardError) -> Self {
        ApiError::forbidden()
    }
}

/// Pure role predicate: false when the claim carries no role or a role
/// outside `allowed`.
pub fn authorize(claims: &Claims, allowed: &[Role]) -> bool {
    match &claims.role {
        Some(role) => allowed.iter().any(|candidate| candidate == role),
        None => false,
    }
}

pub fn ensure_role(auth: &AuthContext, allowed: &[Role]) -> Result<(), GuardError> {
    if authorize(&auth.claims, allowed) {
        return Ok(());
    }

    warn!(subject = %auth.claims.subject, role = ?auth.claims.role, ?allowed, "role_check_failed");
    Err(GuardError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::WRITE_ROLES;
    use chrono::Utc;

    fn claims(role: Option<Role>) -> Claims {
        Claims {
            subject: "user-1".into(),
            role,
            expires_at: Utc::now(),
            issued_at: None,
            raw: serde_json::Value::Null,
        }
    }

    #[test]
    fn admin_and_user_may_write() {
        assert!(authorize(&claims(Some(Role::Admin)), WRITE_ROLES));
        assert!(authorize(&claims(Some(Role::User)), WRITE_ROLES));
    }

    #[test]
    fn missing_role_is_denied() {
        assert!(!authorize(&claims(None), WRITE_ROLES));
    }

    #[test]
    fn role_outside_allowed_set_is_denied() {
        assert!(!authorize(&claims(Some(Role::User)), &[Role::Admin]));
        assert!(!authorize(&claims(Some(Role::Unknown("guest".into()))), WRITE_ROLES));
    }

    #[test]
    fn empty_allowed_set_denies_everyone() {
        assert!(!authorize(&claims(Some(Role::Admin)), &[]));
    }

    #[test]
    fn ensure_role_denies_missing_role() {
        let ctx = AuthContext { claims: claims(None), token: "t".into() };
        assert_eq!(ensure_role(&ctx, WRITE_ROLES), Err(GuardError::Forbidden));
    }
}
