use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Identity claim decoded from a verified access token.
#[derive(Debug, Clone, Serialize)]
pub struct Claims {
    pub subject: String,
    pub role: Option<Role>,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
    pub raw: serde_json::Value,
}

impl Claims {
    /// Convenience helper for role checks.
    pub fn has_role(&self, role: &Role) -> bool {
        self.role.as_ref() == Some(role)
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    sub: String,
    #[serde(default)]
    role: Option<String>,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        if value.sub.trim().is_empty() {
            return Err(AuthError::InvalidClaim("sub", value.sub));
        }

        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("exp", value.exp.to_string()))?;

        let issued_at = match value.iat {
            Some(iat) => Some(
                Utc.timestamp_opt(iat, 0)
                    .single()
                    .ok_or_else(|| AuthError::InvalidClaim("iat", iat.to_string()))?,
            ),
            None => None,
        };

        let role = value
            .role
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| Role::parse(&raw));

        Ok(Self {
            subject: value.sub,
            role,
            expires_at,
            issued_at,
            raw: serde_json::Value::Null,
        })
    }
}

impl TryFrom<serde_json::Value> for Claims {
    type Error = AuthError;

    fn try_from(value: serde_json::Value) -> AuthResult<Self> {
        let repr: ClaimsRepr = serde_json::from_value(value.clone())
            .map_err(|err| AuthError::InvalidJson(err.to_string()))?;
        let mut claims = Claims::try_from(repr)?;
        claims.raw = value;
        Ok(claims)
    }
}
