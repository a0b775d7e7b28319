use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Role carried in the `role` claim of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
    Unknown(String),
}

/// Roles allowed to create, replace and delete resources.
pub const WRITE_ROLES: &[Role] = &[Role::Admin, Role::User];

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::User => ROLE_USER,
            Role::Unknown(other) => other,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            ROLE_ADMIN => Role::Admin,
            ROLE_USER => Role::User,
            _ => Role::Unknown(value.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown(_))
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Role::parse(value))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_case_insensitively() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
    }

    #[test]
    fn keeps_unknown_role_verbatim() {
        let role: Role = "Barista".parse().unwrap();
        assert_eq!(role, Role::Unknown("Barista".into()));
        assert!(!role.is_known());
        assert_eq!(role.to_string(), "Barista");
    }
}
