use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use common_auth::Role;
use once_cell::sync::Lazy;
use rand_core::OsRng;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Checked when the username is unknown so a miss costs the same Argon2 work
/// as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"no-such-account", &salt)
        .ok()
        .map(|hash| hash.to_string())
});

fn password_matches(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("username '{0}' is already registered")]
    UsernameTaken(String),
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Accounts keyed by username, with Argon2 password hashes.
#[derive(Clone, Default)]
pub struct UserStore {
    inner: Arc<RwLock<HashMap<String, User>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, username: &str, password: &str, role: Role) -> Result<User, UserStoreError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| UserStoreError::Hash(err.to_string()))?
            .to_string();

        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.contains_key(username) {
            return Err(UserStoreError::UsernameTaken(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            role,
        };
        guard.insert(user.username.clone(), user.clone());
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// The account for `username` when `password` matches its hash.
    pub fn verify_credentials(&self, username: &str, password: &str) -> Option<User> {
        let user = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned();

        let Some(user) = user else {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                password_matches(hash, password);
            }
            return None;
        };
        password_matches(&user.password_hash, password).then_some(user)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
