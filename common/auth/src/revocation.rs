use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

/// Set of tokens explicitly invalidated before their natural expiry.
///
/// Membership is monotonic: there is no way to un-revoke a token, and entries
/// are kept for the lifetime of the process.
#[derive(Clone, Default)]
pub struct RevokedTokens {
    inner: Arc<RwLock<HashSet<String>>>,
}

impl RevokedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke `token`. Revoking an already revoked token is a no-op.
    pub fn revoke(&self, token: impl Into<String>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let inserted = guard.insert(token.into());
        debug!(inserted, revoked_total = guard.len(), "token revoked");
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.contains(token)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
