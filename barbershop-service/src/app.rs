use std::sync::Arc;

use anyhow::Result;
use axum::extract::FromRef;
use common_auth::{Authenticator, JwtConfig, JwtVerifier, RevokedTokens, TokenSigner};

use crate::metrics::ServiceMetrics;
use crate::models::{AppointmentStore, BarberStore};
use crate::users::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub barbers: BarberStore,
    pub appointments: AppointmentStore,
    pub users: UserStore,
    pub authenticator: Arc<Authenticator>,
    pub token_signer: Arc<TokenSigner>,
    pub metrics: Arc<ServiceMetrics>,
}

impl FromRef<AppState> for Arc<Authenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.authenticator.clone()
    }
}

impl FromRef<AppState> for Arc<TokenSigner> {
    fn from_ref(state: &AppState) -> Self {
        state.token_signer.clone()
    }
}

impl AppState {
    /// Empty stores and a fresh revocation list around the given signing config.
    pub fn new(jwt: JwtConfig) -> Result<Self> {
        let token_signer = Arc::new(TokenSigner::new(&jwt));
        let verifier = JwtVerifier::new(jwt);
        let authenticator = Arc::new(Authenticator::new(verifier, RevokedTokens::new()));

        Ok(Self {
            barbers: BarberStore::new(),
            appointments: AppointmentStore::new(),
            users: UserStore::new(),
            authenticator,
            token_signer,
            metrics: Arc::new(ServiceMetrics::new()?),
        })
    }

    pub fn revoked_tokens(&self) -> &RevokedTokens {
        self.authenticator.revoked_tokens()
    }
}
