pub mod authenticator;
pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod guards;
pub mod revocation;
pub mod roles;
pub mod signer;
pub mod verifier;

pub use authenticator::Authenticator;
pub use claims::Claims;
pub use config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use extractors::AuthContext;
pub use guards::{authorize, ensure_role, GuardError};
pub use revocation::RevokedTokens;
pub use roles::{Role, ROLE_ADMIN, ROLE_USER, WRITE_ROLES};
pub use signer::{IssuedToken, TokenSigner};
pub use verifier::JwtVerifier;
