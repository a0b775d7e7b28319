/// Runtime configuration for HS256 token signing and verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared signing secret.
    pub secret: String,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
    /// Lifetime of issued access tokens.
    pub token_ttl_seconds: i64,
}

impl JwtConfig {
    /// Construct config with no expiry leeway and one hour tokens.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            leeway_seconds: 0,
            token_ttl_seconds: 3600,
        }
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn with_token_ttl(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }
}
