use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Configuration for token signing and verification.
///
/// Secrets and TTLs are always passed in explicitly; nothing in the
/// signing/verification path reads ambient state, so tests can run with
/// fixed secrets.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret for access tokens (and password-reset tokens)
    pub access_secret: Vec<u8>,
    /// Distinct secret for refresh tokens
    pub refresh_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
    /// Access token lifetime (default 1h)
    pub access_ttl: Duration,
    /// Refresh token lifetime (default 7d)
    pub refresh_ttl: Duration,
    /// Password-reset token lifetime (default 1h)
    pub reset_ttl: Duration,
}

pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const DEFAULT_RESET_TTL: Duration = Duration::from_secs(60 * 60);

impl SecurityConfig {
    /// Create a new SecurityConfig with the given secrets and default TTLs.
    pub fn new(access_secret: impl Into<Vec<u8>>, refresh_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
            reset_ttl: DEFAULT_RESET_TTL,
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// Fixed secrets for tests.
    pub fn for_tests() -> Self {
        Self::new(
            b"test_access_secret_do_not_use".to_vec(),
            b"test_refresh_secret_do_not_use".to_vec(),
        )
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::for_tests()
    }
}
