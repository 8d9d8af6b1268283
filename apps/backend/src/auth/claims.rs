//! Claim payloads for the three token kinds this backend issues.

use serde::{Deserialize, Serialize};

use crate::entities::users::UserRole;

/// Claims carried by an access token. Inserted into request extensions by
/// the `JwtExtract` middleware after successful verification.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessClaims {
    /// User id (uuid) as a string
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Claims carried by a refresh token. Deliberately minimal: the subject is
/// re-checked against the stored single-slot token on every use. The `jti`
/// makes every mint distinct, so rotating within the same second still
/// invalidates the previous token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RefreshClaims {
    pub sub: String,
    /// Unique token id
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by a password-reset token. Signed with the access secret
/// on a short TTL; not single-use (see DESIGN.md).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResetClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
