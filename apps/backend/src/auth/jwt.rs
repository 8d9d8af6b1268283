use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{AccessClaims, RefreshClaims, ResetClaims};
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

fn epoch_seconds(now: SystemTime) -> Result<i64, AppError> {
    Ok(now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64)
}

/// An empty secret means the deployment is misconfigured; refuse to sign
/// rather than mint tokens anyone can forge.
fn signing_key(secret: &[u8]) -> Result<EncodingKey, AppError> {
    if secret.is_empty() {
        return Err(AppError::config("JWT signing secret is not set".to_string()));
    }
    Ok(EncodingKey::from_secret(secret))
}

/// Mint an access token carrying identity and role claims.
pub fn mint_access_token(
    sub: &str,
    email: &str,
    role: UserRole,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = epoch_seconds(now)?;
    let exp = iat + security.access_ttl.as_secs() as i64;

    let claims = AccessClaims {
        sub: sub.to_string(),
        email: email.to_string(),
        role,
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &signing_key(&security.access_secret)?,
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify an access token and return its claims.
///
/// Errors:
/// - Expired token → `AppError::UnauthorizedExpiredJwt`
/// - Invalid signature or structure → `AppError::UnauthorizedInvalidJwt`
///
/// This is a pure cryptographic/structural check; whether the account still
/// exists and is active is the caller's lookup.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<AccessClaims, AppError> {
    // Default Validation already checks exp; pin algorithm to configured algorithm.
    let validation = Validation::new(security.algorithm);

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&security.access_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })
}

/// Mint a refresh token for the given subject, signed with the refresh secret.
///
/// The caller persists it as the user's single refresh slot; writing a new
/// one revokes the previous token.
pub fn mint_refresh_token(
    sub: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = epoch_seconds(now)?;
    let exp = iat + security.refresh_ttl.as_secs() as i64;

    let claims = RefreshClaims {
        sub: sub.to_string(),
        jti: uuid::Uuid::new_v4().to_string(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &signing_key(&security.refresh_secret)?,
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a refresh token. Every failure mode collapses to
/// `AppError::InvalidRefreshToken`; the client's only recourse is to log in
/// again either way.
pub fn verify_refresh_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<RefreshClaims, AppError> {
    let validation = Validation::new(security.algorithm);

    decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(&security.refresh_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::invalid_refresh_token())
}

/// Mint a short-lived password-reset token. Reuses the access secret; the
/// short TTL is the only bound (single-use is not enforced by the token).
pub fn mint_password_reset_token(
    sub: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = epoch_seconds(now)?;
    let exp = iat + security.reset_ttl.as_secs() as i64;

    let claims = ResetClaims {
        sub: sub.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &signing_key(&security.access_secret)?,
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

pub fn verify_password_reset_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<ResetClaims, AppError> {
    let validation = Validation::new(security.algorithm);

    decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(&security.access_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::entities::users::UserRole;
    use crate::error::AppError;
    use crate::state::security_config::SecurityConfig;

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let security = SecurityConfig::for_tests();

        let sub = "7f7a3a52-0001-4c64-9d2a-000000000001";
        let email = "alice@example.com";
        let now = SystemTime::now();

        let token = mint_access_token(sub, email, UserRole::Candidate, now, &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();

        assert_eq!(claims.sub, sub);
        assert_eq!(claims.email, email);
        assert_eq!(claims.role, UserRole::Candidate);
        assert_eq!(
            claims.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(claims.exp, claims.iat + security.access_ttl.as_secs() as i64);
    }

    #[test]
    fn test_expired_token() {
        let security = SecurityConfig::for_tests();

        // Minted two access-TTLs ago, so well past exp plus leeway.
        let now = SystemTime::now() - 2 * security.access_ttl;
        let token = mint_access_token("sub-expired", "x@example.com", UserRole::Admin, now, &security)
            .unwrap();

        let result = verify_access_token(&token, &security);
        assert!(matches!(result, Err(AppError::UnauthorizedExpiredJwt)));
    }

    #[test]
    fn test_bad_signature() {
        let security_a = SecurityConfig::new(b"secret-A".to_vec(), b"refresh-A".to_vec());
        let security_b = SecurityConfig::new(b"secret-B".to_vec(), b"refresh-B".to_vec());

        let token =
            mint_access_token("sub-1", "x@example.com", UserRole::Admin, SystemTime::now(), &security_a)
                .unwrap();

        let result = verify_access_token(&token, &security_b);
        assert!(matches!(result, Err(AppError::UnauthorizedInvalidJwt)));
    }

    #[test]
    fn test_access_and_refresh_secrets_are_independent() {
        let security = SecurityConfig::for_tests();
        let now = SystemTime::now();

        // A refresh token never verifies as an access token and vice versa.
        let refresh = mint_refresh_token("sub-2", now, &security).unwrap();
        assert!(verify_access_token(&refresh, &security).is_err());

        let access =
            mint_access_token("sub-2", "y@example.com", UserRole::Candidate, now, &security).unwrap();
        assert!(matches!(
            verify_refresh_token(&access, &security),
            Err(AppError::InvalidRefreshToken)
        ));
    }

    #[test]
    fn test_refresh_roundtrip() {
        let security = SecurityConfig::for_tests();
        let token = mint_refresh_token("sub-3", SystemTime::now(), &security).unwrap();
        let claims = verify_refresh_token(&token, &security).unwrap();
        assert_eq!(claims.sub, "sub-3");
        assert_eq!(claims.exp, claims.iat + security.refresh_ttl.as_secs() as i64);
    }

    #[test]
    fn test_refresh_mints_are_distinct_within_a_second() {
        // Rotation must invalidate the previous token even when both are
        // minted in the same second; the jti guarantees distinct tokens.
        let security = SecurityConfig::for_tests();
        let now = SystemTime::now();
        let first = mint_refresh_token("sub-5", now, &security).unwrap();
        let second = mint_refresh_token("sub-5", now, &security).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_reset_token_roundtrip_and_ttl() {
        let security = SecurityConfig::for_tests();
        let token = mint_password_reset_token("sub-4", SystemTime::now(), &security).unwrap();
        let claims = verify_password_reset_token(&token, &security).unwrap();
        assert_eq!(claims.sub, "sub-4");
        assert_eq!(claims.exp, claims.iat + security.reset_ttl.as_secs() as i64);

        let expired_start = SystemTime::now() - security.reset_ttl - Duration::from_secs(120);
        let stale = mint_password_reset_token("sub-4", expired_start, &security).unwrap();
        assert!(matches!(
            verify_password_reset_token(&stale, &security),
            Err(AppError::UnauthorizedExpiredJwt)
        ));
    }

    #[test]
    fn test_empty_secret_refuses_to_sign() {
        let security = SecurityConfig::new(Vec::new(), Vec::new());
        let result =
            mint_access_token("sub-5", "z@example.com", UserRole::Admin, SystemTime::now(), &security);
        assert!(matches!(result, Err(AppError::Config { .. })));
    }
}
