use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::auth::claims::{Claims, SubjectId};
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Lifetime of tokens issued by the authentication service.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Reasons a bearer credential is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing or malformed bearer token")]
    MissingToken,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
}

/// Stateless verifier for access tokens signed with the shared secret.
///
/// Built once at startup and shared read-only by every worker.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(security: &SecurityConfig) -> Self {
        // Pin the algorithm and reject a token as soon as `exp` has passed.
        let mut validation = Validation::new(security.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(&security.jwt_secret),
            validation,
        }
    }

    /// Verify a raw bearer token and return its subject.
    ///
    /// Errors:
    /// - empty token → `AuthError::MissingToken`
    /// - expired token → `AuthError::Expired`
    /// - bad signature, wrong algorithm, malformed token or claims → `AuthError::InvalidSignature`
    pub fn verify(&self, token: &str) -> Result<SubjectId, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| SubjectId::from(data.claims))
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidSignature,
            })
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

/// Mint a token with the same contract the authentication service issues.
pub fn mint_access_token(
    subject: &str,
    now: SystemTime,
    ttl: Duration,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64;

    let claims = Claims {
        user_id: subject.to_string(),
        iat: Some(iat),
        exp: iat + ttl.as_secs() as i64,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    use super::{mint_access_token, AuthError, TokenVerifier, DEFAULT_TOKEN_TTL};
    use crate::state::security_config::SecurityConfig;

    fn security() -> SecurityConfig {
        SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
    }

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let security = security();
        let verifier = TokenVerifier::new(&security);

        let token =
            mint_access_token("user-roundtrip-123", SystemTime::now(), DEFAULT_TOKEN_TTL, &security)
                .unwrap();
        let subject = verifier.verify(&token).unwrap();

        assert_eq!(subject.as_str(), "user-roundtrip-123");
    }

    #[test]
    fn test_expired_token() {
        let security = security();
        let verifier = TokenVerifier::new(&security);

        // Issued two hours ago with a one hour lifetime
        let issued = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
        let token = mint_access_token(
            "user-expired-456",
            issued,
            Duration::from_secs(60 * 60),
            &security,
        )
        .unwrap();

        assert_eq!(verifier.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_bad_signature() {
        let security_a = SecurityConfig::new("secret-A".as_bytes());
        let token = mint_access_token(
            "user-bad-sig-789",
            SystemTime::now(),
            DEFAULT_TOKEN_TTL,
            &security_a,
        )
        .unwrap();

        let verifier_b = TokenVerifier::new(&SecurityConfig::new("secret-B".as_bytes()));
        assert_eq!(verifier_b.verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let issued = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
        let token = mint_access_token(
            "user-both",
            issued,
            Duration::from_secs(60),
            &SecurityConfig::new("secret-A".as_bytes()),
        )
        .unwrap();

        let verifier = TokenVerifier::new(&SecurityConfig::new("secret-B".as_bytes()));
        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_garbage_and_empty_tokens() {
        let verifier = TokenVerifier::new(&security());

        assert_eq!(
            verifier.verify("not-a-real-token"),
            Err(AuthError::InvalidSignature)
        );
        assert_eq!(verifier.verify(""), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_algorithm_is_pinned() {
        let security = security();
        let claims = serde_json::json!({ "userId": "user-hs512", "exp": 4_000_000_000_i64 });
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(&security.jwt_secret),
        )
        .unwrap();

        let verifier = TokenVerifier::new(&security);
        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_token_without_user_id_is_rejected() {
        let security = security();
        let claims = serde_json::json!({ "sub": "someone", "exp": 4_000_000_000_i64 });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&security.jwt_secret),
        )
        .unwrap();

        let verifier = TokenVerifier::new(&security);
        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidSignature));
    }
}
