//! Signed access tokens.
//!
//! Tokens are HS256 JWTs carrying the username and a 24 hour validity
//! window. They are stateless: nothing is stored and there is no
//! revocation, a token simply stops validating once it expires.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use super::TokenError;
use crate::error::{CoreError, CoreResult, ErrorKind};
use crate::models::auth::{TokenClaims, User};

/// Token lifetime: 24 hours.
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Issuer tag written into and required from every token.
pub const TOKEN_ISSUER: &str = "skymates";

/// Process-wide signing secret. Never printed.
#[derive(Clone)]
pub struct JwtSecret(Vec<u8>);

impl JwtSecret {
    /// Wrap raw secret bytes. An empty secret is a configuration error.
    pub fn new(bytes: impl Into<Vec<u8>>) -> CoreResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CoreError::new(
                ErrorKind::Internal,
                "JWT secret is empty; set JWT_SECRET",
            ));
        }
        Ok(Self(bytes))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(<redacted>)")
    }
}

/// Issues and validates access tokens with one secret.
#[derive(Clone)]
pub struct AuthTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: Duration,
}

impl fmt::Debug for AuthTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokenService")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl AuthTokenService {
    pub fn new(secret: &JwtSecret) -> Self {
        Self::with_issuer(secret, TOKEN_ISSUER)
    }

    /// Service writing and requiring a custom issuer tag.
    pub fn with_issuer(secret: &JwtSecret, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();

        // Signature, algorithm, issuer and claim presence are checked by the
        // library; the time window is checked here against an explicit `now`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf", "iss"]);
        validation.set_issuer(&[issuer.as_str()]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
            lifetime: Duration::seconds(TOKEN_LIFETIME_SECS),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `user`, valid from now for 24 hours.
    pub fn issue(&self, user: &User) -> CoreResult<String> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> CoreResult<String> {
        let claims = TokenClaims {
            username: user.username.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            iss: self.issuer.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| CoreError::internal("jwt encode", e))
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    ///
    /// Accepts when `nbf <= now <= exp`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                let cause = classify(e.kind());
                debug!(error = %e, ?cause, "token rejected");
                cause
            })?
            .claims;

        let now = now.timestamp();
        if now < claims.nbf {
            return Err(TokenError::NotYetValid);
        }
        if now > claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

fn classify(kind: &JwtErrorKind) -> TokenError {
    match kind {
        JwtErrorKind::InvalidSignature => TokenError::BadSignature,
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        JwtErrorKind::ImmatureSignature => TokenError::NotYetValid,
        JwtErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn ada() -> User {
        let now = Utc::now();
        User {
            id: Uuid::nil(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(secret: &str) -> AuthTokenService {
        AuthTokenService::new(&JwtSecret::new(secret).unwrap())
    }

    #[test]
    fn valid_through_whole_window() {
        let svc = service("test-secret");
        let t0 = Utc::now();
        let token = svc.issue_at(&ada(), t0).unwrap();

        let claims = svc.validate_at(&token, t0).unwrap();
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECS);

        let late = t0 + Duration::hours(23) + Duration::minutes(59);
        assert!(svc.validate_at(&token, late).is_ok());
    }

    #[test]
    fn expires_after_a_day() {
        let svc = service("test-secret");
        let t0 = Utc::now();
        let token = svc.issue_at(&ada(), t0).unwrap();
        let after = t0 + Duration::hours(24) + Duration::minutes(1);
        assert_eq!(svc.validate_at(&token, after), Err(TokenError::Expired));
    }

    #[test]
    fn not_valid_before_issue() {
        let svc = service("test-secret");
        let t0 = Utc::now();
        let token = svc.issue_at(&ada(), t0).unwrap();
        let before = t0 - Duration::minutes(1);
        assert_eq!(svc.validate_at(&token, before), Err(TokenError::NotYetValid));
    }

    #[test]
    fn altered_signature_is_rejected() {
        let svc = service("test-secret");
        let mut token = svc.issue(&ada()).unwrap();
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'E' } else { 'A' });
        assert_eq!(svc.validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = service("secret-one").issue(&ada()).unwrap();
        assert_eq!(
            service("secret-two").validate(&token),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn truncated_token_is_malformed() {
        let svc = service("test-secret");
        let token = svc.issue(&ada()).unwrap();
        let cut = token.rfind('.').unwrap();
        assert_eq!(svc.validate(&token[..cut]), Err(TokenError::Malformed));
        assert_eq!(svc.validate("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(svc.validate(""), Err(TokenError::Malformed));
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let secret = JwtSecret::new("test-secret").unwrap();
        let foreign = AuthTokenService::with_issuer(&secret, "elsewhere");
        let token = foreign.issue(&ada()).unwrap();
        assert_eq!(
            AuthTokenService::new(&secret).validate(&token),
            Err(TokenError::IssuerMismatch)
        );
    }

    #[test]
    fn empty_secret_is_refused() {
        let err = JwtSecret::new("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn secret_is_redacted_in_debug() {
        let secret = JwtSecret::new("hunter2").unwrap();
        assert!(!format!("{secret:?}").contains("hunter2"));
        assert!(!format!("{:?}", AuthTokenService::new(&secret)).contains("hunter2"));
    }

    #[test]
    fn token_failures_classify_as_unauthorized() {
        let err: CoreError = TokenError::Expired.into();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.find_cause::<TokenError>(), Some(&TokenError::Expired));
    }
}
