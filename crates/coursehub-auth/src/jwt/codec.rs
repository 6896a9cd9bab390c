//! HS256 access-token codec.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use coursehub_core::config::AuthConfig;
use coursehub_core::error::AppError;
use coursehub_entity::user::UserRole;

use super::claims::AccessClaims;
use super::error::TokenError;

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Compact JWT.
    pub token: String,
    /// When the token stops verifying.
    pub expires_at: DateTime<Utc>,
    /// The signed claims.
    pub claims: AccessClaims,
}

/// Signs and verifies access tokens with a process-wide secret.
///
/// Pure CPU; holds no store handles and needs no coordination between
/// replicas that share the secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Creates a codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
        }
    }

    /// Issues an access token for `user_id` bound to a session lineage.
    pub fn issue(
        &self,
        user_id: Uuid,
        role: UserRole,
        session_lineage_id: Uuid,
    ) -> Result<AccessToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;
        let claims = AccessClaims {
            sub: user_id,
            role,
            sid: session_lineage_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = self.sign(&claims)?;
        Ok(AccessToken {
            token,
            expires_at,
            claims,
        })
    }

    /// Verifies signature and expiry. Fails closed on any decode problem.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }

    fn sign(&self, claims: &AccessClaims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }
}
