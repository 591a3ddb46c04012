use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::error::AuthError;
use super::types::VerifiedPhone;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,        // Subject (user phone)
    pub user_phone: String, // Phone number exactly as the client supplied it
    pub session_id: String, // Upstream session id from the identity provider
    pub exp: i64,           // Expiration timestamp
    pub iat: i64,           // Issued at timestamp
    pub iss: String,        // Issuer
    pub jti: String,        // JWT ID (unique token identifier)
}

/// JWT Service - creates and verifies JWT tokens
///
/// Signs with HS256. The key material is read-only after construction,
/// so one instance is shared across all requests.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: chrono::Duration,
}

impl JwtService {
    /// Create new JWT service with secret, issuer and token lifetime
    pub fn new(secret: &str, issuer: String, ttl: chrono::Duration) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::Configuration(
                "JWT signing secret is empty".to_string(),
            ));
        }
        if ttl <= chrono::Duration::zero() {
            return Err(AuthError::Configuration(
                "JWT lifetime must be positive".to_string(),
            ));
        }
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(AuthError::Configuration(
                "JWT lifetime is out of range".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            ttl,
        })
    }

    /// Create a new JWT token binding a verified phone to its upstream session
    pub fn create_token(&self, verified: &VerifiedPhone) -> Result<String, AuthError> {
        self.create_token_at(verified, Utc::now())
    }

    fn create_token_at(
        &self,
        verified: &VerifiedPhone,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let exp = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AuthError::Configuration("token expiry is out of range".to_string())
        })?;

        let claims = Claims {
            sub: verified.user_phone().to_string(),
            user_phone: verified.user_phone().to_string(),
            session_id: verified.upstream_session_id().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(), // Unique token ID
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Configuration(format!("failed to sign token: {}", e)))
    }

    /// Verify and decode a JWT token
    ///
    /// Every failure (signature, structure, expiry, issuer) collapses into
    /// `InvalidToken`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "Token rejected");
                AuthError::InvalidToken
            })
    }
}
