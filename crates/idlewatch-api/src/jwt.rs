//! Bearer token validation.
//!
//! Tokens are issued by the account service; this crate only verifies them.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use idlewatch_core::config::AuthConfig;
use idlewatch_core::error::AppError;
use idlewatch_entity::user::UserRole;

/// JWT claims payload carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Validates HS256 access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        if let Some(issuer) = &config.issuer {
            // `set_issuer` alone accepts tokens that omit `iss`.
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        AppError::unauthorized("Invalid token issuer")
                    }
                    jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(claim) => {
                        AppError::unauthorized(format!("Token is missing the '{claim}' claim"))
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(secret: &str, exp_offset: Duration, role: UserRole) -> (Uuid, String) {
        issued_token(secret, exp_offset, role, None)
    }

    fn issued_token(
        secret: &str,
        exp_offset: Duration,
        role: UserRole,
        iss: Option<&str>,
    ) -> (Uuid, String) {
        let sub = Uuid::new_v4();
        let claims = Claims {
            sub,
            role,
            exp: (Utc::now() + exp_offset).timestamp(),
            iat: Some(Utc::now().timestamp()),
            iss: iss.map(str::to_string),
        };
        let jwt = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        (sub, jwt)
    }

    #[test]
    fn test_decodes_valid_token() {
        let config = AuthConfig::default();
        let (sub, jwt) = token(&config.jwt_secret, Duration::minutes(5), UserRole::Admin);
        let claims = JwtDecoder::new(&config).decode(&jwt).unwrap();
        assert_eq!(claims.user_id(), sub);
        assert!(claims.role.is_admin());
    }

    #[test]
    fn test_rejects_wrong_secret_and_expired() {
        let config = AuthConfig::default();
        let decoder = JwtDecoder::new(&config);

        let (_, forged) = token("other-secret", Duration::minutes(5), UserRole::User);
        assert_eq!(
            decoder.decode(&forged).unwrap_err().message,
            "Invalid token signature"
        );

        let (_, stale) = token(&config.jwt_secret, Duration::hours(-1), UserRole::User);
        assert_eq!(decoder.decode(&stale).unwrap_err().message, "Token has expired");
    }

    #[test]
    fn test_enforces_configured_issuer() {
        let config = AuthConfig {
            issuer: Some("accounts".into()),
            ..AuthConfig::default()
        };
        let decoder = JwtDecoder::new(&config);

        let (_, bare) = token(&config.jwt_secret, Duration::minutes(5), UserRole::User);
        assert_eq!(
            decoder.decode(&bare).unwrap_err().message,
            "Token is missing the 'iss' claim"
        );

        let (_, foreign) = issued_token(
            &config.jwt_secret,
            Duration::minutes(5),
            UserRole::User,
            Some("elsewhere"),
        );
        assert_eq!(
            decoder.decode(&foreign).unwrap_err().message,
            "Invalid token issuer"
        );

        let (sub, ours) = issued_token(
            &config.jwt_secret,
            Duration::minutes(5),
            UserRole::User,
            Some("accounts"),
        );
        assert_eq!(decoder.decode(&ours).unwrap().user_id(), sub);
    }
}
