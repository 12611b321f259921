//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use gestio_core::config::AuthConfig;
use gestio_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Validates JWT tokens.
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
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks signature, expiration, and that the token type is
    /// `Access`.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Access {
            return Err(AppError::invalid_token(
                "Invalid token type: expected access token",
            ));
        }

        Ok(claims)
    }

    /// Decodes and validates a refresh token string.
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Refresh {
            return Err(AppError::invalid_token(
                "Invalid token type: expected refresh token",
            ));
        }

        Ok(claims)
    }

    /// Internal decode without type checking.
    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::invalid_token("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::invalid_token("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::invalid_token("Invalid token signature")
                    }
                    _ => AppError::invalid_token(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use chrono::Utc;
    use gestio_entity::user::{User, UserRole, UserStatus};
    use uuid::Uuid;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            company_id: Some(Uuid::new_v4()),
            name: "Aiko Tanaka".to_string(),
            email: "aiko@example.com".to_string(),
            username: "aiko".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: UserRole::User,
            status: UserStatus::Active,
            email_verified: true,
            failed_login_attempts: 0,
            locked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn decodes_its_own_tokens() {
        let config = AuthConfig::default();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);
        let user = sample_user();

        let pair = encoder.generate_token_pair(&user).unwrap();

        let access = decoder.decode_access_token(&pair.access_token).unwrap();
        assert_eq!(access.sub, user.id);
        assert_eq!(access.company_id, user.company_id);
        assert_eq!(access.username, "aiko");

        let refresh = decoder.decode_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, user.id);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn rejects_token_of_wrong_type() {
        let config = AuthConfig::default();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let pair = encoder.generate_token_pair(&sample_user()).unwrap();

        let err = decoder.decode_access_token(&pair.refresh_token).unwrap_err();
        assert_eq!(err.kind, gestio_core::error::ErrorKind::InvalidToken);
        assert!(err.message.contains("expected access token"));

        let err = decoder.decode_refresh_token(&pair.access_token).unwrap_err();
        assert!(err.message.contains("expected refresh token"));
    }

    #[test]
    fn rejects_tampered_token() {
        let config = AuthConfig::default();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let pair = encoder.generate_token_pair(&sample_user()).unwrap();
        let mut tampered = pair.access_token.clone();
        tampered.pop();

        assert!(decoder.decode_access_token(&tampered).is_err());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let encoder = JwtEncoder::new(&AuthConfig {
            jwt_secret: "other-secret".to_string(),
            ..AuthConfig::default()
        });
        let decoder = JwtDecoder::new(&AuthConfig::default());

        let pair = encoder.generate_token_pair(&sample_user()).unwrap();
        let err = decoder.decode_access_token(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, gestio_core::error::ErrorKind::InvalidToken);
    }
}
