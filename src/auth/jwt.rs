//! Session token issuing and validation
//! Tokens are stateless: signature plus expiry fully determine validity

use crate::{config::AppConfig, error::AppError, models::user::User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Account email
    pub email: String,

    /// Display name
    pub name: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

impl Claims {
    /// Parse the subject field back into a user id
    pub fn subject_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// Session token service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: u64,
}

impl JwtService {
    /// Create token service from config. A missing or short secret is a
    /// startup failure, never a per-request condition.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config(
                "JWT secret too short (min 32 chars)".to_string(),
            ));
        }

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        Ok(Self {
            encoding_key,
            decoding_key,
            token_ttl_secs: config.security.token_ttl_secs,
        })
    }

    /// Seconds a freshly issued token stays valid
    pub fn ttl_secs(&self) -> u64 {
        self.token_ttl_secs
    }

    /// Issue a session token for a user
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(self.token_ttl_secs as i64);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.display_name.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {:?}", e);
            AppError::Internal(format!("Failed to encode session token: {}", e))
        })
    }

    /// Validate and decode a session token.
    ///
    /// Malformed input, a bad signature and an elapsed expiry all come back
    /// as the same `InvalidToken` error, so callers cannot tell them apart.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        Ok(
            decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
                .map_err(|e| {
                    tracing::debug!("Token validation failed: {:?}", e);
                    AppError::InvalidToken
                })?
                .claims,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig};
    use secrecy::Secret;

    const TEST_SECRET: &str = "test_secret_key_32_characters_long!";

    fn test_config_with_secret(secret: &str) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                max_body_bytes: 1024 * 1024,
            },
            database: DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 5,
                min_connections: 1,
                acquire_timeout_secs: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: Secret::new(secret.to_string()),
                token_ttl_secs: 604_800,
                cookie_secure: false,
                password_min_length: 8,
                password_require_uppercase: true,
                password_require_digit: true,
                password_require_special: false,
            },
        }
    }

    fn test_config() -> AppConfig {
        test_config_with_secret(TEST_SECRET)
    }

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "athlete@example.com".to_string(),
            display_name: "Athlete".to_string(),
            password_hash: "irrelevant".to_string(),
            age: None,
            height_cm: None,
            weight_kg: None,
            fitness_goal: None,
            experience_level: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = JwtService::from_config(&test_config()).unwrap();
        let user = sample_user();

        let token = service.issue(&user).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "athlete@example.com");
        assert_eq!(claims.name, "Athlete");
        assert_eq!(claims.subject_id().unwrap(), user.id);
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::from_config(&test_config()).unwrap();
        let verifier = JwtService::from_config(&test_config_with_secret(
            "another_secret_key_32_characters_x!",
        ))
        .unwrap();

        let token = issuer.issue(&sample_user()).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::from_config(&test_config()).unwrap();
        let user = sample_user();

        // Expiry two hours in the past, well beyond the default leeway
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.display_name.clone(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let service = JwtService::from_config(&test_config()).unwrap();
        assert!(service.verify("not_a_token").is_err());
        assert!(service.verify("").is_err());
        assert!(service.verify("a.b.c").is_err());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let token_a = service.issue(&sample_user()).unwrap();
        let token_b = service.issue(&sample_user()).unwrap();

        // Splice payload from one token onto the signature of another
        let parts_a: Vec<&str> = token_a.split('.').collect();
        let parts_b: Vec<&str> = token_b.split('.').collect();
        let spliced = format!("{}.{}.{}", parts_a[0], parts_b[1], parts_a[2]);

        assert!(service.verify(&spliced).is_err());
    }

    #[test]
    fn test_short_secret_fails_construction() {
        let config = test_config_with_secret("short");
        assert!(JwtService::from_config(&config).is_err());
    }
}
