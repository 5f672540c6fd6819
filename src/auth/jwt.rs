//! JWT Token Handler
//! Mission: Issue and validate HMAC-signed session tokens

use crate::auth::models::{Claims, Role};
use crate::config::{Config, TOKEN_ISSUER, TOKEN_TTL_HOURS};
use crate::error::ServiceError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error};

/// HMAC family accepted on validation; anything else is a type-confusion attempt
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT Handler for token operations
pub struct JwtHandler {
    secret: String,
    expiration_hours: i64,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: TOKEN_TTL_HOURS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.clone())
    }

    fn secret(&self) -> Result<&[u8], ServiceError> {
        if self.secret.trim().is_empty() {
            return Err(ServiceError::Configuration(
                "JWT signing secret is not set".to_string(),
            ));
        }
        Ok(self.secret.as_bytes())
    }

    /// Issue a token for the given identity, valid for 24 hours
    pub fn issue(&self, user_id: i64, username: &str, role: Role) -> Result<String, ServiceError> {
        self.secret()?;
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::hours(self.expiration_hours))
            .ok_or(ServiceError::TokenGeneration)?;

        let claims = Claims {
            user_id,
            username: username.to_string(),
            role,
            iss: TOKEN_ISSUER.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        debug!(
            "Issuing JWT for user {} ({}), expires in {}h",
            username, user_id, self.expiration_hours
        );

        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, ServiceError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret()?),
        )
        .map_err(|e| {
            error!("Failed to sign JWT: {}", e);
            ServiceError::TokenGeneration
        })
    }

    /// Validate a token and extract its claims
    pub fn validate(&self, token: &str) -> Result<Claims, ServiceError> {
        let secret = self.secret()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        let decoded = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
            .map_err(|e| {
                debug!("Rejected JWT: {}", e);
                ServiceError::InvalidToken
            })?;

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-12345";

    fn claims_expiring_at(exp: i64) -> Claims {
        Claims {
            user_id: 1,
            username: "alice".to_string(),
            role: Role::User,
            iss: TOKEN_ISSUER.to_string(),
            exp: exp as usize,
            iat: Utc::now().timestamp() as usize,
        }
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.issue(42, "alice", Role::Admin).unwrap();
        assert!(!token.is_empty());

        let claims = handler.validate(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iss, TOKEN_ISSUER);

        let ttl = claims.exp as i64 - Utc::now().timestamp();
        assert!(ttl > 23 * 3600 && ttl <= 24 * 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let handler = JwtHandler::new(SECRET);
        let token = handler
            .sign(&claims_expiring_at(Utc::now().timestamp() - 3600))
            .unwrap();

        assert!(matches!(
            handler.validate(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1");
        let handler2 = JwtHandler::new("secret2");

        let token = handler1.issue(1, "alice", Role::User).unwrap();
        assert!(matches!(
            handler2.validate(&token),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let handler = JwtHandler::new(SECRET);
        assert!(matches!(
            handler.validate("invalid.token.here"),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn test_other_hmac_strength_accepted() {
        let handler = JwtHandler::new(SECRET);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims_expiring_at(Utc::now().timestamp() + 600),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(handler.validate(&token).unwrap().username, "alice");
    }

    #[test]
    fn test_unsigned_token_rejected() {
        // {"alg":"none","typ":"JWT"}
        let header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let handler = JwtHandler::new(SECRET);
        let valid = handler.issue(1, "alice", Role::Admin).unwrap();
        let payload = valid.split('.').nth(1).unwrap();
        let forged = format!("{}.{}.", header, payload);

        assert!(matches!(
            handler.validate(&forged),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let handler = JwtHandler::new(SECRET);
        let mut claims = claims_expiring_at(Utc::now().timestamp() + 600);
        claims.iss = "someone-else".to_string();
        let token = handler.sign(&claims).unwrap();

        assert!(handler.validate(&token).is_err());
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let handler = JwtHandler::new("");
        assert!(matches!(
            handler.issue(1, "alice", Role::User),
            Err(ServiceError::Configuration(_))
        ));
        assert!(matches!(
            handler.validate("a.b.c"),
            Err(ServiceError::Configuration(_))
        ));
    }
}
