use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use crate::features::users::models::UserRole;

/// HS256 bearer token validator backed by a shared secret
pub struct JwtValidator {
    decoding_key: DecodingKey,
    leeway: u64,
}

/// Claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub role: UserRole,
    pub iat: u64,
    pub exp: u64,
}

impl JwtValidator {
    pub fn new(secret: &str, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::Unauthenticated("Invalid or expired token".to_string())
        })?;

        let claims = token_data.claims;
        if claims.sub.is_empty() {
            return Err(AppError::Unauthenticated(
                "Token is missing a subject".to_string(),
            ));
        }

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
