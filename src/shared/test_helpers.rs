use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use fake::{faker::internet::en::SafeEmail, Fake};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::features::auth::{Claims, JwtValidator};
use crate::features::users::models::{User, UserRole};

pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use-in-production";

/// Mint an HS256 access token valid for one hour
pub fn issue_token(user_id: &str, role: UserRole) -> String {
    let now = Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        iat: now,
        exp: now + 3600,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("test token encodes")
}

pub fn test_validator() -> Arc<JwtValidator> {
    Arc::new(JwtValidator::new(TEST_JWT_SECRET, Duration::from_secs(0)))
}

pub fn make_user(user_id: &str, role: UserRole, created_at: DateTime<Utc>) -> User {
    User {
        user_id: user_id.to_string(),
        role,
        is_anonymous: false,
        email: Some(SafeEmail().fake()),
        phone_number: None,
        hashed_device_id: None,
        created_at,
    }
}
