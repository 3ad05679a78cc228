#![allow(dead_code)]

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

/// JWT claims matching production format (see ds-auth)
#[derive(Debug, Serialize, Deserialize)]
pub struct TestJwtClaims {
    pub sub: String,
    pub username: String,
    pub exp: u64,
    pub iat: u64,
}

/// Create a valid JWT token for testing
pub fn create_test_token(user_id: &str, username: &str, jwt_secret: &[u8]) -> String {
    create_test_token_with_expiry(user_id, username, jwt_secret, Duration::from_secs(3600))
}

/// Create JWT token with custom expiration duration
pub fn create_test_token_with_expiry(
    user_id: &str,
    username: &str,
    jwt_secret: &[u8],
    expires_in: Duration,
) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs();

    let claims = TestJwtClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: now + expires_in.as_secs(),
        iat: now,
    };

    encode(
        &Header::default(), // HS256 by default
        &claims,
        &EncodingKey::from_secret(jwt_secret),
    )
    .expect("Failed to encode JWT")
}

/// Create an expired JWT token (for auth rejection tests)
pub fn create_expired_token(user_id: &str, jwt_secret: &[u8]) -> String {
    let past = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
        - 3600;

    let claims = TestJwtClaims {
        sub: user_id.to_string(),
        username: String::new(),
        exp: past,
        iat: past - 3600,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret),
    )
    .expect("Failed to encode JWT")
}

/// Token signed with a secret the server does not know
pub fn create_token_wrong_secret(user_id: &str) -> String {
    create_test_token(
        user_id,
        user_id,
        b"some-other-secret-that-is-also-32-bytes-long",
    )
}
