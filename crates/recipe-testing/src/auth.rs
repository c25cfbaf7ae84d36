//! Auth helpers for integration tests.
//!
//! Protected endpoints expect `Authorization: Token <jwt>`. `MockAuth` signs a
//! token for a known user id so tests do not need to go through the login flow.

use axum::http::{HeaderName, HeaderValue, header};

use jsonwebtoken::{EncodingKey, Header, encode};

use recipe_auth_types::token::{TokenClaims, issue_token};

/// Secret shared by test servers and [`MockAuth`].
pub const TEST_TOKEN_SECRET: &str = "test-token-secret-for-integration-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: i32,
    pub secret: String,
}

impl MockAuth {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            secret: TEST_TOKEN_SECRET.to_owned(),
        }
    }

    pub fn with_secret(user_id: i32, secret: &str) -> Self {
        Self {
            user_id,
            secret: secret.to_owned(),
        }
    }

    /// Raw `Token <jwt>` header value.
    pub fn header_value(&self) -> HeaderValue {
        let issued = issue_token(self.user_id, &self.secret, 3600).unwrap();
        HeaderValue::from_str(&format!("Token {}", issued.token)).unwrap()
    }

    /// `(name, value)` pair ready for `add_header`.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (header::AUTHORIZATION, self.header_value())
    }

    /// `Authorization` pair carrying a correctly signed token that expired long ago.
    pub fn expired_header(&self) -> (HeaderName, HeaderValue) {
        let claims = TokenClaims {
            sub: self.user_id.to_string(),
            exp: 1_000_000,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .unwrap();
        (
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Token {token}")).unwrap(),
        )
    }
}
