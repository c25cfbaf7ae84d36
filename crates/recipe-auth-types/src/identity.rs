//! `Authorization: Token <jwt>` extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::authorization::Credentials;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::HeaderValue;
use http::request::Parts;

use recipe_core::error::AppError;

use crate::token::{AuthError, validate_token};

/// HMAC secret used to sign and validate tokens. Cheap to clone.
#[derive(Clone)]
pub struct TokenSecret(Arc<str>);

impl TokenSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret(..)")
    }
}

/// Credentials of the `Token` authorization scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCredentials(String);

impl TokenCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl Credentials for TokenCredentials {
    const SCHEME: &'static str = "Token";

    fn decode(value: &HeaderValue) -> Option<Self> {
        let raw = value.to_str().ok()?;
        let token = raw.get(Self::SCHEME.len() + 1..)?.trim();
        if token.is_empty() || token.contains(' ') {
            return None;
        }
        Some(Self(token.to_owned()))
    }

    fn encode(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("{} {}", Self::SCHEME, self.0))
            .unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

/// Identity of the caller, proven by a valid token.
///
/// Returns 401 if the header is absent, uses another scheme, or the token fails
/// validation. Whether the user still exists is checked by the service.
#[derive(Debug, Clone, Copy)]
pub struct TokenIdentity {
    pub user_id: i32,
    pub expires_at: u64,
}

impl<S> FromRequestParts<S> for TokenIdentity
where
    S: Send + Sync,
    TokenSecret: FromRef<S>,
{
    type Rejection = AppError;

    // Extract synchronously and return a 'static future; axum-core 0.5 declares
    // this method as `fn -> impl Future + Send`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let credentials = parts
            .headers
            .typed_get::<Authorization<TokenCredentials>>()
            .map(|Authorization(credentials)| credentials);
        let secret = TokenSecret::from_ref(state);

        let result = match credentials {
            None => Err(AppError::NotAuthenticated),
            Some(credentials) => validate_token(credentials.token(), secret.as_str())
                .map(|info| Self {
                    user_id: info.user_id,
                    expires_at: info.expires_at,
                })
                .map_err(|e| {
                    if let AuthError::Signing(_) = e {
                        tracing::error!(error = %e, "unexpected signing error during validation");
                    }
                    AppError::InvalidToken
                }),
        };

        async move { result }
    }
}
