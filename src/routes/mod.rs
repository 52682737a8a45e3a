//! API route handlers.

pub mod auth;
pub mod blog;
pub mod enquiry;
pub mod health;
pub mod portfolio;
pub mod rss;

use axum::http::HeaderMap;
use serde::Serialize;

use crate::error::ApiError;
use auth::Claims;

/// Success response (for delete).
#[derive(Debug, Serialize, serde::Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Require a valid bearer token on a mutating route.
pub fn verify_auth(headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Auth("Authorization required".to_string()))?;

    auth::verify_access_token(token)
        .map_err(|_| ApiError::Auth("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_verify_auth_missing_header() {
        let err = verify_auth(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_verify_auth_garbage_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer not.a.jwt".parse().unwrap());
        let err = verify_auth(&headers).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_verify_auth_accepts_fresh_token() {
        let token = auth::create_access_token("user-1", "admin@example.com", "ADMIN").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            format!("Bearer {token}").parse().unwrap(),
        );
        let claims = verify_auth(&headers).unwrap();
        assert_eq!(claims.sub, "user-1");
    }
}
