//! Attendee authentication extractor
//!
//! Parses HTTP Basic credentials and resolves them through the identity
//! service. An unresolvable identity is a 401; only repository failures
//! become a 500.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::credentials::Credentials;

/// Extractor that requires authenticated attendee credentials
#[derive(Debug, Clone)]
pub struct Authenticated(pub Credentials);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (username, password) = extract_basic_credentials(&parts.headers)?;

        debug!(username = %username, "Authenticating attendee");

        let credentials = state
            .identity_service
            .authenticate(&username, &password)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?
            .ok_or_else(|| ApiError::unauthorized("Bad username or password"))?;

        Ok(Authenticated(credentials))
    }
}

/// Extract a username/password pair from a Basic Authorization header
pub fn extract_basic_credentials(
    headers: &axum::http::HeaderMap,
) -> Result<(String, String), ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

    let encoded = auth_str
        .strip_prefix("Basic ")
        .ok_or_else(|| ApiError::unauthorized("Basic authentication required"))?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| ApiError::bad_request("Invalid Basic authentication encoding"))?;

    let decoded = String::from_utf8(decoded)
        .map_err(|_| ApiError::bad_request("Invalid Basic authentication encoding"))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| ApiError::bad_request("Invalid Basic authentication encoding"))?;

    Ok((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};

    fn header_for(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_basic_credentials() {
        // ada@example.com:hunter2
        let headers = header_for("Basic YWRhQGV4YW1wbGUuY29tOmh1bnRlcjI=");

        let (username, password) = extract_basic_credentials(&headers).unwrap();
        assert_eq!(username, "ada@example.com");
        assert_eq!(password, "hunter2");
    }

    #[test]
    fn test_password_may_contain_colons() {
        // user:pa:ss
        let encoded = STANDARD.encode("user:pa:ss");
        let headers = header_for(&format!("Basic {}", encoded));

        let (username, password) = extract_basic_credentials(&headers).unwrap();
        assert_eq!(username, "user");
        assert_eq!(password, "pa:ss");
    }

    #[test]
    fn test_missing_header() {
        let result = extract_basic_credentials(&HeaderMap::new());
        assert_eq!(result.unwrap_err().status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_wrong_scheme() {
        let headers = header_for("Bearer some-token");
        let result = extract_basic_credentials(&headers);
        assert_eq!(result.unwrap_err().status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_base64() {
        let headers = header_for("Basic not-base64!!!");
        let result = extract_basic_credentials(&headers);
        assert_eq!(result.unwrap_err().status, StatusCode::BAD_REQUEST);
    }
}
