//! Directory HTTP client
//!
//! Talks to the chat-workspace directory the attendee import was matched
//! against. The wire shape is the workspace's `users.info` call: a GET with
//! a bearer token, answered by `{ok, user}` where a non-`ok` body carries an
//! `error` string instead of a user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::directory::{
    DirectoryClient, DirectoryError, DirectoryHandle, DirectoryProfile,
};

/// Directory endpoint configuration
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Base URL of the directory API
    pub base_url: String,
    /// Bearer token
    pub token: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectoryConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<UserInfo>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
    name: String,
    #[serde(default)]
    profile: Option<UserInfoProfile>,
}

#[derive(Debug, Deserialize)]
struct UserInfoProfile {
    #[serde(default)]
    email: Option<String>,
}

/// Directory client over HTTP
#[derive(Debug)]
pub struct HttpDirectoryClient {
    config: DirectoryConfig,
    http_client: Client,
}

impl HttpDirectoryClient {
    pub fn new(config: DirectoryConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn lookup(&self, handle: &DirectoryHandle) -> Result<DirectoryProfile, DirectoryError> {
        let url = format!("{}/users.info", self.config.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.config.token)
            .query(&[("user", handle.as_str())])
            .send()
            .await
            .map_err(|e| DirectoryError::Request {
                handle: handle.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Request {
                handle: handle.to_string(),
                message: format!("HTTP status {}", status),
            });
        }

        let body: UserInfoResponse =
            response.json().await.map_err(|e| DirectoryError::Request {
                handle: handle.to_string(),
                message: e.to_string(),
            })?;

        if !body.ok {
            return match body.error.as_deref() {
                Some("user_not_found") => Err(DirectoryError::UnknownHandle {
                    handle: handle.to_string(),
                }),
                other => Err(DirectoryError::Request {
                    handle: handle.to_string(),
                    message: other.unwrap_or("the response was not OK").to_string(),
                }),
            };
        }

        let user = body.user.ok_or_else(|| DirectoryError::UnusableProfile {
            handle: handle.to_string(),
            message: "response carried no user".to_string(),
        })?;

        let email = user
            .profile
            .and_then(|p| p.email)
            .ok_or_else(|| DirectoryError::UnusableProfile {
                handle: handle.to_string(),
                message: "profile carries no email".to_string(),
            })?;

        Ok(DirectoryProfile {
            id: user.id,
            name: user.name,
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn handle() -> DirectoryHandle {
        DirectoryHandle::new("UABCD1234").unwrap()
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users.info"))
            .and(query_param("user", "UABCD1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "user": {
                    "id": "UABCD1234",
                    "name": "ada",
                    "profile": { "email": "ada@example.com" }
                }
            })))
            .mount(&server)
            .await;

        let client = HttpDirectoryClient::new(DirectoryConfig::new(server.uri(), "xoxb-test"));
        let profile = client.lookup(&handle()).await.unwrap();

        assert_eq!(profile.id, "UABCD1234");
        assert_eq!(profile.name, "ada");
        assert_eq!(profile.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_lookup_unknown_handle() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users.info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": false,
                "error": "user_not_found"
            })))
            .mount(&server)
            .await;

        let client = HttpDirectoryClient::new(DirectoryConfig::new(server.uri(), "xoxb-test"));
        let result = client.lookup(&handle()).await;

        assert!(matches!(result, Err(DirectoryError::UnknownHandle { .. })));
    }

    #[tokio::test]
    async fn test_lookup_profile_without_email() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users.info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "user": { "id": "UABCD1234", "name": "ada" }
            })))
            .mount(&server)
            .await;

        let client = HttpDirectoryClient::new(DirectoryConfig::new(server.uri(), "xoxb-test"));
        let result = client.lookup(&handle()).await;

        assert!(matches!(result, Err(DirectoryError::UnusableProfile { .. })));
    }

    #[tokio::test]
    async fn test_lookup_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users.info"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpDirectoryClient::new(DirectoryConfig::new(server.uri(), "xoxb-test"));
        let result = client.lookup(&handle()).await;

        assert!(matches!(result, Err(DirectoryError::Request { .. })));
    }
}
