//! HTTP event emitter
//!
//! Broadcasts domain events to a push service. Requests are spawned so the
//! mutation that produced the event never waits for, or learns about, the
//! delivery outcome; failures are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::Value;
use sha2::Sha256;
use tracing::{debug, warn};

use crate::domain::event::{EventEmitter, EventName};

type HmacSha256 = Hmac<Sha256>;

/// Push-service endpoint configuration
#[derive(Debug, Clone)]
pub struct EventsConfig {
    /// Base URL of the push service
    pub base_url: String,
    /// Application id on the push service
    pub app_id: String,
    /// Shared secret used to sign request bodies
    pub secret: String,
    /// Channel every event is published on
    pub channel: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EventsConfig {
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            app_id: app_id.into(),
            secret: secret.into(),
            channel: "api_events".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug)]
struct EmitterInner {
    config: EventsConfig,
    http_client: Client,
}

impl EmitterInner {
    /// HMAC-SHA256 hex signature of a request body
    fn generate_signature(secret: &str, body: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
        mac.update(body.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/apps/{}/events",
            self.config.base_url.trim_end_matches('/'),
            self.config.app_id
        )
    }

    /// Deliver one event. Delivery errors are returned for logging only.
    async fn send(&self, name: EventName, payload: Value) -> Result<(), String> {
        let body = serde_json::json!({
            "name": name.as_str(),
            "channels": [self.config.channel],
            "data": payload.to_string(),
        })
        .to_string();

        let signature = Self::generate_signature(&self.config.secret, &body);

        let response = self
            .http_client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("X-Event-Signature", format!("sha256={}", signature))
            .body(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP status {}", status));
        }

        Ok(())
    }
}

/// Event emitter over HTTP
#[derive(Debug)]
pub struct HttpEventEmitter {
    inner: Arc<EmitterInner>,
}

impl HttpEventEmitter {
    pub fn new(config: EventsConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(EmitterInner {
                config,
                http_client,
            }),
        }
    }
}

impl EventEmitter for HttpEventEmitter {
    fn trigger(&self, name: EventName, payload: Value) {
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            match inner.send(name, payload).await {
                Ok(()) => debug!(event = %name, "event broadcast"),
                Err(message) => {
                    warn!(event = %name, error = %message, "event broadcast failed")
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_signature_is_deterministic() {
        let a = EmitterInner::generate_signature("secret", r#"{"name":"teams_add"}"#);
        let b = EmitterInner::generate_signature("secret", r#"{"name":"teams_add"}"#);
        let c = EmitterInner::generate_signature("other", r#"{"name":"teams_add"}"#);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_empty());
    }

    #[tokio::test]
    async fn test_send_posts_signed_event() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/apps/hack-platform/events"))
            .and(header_exists("X-Event-Signature"))
            .and(body_partial_json(json!({
                "name": "teams_add",
                "channels": ["api_events"],
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let emitter =
            HttpEventEmitter::new(EventsConfig::new(server.uri(), "hack-platform", "s3cret"));

        emitter
            .inner
            .send(EventName::TeamsAdd, json!({"teamid": "crew"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_reports_http_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let emitter =
            HttpEventEmitter::new(EventsConfig::new(server.uri(), "hack-platform", "s3cret"));

        let result = emitter.inner.send(EventName::HacksAdd, json!({})).await;
        assert!(result.is_err());
    }
}
