use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use soliloquy_logging::sq_debug;

use crate::{FailureKind, Recommendation, RecommendError};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/recommend";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        }
    }
}

/// The recommendation backend, seen from the request controller.
#[async_trait::async_trait]
pub trait RecommendationClient: Send + Sync {
    async fn recommend(&self, title: &str) -> Result<Recommendation, RecommendError>;
}

/// Holds one `reqwest::Client` so every request shares its connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestRecommendationClient {
    client: reqwest::Client,
    endpoint: url::Url,
    max_bytes: u64,
}

impl ReqwestRecommendationClient {
    pub fn new(settings: ClientSettings) -> Result<Self, RecommendError> {
        let endpoint = url::Url::parse(&settings.endpoint)
            .map_err(|err| RecommendError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RecommendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            max_bytes: settings.max_bytes,
        })
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, RecommendError> {
        let max_bytes = self.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(RecommendError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(RecommendError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl RecommendationClient for ReqwestRecommendationClient {
    async fn recommend(&self, title: &str) -> Result<Recommendation, RecommendError> {
        let body = json!({ "title": title }).to_string();

        let response = self
            .client
            .post(self.endpoint.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecommendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        sq_debug!("recommendation body received ({} bytes)", bytes.len());
        parse_recommendation(&bytes)
    }
}

/// Any JSON document is a success; only a string `message` field is renderable.
fn parse_recommendation(bytes: &[u8]) -> Result<Recommendation, RecommendError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| RecommendError::new(FailureKind::Parse, err.to_string()))?;
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);
    Ok(Recommendation { message })
}

fn map_reqwest_error(err: reqwest::Error) -> RecommendError {
    if err.is_timeout() {
        return RecommendError::new(FailureKind::Timeout, err.to_string());
    }
    RecommendError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_recommendation;
    use crate::FailureKind;

    #[test]
    fn message_field_is_extracted() {
        let rec = parse_recommendation(br#"{"message": "hello"}"#).unwrap();
        assert_eq!(rec.message.as_deref(), Some("hello"));
    }

    #[test]
    fn missing_or_non_string_message_is_none() {
        assert_eq!(parse_recommendation(b"{}").unwrap().message, None);
        assert_eq!(parse_recommendation(br#"{"message": 3}"#).unwrap().message, None);
        assert_eq!(parse_recommendation(b"[1, 2]").unwrap().message, None);
    }

    #[test]
    fn malformed_body_is_a_parse_failure() {
        let err = parse_recommendation(b"<html>oops</html>").unwrap_err();
        assert_eq!(err.kind, FailureKind::Parse);
        assert_eq!(parse_recommendation(b"").unwrap_err().kind, FailureKind::Parse);
    }
}
