use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::config::ArbiterConfig;
use crate::error::{ClassifierFailureKind, Result, SignalError};
use crate::llm_io::parse_local_loopback_endpoint;

use super::{ClassificationRequest, TopicClassifier};

/// Chat-completion classifier served from a loopback endpoint (ollama or an
/// openai-compatible server).
#[derive(Debug, Clone)]
pub struct LocalLlmClassifier {
    client: Client,
    endpoint: Url,
    model: String,
    max_output_tokens: u32,
    temperature_milli: u16,
}

impl LocalLlmClassifier {
    pub fn from_config(config: &ArbiterConfig) -> Result<Self> {
        let endpoint = parse_local_loopback_endpoint(&config.llm_endpoint, "arbiter endpoint")
            .map_err(SignalError::InvalidEndpoint)?;
        let client = Client::builder().timeout(config.llm_timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            model: config.llm_model.clone(),
            max_output_tokens: config.llm_max_output_tokens,
            temperature_milli: config.llm_temperature_milli,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TopicClassifier for LocalLlmClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Value> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.user_prompt}
            ],
            "stream": false,
            "format": "json",
            "options": {
                "temperature": (f64::from(self.temperature_milli) / 1000.0),
                "num_predict": self.max_output_tokens
            }
        });
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                let kind = if err.is_timeout() {
                    ClassifierFailureKind::Timeout
                } else {
                    ClassifierFailureKind::Transient
                };
                SignalError::classifier(kind, format!("request failed: {err}"))
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SignalError::classifier(
                status_kind(status),
                format!("non-success status: {status}"),
            ));
        }
        response.json::<Value>().await.map_err(|err| {
            SignalError::classifier(
                ClassifierFailureKind::Schema,
                format!("invalid json response: {err}"),
            )
        })
    }
}

fn status_kind(status: StatusCode) -> ClassifierFailureKind {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ClassifierFailureKind::Transient
    } else {
        ClassifierFailureKind::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_rejects_remote_endpoint() {
        let config = ArbiterConfig {
            llm_endpoint: "https://api.example.com/v1/chat".to_string(),
            ..ArbiterConfig::default()
        };
        let err = LocalLlmClassifier::from_config(&config).expect_err("remote host");
        assert_eq!(err.code(), "INVALID_ENDPOINT");
    }

    #[test]
    fn from_config_accepts_default_loopback_endpoint() {
        let classifier =
            LocalLlmClassifier::from_config(&ArbiterConfig::default()).expect("loopback");
        assert_eq!(classifier.endpoint().host_str(), Some("127.0.0.1"));
    }

    #[test]
    fn throttling_and_server_errors_are_transient() {
        assert_eq!(
            status_kind(StatusCode::TOO_MANY_REQUESTS),
            ClassifierFailureKind::Transient
        );
        assert_eq!(
            status_kind(StatusCode::BAD_GATEWAY),
            ClassifierFailureKind::Transient
        );
        assert_eq!(
            status_kind(StatusCode::NOT_FOUND),
            ClassifierFailureKind::Fatal
        );
    }
}
