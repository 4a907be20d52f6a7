//! Topic-switch arbitration behind an advisory classifier.
//!
//! The classifier is only trusted when its answer arrives in time and parses
//! into a verdict. Every other outcome (error, timeout, panic, malformed
//! payload, arbiter disabled) yields [`TopicSwitchVerdict::fail_safe`], so a
//! conversation is never pulled out of its current sales flow by accident.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ArbiterConfig;
use crate::context::ConversationTurn;
use crate::error::{ClassifierFailureKind, Result};
use crate::models::TopicSwitchVerdict;

#[cfg(feature = "llm-classifier")]
mod llm;
mod parsing;
mod prompt;

#[cfg(test)]
mod tests;

#[cfg(feature = "llm-classifier")]
pub use llm::LocalLlmClassifier;

/// External advisory classifier. Returns the raw payload; shape checking is
/// the arbiter's job.
#[async_trait]
pub trait TopicClassifier: Send + Sync {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Value>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub current_topic: String,
    pub origin_topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentTopic {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CurrentTopic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Where the conversation came from, e.g. the ad or campaign that opened it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceContext {
    pub origin_topic: Option<String>,
    pub channel: Option<String>,
}

impl SourceContext {
    fn describe(&self) -> Option<String> {
        let origin = self.origin_topic.as_deref().map(str::trim).filter(|v| !v.is_empty());
        let channel = self.channel.as_deref().map(str::trim).filter(|v| !v.is_empty());
        match (origin, channel) {
            (Some(origin), Some(channel)) => Some(format!("{origin} (via {channel})")),
            (Some(origin), None) => Some(origin.to_string()),
            (None, Some(channel)) => Some(format!("via {channel}")),
            (None, None) => None,
        }
    }
}

#[derive(Clone)]
pub struct TopicSwitchArbiter {
    classifier: Arc<dyn TopicClassifier>,
    config: ArbiterConfig,
}

impl TopicSwitchArbiter {
    pub fn new(classifier: Arc<dyn TopicClassifier>, config: ArbiterConfig) -> Self {
        Self { classifier, config }
    }

    #[cfg(feature = "llm-classifier")]
    pub fn from_config(config: ArbiterConfig) -> Result<Self> {
        let classifier = LocalLlmClassifier::from_config(&config)?;
        Ok(Self::new(Arc::new(classifier), config))
    }

    #[must_use]
    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Applies the configured confidence floor. `arbitrate` never does; the
    /// caller decides whether to act on a verdict.
    #[must_use]
    pub fn is_actionable(&self, verdict: &TopicSwitchVerdict) -> bool {
        verdict.is_actionable(self.config.min_confidence())
    }

    /// Always resolves. The classifier runs on its own task so that neither
    /// a panic nor a hang inside it can escape; the configured timeout bounds
    /// the wait.
    pub async fn arbitrate(
        &self,
        message: &str,
        current_topic: &CurrentTopic,
        recent_history: &[ConversationTurn],
        source: &SourceContext,
    ) -> TopicSwitchVerdict {
        if !self.config.enabled {
            debug!(topic = %current_topic.name, "topic arbiter disabled; keeping current topic");
            return TopicSwitchVerdict::fail_safe();
        }

        let request = prompt::build_classification_request(
            message,
            current_topic,
            recent_history,
            source,
            self.config.history_turns,
            self.config.max_chars_per_turn,
        );
        let classifier = Arc::clone(&self.classifier);
        let call = tokio::spawn(async move { classifier.classify(&request).await });
        let abort = call.abort_handle();

        let outcome = match tokio::time::timeout(self.config.llm_timeout, call).await {
            Err(_) => {
                abort.abort();
                Err((
                    ClassifierFailureKind::Timeout,
                    format!("no verdict within {:?}", self.config.llm_timeout),
                ))
            }
            Ok(Err(join_err)) => Err((
                ClassifierFailureKind::Fatal,
                format!("classifier task failed: {join_err}"),
            )),
            Ok(Ok(Err(err))) => Err((err.classifier_kind(), err.to_string())),
            Ok(Ok(Ok(value))) => {
                parsing::parse_verdict(&value).map_err(|err| (err.classifier_kind(), err.to_string()))
            }
        };

        match outcome {
            Ok(verdict) => {
                debug!(
                    topic = %current_topic.name,
                    should_switch = verdict.should_switch,
                    target = verdict.target_topic.as_deref().unwrap_or(""),
                    confidence = verdict.confidence,
                    "topic arbiter verdict"
                );
                verdict
            }
            Err((kind, message)) => {
                warn!(
                    topic = %current_topic.name,
                    kind = kind.as_str(),
                    error = %message,
                    "topic arbiter fell back to fail-safe verdict"
                );
                TopicSwitchVerdict::fail_safe()
            }
        }
    }
}

impl std::fmt::Debug for TopicSwitchArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicSwitchArbiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
