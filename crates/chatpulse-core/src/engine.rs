use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arbiter::{CurrentTopic, SourceContext, TopicSwitchArbiter};
#[cfg(feature = "llm-classifier")]
use crate::config::AppConfig;
use crate::context::ConversationSnapshot;
use crate::debounce::{DebounceCoordinator, SettleHandle};
#[cfg(feature = "llm-classifier")]
use crate::error::Result;
use crate::models::{FutureInterestRecord, TopicSwitchVerdict};
use crate::temporal::TemporalIntentExtractor;

/// Present when the caller judged the active product topic ambiguous and
/// wants the arbiter consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCheck {
    pub current_topic: CurrentTopic,
    #[serde(default)]
    pub source_context: SourceContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub future_interest: Option<FutureInterestRecord>,
    pub topic_switch: Option<TopicSwitchVerdict>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettledSignals {
    pub user_id: String,
    pub combined_text: String,
    pub interpretation: Interpretation,
}

#[derive(Debug, Clone)]
pub struct SignalEngine {
    extractor: TemporalIntentExtractor,
    arbiter: Option<TopicSwitchArbiter>,
}

impl SignalEngine {
    pub fn new(extractor: TemporalIntentExtractor, arbiter: TopicSwitchArbiter) -> Self {
        Self {
            extractor,
            arbiter: Some(arbiter),
        }
    }

    /// Engine without a classifier. A topic check still answers, always with
    /// the fail-safe verdict.
    pub fn detection_only(extractor: TemporalIntentExtractor) -> Self {
        Self {
            extractor,
            arbiter: None,
        }
    }

    /// System clock plus the local-LLM arbiter described by `config`.
    #[cfg(feature = "llm-classifier")]
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            TemporalIntentExtractor::default(),
            TopicSwitchArbiter::from_config(config.arbiter.clone())?,
        ))
    }

    #[must_use]
    pub fn extractor(&self) -> &TemporalIntentExtractor {
        &self.extractor
    }

    #[must_use]
    pub fn arbiter(&self) -> Option<&TopicSwitchArbiter> {
        self.arbiter.as_ref()
    }

    /// Runs the temporal extractor on the combined text and, only when a
    /// topic check is supplied, the arbiter with the snapshot's recent turns.
    pub async fn interpret(
        &self,
        combined_text: &str,
        snapshot: &ConversationSnapshot,
        topic_check: Option<&TopicCheck>,
    ) -> Interpretation {
        let future_interest = self.extractor.detect(combined_text, snapshot);
        let topic_switch = match (topic_check, &self.arbiter) {
            (Some(check), Some(arbiter)) => Some(
                arbiter
                    .arbitrate(
                        combined_text,
                        &check.current_topic,
                        &snapshot.recent_turns,
                        &check.source_context,
                    )
                    .await,
            ),
            (Some(check), None) => {
                debug!(
                    topic = %check.current_topic.name,
                    "no arbiter configured; keeping current topic"
                );
                Some(TopicSwitchVerdict::fail_safe())
            }
            (None, _) => None,
        };
        Interpretation {
            future_interest,
            topic_switch,
        }
    }

    /// Feeds one inbound fragment through `coordinator`; once the user goes
    /// quiet the combined text is interpreted against the snapshot and topic
    /// check given with the latest fragment.
    pub fn submit(
        &self,
        coordinator: &DebounceCoordinator,
        user_id: &str,
        text: impl Into<String>,
        snapshot: ConversationSnapshot,
        topic_check: Option<TopicCheck>,
    ) -> SettleHandle<SettledSignals> {
        let engine = self.clone();
        let owner = user_id.to_string();
        coordinator.submit(user_id, text, move |combined_text| async move {
            let interpretation = engine
                .interpret(&combined_text, &snapshot, topic_check.as_ref())
                .await;
            SettledSignals {
                user_id: owner,
                combined_text,
                interpretation,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{Value, json};

    use super::*;
    use crate::arbiter::{ClassificationRequest, TopicClassifier};
    use crate::clock::FixedClock;
    use crate::config::ArbiterConfig;
    use crate::context::ConversationTurn;
    use crate::error::Result;

    struct ScriptedClassifier {
        reply: Value,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TopicClassifier for ScriptedClassifier {
        async fn classify(&self, _request: &ClassificationRequest) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0)
            .single()
            .expect("valid reference instant")
    }

    fn engine(reply: Value) -> (SignalEngine, Arc<ScriptedClassifier>) {
        let classifier = Arc::new(ScriptedClassifier {
            reply,
            calls: AtomicUsize::new(0),
        });
        let engine = SignalEngine::new(
            TemporalIntentExtractor::new(Arc::new(FixedClock(now()))),
            TopicSwitchArbiter::new(classifier.clone(), ArbiterConfig::default()),
        );
        (engine, classifier)
    }

    fn anchored_snapshot() -> ConversationSnapshot {
        ConversationSnapshot {
            requested_size: Some("4x6 metros".to_string()),
            recent_turns: vec![ConversationTurn::new("user", "precio de la malla 4x6")],
            ..ConversationSnapshot::default()
        }
    }

    #[tokio::test]
    async fn interpret_without_topic_check_skips_arbiter() {
        let (engine, classifier) = engine(json!({"should_switch": false, "confidence": 0.1}));
        let result = engine
            .interpret("tal vez el próximo mes", &anchored_snapshot(), None)
            .await;

        let record = result.future_interest.expect("anchored deferral");
        assert_eq!(record.timeframe_days, 30);
        assert_eq!(record.product_interest.as_deref(), Some("4x6 metros"));
        assert_eq!(result.topic_switch, None);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn interpret_with_topic_check_runs_both_interpreters() {
        let (engine, classifier) = engine(json!({
            "should_switch": true,
            "target_topic": "rollo completo",
            "confidence": 0.85
        }));
        let check = TopicCheck {
            current_topic: CurrentTopic::new("malla sombra confeccionada"),
            source_context: SourceContext::default(),
        };
        let result = engine
            .interpret("mejor el rollo, ahorita no", &anchored_snapshot(), Some(&check))
            .await;

        assert_eq!(result.future_interest, None);
        let verdict = result.topic_switch.expect("arbiter consulted");
        assert!(verdict.should_switch);
        assert_eq!(verdict.target_topic.as_deref(), Some("rollo completo"));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_interprets_the_coalesced_burst() {
        let (engine, _classifier) = engine(json!({"should_switch": false, "confidence": 0.2}));
        let coordinator = DebounceCoordinator::with_window(Duration::from_secs(5));

        let first = engine.submit(
            &coordinator,
            "u1",
            "me interesa la malla",
            ConversationSnapshot::default(),
            None,
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
        let second = engine.submit(
            &coordinator,
            "u1",
            "pero en 2 semanas",
            ConversationSnapshot::default(),
            None,
        );

        let settled = second
            .outcome()
            .await
            .into_dispatched()
            .expect("latest fragment dispatches");
        assert_eq!(settled.user_id, "u1");
        assert_eq!(settled.combined_text, "me interesa la malla\npero en 2 semanas");
        let record = settled
            .interpretation
            .future_interest
            .expect("explicit interest with timeframe");
        assert_eq!(record.timeframe_days, 14);
        assert!(first.outcome().await.into_dispatched().is_none());
    }

    #[tokio::test]
    async fn detection_only_engine_keeps_current_topic() {
        let engine = SignalEngine::detection_only(TemporalIntentExtractor::new(Arc::new(
            FixedClock(now()),
        )));
        let check = TopicCheck {
            current_topic: CurrentTopic::new("malla sombra"),
            source_context: SourceContext::default(),
        };
        let result = engine
            .interpret("lo compro en un mes", &ConversationSnapshot::default(), Some(&check))
            .await;

        assert!(engine.arbiter().is_none());
        assert_eq!(
            result.future_interest.map(|record| record.timeframe_days),
            Some(30)
        );
        assert_eq!(result.topic_switch, Some(TopicSwitchVerdict::fail_safe()));
    }

    #[test]
    fn interpretation_serializes_camel_case() {
        let value = serde_json::to_value(Interpretation {
            future_interest: None,
            topic_switch: Some(TopicSwitchVerdict::fail_safe()),
        })
        .expect("serialize");
        assert_eq!(
            value,
            json!({
                "futureInterest": null,
                "topicSwitch": {"shouldSwitch": false, "targetTopic": null, "confidence": 0.0}
            })
        );
    }
}
