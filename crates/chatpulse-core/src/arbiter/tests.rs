use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use super::*;
use crate::error::SignalError;

enum Behavior {
    Reply(Value),
    Fail(ClassifierFailureKind),
    Hang,
    Panic,
}

struct FakeClassifier {
    behavior: Behavior,
    seen: Mutex<Vec<ClassificationRequest>>,
}

impl FakeClassifier {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ClassificationRequest> {
        self.seen.lock().expect("fake classifier lock").clone()
    }
}

#[async_trait]
impl TopicClassifier for FakeClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Value> {
        self.seen
            .lock()
            .expect("fake classifier lock")
            .push(request.clone());
        match &self.behavior {
            Behavior::Reply(value) => Ok(value.clone()),
            Behavior::Fail(kind) => Err(SignalError::classifier(*kind, "induced failure")),
            Behavior::Hang => std::future::pending().await,
            Behavior::Panic => panic!("classifier exploded"),
        }
    }
}

fn arbiter_with(classifier: Arc<FakeClassifier>) -> TopicSwitchArbiter {
    let config = ArbiterConfig {
        llm_timeout: Duration::from_millis(500),
        history_turns: 2,
        ..ArbiterConfig::default()
    };
    TopicSwitchArbiter::new(classifier, config)
}

fn topic() -> CurrentTopic {
    CurrentTopic::new("malla sombra").with_description("malla raschel confeccionada con ojillos")
}

fn history() -> Vec<ConversationTurn> {
    vec![
        ConversationTurn::new("user", "hola, precio de la malla"),
        ConversationTurn::new("assistant", "¿qué medida necesitas?"),
        ConversationTurn::new("user", "4x6"),
    ]
}

fn source() -> SourceContext {
    SourceContext {
        origin_topic: Some("malla sombra".to_string()),
        channel: Some("anuncio facebook".to_string()),
    }
}

fn assert_exact_fail_safe(verdict: &TopicSwitchVerdict) {
    assert_eq!(verdict, &TopicSwitchVerdict::fail_safe());
    assert!(!verdict.should_switch);
    assert_eq!(verdict.target_topic, None);
    assert_eq!(verdict.confidence, 0.0);
}

#[tokio::test]
async fn confident_verdict_is_returned_as_parsed() {
    let classifier = FakeClassifier::new(Behavior::Reply(json!({
        "should_switch": true,
        "target_topic": "borde separador",
        "confidence": 0.92
    })));
    let verdict = arbiter_with(classifier)
        .arbitrate("y tienen borde para jardín?", &topic(), &history(), &source())
        .await;
    assert!(verdict.should_switch);
    assert_eq!(verdict.target_topic.as_deref(), Some("borde separador"));
    assert!(verdict.is_actionable(0.7));
}

#[tokio::test]
async fn actionability_follows_configured_confidence_floor() {
    let reply = json!({
        "should_switch": true,
        "target_topic": "borde separador",
        "confidence": 0.85
    });
    let lenient = arbiter_with(FakeClassifier::new(Behavior::Reply(reply.clone())));
    let strict = TopicSwitchArbiter::new(
        FakeClassifier::new(Behavior::Reply(reply)),
        ArbiterConfig {
            min_confidence_milli: 900,
            ..ArbiterConfig::default()
        },
    );

    let verdict = lenient
        .arbitrate("y tienen borde para jardín?", &topic(), &history(), &source())
        .await;
    assert!(lenient.is_actionable(&verdict));

    let verdict = strict
        .arbitrate("y tienen borde para jardín?", &topic(), &history(), &source())
        .await;
    assert!(verdict.should_switch);
    assert!(!strict.is_actionable(&verdict));
    assert!(!strict.is_actionable(&TopicSwitchVerdict::fail_safe()));
}

#[tokio::test]
async fn classifier_error_yields_fail_safe() {
    for kind in [
        ClassifierFailureKind::Transient,
        ClassifierFailureKind::Fatal,
        ClassifierFailureKind::Schema,
    ] {
        let verdict = arbiter_with(FakeClassifier::new(Behavior::Fail(kind)))
            .arbitrate("rollo", &topic(), &history(), &source())
            .await;
        assert_exact_fail_safe(&verdict);
    }
}

#[tokio::test(start_paused = true)]
async fn classifier_timeout_yields_fail_safe() {
    let verdict = arbiter_with(FakeClassifier::new(Behavior::Hang))
        .arbitrate("rollo", &topic(), &history(), &source())
        .await;
    assert_exact_fail_safe(&verdict);
}

#[tokio::test]
async fn malformed_payload_yields_fail_safe() {
    for payload in [
        json!({"response": "switch to rollos, confidence high"}),
        json!({"should_switch": "maybe", "confidence": 0.9}),
        json!({"should_switch": true, "confidence": 0.9}),
        json!([1, 2, 3]),
    ] {
        let verdict = arbiter_with(FakeClassifier::new(Behavior::Reply(payload)))
            .arbitrate("rollo", &topic(), &history(), &source())
            .await;
        assert_exact_fail_safe(&verdict);
    }
}

#[tokio::test]
async fn classifier_panic_yields_fail_safe() {
    let verdict = arbiter_with(FakeClassifier::new(Behavior::Panic))
        .arbitrate("rollo", &topic(), &history(), &source())
        .await;
    assert_exact_fail_safe(&verdict);
}

#[tokio::test]
async fn disabled_arbiter_never_calls_classifier() {
    let classifier = FakeClassifier::new(Behavior::Reply(json!({
        "should_switch": true,
        "target_topic": "otro",
        "confidence": 1.0
    })));
    let config = ArbiterConfig {
        enabled: false,
        ..ArbiterConfig::default()
    };
    let arbiter = TopicSwitchArbiter::new(classifier.clone(), config);
    let verdict = arbiter
        .arbitrate("rollo", &topic(), &history(), &source())
        .await;
    assert_exact_fail_safe(&verdict);
    assert!(classifier.requests().is_empty());
}

#[tokio::test]
async fn request_carries_topic_origin_and_bounded_trail() {
    let classifier = FakeClassifier::new(Behavior::Reply(json!({
        "should_switch": false,
        "target_topic": null,
        "confidence": 0.3
    })));
    let verdict = arbiter_with(classifier.clone())
        .arbitrate("¿y en rollo?", &topic(), &history(), &source())
        .await;
    assert!(!verdict.should_switch);

    let requests = classifier.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.current_topic, "malla sombra");
    assert_eq!(request.origin_topic.as_deref(), Some("malla sombra"));
    assert!(request.system_prompt.contains("Do NOT switch"));
    assert!(request.user_prompt.contains("malla raschel confeccionada"));
    assert!(request.user_prompt.contains("malla sombra (via anuncio facebook)"));
    assert!(request.user_prompt.contains("- assistant: ¿qué medida necesitas?"));
    assert!(request.user_prompt.contains("- user: 4x6"));
    assert!(!request.user_prompt.contains("hola, precio de la malla"));
    assert!(request.user_prompt.contains("New customer message: ¿y en rollo?"));
}

#[test]
fn history_trail_truncates_long_turns() {
    let turns = vec![ConversationTurn::new("user", "a".repeat(40))];
    let trail = prompt::format_history_trail(&turns, 5, 16);
    assert_eq!(trail, format!("- user: {}...", "a".repeat(16)));
}
