use serde_json::{Map, Value};

use crate::error::{ClassifierFailureKind, Result, SignalError};
use crate::llm_io::{extract_json_object, extract_llm_content, parse_unit_interval};
use crate::models::TopicSwitchVerdict;

const SWITCH_KEYS: &[&str] = &["should_switch", "shouldSwitch", "switch"];
const TARGET_KEYS: &[&str] = &["target_topic", "targetTopic", "topic"];
const REASON_KEYS: &[&str] = &["reason", "rationale"];

/// Accepts either a verdict object or a chat response whose content embeds
/// one. Anything that does not fit the verdict shape is a schema failure.
pub(super) fn parse_verdict(value: &Value) -> Result<TopicSwitchVerdict> {
    if let Some(object) = verdict_object(value) {
        return verdict_from_object(object);
    }
    let content = extract_llm_content(value)
        .ok_or_else(|| schema_error("classifier response missing content"))?;
    let fragment = extract_json_object(&content)
        .ok_or_else(|| schema_error("classifier content does not contain a json object"))?;
    let parsed = serde_json::from_str::<Value>(fragment)
        .map_err(|err| schema_error(format!("classifier content json parse failed: {err}")))?;
    let object = verdict_object(&parsed)
        .ok_or_else(|| schema_error("classifier produced unsupported schema"))?;
    verdict_from_object(object)
}

fn verdict_object(value: &Value) -> Option<&Map<String, Value>> {
    let object = value.as_object()?;
    let object = object
        .get("result")
        .or_else(|| object.get("verdict"))
        .and_then(Value::as_object)
        .unwrap_or(object);
    SWITCH_KEYS
        .iter()
        .any(|key| object.contains_key(*key))
        .then_some(object)
}

fn verdict_from_object(object: &Map<String, Value>) -> Result<TopicSwitchVerdict> {
    let should_switch = first_value(object, SWITCH_KEYS)
        .and_then(parse_bool)
        .ok_or_else(|| schema_error("should_switch is not a boolean"))?;
    let confidence = first_value(object, &["confidence"])
        .and_then(parse_unit_interval)
        .ok_or_else(|| schema_error("confidence is missing or outside [0, 1]"))?;
    let target_topic = match first_value(object, TARGET_KEYS) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => normalize_topic(text),
        Some(other) => {
            return Err(schema_error(format!(
                "target_topic must be a string or null, got {other}"
            )));
        }
    };
    if should_switch && target_topic.is_none() {
        return Err(schema_error("switch verdict without a target topic"));
    }
    let reason = first_value(object, REASON_KEYS)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    Ok(TopicSwitchVerdict {
        should_switch,
        target_topic: target_topic.filter(|_| should_switch),
        confidence,
        reason,
    })
}

fn first_value<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn normalize_topic(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "none" | "null" | "n/a" => None,
        _ => Some(trimmed.to_string()),
    }
}

fn schema_error(message: impl Into<String>) -> SignalError {
    SignalError::classifier(ClassifierFailureKind::Schema, message)
}
