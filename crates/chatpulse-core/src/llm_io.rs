use serde_json::Value;

#[cfg(feature = "llm-classifier")]
pub fn parse_local_loopback_endpoint(
    raw: &str,
    label: &str,
) -> std::result::Result<reqwest::Url, String> {
    let url = reqwest::Url::parse(raw).map_err(|err| format!("invalid {label}: {err}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported {label} scheme: {other}")),
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(format!("{label} must not include credentials"));
    }
    let host = url
        .host_str()
        .ok_or_else(|| format!("{label} host is missing"))?;
    if !matches!(host, "127.0.0.1" | "localhost" | "::1" | "[::1]") {
        return Err(format!("{label} must use a loopback host, got: {host}"));
    }
    Ok(url)
}

/// Pulls the assistant text out of the common chat response shapes
/// (ollama `message`, openai `choices`, plain `response`).
pub fn extract_llm_content(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(|message| message.get("content"))
        .or_else(|| {
            value
                .get("choices")
                .and_then(Value::as_array)
                .and_then(|choices| choices.first())
                .and_then(|choice| choice.get("message"))
                .and_then(|message| message.get("content"))
        })
        .or_else(|| value.get("response"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// First `{` to last `}`; models like to wrap verdicts in prose or fences.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Reads a confidence either as a unit fraction or as a percentage.
/// Negative, non-finite and >100 values are rejected rather than clamped.
pub fn parse_unit_interval(value: &Value) -> Option<f32> {
    let raw = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    let scaled = if raw <= 1.0 {
        raw
    } else if raw <= 100.0 {
        raw / 100.0
    } else {
        return None;
    };
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is already bounded to [0, 1]"
    )]
    let confidence = scaled as f32;
    Some(confidence)
}
