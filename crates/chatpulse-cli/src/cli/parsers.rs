use chrono::{DateTime, Utc};

use chatpulse_core::ConversationTurn;

const DEFAULT_HISTORY_ROLE: &str = "user";

pub(super) fn parse_rfc3339(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("invalid RFC3339 timestamp '{raw}': {err}"))
}

pub(super) fn parse_min_one_u64(raw: &str) -> std::result::Result<u64, String> {
    let value = raw
        .parse::<u64>()
        .map_err(|_| format!("invalid integer value '{raw}'"))?;
    if value == 0 {
        return Err("value must be >= 1".to_string());
    }
    Ok(value)
}

/// `role: text`; a turn without a role prefix is attributed to the user.
pub(super) fn parse_history_turn(raw: &str) -> std::result::Result<ConversationTurn, String> {
    let (role, text) = match raw.split_once(':') {
        Some((role, text))
            if !role.trim().is_empty() && !role.trim().contains(char::is_whitespace) =>
        {
            (role.trim(), text.trim())
        }
        _ => (DEFAULT_HISTORY_ROLE, raw.trim()),
    };
    if text.is_empty() {
        return Err(format!("history turn '{raw}' has no text"));
    }
    Ok(ConversationTurn::new(role, text))
}
