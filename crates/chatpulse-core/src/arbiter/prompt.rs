use crate::context::ConversationTurn;
use crate::text::{normalize_message, truncate_text};

use super::{ClassificationRequest, CurrentTopic, SourceContext};

const ARBITER_SYSTEM_PROMPT: &str = "You decide whether a sales conversation should switch \
to a different product topic. Return JSON only, exactly one object: \
{\"should_switch\": true|false, \"target_topic\": \"<topic>\"|null, \"confidence\": 0.0-1.0, \"reason\": \"<short>\"}.\n\
Rules:\n\
- Do NOT switch when the only evidence is a single ambiguous keyword that could be a synonym, \
size, variant or accessory of the current topic.\n\
- Do NOT switch when the conversation origin strongly anchors it to the current topic.\n\
- Switch only when the customer unambiguously asks about a different product.\n\
- When should_switch is false, target_topic must be null.";

pub(super) fn build_classification_request(
    message: &str,
    current_topic: &CurrentTopic,
    recent_history: &[ConversationTurn],
    source: &SourceContext,
    history_turns: usize,
    max_chars_per_turn: usize,
) -> ClassificationRequest {
    let trail = format_history_trail(recent_history, history_turns, max_chars_per_turn);
    let mut user_prompt = format!("Current topic: {}", current_topic.name.trim());
    if let Some(description) = current_topic
        .description
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        user_prompt.push_str(&format!("\nTopic description: {description}"));
    }
    user_prompt.push_str(&format!(
        "\nConversation origin: {}",
        source.describe().unwrap_or_else(|| "unknown".to_string())
    ));
    if trail.is_empty() {
        user_prompt.push_str("\nRecent turns: (none)");
    } else {
        user_prompt.push_str(&format!("\nRecent turns:\n{trail}"));
    }
    user_prompt.push_str(&format!(
        "\nNew customer message: {}",
        truncate_text(message.trim(), max_chars_per_turn)
    ));

    ClassificationRequest {
        system_prompt: ARBITER_SYSTEM_PROMPT.to_string(),
        user_prompt,
        current_topic: current_topic.name.clone(),
        origin_topic: source.origin_topic.clone(),
    }
}

/// Last `max_turns` turns, oldest first, one `role: text` line each.
pub(super) fn format_history_trail(
    turns: &[ConversationTurn],
    max_turns: usize,
    max_chars_per_turn: usize,
) -> String {
    let start = turns.len().saturating_sub(max_turns);
    turns[start..]
        .iter()
        .filter_map(|turn| {
            let text = normalize_message(&turn.text);
            (!text.is_empty()).then(|| {
                format!(
                    "- {}: {}",
                    turn.role.trim(),
                    truncate_text(&text, max_chars_per_turn)
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}
