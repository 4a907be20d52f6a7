use std::time::Duration;

use super::env::{
    parse_enabled_default_true, read_env_u16, read_env_u32, read_env_u64, read_env_usize,
    read_non_empty_env,
};

const ENV_ARBITER_ENABLED: &str = "CHATPULSE_ARBITER_ENABLED";
const ENV_ARBITER_LLM_ENDPOINT: &str = "CHATPULSE_ARBITER_LLM_ENDPOINT";
const ENV_ARBITER_LLM_MODEL: &str = "CHATPULSE_ARBITER_LLM_MODEL";
const ENV_ARBITER_LLM_TIMEOUT_MS: &str = "CHATPULSE_ARBITER_LLM_TIMEOUT_MS";
const ENV_ARBITER_LLM_MAX_OUTPUT_TOKENS: &str = "CHATPULSE_ARBITER_LLM_MAX_OUTPUT_TOKENS";
const ENV_ARBITER_LLM_TEMPERATURE_MILLI: &str = "CHATPULSE_ARBITER_LLM_TEMPERATURE_MILLI";
const ENV_ARBITER_HISTORY_TURNS: &str = "CHATPULSE_ARBITER_HISTORY_TURNS";
const ENV_ARBITER_MAX_CHARS_PER_TURN: &str = "CHATPULSE_ARBITER_MAX_CHARS_PER_TURN";
const ENV_ARBITER_MIN_CONFIDENCE_MILLI: &str = "CHATPULSE_ARBITER_MIN_CONFIDENCE_MILLI";

const DEFAULT_ARBITER_LLM_ENDPOINT: &str = "http://127.0.0.1:11434/api/chat";
const DEFAULT_ARBITER_LLM_MODEL: &str = "qwen2.5:7b-instruct";
const DEFAULT_ARBITER_LLM_TIMEOUT_MS: u64 = 4_000;
const MIN_ARBITER_LLM_TIMEOUT_MS: u64 = 200;
const DEFAULT_ARBITER_LLM_MAX_OUTPUT_TOKENS: u32 = 200;
const DEFAULT_ARBITER_LLM_TEMPERATURE_MILLI: u16 = 0;
const DEFAULT_ARBITER_HISTORY_TURNS: usize = 6;
const DEFAULT_ARBITER_MAX_CHARS_PER_TURN: usize = 280;
const MIN_ARBITER_MAX_CHARS_PER_TURN: usize = 16;
const DEFAULT_ARBITER_MIN_CONFIDENCE_MILLI: u16 = 700;

#[derive(Debug, Clone, PartialEq)]
pub struct ArbiterConfig {
    pub enabled: bool,
    pub llm_endpoint: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub llm_max_output_tokens: u32,
    pub llm_temperature_milli: u16,
    pub history_turns: usize,
    pub max_chars_per_turn: usize,
    pub min_confidence_milli: u16,
}

impl ArbiterConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            enabled: parse_enabled_default_true(std::env::var(ENV_ARBITER_ENABLED).ok().as_deref()),
            llm_endpoint: read_non_empty_env(ENV_ARBITER_LLM_ENDPOINT)
                .unwrap_or_else(|| DEFAULT_ARBITER_LLM_ENDPOINT.to_string()),
            llm_model: read_non_empty_env(ENV_ARBITER_LLM_MODEL)
                .unwrap_or_else(|| DEFAULT_ARBITER_LLM_MODEL.to_string()),
            llm_timeout: Duration::from_millis(read_env_u64(
                ENV_ARBITER_LLM_TIMEOUT_MS,
                DEFAULT_ARBITER_LLM_TIMEOUT_MS,
                MIN_ARBITER_LLM_TIMEOUT_MS,
            )),
            llm_max_output_tokens: read_env_u32(ENV_ARBITER_LLM_MAX_OUTPUT_TOKENS)
                .filter(|value| *value > 0)
                .unwrap_or(DEFAULT_ARBITER_LLM_MAX_OUTPUT_TOKENS),
            llm_temperature_milli: read_env_u16(ENV_ARBITER_LLM_TEMPERATURE_MILLI)
                .filter(|value| *value <= 2_000)
                .unwrap_or(DEFAULT_ARBITER_LLM_TEMPERATURE_MILLI),
            history_turns: read_env_usize(
                ENV_ARBITER_HISTORY_TURNS,
                DEFAULT_ARBITER_HISTORY_TURNS,
                1,
            ),
            max_chars_per_turn: read_env_usize(
                ENV_ARBITER_MAX_CHARS_PER_TURN,
                DEFAULT_ARBITER_MAX_CHARS_PER_TURN,
                MIN_ARBITER_MAX_CHARS_PER_TURN,
            ),
            min_confidence_milli: read_env_u16(ENV_ARBITER_MIN_CONFIDENCE_MILLI)
                .filter(|value| *value <= 1_000)
                .unwrap_or(DEFAULT_ARBITER_MIN_CONFIDENCE_MILLI),
        }
    }

    #[must_use]
    pub fn min_confidence(&self) -> f32 {
        f32::from(self.min_confidence_milli) / 1000.0
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            llm_endpoint: DEFAULT_ARBITER_LLM_ENDPOINT.to_string(),
            llm_model: DEFAULT_ARBITER_LLM_MODEL.to_string(),
            llm_timeout: Duration::from_millis(DEFAULT_ARBITER_LLM_TIMEOUT_MS),
            llm_max_output_tokens: DEFAULT_ARBITER_LLM_MAX_OUTPUT_TOKENS,
            llm_temperature_milli: DEFAULT_ARBITER_LLM_TEMPERATURE_MILLI,
            history_turns: DEFAULT_ARBITER_HISTORY_TURNS,
            max_chars_per_turn: DEFAULT_ARBITER_MAX_CHARS_PER_TURN,
            min_confidence_milli: DEFAULT_ARBITER_MIN_CONFIDENCE_MILLI,
        }
    }
}
