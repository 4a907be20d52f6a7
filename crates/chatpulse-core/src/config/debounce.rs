use std::time::Duration;

use super::env::read_env_u64;

const ENV_DEBOUNCE_WINDOW_MS: &str = "CHATPULSE_DEBOUNCE_WINDOW_MS";

const DEFAULT_DEBOUNCE_WINDOW_MS: u64 = 5_000;
const MIN_DEBOUNCE_WINDOW_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub window: Duration,
}

impl DebounceConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            window: Duration::from_millis(read_env_u64(
                ENV_DEBOUNCE_WINDOW_MS,
                DEFAULT_DEBOUNCE_WINDOW_MS,
                MIN_DEBOUNCE_WINDOW_MS,
            )),
        }
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(DEFAULT_DEBOUNCE_WINDOW_MS),
        }
    }
}
