mod arbiter;
mod debounce;
mod env;

pub use arbiter::ArbiterConfig;
pub use debounce::DebounceConfig;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub debounce: DebounceConfig,
    pub arbiter: ArbiterConfig,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            debounce: DebounceConfig::from_env(),
            arbiter: ArbiterConfig::from_env(),
        }
    }
}
