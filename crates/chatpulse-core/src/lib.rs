// Fallible APIs in this crate share one concrete error contract (`SignalError`);
// the interpreters themselves are infallible by contract.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod arbiter;
pub mod clock;
pub mod config;
pub mod context;
pub mod debounce;
pub mod engine;
pub mod error;
pub(crate) mod llm_io;
pub mod models;
pub mod temporal;
pub mod text;
pub mod timeframe;

pub use arbiter::{
    ClassificationRequest, CurrentTopic, SourceContext, TopicClassifier, TopicSwitchArbiter,
};
#[cfg(feature = "llm-classifier")]
pub use arbiter::LocalLlmClassifier;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ArbiterConfig, DebounceConfig};
pub use context::{ConversationSnapshot, ConversationTurn};
pub use debounce::{DebounceCoordinator, SettleHandle, SettleOutcome};
pub use engine::{Interpretation, SettledSignals, SignalEngine, TopicCheck};
pub use error::{ClassifierFailureKind, ErrorPayload, Result, SignalError};
pub use models::{FutureInterestRecord, TopicSwitchVerdict};
pub use temporal::{TemporalIntentExtractor, detect_at};
pub use text::normalize_message;
pub use timeframe::{TimeframeKind, TimeframeMatch, resolve_timeframe};
