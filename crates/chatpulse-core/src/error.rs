use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, SignalError>;

/// How a classifier call failed. Every kind is recovered by the arbiter into
/// the fail-safe verdict; the kind only shapes the log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierFailureKind {
    Transient,
    Timeout,
    Schema,
    Fatal,
}

impl ClassifierFailureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Timeout => "timeout",
            Self::Schema => "schema",
            Self::Fatal => "fatal",
        }
    }
}

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("classifier {} failure: {message}", kind.as_str())]
    Classifier {
        kind: ClassifierFailureKind,
        message: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "llm-classifier")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
}

impl SignalError {
    pub fn classifier(kind: ClassifierFailureKind, message: impl Into<String>) -> Self {
        Self::Classifier {
            kind,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::Classifier { kind, .. } => match kind {
                ClassifierFailureKind::Transient => "CLASSIFIER_TRANSIENT",
                ClassifierFailureKind::Timeout => "CLASSIFIER_TIMEOUT",
                ClassifierFailureKind::Schema => "CLASSIFIER_SCHEMA",
                ClassifierFailureKind::Fatal => "CLASSIFIER_FATAL",
            },
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "llm-classifier")]
            Self::Http(_) => "HTTP_ERROR",
        }
    }

    /// Failure kind used when this error surfaces from a classifier call.
    pub fn classifier_kind(&self) -> ClassifierFailureKind {
        match self {
            Self::Classifier { kind, .. } => *kind,
            Self::Json(_) => ClassifierFailureKind::Schema,
            Self::InvalidEndpoint(_) => ClassifierFailureKind::Fatal,
            #[cfg(feature = "llm-classifier")]
            Self::Http(err) if err.is_timeout() => ClassifierFailureKind::Timeout,
            #[cfg(feature = "llm-classifier")]
            Self::Http(_) => ClassifierFailureKind::Transient,
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
        }
    }
}
