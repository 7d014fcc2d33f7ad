use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Outcome classification for a single poll cycle. Every variant is local to
/// one cycle and is superseded by the next cycle's outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PollError {
    /// Request could not be sent, the connection failed, or the per-request
    /// timeout expired before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived but its status was outside the success range.
    #[error("response not OK")]
    Status { status: u16 },

    /// The response body did not match the expected snapshot shape.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl PollError {
    /// The distinguishing reason string, preserved for diagnostics even
    /// though presentation collapses all variants into one failed state.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Shape mismatch in a polled payload, naming the first missing or mistyped
/// field encountered.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason} at field `{field}`")]
pub struct DecodeError {
    pub field: String,
    pub reason: String,
}

impl DecodeError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: "missing field".to_string(),
        }
    }

    pub fn mistyped(field: impl Into<String>, expected: &str) -> Self {
        Self {
            field: field.into(),
            reason: format!("expected {expected}"),
        }
    }
}
