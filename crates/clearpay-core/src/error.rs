//! Error Types

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, ClearpayError>;

/// Gateway error types
#[derive(Error, Debug)]
pub enum ClearpayError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hook handler failed while rendering
    #[error("Hook '{hook}' handler '{handler}' failed: {message}")]
    HookHandler {
        hook: String,
        handler: String,
        message: String,
    },

    /// Invalid hook argument
    #[error("Invalid hook argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClearpayError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => "Payment gateway is not configured correctly.".into(),
            Self::HookHandler { hook, .. } => format!("Unable to render '{hook}'."),
            Self::InvalidArgument(msg) => format!("Invalid request: {msg}"),
            Self::Json(_) => "An unexpected error occurred.".into(),
        }
    }
}
