//! Asset Error Types

use clearpay_core::ClearpayError;
use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssetError>;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Fallback region {0} has no entry in the region table")]
    MissingFallback(String),

    #[error("Asset handle not registered: {0}")]
    UnknownHandle(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Order total {total} exceeds limit of {max}")]
    OrderLimitExceeded { total: Decimal, max: Decimal },

    #[error("Missing template: {0}")]
    MissingTemplate(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AssetError {
    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidAmount(_) => "The amount provided is not a valid price.",
            Self::OrderLimitExceeded { .. } => "This order is outside the Clearpay limits.",
            _ => "Clearpay content is temporarily unavailable.",
        }
    }
}

impl From<AssetError> for ClearpayError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::InvalidAmount(msg) => Self::InvalidArgument(msg),
            AssetError::Serialization(e) => Self::Json(e),
            other => Self::Config(other.to_string()),
        }
    }
}
