use thiserror::Error;

/// Failures raised at the fee engine boundary.
///
/// Each input variant names the field that was rejected, so callers can point
/// the user at the offending value. None of them are retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid distance: {0}")]
    InvalidDistance(String),

    #[error("invalid item count: {0}")]
    InvalidItemCount(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid pricing configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Name of the input field this error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::InvalidAmount(_) => Some("cart_value"),
            Error::InvalidDistance(_) => Some("distance"),
            Error::InvalidItemCount(_) => Some("item_count"),
            Error::InvalidTimestamp(_) => Some("delivered_at"),
            Error::InvalidConfig(_) | Error::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
