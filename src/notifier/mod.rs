mod format;
mod telegram;

pub use format::{alert_message, test_message};
pub use telegram::TelegramDispatcher;

use thiserror::Error;

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct DispatchError {
    message: String,
}

impl From<teloxide::RequestError> for DispatchError {
    fn from(error: teloxide::RequestError) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
impl DispatchError {
    pub(crate) fn simulated(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Outbound channel contract. Implementations must be safe to retry: the
/// engine does not deduplicate, it simply re-sends on the next eligible
/// tick after a failure.
pub trait Dispatcher {
    async fn send(&self, text: &str) -> Result<(), DispatchError>;
}
