use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// The bridge's single local failure mode.
///
/// Everything else that can go wrong happens inside the external server
/// process and surfaces as a lifecycle notification, not an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Language server initialization failed: {reason}")]
    InitializationFailure { reason: String },
}

impl BridgeError {
    pub(crate) fn init(reason: impl Into<String>) -> Self {
        Self::InitializationFailure {
            reason: reason.into(),
        }
    }
}
