/// Errors raised by the wheel core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WheelError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Segment list cannot change while the wheel is spinning")]
    SpinInProgress,
}

impl WheelError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        WheelError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, WheelError>;
