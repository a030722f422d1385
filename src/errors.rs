use thiserror::Error;

/// Failure classes surfaced to the user as transient notices. None of these
/// are fatal: the originating form stays interactive and may be resubmitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    /// Missing or malformed required input, detected locally. Never reaches
    /// the directory.
    #[error("{0}")]
    Validation(String),
    /// An account with the submitted email already exists.
    #[error("{0}")]
    Conflict(String),
    /// A (simulated) remote call failed.
    #[error("{0}")]
    Remote(String),
}

impl FlowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FlowError::Validation(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        FlowError::Remote(msg.into())
    }
}
