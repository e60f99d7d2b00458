/// Errors from assembling guard chains.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GuardError {
    /// A guard with this name is already part of the chain.
    #[error("guard '{0}' is already registered")]
    Duplicate(String),

    /// No guard with this name is part of the chain.
    #[error("no guard named '{0}'")]
    Unknown(String),
}

/// Result alias for guard chain operations.
pub type GuardResult<T> = Result<T, GuardError>;
