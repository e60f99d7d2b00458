use dax_types::ValueKind;

/// Processor faults.
///
/// These indicate a defect in a processor or in how it was registered, not
/// a routine outcome. Routine outcomes (absent, rejected) are ordinary
/// return values.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// The container passed the container-type check but is not the Rust
    /// type the processor expects.
    #[error("processor for '{key}' expects {expected}, got container '{found}'")]
    ContainerMismatch {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// An erased value could not be converted to the processor's value type.
    #[error("value for '{key}' has the wrong shape: expected {expected}, got {actual}")]
    ValueMismatch {
        key: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// The container is in a state the processor cannot interpret.
    #[error("processor for '{key}' failed: {message}")]
    Internal { key: &'static str, message: String },
}

impl ProcessorError {
    pub fn internal(key: &'static str, message: impl Into<String>) -> Self {
        Self::Internal {
            key,
            message: message.into(),
        }
    }
}

/// Result alias for processor operations.
pub type ProcessorResult<T> = Result<T, ProcessorError>;
