use dax_processor::ProcessorError;
use dax_types::TypeError;

/// Errors from building the processor registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The processor's key conflicts with an already registered key.
    #[error("cannot register processor '{processor}': {source}")]
    Key {
        processor: &'static str,
        #[source]
        source: TypeError,
    },

    /// The dispatcher is sealed and late registration is disabled.
    #[error("registry is sealed; late registration of '{processor}' for '{key}' refused")]
    Sealed {
        processor: &'static str,
        key: &'static str,
    },
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors surfaced by dispatcher reads and the erased API.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// A processor faulted. Never reported as an absent value.
    #[error("processor '{processor}' failed for '{key}': {source}")]
    Processor {
        key: &'static str,
        processor: &'static str,
        #[source]
        source: ProcessorError,
    },

    /// A key id or value did not fit the key registry.
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl DataError {
    pub(crate) fn processor(key: &'static str, processor: &'static str, source: ProcessorError) -> Self {
        Self::Processor {
            key,
            processor,
            source,
        }
    }
}

/// Result alias for dispatcher reads.
pub type DataResult<T> = Result<T, DataError>;
