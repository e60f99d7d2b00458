use thiserror::Error;

use crate::data::ValueKind;

/// Errors produced by key and value type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid key id '{0}': expected 'namespace:path' using [a-z0-9_./-]")]
    InvalidKeyId(String),

    #[error("a different key is already registered under '{0}'")]
    DuplicateKey(String),

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("key '{key}' holds {actual} values, not {expected}")]
    KindMismatch {
        key: String,
        expected: ValueKind,
        actual: ValueKind,
    },
}
