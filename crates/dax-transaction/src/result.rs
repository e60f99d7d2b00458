use std::fmt;

use serde::Serialize;

use dax_types::{DataType, Key, KeyDef};
use dax_value::{ErasedValue, ImmutableValue};

use crate::status::TransactionStatus;

// ---------------------------------------------------------------------------
// TransactionResult
// ---------------------------------------------------------------------------

/// Structured outcome of a mutation attempt.
///
/// Immutable once built. Use [`TransactionResult::builder`] or one of the
/// shorthand constructors.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionResult {
    status: TransactionStatus,
    successful: Vec<ErasedValue>,
    replaced: Vec<ErasedValue>,
    rejected: Vec<ErasedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault: Option<String>,
}

impl TransactionResult {
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::default()
    }

    /// Success without any values, e.g. a no-op removal of a default.
    pub fn success_no_data() -> Self {
        Self::builder().result(TransactionStatus::Success).build()
    }

    /// Nothing applicable to change.
    pub fn fail_no_data() -> Self {
        Self::builder().result(TransactionStatus::NoData).build()
    }

    /// `value` was applied and nothing was replaced.
    pub fn success_result<V: DataType>(value: &ImmutableValue<V>) -> Self {
        Self::builder()
            .success(value)
            .result(TransactionStatus::Success)
            .build()
    }

    /// `value` was applied, overwriting `replaced`.
    pub fn success_replace_result<V: DataType>(
        value: &ImmutableValue<V>,
        replaced: &ImmutableValue<V>,
    ) -> Self {
        Self::builder()
            .success(value)
            .replace(replaced)
            .result(TransactionStatus::Success)
            .build()
    }

    /// `value` was rejected by a processor precondition.
    pub fn fail_result<V: DataType>(value: &ImmutableValue<V>) -> Self {
        Self::builder()
            .reject(value)
            .result(TransactionStatus::Failure)
            .build()
    }

    /// Applying `value` hit a processor fault.
    pub fn error_result<V: DataType>(value: &ImmutableValue<V>, fault: impl Into<String>) -> Self {
        Self::builder()
            .reject(value)
            .fault(fault)
            .result(TransactionStatus::Error)
            .build()
    }

    /// The guard hook vetoed `value`.
    pub fn cancelled<V: DataType>(value: &ImmutableValue<V>) -> Self {
        Self::builder()
            .reject(value)
            .result(TransactionStatus::Cancelled)
            .build()
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Returns `true` only for [`TransactionStatus::Success`].
    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    pub fn successful(&self) -> &[ErasedValue] {
        &self.successful
    }

    pub fn replaced(&self) -> &[ErasedValue] {
        &self.replaced
    }

    pub fn rejected(&self) -> &[ErasedValue] {
        &self.rejected
    }

    /// Description of the processor fault, for [`TransactionStatus::Error`].
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// The applied value for `key`, if any.
    pub fn successful_value<V: DataType>(&self, key: Key<V>) -> Option<V> {
        typed_value(&self.successful, key)
    }

    /// The overwritten value for `key`, if any.
    pub fn replaced_value<V: DataType>(&self, key: Key<V>) -> Option<V> {
        typed_value(&self.replaced, key)
    }

    /// The rejected value for `key`, if any.
    pub fn rejected_value<V: DataType>(&self, key: Key<V>) -> Option<V> {
        typed_value(&self.rejected, key)
    }
}

fn typed_value<V: DataType>(values: &[ErasedValue], key: Key<V>) -> Option<V> {
    values
        .iter()
        .find_map(|value| value.downcast(key))
        .map(|value| value.get().clone())
}

impl fmt::Display for TransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (successful: {}, replaced: {}, rejected: {})",
            self.status,
            self.successful.len(),
            self.replaced.len(),
            self.rejected.len()
        )?;
        if let Some(fault) = &self.fault {
            write!(f, ": {fault}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Accumulates values for a [`TransactionResult`], then finalises once.
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    status: Option<TransactionStatus>,
    successful: Vec<ErasedValue>,
    replaced: Vec<ErasedValue>,
    rejected: Vec<ErasedValue>,
    fault: Option<String>,
}

impl TransactionBuilder {
    pub fn success<V: DataType>(mut self, value: &ImmutableValue<V>) -> Self {
        self.successful.push(value.erase());
        self
    }

    pub fn replace<V: DataType>(mut self, value: &ImmutableValue<V>) -> Self {
        self.replaced.push(value.erase());
        self
    }

    pub fn reject<V: DataType>(mut self, value: &ImmutableValue<V>) -> Self {
        self.rejected.push(value.erase());
        self
    }

    pub fn fault(mut self, fault: impl Into<String>) -> Self {
        self.fault = Some(fault.into());
        self
    }

    pub fn result(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Merge another result into this one.
    ///
    /// Successful values replace earlier successful values for the same key;
    /// the earliest replaced value per key is kept; rejected values
    /// accumulate. The more severe status wins, and the first fault is kept.
    pub fn absorb(mut self, other: &TransactionResult) -> Self {
        for value in &other.successful {
            self.successful
                .retain(|existing| !same_key(existing, value));
            self.successful.push(value.clone());
        }
        for value in &other.replaced {
            if !self.replaced.iter().any(|existing| same_key(existing, value)) {
                self.replaced.push(value.clone());
            }
        }
        self.rejected.extend(other.rejected.iter().cloned());
        if self.fault.is_none() {
            self.fault = other.fault.clone();
        }
        self.status = Some(match self.status {
            Some(current) => current.max_severity(other.status),
            None => other.status,
        });
        self
    }

    /// Finalise the result.
    ///
    /// Without an explicit status the result is `Failure` if anything was
    /// rejected and `Success` otherwise.
    pub fn build(self) -> TransactionResult {
        let status = self.status.unwrap_or(if self.rejected.is_empty() {
            TransactionStatus::Success
        } else {
            TransactionStatus::Failure
        });
        TransactionResult {
            status,
            successful: self.successful,
            replaced: self.replaced,
            rejected: self.rejected,
            fault: self.fault,
        }
    }
}

fn same_key(a: &ErasedValue, b: &ErasedValue) -> bool {
    KeyDef::same(a.key().def(), b.key().def())
}
