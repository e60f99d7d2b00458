use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use dax_types::{DataType, DataValue, Key, KeyDef};

/// An immutable value viewed through the erased value model.
pub type ErasedValue = ImmutableValue<DataValue>;

// ---------------------------------------------------------------------------
// MutableValue
// ---------------------------------------------------------------------------

/// Caller-owned snapshot of a value.
///
/// `set` rebinds the held value in place and never writes back to the
/// container the value was read from. A `MutableValue` is not a live view:
/// it is stale as soon as its container changes.
#[derive(Clone, Debug, PartialEq)]
pub struct MutableValue<V: DataType> {
    key: Key<V>,
    default: V,
    actual: V,
}

impl<V: DataType> MutableValue<V> {
    pub fn new(key: Key<V>, default: V, actual: V) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }

    /// A value that currently holds its default.
    pub fn of_default(key: Key<V>, default: V) -> Self {
        Self {
            key,
            actual: default.clone(),
            default,
        }
    }

    pub fn key(&self) -> Key<V> {
        self.key
    }

    pub fn get(&self) -> &V {
        &self.actual
    }

    /// Rebind the held value.
    pub fn set(&mut self, value: V) -> &mut Self {
        self.actual = value;
        self
    }

    /// Apply `f` to the held value.
    pub fn transform(&mut self, f: impl FnOnce(&V) -> V) -> &mut Self {
        self.actual = f(&self.actual);
        self
    }

    pub fn default(&self) -> &V {
        &self.default
    }

    /// Returns `true` while the held value equals the default.
    pub fn is_default(&self) -> bool {
        self.actual == self.default
    }

    pub fn as_immutable(&self) -> ImmutableValue<V> {
        ImmutableValue::new(self.key, self.default.clone(), self.actual.clone())
    }

    pub fn into_inner(self) -> V {
        self.actual
    }
}

impl<V: DataType> fmt::Display for MutableValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.actual.to_data())
    }
}

// ---------------------------------------------------------------------------
// ImmutableValue
// ---------------------------------------------------------------------------

struct Inner<V> {
    key: Key<V>,
    default: V,
    actual: V,
}

/// Shared, side-effect free value object.
///
/// Cloning is cheap (reference counted). Two immutable values are equal when
/// their keys are the same key and their actual values are equal; defaults
/// do not take part in equality or hashing, so values built with different
/// display defaults remain interchangeable as cache and set entries.
pub struct ImmutableValue<V: DataType> {
    inner: Arc<Inner<V>>,
}

impl<V: DataType> ImmutableValue<V> {
    pub fn new(key: Key<V>, default: V, actual: V) -> Self {
        Self {
            inner: Arc::new(Inner {
                key,
                default,
                actual,
            }),
        }
    }

    pub fn key(&self) -> Key<V> {
        self.inner.key
    }

    pub fn get(&self) -> &V {
        &self.inner.actual
    }

    pub fn default(&self) -> &V {
        &self.inner.default
    }

    /// A new value with a different actual value and the same key and
    /// default. `self` is left untouched.
    pub fn with(&self, actual: V) -> Self {
        Self::new(self.inner.key, self.inner.default.clone(), actual)
    }

    pub fn as_mutable(&self) -> MutableValue<V> {
        MutableValue::new(
            self.inner.key,
            self.inner.default.clone(),
            self.inner.actual.clone(),
        )
    }

    /// The same value in the erased model.
    pub fn erase(&self) -> ErasedValue {
        ImmutableValue::new(
            self.inner.key.erase(),
            self.inner.default.to_data(),
            self.inner.actual.to_data(),
        )
    }

    /// Returns `true` if both handles share one allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl ErasedValue {
    /// Recover the typed value. Returns `None` if the value belongs to a
    /// different key or does not convert to `V`.
    pub fn downcast<V: DataType>(&self, key: Key<V>) -> Option<ImmutableValue<V>> {
        if !KeyDef::same(self.inner.key.def(), key.def()) {
            return None;
        }
        Some(ImmutableValue::new(
            key,
            V::from_data(&self.inner.default)?,
            V::from_data(&self.inner.actual)?,
        ))
    }

    pub fn key_id(&self) -> &'static str {
        self.inner.key.id()
    }
}

impl<V: DataType> Clone for ImmutableValue<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: DataType> PartialEq for ImmutableValue<V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.key == other.inner.key && self.inner.actual == other.inner.actual
    }
}

impl<V: DataType + Eq> Eq for ImmutableValue<V> {}

impl<V: DataType + Hash> Hash for ImmutableValue<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.key.hash(state);
        self.inner.actual.hash(state);
    }
}

impl<V: DataType> fmt::Debug for ImmutableValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmutableValue")
            .field("key", &self.inner.key)
            .field("default", &self.inner.default)
            .field("actual", &self.inner.actual)
            .finish()
    }
}

impl<V: DataType> fmt::Display for ImmutableValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.inner.key, self.inner.actual.to_data())
    }
}

impl<V: DataType> Serialize for ImmutableValue<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ImmutableValue", 3)?;
        state.serialize_field("key", self.inner.key.id())?;
        state.serialize_field("default", &self.inner.default.to_data())?;
        state.serialize_field("actual", &self.inner.actual.to_data())?;
        state.end()
    }
}
