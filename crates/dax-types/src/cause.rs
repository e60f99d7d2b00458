use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::{DataType, DataValue};

/// Well-known context keys carried by a [`Cause`].
pub mod context_keys {
    /// How an entity is being moved (`DataValue::Enum`).
    pub const TELEPORT_TYPE: &str = "dax:teleport_type";
    /// Plugin or extension responsible for the change (`DataValue::Text`).
    pub const PLUGIN: &str = "dax:plugin";
    /// Player on whose behalf the change is made (`DataValue::Text`).
    pub const NOTIFIER: &str = "dax:notifier";
}

/// One named participant in a cause chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCause {
    pub name: String,
    pub source: String,
}

impl NamedCause {
    pub const SOURCE: &'static str = "source";

    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Explicit, immutable description of why a mutation is happening.
///
/// Every mutating dispatcher call accepts a `Cause`; there is no ambient
/// cause stack. The first entry is the root cause. Context entries are
/// typed side information (teleport type, responsible plugin, ...).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cause {
    id: Uuid,
    entries: Vec<NamedCause>,
    context: BTreeMap<String, DataValue>,
}

impl Cause {
    /// A cause whose root is `source`.
    pub fn of(source: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            entries: vec![NamedCause::new(NamedCause::SOURCE, source)],
            context: BTreeMap::new(),
        }
    }

    /// Append another named participant.
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.entries.push(NamedCause::new(name, source));
        self
    }

    /// Attach a context entry, replacing any previous value for `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl DataType) -> Self {
        self.context.insert(key.into(), value.to_data());
        self
    }

    /// Correlation id, time-ordered (UUID v7).
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// The root cause.
    pub fn root(&self) -> &NamedCause {
        // `of` always seeds one entry and entries are never removed.
        &self.entries[0]
    }

    pub fn entries(&self) -> &[NamedCause] {
        &self.entries
    }

    /// Source of the first entry with the given name.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.source.as_str())
    }

    pub fn context(&self, key: &str) -> Option<&DataValue> {
        self.context.get(key)
    }

    /// Typed view of a context entry.
    pub fn context_as<T: DataType>(&self, key: &str) -> Option<T> {
        self.context.get(key).and_then(T::from_data)
    }

    /// Short representation for logs.
    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cause[{}] {}", self.short_id(), self.root().source)
    }
}
