use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ValueKind
// ---------------------------------------------------------------------------

/// Semantic type of the values held under a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int,
    Double,
    Text,
    /// One of a closed set of named constants.
    Enum,
    List,
    /// Composite value with named fields.
    Record,
    /// Any of the above; used by the erased value model itself.
    Dynamic,
}

impl ValueKind {
    /// Returns `true` if a value of kind `other` may be stored under a key of
    /// this kind.
    pub fn accepts(&self, other: ValueKind) -> bool {
        *self == Self::Dynamic || *self == other
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Double => write!(f, "double"),
            Self::Text => write!(f, "text"),
            Self::Enum => write!(f, "enum"),
            Self::List => write!(f, "list"),
            Self::Record => write!(f, "record"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

// ---------------------------------------------------------------------------
// DataValue
// ---------------------------------------------------------------------------

/// Type-erased value as it crosses the dispatch boundary.
///
/// Processors and transaction results speak `DataValue`; callers normally
/// work with the typed view through a [`crate::Key`] and [`DataType`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    /// Stable id of an enum constant, e.g. `"entity_teleport"`.
    Enum(String),
    List(Vec<DataValue>),
    Record(BTreeMap<String, DataValue>),
}

impl DataValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Double(_) => ValueKind::Double,
            Self::Text(_) => ValueKind::Text,
            Self::Enum(_) => ValueKind::Enum,
            Self::List(_) => ValueKind::List,
            Self::Record(_) => ValueKind::Record,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DataValue]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, DataValue>> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    /// Look up a field of a record value.
    pub fn field(&self, name: &str) -> Option<&DataValue> {
        self.as_record()?.get(name)
    }

    /// Start building a record value.
    pub fn record() -> RecordBuilder {
        RecordBuilder::default()
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Enum(v) => write!(f, "{v}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Fluent builder for [`DataValue::Record`].
#[derive(Clone, Debug, Default)]
pub struct RecordBuilder {
    fields: BTreeMap<String, DataValue>,
}

impl RecordBuilder {
    pub fn field(mut self, name: impl Into<String>, value: impl DataType) -> Self {
        self.fields.insert(name.into(), value.to_data());
        self
    }

    pub fn build(self) -> DataValue {
        DataValue::Record(self.fields)
    }
}

// ---------------------------------------------------------------------------
// DataType
// ---------------------------------------------------------------------------

/// Bridge between a Rust type and the erased [`DataValue`] model.
///
/// `from_data` returns `None` when the erased value has the wrong shape;
/// the dispatcher reports that as an error, never as absence.
pub trait DataType: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The kind of value this type converts to.
    fn kind() -> ValueKind;

    fn to_data(&self) -> DataValue;

    fn from_data(value: &DataValue) -> Option<Self>;
}

impl DataType for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn to_data(&self) -> DataValue {
        DataValue::Bool(*self)
    }

    fn from_data(value: &DataValue) -> Option<Self> {
        value.as_bool()
    }
}

impl DataType for i64 {
    fn kind() -> ValueKind {
        ValueKind::Int
    }

    fn to_data(&self) -> DataValue {
        DataValue::Int(*self)
    }

    fn from_data(value: &DataValue) -> Option<Self> {
        value.as_int()
    }
}

impl DataType for i32 {
    fn kind() -> ValueKind {
        ValueKind::Int
    }

    fn to_data(&self) -> DataValue {
        DataValue::Int(i64::from(*self))
    }

    fn from_data(value: &DataValue) -> Option<Self> {
        value.as_int().and_then(|v| i32::try_from(v).ok())
    }
}

impl DataType for f64 {
    fn kind() -> ValueKind {
        ValueKind::Double
    }

    fn to_data(&self) -> DataValue {
        DataValue::Double(*self)
    }

    fn from_data(value: &DataValue) -> Option<Self> {
        value.as_double()
    }
}

impl DataType for String {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn to_data(&self) -> DataValue {
        DataValue::Text(self.clone())
    }

    fn from_data(value: &DataValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl<T: DataType> DataType for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::List
    }

    fn to_data(&self) -> DataValue {
        DataValue::List(self.iter().map(DataType::to_data).collect())
    }

    fn from_data(value: &DataValue) -> Option<Self> {
        value.as_list()?.iter().map(T::from_data).collect()
    }
}

impl DataType for DataValue {
    fn kind() -> ValueKind {
        ValueKind::Dynamic
    }

    fn to_data(&self) -> DataValue {
        self.clone()
    }

    fn from_data(value: &DataValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// Implement [`DataType`] for a fieldless enum, mapping each variant to a
/// stable string id.
///
/// ```rust
/// use dax_types::{data_enum, DataType, DataValue};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Side { Server, Client }
///
/// data_enum!(Side { Server => "server", Client => "client" });
///
/// assert_eq!(Side::Client.to_data(), DataValue::Enum("client".into()));
/// assert_eq!(Side::from_data(&DataValue::Enum("server".into())), Some(Side::Server));
/// ```
#[macro_export]
macro_rules! data_enum {
    ($ty:ident { $($variant:ident => $id:literal),+ $(,)? }) => {
        impl $crate::DataType for $ty {
            fn kind() -> $crate::ValueKind {
                $crate::ValueKind::Enum
            }

            fn to_data(&self) -> $crate::DataValue {
                let id = match self {
                    $($ty::$variant => $id,)+
                };
                $crate::DataValue::Enum(id.to_string())
            }

            fn from_data(value: &$crate::DataValue) -> Option<Self> {
                match value.as_enum()? {
                    $($id => Some($ty::$variant),)+
                    _ => None,
                }
            }
        }
    };
}
