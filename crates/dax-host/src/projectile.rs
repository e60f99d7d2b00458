use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dax_types::{DataType, DataValue, ValueKind};

use crate::entity::EntityId;

/// Whatever launched a projectile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileSource {
    #[default]
    Unknown,
    /// An entity, such as a player or skeleton.
    Entity(EntityId),
    /// A block, such as a dispenser, at the given position.
    Block { x: i64, y: i64, z: i64 },
}

impl fmt::Display for ProjectileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Entity(id) => write!(f, "entity {id}"),
            Self::Block { x, y, z } => write!(f, "block at {x},{y},{z}"),
        }
    }
}

impl DataType for ProjectileSource {
    fn kind() -> ValueKind {
        ValueKind::Record
    }

    fn to_data(&self) -> DataValue {
        let record = DataValue::record();
        let record = match self {
            Self::Unknown => record.field("kind", DataValue::Enum("unknown".into())),
            Self::Entity(id) => record
                .field("kind", DataValue::Enum("entity".into()))
                .field("entity", id.to_string()),
            Self::Block { x, y, z } => record
                .field("kind", DataValue::Enum("block".into()))
                .field("x", *x)
                .field("y", *y)
                .field("z", *z),
        };
        record.build()
    }

    fn from_data(value: &DataValue) -> Option<Self> {
        match value.field("kind")?.as_enum()? {
            "unknown" => Some(Self::Unknown),
            "entity" => {
                let id = Uuid::parse_str(value.field("entity")?.as_text()?).ok()?;
                Some(Self::Entity(EntityId::from_uuid(id)))
            }
            "block" => Some(Self::Block {
                x: value.field("x")?.as_int()?,
                y: value.field("y")?.as_int()?,
                z: value.field("z")?.as_int()?,
            }),
            _ => None,
        }
    }
}
