use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use dax_types::{DataType, DataValue, ValueKind};

/// A block type with its property values, e.g. `minecraft:grass[snowy=true]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    block: String,
    properties: BTreeMap<String, String>,
}

impl BlockState {
    pub fn new(block: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn air() -> Self {
        Self::new("minecraft:air")
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(property.into(), value.into());
        self
    }

    pub fn block(&self) -> &str {
        &self.block
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.block)?;
        if !self.properties.is_empty() {
            let properties: Vec<String> = self
                .properties
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            write!(f, "[{}]", properties.join(","))?;
        }
        Ok(())
    }
}

impl DataType for BlockState {
    fn kind() -> ValueKind {
        ValueKind::Record
    }

    fn to_data(&self) -> DataValue {
        let properties = self
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), DataValue::Text(value.clone())))
            .collect();
        DataValue::record()
            .field("block", self.block.clone())
            .field("properties", DataValue::Record(properties))
            .build()
    }

    fn from_data(value: &DataValue) -> Option<Self> {
        let block = value.field("block")?.as_text()?.to_string();
        let properties = value
            .field("properties")?
            .as_record()?
            .iter()
            .map(|(name, value)| Some((name.clone(), value.as_text()?.to_string())))
            .collect::<Option<BTreeMap<_, _>>>()?;
        Some(Self { block, properties })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_properties() {
        let grass = BlockState::new("minecraft:grass").with("snowy", "true");
        assert_eq!(grass.to_string(), "minecraft:grass[snowy=true]");
        assert_eq!(BlockState::air().to_string(), "minecraft:air");
    }

    #[test]
    fn record_shape() {
        let log = BlockState::new("minecraft:log").with("axis", "y");
        let data = log.to_data();
        assert_eq!(data.kind(), ValueKind::Record);
        assert_eq!(data.field("block"), Some(&DataValue::Text("minecraft:log".into())));
        assert_eq!(BlockState::from_data(&data), Some(log));
    }

    #[test]
    fn malformed_records_are_refused() {
        let missing_block = DataValue::record().field("properties", DataValue::Record(BTreeMap::new())).build();
        assert_eq!(BlockState::from_data(&missing_block), None);
        assert_eq!(BlockState::from_data(&DataValue::Text("minecraft:air".into())), None);
    }
}
