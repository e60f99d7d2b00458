use dax_transaction::TransactionResult;
use dax_types::{ContainerType, DataHolder, DataType, DataValue, Key, KeyDef};
use dax_value::{ErasedValue, ImmutableValue, MutableValue};

use crate::error::{ProcessorError, ProcessorResult};

// ---------------------------------------------------------------------------
// ValueProcessor
// ---------------------------------------------------------------------------

/// Typed processor for one key on one container type.
///
/// Processors are stateless strategy objects; per-container state lives in
/// the container (or its extension side-table). A processor declared for a
/// container type must handle every instance of that type and of its
/// subtypes, unless a more specific processor is registered for them.
pub trait ValueProcessor: Send + Sync + 'static {
    /// Concrete Rust type of the containers this processor handles.
    type Container: DataHolder;
    /// Type of the values under [`Self::key`].
    type Value: DataType;

    fn key(&self) -> Key<Self::Value>;

    /// The declared container type, used for selection.
    fn container_type(&self) -> &'static ContainerType;

    /// The value reported as default by constructed value wrappers.
    fn default_value(&self) -> Self::Value;

    /// Structural check beyond the container type, e.g. "the entity is in
    /// the state this key needs".
    fn supports(&self, _container: &Self::Container) -> bool {
        true
    }

    fn get(&self, container: &Self::Container) -> ProcessorResult<Option<Self::Value>>;

    /// Apply `value`. Returns `true` iff the observable state changed.
    fn set(&self, container: &mut Self::Container, value: Self::Value) -> ProcessorResult<bool>;

    /// Remove the value. Keys without an unset concept keep this default.
    fn remove(&self, _container: &mut Self::Container) -> ProcessorResult<TransactionResult> {
        Ok(TransactionResult::fail_no_data())
    }

    fn construct_value(&self, actual: Self::Value) -> MutableValue<Self::Value> {
        MutableValue::new(self.key(), self.default_value(), actual)
    }

    fn construct_immutable_value(&self, actual: Self::Value) -> ImmutableValue<Self::Value> {
        ImmutableValue::new(self.key(), self.default_value(), actual)
    }
}

// ---------------------------------------------------------------------------
// DataProcessor
// ---------------------------------------------------------------------------

/// Object-safe, erased processor as stored by the registry.
pub trait DataProcessor: Send + Sync {
    fn key(&self) -> &'static KeyDef;

    fn container_type(&self) -> &'static ContainerType;

    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// `Ok(false)` if the container is not handled; `Err` if it claims to be
    /// handled but cannot be interpreted.
    fn supports(&self, container: &dyn DataHolder) -> ProcessorResult<bool>;

    fn get(&self, container: &dyn DataHolder) -> ProcessorResult<Option<DataValue>>;

    fn set(&self, container: &mut dyn DataHolder, value: &DataValue) -> ProcessorResult<bool>;

    fn remove(&self, container: &mut dyn DataHolder) -> ProcessorResult<TransactionResult>;

    fn default_value(&self) -> DataValue;

    /// Whether `value` converts to this processor's value type. A value of
    /// the right kind can still be out of range, e.g. an `Int` past `i32`.
    fn accepts(&self, value: &DataValue) -> bool;

    /// Immutable value bound to this processor's key and default.
    fn construct_erased(&self, actual: DataValue) -> ErasedValue {
        ImmutableValue::new(Key::new(self.key()), self.default_value(), actual)
    }
}

impl<P: ValueProcessor> DataProcessor for P {
    fn key(&self) -> &'static KeyDef {
        ValueProcessor::key(self).def()
    }

    fn container_type(&self) -> &'static ContainerType {
        ValueProcessor::container_type(self)
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<P>()
    }

    fn supports(&self, container: &dyn DataHolder) -> ProcessorResult<bool> {
        if !ValueProcessor::container_type(self).is_assignable_from(container.container_type()) {
            return Ok(false);
        }
        let typed = downcast_ref(self, container)?;
        Ok(ValueProcessor::supports(self, typed))
    }

    fn get(&self, container: &dyn DataHolder) -> ProcessorResult<Option<DataValue>> {
        let typed = downcast_ref(self, container)?;
        Ok(ValueProcessor::get(self, typed)?.map(|value| value.to_data()))
    }

    fn set(&self, container: &mut dyn DataHolder, value: &DataValue) -> ProcessorResult<bool> {
        let key = ValueProcessor::key(self).id();
        let typed_value = P::Value::from_data(value).ok_or(ProcessorError::ValueMismatch {
            key,
            expected: P::Value::kind(),
            actual: value.kind(),
        })?;
        let typed = downcast_mut(self, container)?;
        ValueProcessor::set(self, typed, typed_value)
    }

    fn remove(&self, container: &mut dyn DataHolder) -> ProcessorResult<TransactionResult> {
        let typed = downcast_mut(self, container)?;
        ValueProcessor::remove(self, typed)
    }

    fn default_value(&self) -> DataValue {
        ValueProcessor::default_value(self).to_data()
    }

    fn accepts(&self, value: &DataValue) -> bool {
        P::Value::from_data(value).is_some()
    }
}

fn mismatch<P: ValueProcessor>(processor: &P, found: &'static ContainerType) -> ProcessorError {
    ProcessorError::ContainerMismatch {
        key: ValueProcessor::key(processor).id(),
        expected: std::any::type_name::<P::Container>(),
        found: found.name(),
    }
}

fn downcast_ref<'a, P: ValueProcessor>(
    processor: &P,
    container: &'a dyn DataHolder,
) -> ProcessorResult<&'a P::Container> {
    let found = container.container_type();
    container
        .as_any()
        .downcast_ref::<P::Container>()
        .ok_or_else(|| mismatch(processor, found))
}

fn downcast_mut<'a, P: ValueProcessor>(
    processor: &P,
    container: &'a mut dyn DataHolder,
) -> ProcessorResult<&'a mut P::Container> {
    let found = container.container_type();
    container
        .as_any_mut()
        .downcast_mut::<P::Container>()
        .ok_or_else(|| mismatch(processor, found))
}
