use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use dax_processor::DataProcessor;
use dax_types::{ContainerType, KeyDef, KeyRegistry};

use crate::error::{RegistryError, RegistryResult};

/// Processors indexed by key, in registration order.
///
/// Several processors may be registered for one key, each declared for a
/// different (or even the same) container type. Which one serves a given
/// container is decided by [`ProcessorRegistry::select`].
#[derive(Default)]
pub struct ProcessorRegistry {
    keys: KeyRegistry,
    processors: HashMap<&'static str, Vec<Arc<dyn DataProcessor>>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor, adding its key to the key registry if needed.
    pub fn register<P: DataProcessor + 'static>(&mut self, processor: P) -> RegistryResult<()> {
        self.register_arc(Arc::new(processor))
    }

    /// Register an already shared processor.
    pub fn register_arc(&mut self, processor: Arc<dyn DataProcessor>) -> RegistryResult<()> {
        let key = processor.key();
        self.keys
            .register(key)
            .map_err(|source| RegistryError::Key {
                processor: processor.name(),
                source,
            })?;
        debug!(
            key = key.id(),
            container_type = processor.container_type().name(),
            processor = processor.name(),
            "registered processor"
        );
        self.processors.entry(key.id()).or_default().push(processor);
        Ok(())
    }

    /// Pick the processor for `key` on a container of runtime type
    /// `container_type`.
    ///
    /// Returns `None` if the key is unknown or no processor's declared type
    /// is assignable from `container_type`.
    pub fn select(
        &self,
        key: &KeyDef,
        container_type: &ContainerType,
    ) -> Option<Arc<dyn DataProcessor>> {
        if !self.keys.contains(key) {
            return None;
        }
        let candidates: Vec<&Arc<dyn DataProcessor>> = self
            .processors
            .get(key.id())?
            .iter()
            .filter(|processor| processor.container_type().is_assignable_from(container_type))
            .collect();

        candidates
            .iter()
            .find(|candidate| {
                !candidates.iter().any(|other| {
                    candidate
                        .container_type()
                        .is_proper_supertype_of(other.container_type())
                })
            })
            .map(|winner| Arc::clone(winner))
    }

    /// All processors registered for `key`, in registration order.
    pub fn processors_for(&self, key: &KeyDef) -> &[Arc<dyn DataProcessor>] {
        if !self.keys.contains(key) {
            return &[];
        }
        self.processors
            .get(key.id())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn keys(&self) -> &KeyRegistry {
        &self.keys
    }

    /// Look up a registered key by id.
    pub fn key(&self, id: &str) -> Option<&'static KeyDef> {
        self.keys.get(id)
    }

    /// Total number of registered processors.
    pub fn processor_count(&self) -> usize {
        self.processors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("keys", &self.keys.len())
            .field("processors", &self.processor_count())
            .finish()
    }
}
