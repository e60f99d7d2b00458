use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, error, warn};

use dax_guard::{AllowAll, GuardDecision, MutationGuard, ProposedMutation};
use dax_processor::{DataProcessor, ProcessorError};
use dax_transaction::{TransactionResult, TransactionStatus};
use dax_types::{Cause, DataHolder, DataType, DataValue, Key, KeyDef, TypeError};
use dax_value::{CacheStats, ErasedValue, ImmutableValue, ImmutableValueCache, MutableValue};

use crate::config::DispatcherConfig;
use crate::error::{DataError, DataResult, RegistryError, RegistryResult};
use crate::registry::ProcessorRegistry;

/// Root cause source used by the cause-less mutation entry points.
pub const UNATTRIBUTED: &str = "dax:unattributed";

/// Single entry point for reading and mutating values.
///
/// The registry lives behind a `RwLock`. Selection takes the read lock and
/// clones the chosen processor out, so no lock is held while processors or
/// the guard run.
pub struct Dispatcher {
    registry: RwLock<ProcessorRegistry>,
    guard: Box<dyn MutationGuard>,
    cache: ImmutableValueCache,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Seal `registry` into a dispatcher that allows every mutation.
    pub fn new(registry: ProcessorRegistry, config: DispatcherConfig) -> Self {
        Self {
            registry: RwLock::new(registry),
            guard: Box::new(AllowAll),
            cache: ImmutableValueCache::new(config.value_cache_capacity),
            config,
        }
    }

    /// Replace the guard consulted before mutations.
    pub fn with_guard(mut self, guard: Box<dyn MutationGuard>) -> Self {
        self.guard = guard;
        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Register a processor after the dispatcher was built.
    ///
    /// Refused unless `allow_late_registration` is set.
    pub fn register_late<P: DataProcessor + 'static>(&self, processor: P) -> RegistryResult<()> {
        if !self.config.allow_late_registration {
            return Err(RegistryError::Sealed {
                processor: processor.name(),
                key: processor.key().id(),
            });
        }
        warn!(
            key = processor.key().id(),
            processor = processor.name(),
            "late processor registration"
        );
        self.registry
            .write()
            .expect("registry lock poisoned")
            .register(processor)
    }

    /// Look up a registered key by id.
    pub fn key(&self, id: &str) -> Option<&'static KeyDef> {
        self.registry.read().expect("registry lock poisoned").key(id)
    }

    /// All registered keys, in registration order.
    pub fn registered_keys(&self) -> Vec<&'static KeyDef> {
        self.registry
            .read()
            .expect("registry lock poisoned")
            .keys()
            .iter()
            .collect()
    }

    fn select(&self, container: &dyn DataHolder, key: &KeyDef) -> Option<Arc<dyn DataProcessor>> {
        let selected = self
            .registry
            .read()
            .expect("registry lock poisoned")
            .select(key, container.container_type());
        if selected.is_none() {
            debug!(
                key = key.id(),
                container_type = container.container_type().name(),
                "no processor"
            );
        }
        selected
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Whether some processor handles `key` on this container.
    ///
    /// A faulting processor is logged and reads as `false` here, the same as
    /// an unsupported container. Use [`Self::try_supports`] to tell the two
    /// apart.
    pub fn supports<V>(&self, container: &dyn DataHolder, key: Key<V>) -> bool {
        let Some(processor) = self.select(container, key.def()) else {
            return false;
        };
        match processor.supports(container) {
            Ok(supported) => supported,
            Err(err) => {
                log_fault(processor.as_ref(), key.id(), &err);
                false
            }
        }
    }

    /// [`Self::supports`] with processor faults reported as errors.
    pub fn try_supports<V>(&self, container: &dyn DataHolder, key: Key<V>) -> DataResult<bool> {
        let Some(processor) = self.select(container, key.def()) else {
            return Ok(false);
        };
        processor
            .supports(container)
            .map_err(|err| DataError::processor(key.id(), processor.name(), err))
    }

    /// Current value of `key`, or `None` if it does not apply.
    pub fn get<V: DataType>(&self, container: &dyn DataHolder, key: Key<V>) -> DataResult<Option<V>> {
        match self.read(container, key.def())? {
            Some((_, raw)) => typed(key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Current value wrapped with the processor's default.
    pub fn get_value<V: DataType>(
        &self,
        container: &dyn DataHolder,
        key: Key<V>,
    ) -> DataResult<Option<MutableValue<V>>> {
        let Some((processor, raw)) = self.read(container, key.def())? else {
            return Ok(None);
        };
        let default = typed(key, &processor.default_value())?;
        Ok(Some(MutableValue::new(key, default, typed(key, &raw)?)))
    }

    /// Current value as a shared, canonical immutable value.
    pub fn get_immutable_value<V: DataType + Eq>(
        &self,
        container: &dyn DataHolder,
        key: Key<V>,
    ) -> DataResult<Option<ImmutableValue<V>>> {
        let Some((processor, raw)) = self.read(container, key.def())? else {
            return Ok(None);
        };
        let default = typed(key, &processor.default_value())?;
        let actual = typed(key, &raw)?;
        Ok(Some(self.cache.cached_of(key, default, actual)))
    }

    /// Every value present on the container, in key registration order.
    pub fn values(&self, container: &dyn DataHolder) -> DataResult<Vec<ErasedValue>> {
        let processors: Vec<Arc<dyn DataProcessor>> = {
            let registry = self.registry.read().expect("registry lock poisoned");
            registry
                .keys()
                .iter()
                .filter_map(|key| registry.select(key, container.container_type()))
                .collect()
        };

        let mut values = Vec::new();
        for processor in processors {
            if let Some(raw) = read_with(processor.as_ref(), container)? {
                values.push(processor.construct_erased(raw));
            }
        }
        Ok(values)
    }

    /// Erased read by key id.
    pub fn get_raw(&self, container: &dyn DataHolder, id: &str) -> DataResult<Option<DataValue>> {
        let key = self
            .key(id)
            .ok_or_else(|| TypeError::UnknownKey(id.to_string()))?;
        Ok(self.read(container, key)?.map(|(_, raw)| raw))
    }

    fn read(
        &self,
        container: &dyn DataHolder,
        key: &KeyDef,
    ) -> DataResult<Option<(Arc<dyn DataProcessor>, DataValue)>> {
        let Some(processor) = self.select(container, key) else {
            return Ok(None);
        };
        let raw = read_with(processor.as_ref(), container)?;
        Ok(raw.map(|raw| (processor, raw)))
    }

    // -----------------------------------------------------------------------
    // Offers
    // -----------------------------------------------------------------------

    /// [`Self::offer_with_cause`] with an unattributed cause.
    pub fn offer<V: DataType>(
        &self,
        container: &mut dyn DataHolder,
        key: Key<V>,
        value: V,
    ) -> TransactionResult {
        self.offer_with_cause(container, key, value, &Cause::of(UNATTRIBUTED))
    }

    /// Offer `value` for `key` on the container.
    ///
    /// - no processor: `NO_DATA`, offered value rejected
    /// - value does not convert to the processor's type: `FAILURE`
    /// - processor does not support the instance: `FAILURE`
    /// - guard denies: `CANCELLED`, processor never invoked
    /// - `set` changed state: `SUCCESS`, prior value replaced if it differed
    /// - `set` changed nothing but the value already held: `SUCCESS`
    /// - `set` changed nothing otherwise: `FAILURE`
    /// - processor fault: `ERROR` with the fault message
    pub fn offer_with_cause<V: DataType>(
        &self,
        container: &mut dyn DataHolder,
        key: Key<V>,
        value: V,
        cause: &Cause,
    ) -> TransactionResult {
        self.offer_data(container, key.def(), value.to_data(), cause)
    }

    /// Offer several values, folding the outcomes into one result.
    ///
    /// Every value is attempted; the merged status is the most severe one.
    pub fn offer_all(
        &self,
        container: &mut dyn DataHolder,
        values: &[ErasedValue],
        cause: &Cause,
    ) -> TransactionResult {
        values
            .iter()
            .fold(TransactionResult::builder(), |builder, value| {
                let result = self.offer_data(container, value.key().def(), value.get().clone(), cause);
                builder.absorb(&result)
            })
            .build()
    }

    /// Erased offer by key id. The value must fit the key's kind.
    pub fn offer_raw(
        &self,
        container: &mut dyn DataHolder,
        id: &str,
        value: DataValue,
        cause: &Cause,
    ) -> DataResult<TransactionResult> {
        let key = self
            .key(id)
            .ok_or_else(|| TypeError::UnknownKey(id.to_string()))?;
        if !key.kind().accepts(value.kind()) {
            return Err(TypeError::KindMismatch {
                key: id.to_string(),
                expected: value.kind(),
                actual: key.kind(),
            }
            .into());
        }
        Ok(self.offer_data(container, key, value, cause))
    }

    fn offer_data(
        &self,
        container: &mut dyn DataHolder,
        key: &'static KeyDef,
        value: DataValue,
        cause: &Cause,
    ) -> TransactionResult {
        let Some(processor) = self.select(&*container, key) else {
            let offered = ImmutableValue::new(Key::new(key), value.clone(), value);
            return TransactionResult::builder()
                .reject(&offered)
                .result(TransactionStatus::NoData)
                .build();
        };
        let offered = processor.construct_erased(value.clone());

        if !processor.accepts(&value) {
            debug!(key = key.id(), processor = processor.name(), "offered value out of range");
            return TransactionResult::fail_result(&offered);
        }

        match processor.supports(&*container) {
            Ok(true) => {}
            Ok(false) => {
                debug!(key = key.id(), processor = processor.name(), "container not supported");
                return TransactionResult::fail_result(&offered);
            }
            Err(err) => return fault(processor.as_ref(), &offered, err),
        }

        if self.config.guards_enabled {
            let mutation = ProposedMutation::offer(&*container, key, value.clone(), cause);
            if let GuardDecision::Deny { reason } = self.guard.can_apply(&mutation) {
                warn!(key = key.id(), cause = %cause, %reason, "offer cancelled by guard");
                return TransactionResult::cancelled(&offered);
            }
        }

        let prior = match processor.get(&*container) {
            Ok(prior) => prior,
            Err(err) => return fault(processor.as_ref(), &offered, err),
        };
        let changed = match processor.set(container, &value) {
            Ok(changed) => changed,
            Err(err) => return fault(processor.as_ref(), &offered, err),
        };

        let result = match (changed, prior) {
            (true, Some(prior)) if prior != value => {
                TransactionResult::success_replace_result(&offered, &processor.construct_erased(prior))
            }
            (true, _) => TransactionResult::success_result(&offered),
            (false, Some(prior)) if prior == value => TransactionResult::success_result(&offered),
            (false, _) => TransactionResult::fail_result(&offered),
        };

        if result.is_successful() {
            debug!(
                key = key.id(),
                processor = processor.name(),
                changed,
                value = ?self.config.log_values.then_some(&value),
                "offer applied"
            );
            if self.config.guards_enabled {
                let mutation = ProposedMutation::offer(&*container, key, value, cause);
                self.guard.notify(&mutation, &result);
            }
        } else {
            debug!(key = key.id(), processor = processor.name(), "offer rejected by processor");
        }
        result
    }

    // -----------------------------------------------------------------------
    // Removals
    // -----------------------------------------------------------------------

    /// [`Self::remove_with_cause`] with an unattributed cause.
    pub fn remove<V>(&self, container: &mut dyn DataHolder, key: Key<V>) -> TransactionResult {
        self.remove_with_cause(container, key, &Cause::of(UNATTRIBUTED))
    }

    /// Remove `key` from the container.
    ///
    /// `NO_DATA` when nothing handles the key here, `CANCELLED` on a guard
    /// veto, `ERROR` on a processor fault, otherwise whatever the processor
    /// reports.
    pub fn remove_with_cause<V>(
        &self,
        container: &mut dyn DataHolder,
        key: Key<V>,
        cause: &Cause,
    ) -> TransactionResult {
        self.remove_data(container, key.def(), cause)
    }

    /// Erased removal by key id.
    pub fn remove_raw(
        &self,
        container: &mut dyn DataHolder,
        id: &str,
        cause: &Cause,
    ) -> DataResult<TransactionResult> {
        let key = self
            .key(id)
            .ok_or_else(|| TypeError::UnknownKey(id.to_string()))?;
        Ok(self.remove_data(container, key, cause))
    }

    fn remove_data(
        &self,
        container: &mut dyn DataHolder,
        key: &'static KeyDef,
        cause: &Cause,
    ) -> TransactionResult {
        let Some(processor) = self.select(&*container, key) else {
            return TransactionResult::fail_no_data();
        };

        match processor.supports(&*container) {
            Ok(true) => {}
            Ok(false) => return TransactionResult::fail_no_data(),
            Err(err) => return removal_fault(processor.as_ref(), err),
        }

        if self.config.guards_enabled {
            let mutation = ProposedMutation::remove(&*container, key, cause);
            if let GuardDecision::Deny { reason } = self.guard.can_apply(&mutation) {
                warn!(key = key.id(), cause = %cause, %reason, "removal cancelled by guard");
                return TransactionResult::builder()
                    .result(TransactionStatus::Cancelled)
                    .build();
            }
        }

        let result = match processor.remove(container) {
            Ok(result) => result,
            Err(err) => return removal_fault(processor.as_ref(), err),
        };

        debug!(key = key.id(), processor = processor.name(), status = %result.status(), "removal");
        if result.is_successful() && self.config.guards_enabled {
            let mutation = ProposedMutation::remove(&*container, key, cause);
            self.guard.notify(&mutation, &result);
        }
        result
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &*self.registry.read().expect("registry lock poisoned"))
            .field("guard", &self.guard.name())
            .field("config", &self.config)
            .finish()
    }
}

fn read_with(processor: &dyn DataProcessor, container: &dyn DataHolder) -> DataResult<Option<DataValue>> {
    let key = processor.key().id();
    let supported = processor
        .supports(container)
        .map_err(|err| DataError::processor(key, processor.name(), err))?;
    if !supported {
        return Ok(None);
    }
    processor
        .get(container)
        .map_err(|err| DataError::processor(key, processor.name(), err))
}

fn typed<V: DataType>(key: Key<V>, raw: &DataValue) -> DataResult<V> {
    V::from_data(raw).ok_or_else(|| {
        TypeError::KindMismatch {
            key: key.id().to_string(),
            expected: V::kind(),
            actual: raw.kind(),
        }
        .into()
    })
}

fn log_fault(processor: &dyn DataProcessor, key: &str, err: &ProcessorError) {
    error!(key, processor = processor.name(), error = %err, "processor fault");
}

fn fault(processor: &dyn DataProcessor, offered: &ErasedValue, err: ProcessorError) -> TransactionResult {
    log_fault(processor, offered.key_id(), &err);
    TransactionResult::error_result(offered, err.to_string())
}

fn removal_fault(processor: &dyn DataProcessor, err: ProcessorError) -> TransactionResult {
    log_fault(processor, processor.key().id(), &err);
    TransactionResult::builder()
        .fault(err.to_string())
        .result(TransactionStatus::Error)
        .build()
}
