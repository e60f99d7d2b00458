use std::fmt;

use tracing::info;

use dax_guard::MutationGuard;
use dax_processor::DataProcessor;
use dax_registry::{Dispatcher, ProcessorRegistry};

use crate::config::DaxConfig;
use crate::error::SdkResult;
use crate::logging::init_logging;

/// A configured dispatcher, ready for use.
pub struct DataLayer {
    config: DaxConfig,
    dispatcher: Dispatcher,
}

impl DataLayer {
    /// Build a layer from `config` with the default guard.
    pub fn new(config: DaxConfig) -> SdkResult<Self> {
        Self::builder(config)?.build()
    }

    /// Load a TOML config file, install logging at its level, and build.
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> SdkResult<Self> {
        let config = DaxConfig::load(path)?;
        init_logging(&config.log_level);
        Self::new(config)
    }

    /// Start a builder for registering extra processors or a guard.
    ///
    /// Built-ins, if enabled, are registered first.
    pub fn builder(config: DaxConfig) -> SdkResult<DataLayerBuilder> {
        config.validate()?;
        let mut registry = ProcessorRegistry::new();
        if config.register_builtins {
            dax_host::register_builtins(&mut registry)?;
        }
        Ok(DataLayerBuilder {
            config,
            registry,
            guard: None,
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &DaxConfig {
        &self.config
    }

    pub fn into_dispatcher(self) -> Dispatcher {
        self.dispatcher
    }
}

impl fmt::Debug for DataLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataLayer")
            .field("config", &self.config)
            .field("keys", &self.dispatcher.registered_keys().len())
            .finish()
    }
}

/// Collects processors and a guard before sealing the dispatcher.
pub struct DataLayerBuilder {
    config: DaxConfig,
    registry: ProcessorRegistry,
    guard: Option<Box<dyn MutationGuard>>,
}

impl DataLayerBuilder {
    pub fn processor<P: DataProcessor + 'static>(mut self, processor: P) -> SdkResult<Self> {
        self.registry.register(processor)?;
        Ok(self)
    }

    /// Guard consulted before every mutation. Replaces any previous one.
    pub fn guard(mut self, guard: impl MutationGuard + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    pub fn build(self) -> SdkResult<DataLayer> {
        info!(
            processors = self.registry.processor_count(),
            keys = self.registry.keys().len(),
            guards_enabled = self.config.dispatcher.guards_enabled,
            "data layer ready"
        );
        let mut dispatcher = Dispatcher::new(self.registry, self.config.dispatcher.clone());
        if let Some(guard) = self.guard {
            dispatcher = dispatcher.with_guard(guard);
        }
        Ok(DataLayer {
            config: self.config,
            dispatcher,
        })
    }
}

#[cfg(test)]
mod tests {
    use dax_guard::{FnGuard, GuardDecision, ProposedMutation};
    use dax_host::{keys, Entity, EntityKind};
    use dax_processor::{ProcessorError, ProcessorResult, ValueProcessor};
    use dax_registry::RegistryError;
    use dax_transaction::TransactionStatus;
    use dax_types::{ContainerType, Key, KeyDef, ValueKind};

    use super::*;
    use crate::error::{ConfigError, SdkError};

    static POWERED_DEF: KeyDef = KeyDef::new("test:powered", "Powered", ValueKind::Bool);
    static POWERED: Key<bool> = Key::new(&POWERED_DEF);

    struct PoweredProcessor;

    impl ValueProcessor for PoweredProcessor {
        type Container = Entity;
        type Value = bool;

        fn key(&self) -> Key<bool> {
            POWERED
        }

        fn container_type(&self) -> &'static ContainerType {
            &dax_host::types::CREEPER
        }

        fn default_value(&self) -> bool {
            false
        }

        fn get(&self, entity: &Entity) -> ProcessorResult<Option<bool>> {
            match entity.kind() {
                EntityKind::Creeper(creeper) => Ok(Some(creeper.powered)),
                _ => Err(ProcessorError::internal(POWERED.id(), "not a creeper")),
            }
        }

        fn set(&self, entity: &mut Entity, value: bool) -> ProcessorResult<bool> {
            match entity.kind_mut() {
                EntityKind::Creeper(creeper) if creeper.powered != value => {
                    creeper.powered = value;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    // -----------------------------------------------------------------------
    // 1. Bootstrap
    // -----------------------------------------------------------------------

    #[test]
    fn default_layer_has_builtins() {
        let layer = DataLayer::new(DaxConfig::default()).unwrap();
        assert_eq!(layer.dispatcher().registered_keys().len(), keys::all().len());

        let mut creeper = Entity::creeper();
        let result = layer.dispatcher().offer(&mut creeper, keys::FUSE_DURATION, 45);
        assert!(result.is_successful());
        assert_eq!(layer.dispatcher().get(&creeper, keys::FUSE_DURATION).unwrap(), Some(45));
    }

    #[test]
    fn builtins_can_be_disabled() {
        let config = DaxConfig {
            register_builtins: false,
            ..Default::default()
        };
        let layer = DataLayer::new(config).unwrap();
        assert!(layer.dispatcher().registered_keys().is_empty());

        let mut creeper = Entity::creeper();
        let result = layer.dispatcher().offer(&mut creeper, keys::FUSE_DURATION, 45);
        assert_eq!(result.status(), TransactionStatus::NoData);
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = DaxConfig {
            log_level: "dax=loud".into(),
            ..Default::default()
        };
        let err = DataLayer::new(config).unwrap_err();
        assert!(matches!(err, SdkError::Config(ConfigError::LogLevel { .. })));
    }

    // -----------------------------------------------------------------------
    // 2. Builder
    // -----------------------------------------------------------------------

    #[test]
    fn extra_processor_is_served() {
        let layer = DataLayer::builder(DaxConfig::default())
            .and_then(|builder| builder.processor(PoweredProcessor))
            .and_then(DataLayerBuilder::build)
            .unwrap();

        let mut creeper = Entity::creeper();
        assert!(layer.dispatcher().offer(&mut creeper, POWERED, true).is_successful());
        assert_eq!(layer.dispatcher().get(&creeper, POWERED).unwrap(), Some(true));
        assert!(!layer.dispatcher().supports(&Entity::primed_tnt(), POWERED));
    }

    #[test]
    fn conflicting_key_is_a_registry_error() {
        static CLASH_DEF: KeyDef = KeyDef::new("dax:vanish", "Clash", ValueKind::Bool);
        static CLASH: Key<bool> = Key::new(&CLASH_DEF);

        struct Clash;

        impl ValueProcessor for Clash {
            type Container = Entity;
            type Value = bool;

            fn key(&self) -> Key<bool> {
                CLASH
            }

            fn container_type(&self) -> &'static ContainerType {
                &dax_host::types::ENTITY
            }

            fn default_value(&self) -> bool {
                false
            }

            fn get(&self, _entity: &Entity) -> ProcessorResult<Option<bool>> {
                Ok(None)
            }

            fn set(&self, _entity: &mut Entity, _value: bool) -> ProcessorResult<bool> {
                Ok(false)
            }
        }

        let err = DataLayer::builder(DaxConfig::default())
            .and_then(|builder| builder.processor(Clash))
            .err();
        assert!(matches!(err, Some(SdkError::Registry(RegistryError::Key { .. }))));
    }

    #[test]
    fn guard_vetoes_mutations() {
        let layer = DataLayer::builder(DaxConfig::default())
            .unwrap()
            .guard(FnGuard::new("no-priming", |m: &ProposedMutation<'_>| {
                if m.key.id() == keys::TICKS_REMAINING.id() {
                    GuardDecision::deny("priming disabled")
                } else {
                    GuardDecision::Allow
                }
            }))
            .build()
            .unwrap();

        let mut creeper = Entity::creeper();
        let result = layer.dispatcher().offer(&mut creeper, keys::TICKS_REMAINING, 10);
        assert_eq!(result.status(), TransactionStatus::Cancelled);
        assert_eq!(layer.dispatcher().get(&creeper, keys::TICKS_REMAINING).unwrap(), None);
        assert!(layer
            .dispatcher()
            .offer(&mut creeper, keys::FUSE_DURATION, 20)
            .is_successful());
    }

    #[test]
    fn unguarded_config_skips_the_guard() {
        let config = DaxConfig {
            dispatcher: dax_registry::DispatcherConfig::unguarded(),
            ..Default::default()
        };
        let layer = DataLayer::builder(config)
            .unwrap()
            .guard(FnGuard::new("deny-all", |_: &ProposedMutation<'_>| {
                GuardDecision::deny("nope")
            }))
            .build()
            .unwrap();

        let mut creeper = Entity::creeper();
        assert!(layer
            .dispatcher()
            .offer(&mut creeper, keys::TICKS_REMAINING, 10)
            .is_successful());
    }
}
