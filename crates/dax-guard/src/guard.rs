use std::fmt;

use serde::{Deserialize, Serialize};

use dax_transaction::TransactionResult;
use dax_types::{Cause, ContainerType, DataHolder, DataValue, KeyDef};

// ---------------------------------------------------------------------------
// ProposedMutation
// ---------------------------------------------------------------------------

/// The change being proposed.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationKind {
    /// Apply a new value.
    Offer(DataValue),
    /// Remove the current value.
    Remove,
}

/// Everything a guard sees about a pending change.
pub struct ProposedMutation<'a> {
    pub container: &'a dyn DataHolder,
    pub key: &'static KeyDef,
    pub change: MutationKind,
    pub cause: &'a Cause,
}

impl<'a> ProposedMutation<'a> {
    pub fn offer(
        container: &'a dyn DataHolder,
        key: &'static KeyDef,
        value: DataValue,
        cause: &'a Cause,
    ) -> Self {
        Self {
            container,
            key,
            change: MutationKind::Offer(value),
            cause,
        }
    }

    pub fn remove(container: &'a dyn DataHolder, key: &'static KeyDef, cause: &'a Cause) -> Self {
        Self {
            container,
            key,
            change: MutationKind::Remove,
            cause,
        }
    }

    pub fn container_type(&self) -> &'static ContainerType {
        self.container.container_type()
    }

    /// The offered value, or `None` for a removal.
    pub fn offered(&self) -> Option<&DataValue> {
        match &self.change {
            MutationKind::Offer(value) => Some(value),
            MutationKind::Remove => None,
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(self.change, MutationKind::Remove)
    }
}

impl fmt::Debug for ProposedMutation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProposedMutation")
            .field("container", &self.container.container_type())
            .field("key", &self.key.id())
            .field("change", &self.change)
            .field("cause", &self.cause.short_id())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// GuardDecision
// ---------------------------------------------------------------------------

/// A guard's verdict on a proposed mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardDecision {
    Allow,
    Deny { reason: String },
}

impl GuardDecision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Deny { reason } => Some(reason),
        }
    }
}

// ---------------------------------------------------------------------------
// MutationGuard
// ---------------------------------------------------------------------------

/// Observer with veto power over every offer and removal.
///
/// Guards run synchronously on the mutating thread and must not re-enter
/// the dispatcher for the container and key they are deciding on.
pub trait MutationGuard: Send + Sync {
    /// Name used in logs and for chain membership.
    fn name(&self) -> &str;

    /// Decide whether the mutation may proceed. Called before the processor
    /// is touched.
    fn can_apply(&self, mutation: &ProposedMutation<'_>) -> GuardDecision;

    /// Called after a mutation reported `SUCCESS`.
    fn notify(&self, _mutation: &ProposedMutation<'_>, _result: &TransactionResult) {}
}

/// Guard that allows everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl MutationGuard for AllowAll {
    fn name(&self) -> &str {
        "allow-all"
    }

    fn can_apply(&self, _mutation: &ProposedMutation<'_>) -> GuardDecision {
        GuardDecision::Allow
    }
}

/// Guard backed by a closure.
pub struct FnGuard<F> {
    name: String,
    decide: F,
}

impl<F> FnGuard<F>
where
    F: Fn(&ProposedMutation<'_>) -> GuardDecision + Send + Sync,
{
    pub fn new(name: impl Into<String>, decide: F) -> Self {
        Self {
            name: name.into(),
            decide,
        }
    }
}

impl<F> MutationGuard for FnGuard<F>
where
    F: Fn(&ProposedMutation<'_>) -> GuardDecision + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn can_apply(&self, mutation: &ProposedMutation<'_>) -> GuardDecision {
        (self.decide)(mutation)
    }
}

impl<F> fmt::Debug for FnGuard<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGuard").field("name", &self.name).finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::any::Any;

    use dax_types::{container_type, ValueKind};

    use super::*;

    container_type!(pub(crate) static CREEPER = "creeper");

    pub(crate) static FUSE: KeyDef = KeyDef::new("dax:fuse_duration", "Fuse Duration", ValueKind::Int);

    pub(crate) struct Creeper;

    impl DataHolder for Creeper {
        fn container_type(&self) -> &'static ContainerType {
            &CREEPER
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn allow_all_allows() {
        let cause = Cause::of("test");
        let mutation = ProposedMutation::remove(&Creeper, &FUSE, &cause);
        assert!(AllowAll.can_apply(&mutation).is_allow());
    }

    #[test]
    fn fn_guard_sees_offered_value() {
        let guard = FnGuard::new("short-fuse", |m: &ProposedMutation<'_>| {
            match m.offered().and_then(DataValue::as_int) {
                Some(ticks) if ticks < 10 => GuardDecision::deny("fuse too short"),
                _ => GuardDecision::Allow,
            }
        });
        let cause = Cause::of("test");

        let short = ProposedMutation::offer(&Creeper, &FUSE, DataValue::Int(5), &cause);
        assert_eq!(guard.can_apply(&short).reason(), Some("fuse too short"));

        let long = ProposedMutation::offer(&Creeper, &FUSE, DataValue::Int(40), &cause);
        assert!(guard.can_apply(&long).is_allow());

        let removal = ProposedMutation::remove(&Creeper, &FUSE, &cause);
        assert!(removal.is_removal());
        assert!(guard.can_apply(&removal).is_allow());
        assert_eq!(guard.name(), "short-fuse");
    }

    #[test]
    fn mutation_reports_container_type() {
        let cause = Cause::of("test");
        let mutation = ProposedMutation::remove(&Creeper, &FUSE, &cause);
        assert_eq!(mutation.container_type(), &CREEPER);
        let debug = format!("{mutation:?}");
        assert!(debug.contains("dax:fuse_duration"));
    }

    #[test]
    fn decision_serializes() {
        let json = serde_json::to_string(&GuardDecision::deny("no")).unwrap();
        assert_eq!(json, r#"{"Deny":{"reason":"no"}}"#);
    }
}
