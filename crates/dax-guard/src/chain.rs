use std::fmt;

use tracing::debug;

use dax_transaction::TransactionResult;

use crate::error::{GuardError, GuardResult};
use crate::guard::{GuardDecision, MutationGuard, ProposedMutation};

/// Ordered list of guards evaluated fail-fast.
///
/// The first guard that denies stops evaluation; its reason is reported
/// prefixed with the guard's name. Notifications go to every guard in
/// order. An empty chain allows everything.
#[derive(Default)]
pub struct GuardChain {
    guards: Vec<Box<dyn MutationGuard>>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a guard. Names must be unique within the chain.
    pub fn add(&mut self, guard: Box<dyn MutationGuard>) -> GuardResult<()> {
        if self.contains(guard.name()) {
            return Err(GuardError::Duplicate(guard.name().to_string()));
        }
        self.guards.push(guard);
        Ok(())
    }

    /// Builder-style [`Self::add`].
    pub fn with(mut self, guard: Box<dyn MutationGuard>) -> GuardResult<Self> {
        self.add(guard)?;
        Ok(self)
    }

    /// Remove and return the guard called `name`.
    pub fn remove(&mut self, name: &str) -> GuardResult<Box<dyn MutationGuard>> {
        let index = self
            .guards
            .iter()
            .position(|guard| guard.name() == name)
            .ok_or_else(|| GuardError::Unknown(name.to_string()))?;
        Ok(self.guards.remove(index))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.guards.iter().any(|guard| guard.name() == name)
    }

    /// Guard names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.guards.iter().map(|guard| guard.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl MutationGuard for GuardChain {
    fn name(&self) -> &str {
        "guard-chain"
    }

    fn can_apply(&self, mutation: &ProposedMutation<'_>) -> GuardDecision {
        for guard in &self.guards {
            if let GuardDecision::Deny { reason } = guard.can_apply(mutation) {
                debug!(guard = guard.name(), key = mutation.key.id(), %reason, "guard denied mutation");
                return GuardDecision::deny(format!("{}: {reason}", guard.name()));
            }
        }
        GuardDecision::Allow
    }

    fn notify(&self, mutation: &ProposedMutation<'_>, result: &TransactionResult) {
        for guard in &self.guards {
            guard.notify(mutation, result);
        }
    }
}

impl fmt::Debug for GuardChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardChain")
            .field("guards", &self.names())
            .finish()
    }
}
