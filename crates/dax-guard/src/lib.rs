//! Pre-mutation guard hook for DAX.
//!
//! Every offer and removal is shown to the configured [`MutationGuard`]
//! before it reaches a processor. A guard may veto the change, in which
//! case the dispatcher reports `CANCELLED` and the container is untouched.
//! After a successful mutation the guard is notified; notification cannot
//! veto.
//!
//! # Re-entrancy
//!
//! Guards run synchronously on the caller's thread. A guard must not offer
//! or remove values on the same (container, key) it is deciding on; the
//! dispatcher does not detect this.
//!
//! # Composition
//!
//! [`GuardChain`] evaluates an ordered list of guards fail-fast and is
//! itself a guard. [`AllowAll`] is the no-op guard and [`FnGuard`] adapts a
//! closure.

pub mod chain;
pub mod error;
pub mod guard;

pub use chain::GuardChain;
pub use error::{GuardError, GuardResult};
pub use guard::{AllowAll, FnGuard, GuardDecision, MutationGuard, MutationKind, ProposedMutation};
