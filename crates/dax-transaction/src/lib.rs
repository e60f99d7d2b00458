//! Transaction results for DAX.
//!
//! Every mutation through the dispatcher reports a [`TransactionResult`]:
//! the values that were applied, the values they replaced, the values that
//! were rejected, and a [`TransactionStatus`]. Results are built once through
//! a [`TransactionBuilder`] and are immutable afterwards.
//!
//! Callers must match the status exhaustively; only
//! [`TransactionStatus::Success`] means the container changed as requested.

pub mod result;
pub mod status;

pub use result::{TransactionBuilder, TransactionResult};
pub use status::TransactionStatus;
