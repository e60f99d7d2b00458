use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome category of a mutation attempt.
///
/// Declaration order is severity order: when results are merged, the more
/// severe status wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// The container now holds the offered values.
    Success,
    /// Nothing applicable: no processor for the key/container, or nothing to
    /// remove.
    NoData,
    /// A processor precondition rejected the change.
    Failure,
    /// A processor fault; the container may not have been changed.
    Error,
    /// The guard hook vetoed the change before it reached the processor.
    Cancelled,
}

impl TransactionStatus {
    /// Returns `true` only for [`Self::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The more severe of two statuses.
    pub fn max_severity(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::NoData => write!(f, "NO_DATA"),
            Self::Failure => write!(f, "FAILURE"),
            Self::Error => write!(f, "ERROR"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_success_is_success() {
        assert!(TransactionStatus::Success.is_success());
        assert!(!TransactionStatus::NoData.is_success());
        assert!(!TransactionStatus::Failure.is_success());
        assert!(!TransactionStatus::Error.is_success());
        assert!(!TransactionStatus::Cancelled.is_success());
    }

    #[test]
    fn severity_order() {
        use TransactionStatus::*;
        assert_eq!(Success.max_severity(NoData), NoData);
        assert_eq!(Failure.max_severity(NoData), Failure);
        assert_eq!(Error.max_severity(Failure), Error);
        assert_eq!(Error.max_severity(Cancelled), Cancelled);
    }

    #[test]
    fn display_and_serde_agree() {
        for status in [
            TransactionStatus::Success,
            TransactionStatus::NoData,
            TransactionStatus::Failure,
            TransactionStatus::Error,
            TransactionStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
            let parsed: TransactionStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
    }
}
