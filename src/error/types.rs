use thiserror::Error;

/// Usage errors raised by the locking primitives.
///
/// Every variant is a programmer-misuse failure. Timeouts are never reported
/// through this type: timed acquisition and timed waits return `bool` (or a
/// remaining-nanoseconds count) so callers can branch on them in normal
/// control flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelockError {
    #[error("cannot unlock: lock is not owned by the current thread")]
    UnlockNotOwner,

    #[error("cannot {operation}: the bound lock is not held by the current thread")]
    ConditionNotOwner { operation: &'static str },

    #[error("the read view of a read-write lock does not support conditions")]
    ConditionUnsupported,

    #[error("cannot unlock read view: no readers currently hold the lock")]
    NoActiveReaders,
}

impl RelockError {
    pub fn condition_not_owner(operation: &'static str) -> Self {
        RelockError::ConditionNotOwner { operation }
    }
}

pub type Result<T> = std::result::Result<T, RelockError>;
