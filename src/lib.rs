//! Reentrant locking library with lock-bound condition variables and
//! saturating time-unit conversion

pub mod error;
pub mod lock;
pub mod time;

pub use error::{RelockError, Result};
pub use lock::{Condition, Lock, LockGuard, Mutex, ReadWriteLock, ReentrantLock};
pub use time::TimeUnit;
