use crate::error::Result;
use crate::lock::condition::LockCondition;
use crate::lock::mutex::Mutex;
use crate::lock::traits::{Condition, Lock};
use crate::time::TimeUnit;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A [`Lock`] the owning thread may re-acquire without blocking.
///
/// Each nested acquisition increments a recursion counter; the lock becomes
/// free only after the owner has released it the same number of times. Any
/// number of [`Condition`]s may be bound to one lock.
///
/// No fairness is guaranteed among blocked waiters.
#[derive(Debug, Default)]
pub struct ReentrantLock {
    mutex: Arc<Mutex>,
}

impl ReentrantLock {
    pub fn new() -> Self {
        ReentrantLock {
            mutex: Arc::new(Mutex::new()),
        }
    }

    /// Whether any thread currently holds this lock.
    pub fn is_locked(&self) -> bool {
        self.mutex.is_locked()
    }

    /// Whether the calling thread holds this lock.
    pub fn is_held_by_current_thread(&self) -> bool {
        self.mutex.held_by_current_thread()
    }

    /// The current recursion depth (zero when free).
    pub fn hold_count(&self) -> u64 {
        self.mutex.hold_count()
    }
}

/// Compute an absolute deadline from a relative timeout, saturating the unit
/// conversion. `None` means the timeout is unrepresentable as an `Instant`
/// and the caller should wait unbounded.
pub(crate) fn deadline_after(duration: u64, unit: TimeUnit) -> Option<Instant> {
    let nanos = TimeUnit::Nanoseconds.convert(duration, unit);
    Instant::now().checked_add(Duration::from_nanos(nanos))
}

impl Lock for ReentrantLock {
    fn lock(&self) {
        self.mutex.lock();
    }

    fn unlock(&self) -> Result<()> {
        self.mutex.unlock()
    }

    fn try_lock(&self) -> bool {
        self.mutex.try_lock()
    }

    fn try_lock_for(&self, duration: u64, unit: TimeUnit) -> bool {
        if TimeUnit::Nanoseconds.convert(duration, unit) == 0 {
            return self.try_lock();
        }
        match deadline_after(duration, unit) {
            Some(deadline) => self.mutex.try_lock_until(deadline),
            None => {
                self.mutex.lock();
                true
            }
        }
    }

    fn new_condition(&self) -> Result<Box<dyn Condition>> {
        Ok(Box::new(LockCondition::new(Arc::clone(&self.mutex))))
    }
}
