use crate::error::Result;
use crate::lock::mutex::Mutex;
use crate::lock::traits::Condition;
use crate::time::TimeUnit;
use parking_lot::Condvar;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// A [`Condition`] bound to one [`ReentrantLock`] at creation time.
///
/// The wait set is this condition's own condvar; it is only touched while
/// the bound lock's internal state mutex is held.
///
/// [`ReentrantLock`]: crate::lock::ReentrantLock
pub struct LockCondition {
    mutex: Arc<Mutex>,
    waiters: Condvar,
}

impl LockCondition {
    pub(crate) fn new(mutex: Arc<Mutex>) -> Self {
        LockCondition {
            mutex,
            waiters: Condvar::new(),
        }
    }
}

impl Condition for LockCondition {
    fn wait(&self) -> Result<()> {
        self.mutex.wait_released(&self.waiters, None)?;
        Ok(())
    }

    fn wait_for(&self, duration: u64, unit: TimeUnit) -> Result<bool> {
        let nanos = TimeUnit::Nanoseconds.convert(duration, unit);
        let signaled = match Instant::now().checked_add(Duration::from_nanos(nanos)) {
            Some(deadline) => self.mutex.wait_released(&self.waiters, Some(deadline))?,
            None => self.mutex.wait_released(&self.waiters, None)?,
        };
        if !signaled {
            debug!(duration, unit = %unit, "condition wait timed out");
        }
        Ok(signaled)
    }

    fn wait_nanos(&self, nanos: u64) -> Result<i64> {
        let started = Instant::now();
        match started.checked_add(Duration::from_nanos(nanos)) {
            Some(deadline) => {
                self.mutex.wait_released(&self.waiters, Some(deadline))?;
            }
            None => {
                self.mutex.wait_released(&self.waiters, None)?;
            }
        }
        let elapsed = started.elapsed().as_nanos() as i128;
        let remaining = nanos as i128 - elapsed;
        Ok(remaining.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    fn signal(&self) -> Result<()> {
        self.mutex.notify_waiters(&self.waiters, false)
    }

    fn signal_all(&self) -> Result<()> {
        self.mutex.notify_waiters(&self.waiters, true)
    }
}
