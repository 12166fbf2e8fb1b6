use crate::error::{RelockError, Result};
use crate::lock::reentrant::deadline_after;
use crate::lock::traits::{Condition, Lock};
use crate::time::TimeUnit;
use parking_lot::{Condvar, Mutex as StateMutex};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};
use tracing::trace;

/// Shared reader/writer state.
///
/// Invariant: `writer` present implies `readers == 0`, and vice versa;
/// `writer_depth` is non-zero if and only if `writer` is present.
#[derive(Debug, Default)]
struct RwState {
    readers: u64,
    writer: Option<ThreadId>,
    writer_depth: u64,
}

#[derive(Debug, Default)]
struct RwInner {
    state: StateMutex<RwState>,
    available: Condvar,
}

impl RwInner {
    fn lock_read(&self) {
        let mut state = self.state.lock();
        while state.writer.is_some() {
            self.available.wait(&mut state);
        }
        state.readers += 1;
    }

    fn try_lock_read(&self, deadline: Option<Instant>) -> bool {
        let mut state = self.state.lock();
        while state.writer.is_some() {
            let Some(deadline) = deadline else {
                return false;
            };
            if self.available.wait_until(&mut state, deadline).timed_out()
                && state.writer.is_some()
            {
                return false;
            }
        }
        state.readers += 1;
        true
    }

    fn unlock_read(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.readers == 0 {
            return Err(RelockError::NoActiveReaders);
        }
        state.readers -= 1;
        if state.readers == 0 {
            self.available.notify_all();
        }
        Ok(())
    }

    fn lock_write(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock();
        if state.writer == Some(me) {
            state.writer_depth += 1;
            return;
        }
        while state.readers > 0 || state.writer.is_some() {
            self.available.wait(&mut state);
        }
        state.writer = Some(me);
        state.writer_depth = 1;
        trace!(writer = ?me, "write lock acquired");
    }

    fn try_lock_write(&self, deadline: Option<Instant>) -> bool {
        let me = thread::current().id();
        let mut state = self.state.lock();
        loop {
            if state.writer == Some(me) {
                state.writer_depth += 1;
                return true;
            }
            if state.readers == 0 && state.writer.is_none() {
                state.writer = Some(me);
                state.writer_depth = 1;
                return true;
            }
            let Some(deadline) = deadline else {
                return false;
            };
            if self.available.wait_until(&mut state, deadline).timed_out() {
                // Exclusivity may have opened up right at the deadline.
                if state.readers == 0 && state.writer.is_none() {
                    state.writer = Some(me);
                    state.writer_depth = 1;
                    return true;
                }
                return false;
            }
        }
    }

    fn unlock_write(&self) -> Result<()> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        if state.writer != Some(me) {
            return Err(RelockError::UnlockNotOwner);
        }
        state.writer_depth -= 1;
        if state.writer_depth == 0 {
            state.writer = None;
            self.available.notify_all();
            trace!(writer = ?me, "write lock released");
        }
        Ok(())
    }

    /// Condition support for the write view: release the write lock
    /// completely, wait on `cv`, re-acquire exclusivity at the saved depth.
    fn wait_write_released(&self, cv: &Condvar, deadline: Option<Instant>) -> Result<bool> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        if state.writer != Some(me) {
            return Err(RelockError::condition_not_owner("wait"));
        }
        let depth = state.writer_depth;
        state.writer = None;
        state.writer_depth = 0;
        self.available.notify_all();

        let signaled = match deadline {
            None => {
                cv.wait(&mut state);
                true
            }
            Some(deadline) => !cv.wait_until(&mut state, deadline).timed_out(),
        };

        while state.readers > 0 || state.writer.is_some() {
            self.available.wait(&mut state);
        }
        state.writer = Some(me);
        state.writer_depth = depth;
        Ok(signaled)
    }

    fn notify_write_waiters(&self, cv: &Condvar, all: bool) -> Result<()> {
        let state = self.state.lock();
        if state.writer != Some(thread::current().id()) {
            return Err(RelockError::condition_not_owner("signal"));
        }
        if all {
            cv.notify_all();
        } else {
            cv.notify_one();
        }
        Ok(())
    }
}

/// A pair of [`Lock`] views over one shared state: any number of concurrent
/// readers, or one exclusive (re-entrant) writer, never both.
#[derive(Debug, Default)]
pub struct ReadWriteLock {
    inner: Arc<RwInner>,
}

impl ReadWriteLock {
    pub fn new() -> Self {
        ReadWriteLock::default()
    }

    /// The lock view used for reading.
    pub fn read_lock(&self) -> ReadLock {
        ReadLock {
            inner: Arc::clone(&self.inner),
        }
    }

    /// The lock view used for writing.
    pub fn write_lock(&self) -> WriteLock {
        WriteLock {
            inner: Arc::clone(&self.inner),
        }
    }

    /// The number of read acquisitions currently outstanding.
    pub fn reader_count(&self) -> u64 {
        self.inner.state.lock().readers
    }

    /// Whether a writer currently holds exclusive access.
    pub fn is_write_locked(&self) -> bool {
        self.inner.state.lock().writer.is_some()
    }
}

/// The shared-access view of a [`ReadWriteLock`].
///
/// Acquisition increments the reader count and blocks only while a writer
/// holds exclusive access. Conditions are not supported on this view.
#[derive(Clone)]
pub struct ReadLock {
    inner: Arc<RwInner>,
}

impl Lock for ReadLock {
    fn lock(&self) {
        self.inner.lock_read();
    }

    fn unlock(&self) -> Result<()> {
        self.inner.unlock_read()
    }

    fn try_lock(&self) -> bool {
        self.inner.try_lock_read(None)
    }

    fn try_lock_for(&self, duration: u64, unit: TimeUnit) -> bool {
        if TimeUnit::Nanoseconds.convert(duration, unit) == 0 {
            return self.try_lock();
        }
        match deadline_after(duration, unit) {
            Some(deadline) => self.inner.try_lock_read(Some(deadline)),
            None => {
                self.inner.lock_read();
                true
            }
        }
    }

    fn new_condition(&self) -> Result<Box<dyn Condition>> {
        Err(RelockError::ConditionUnsupported)
    }
}

/// The exclusive view of a [`ReadWriteLock`], re-entrant for its owner.
#[derive(Clone)]
pub struct WriteLock {
    inner: Arc<RwInner>,
}

impl Lock for WriteLock {
    fn lock(&self) {
        self.inner.lock_write();
    }

    fn unlock(&self) -> Result<()> {
        self.inner.unlock_write()
    }

    fn try_lock(&self) -> bool {
        self.inner.try_lock_write(None)
    }

    fn try_lock_for(&self, duration: u64, unit: TimeUnit) -> bool {
        if TimeUnit::Nanoseconds.convert(duration, unit) == 0 {
            return self.try_lock();
        }
        match deadline_after(duration, unit) {
            Some(deadline) => self.inner.try_lock_write(Some(deadline)),
            None => {
                self.inner.lock_write();
                true
            }
        }
    }

    fn new_condition(&self) -> Result<Box<dyn Condition>> {
        Ok(Box::new(WriteCondition {
            inner: Arc::clone(&self.inner),
            waiters: Condvar::new(),
        }))
    }
}

/// A [`Condition`] bound to the write view of a [`ReadWriteLock`].
pub struct WriteCondition {
    inner: Arc<RwInner>,
    waiters: Condvar,
}

impl Condition for WriteCondition {
    fn wait(&self) -> Result<()> {
        self.inner.wait_write_released(&self.waiters, None)?;
        Ok(())
    }

    fn wait_for(&self, duration: u64, unit: TimeUnit) -> Result<bool> {
        let nanos = TimeUnit::Nanoseconds.convert(duration, unit);
        match Instant::now().checked_add(Duration::from_nanos(nanos)) {
            Some(deadline) => self.inner.wait_write_released(&self.waiters, Some(deadline)),
            None => self.inner.wait_write_released(&self.waiters, None),
        }
    }

    fn wait_nanos(&self, nanos: u64) -> Result<i64> {
        let started = Instant::now();
        match started.checked_add(Duration::from_nanos(nanos)) {
            Some(deadline) => {
                self.inner.wait_write_released(&self.waiters, Some(deadline))?;
            }
            None => {
                self.inner.wait_write_released(&self.waiters, None)?;
            }
        }
        let elapsed = started.elapsed().as_nanos() as i128;
        let remaining = nanos as i128 - elapsed;
        Ok(remaining.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    fn signal(&self) -> Result<()> {
        self.inner.notify_write_waiters(&self.waiters, false)
    }

    fn signal_all(&self) -> Result<()> {
        self.inner.notify_write_waiters(&self.waiters, true)
    }
}
