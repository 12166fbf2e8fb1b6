use crate::error::Result;
use crate::lock::LockGuard;
use crate::time::TimeUnit;

/// Exclusive-acquisition capability implemented by [`ReentrantLock`] and the
/// read/write views of [`ReadWriteLock`].
///
/// [`ReentrantLock`]: crate::lock::ReentrantLock
/// [`ReadWriteLock`]: crate::lock::ReadWriteLock
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it is available.
    fn lock(&self);

    /// Release one level of the lock.
    ///
    /// Returns a usage error, with no state change, if the calling thread
    /// does not hold the lock.
    fn unlock(&self) -> Result<()>;

    /// Acquire the lock only if it is available right now.
    ///
    /// Never blocks; returns `true` if the lock was acquired.
    fn try_lock(&self) -> bool;

    /// Acquire the lock, giving up once `duration` (interpreted in `unit`)
    /// has elapsed.
    ///
    /// A zero duration never blocks and is equivalent to [`Lock::try_lock`].
    /// Returns `true` if the lock was acquired before the deadline.
    fn try_lock_for(&self, duration: u64, unit: TimeUnit) -> bool;

    /// Create a new [`Condition`] bound to this lock instance.
    ///
    /// Any number of conditions may be bound to the same lock. Before waiting
    /// on the condition the lock must be held by the calling thread; waiting
    /// atomically releases the lock and re-acquires it before returning.
    fn new_condition(&self) -> Result<Box<dyn Condition>>;

    /// Acquire the lock for the current scope, releasing it on every exit
    /// path when the guard drops.
    fn guard(&self) -> LockGuard<'_, Self>
    where
        Self: Sized,
    {
        LockGuard::new(self)
    }
}

/// Wait/notify capability bound to exactly one [`Lock`] instance.
///
/// Every operation requires the calling thread to hold the bound lock;
/// violating that is a usage error, reported distinctly from a timeout.
pub trait Condition: Send + Sync {
    /// Block until signaled, releasing the bound lock completely while
    /// waiting and re-acquiring it (at the same recursion depth) before
    /// returning.
    fn wait(&self) -> Result<()>;

    /// As [`Condition::wait`], but give up once `duration` (interpreted in
    /// `unit`) has elapsed.
    ///
    /// Returns `true` if the wait ended due to a signal and `false` on
    /// timeout; the lock is re-acquired before returning in either case.
    fn wait_for(&self, duration: u64, unit: TimeUnit) -> Result<bool>;

    /// As [`Condition::wait`], bounded by `nanos` nanoseconds.
    ///
    /// Returns an estimate of the time remaining; a value less than or equal
    /// to zero means the full wait elapsed. A positive value may be passed to
    /// a subsequent call to finish waiting out an overall deadline, which
    /// makes waiting loops safe against spurious wakeups.
    fn wait_nanos(&self, nanos: u64) -> Result<i64>;

    /// Wake one waiting thread, chosen arbitrarily.
    ///
    /// The woken thread must re-acquire the lock before returning from its
    /// wait; there is no reserved hand-off. Never blocks.
    fn signal(&self) -> Result<()>;

    /// Wake all waiting threads. Never blocks.
    fn signal_all(&self) -> Result<()>;
}
