use crate::lock::traits::Lock;
use tracing::error;

/// Scoped acquisition of a [`Lock`].
///
/// Acquires on construction and releases when dropped, so the lock is
/// released on every exit path, including panics, without relying on the
/// lock's own destructor.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a, L: Lock + ?Sized> {
    lock: &'a L,
}

impl<'a, L: Lock + ?Sized> LockGuard<'a, L> {
    pub fn new(lock: &'a L) -> Self {
        lock.lock();
        LockGuard { lock }
    }
}

impl<L: Lock + ?Sized> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        // The guard acquired the lock on this thread, so a failed unlock
        // cannot happen in correct use; report rather than panic in drop.
        if let Err(e) = self.lock.unlock() {
            error!("lock guard failed to release: {e}");
        }
    }
}
