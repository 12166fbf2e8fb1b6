use crate::error::{RelockError, Result};
use parking_lot::{Condvar, Mutex as StateMutex};
use std::thread::{self, ThreadId};
use std::time::Instant;
use tracing::trace;

/// Owner identity and recursion depth.
///
/// Invariant: `depth` is non-zero if and only if `owner` is present.
#[derive(Debug, Default)]
struct OwnerState {
    owner: Option<ThreadId>,
    depth: u64,
}

/// A recursive, owner-enforcing mutual-exclusion primitive.
///
/// The thread that owns the mutex may acquire it again in repeated calls
/// without blocking, and must release it the same number of times. Identity
/// is enforced: the mutex can only be released by the thread that acquired
/// it, and a release by any other thread is a usage error that leaves the
/// state untouched.
///
/// This is the leaf primitive; [`ReentrantLock`] and the condition machinery
/// are built on top of it.
///
/// [`ReentrantLock`]: crate::lock::ReentrantLock
#[derive(Debug, Default)]
pub struct Mutex {
    state: StateMutex<OwnerState>,
    available: Condvar,
}

impl Mutex {
    /// Create an unowned mutex.
    pub fn new() -> Self {
        Mutex::default()
    }

    /// Create a mutex initially owned by the calling thread, at depth 1.
    pub fn new_owned() -> Self {
        let mutex = Mutex::new();
        mutex.lock();
        mutex
    }

    /// Acquire the mutex, blocking while another thread owns it.
    pub fn lock(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock();
        if state.owner == Some(me) {
            state.depth += 1;
            return;
        }
        while state.owner.is_some() {
            self.available.wait(&mut state);
        }
        state.owner = Some(me);
        state.depth = 1;
        trace!(owner = ?me, "mutex acquired");
    }

    /// Release one level of the mutex.
    ///
    /// When the recursion depth returns to zero, ownership is released and
    /// one blocked waiter (if any) becomes eligible to acquire.
    pub fn unlock(&self) -> Result<()> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        if state.owner != Some(me) {
            return Err(RelockError::UnlockNotOwner);
        }
        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            self.available.notify_one();
            trace!(owner = ?me, "mutex released");
        }
        Ok(())
    }

    /// Acquire the mutex only if it is free or already owned by the caller.
    pub fn try_lock(&self) -> bool {
        let me = thread::current().id();
        let mut state = self.state.lock();
        match state.owner {
            None => {
                state.owner = Some(me);
                state.depth = 1;
                true
            }
            Some(owner) if owner == me => {
                state.depth += 1;
                true
            }
            Some(_) => false,
        }
    }

    /// Acquire the mutex, giving up at `deadline`.
    pub fn try_lock_until(&self, deadline: Instant) -> bool {
        let me = thread::current().id();
        let mut state = self.state.lock();
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.depth = 1;
                    return true;
                }
                Some(owner) if owner == me => {
                    state.depth += 1;
                    return true;
                }
                Some(_) => {
                    if self.available.wait_until(&mut state, deadline).timed_out() {
                        // The owner may have released right at the deadline.
                        if state.owner.is_none() {
                            state.owner = Some(me);
                            state.depth = 1;
                            return true;
                        }
                        trace!(?deadline, "timed mutex acquisition gave up");
                        return false;
                    }
                }
            }
        }
    }

    /// Whether any thread currently owns the mutex.
    pub fn is_locked(&self) -> bool {
        self.state.lock().owner.is_some()
    }

    /// Whether the calling thread owns the mutex.
    pub fn held_by_current_thread(&self) -> bool {
        self.state.lock().owner == Some(thread::current().id())
    }

    /// The current recursion depth (zero when unowned).
    pub fn hold_count(&self) -> u64 {
        self.state.lock().depth
    }

    /// Release all recursion levels, wait on `cv`, then re-acquire at the
    /// saved depth before returning.
    ///
    /// Returns whether the wake was a signal (`true`) rather than the
    /// deadline elapsing. The release, the wait registration, and the
    /// re-acquisition all happen under the state mutex, so a signal sent by
    /// a thread that acquired the lock after our release can never be lost.
    pub(crate) fn wait_released(&self, cv: &Condvar, deadline: Option<Instant>) -> Result<bool> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        if state.owner != Some(me) {
            return Err(RelockError::condition_not_owner("wait"));
        }
        let depth = state.depth;
        state.owner = None;
        state.depth = 0;
        self.available.notify_one();

        let signaled = match deadline {
            None => {
                cv.wait(&mut state);
                true
            }
            Some(deadline) => !cv.wait_until(&mut state, deadline).timed_out(),
        };

        // Re-acquire before returning, on both outcomes.
        while state.owner.is_some() {
            self.available.wait(&mut state);
        }
        state.owner = Some(me);
        state.depth = depth;
        Ok(signaled)
    }

    /// Wake waiters parked on `cv`. The caller must own the mutex.
    pub(crate) fn notify_waiters(&self, cv: &Condvar, all: bool) -> Result<()> {
        let state = self.state.lock();
        if state.owner != Some(thread::current().id()) {
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
