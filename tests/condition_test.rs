use relock::{Condition, Lock, ReentrantLock, TimeUnit};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

fn lock_and_condition() -> (Arc<ReentrantLock>, Arc<Box<dyn Condition>>) {
    let lock = Arc::new(ReentrantLock::new());
    let condition = Arc::new(lock.new_condition().unwrap());
    (lock, condition)
}

#[test]
fn test_wait_releases_lock_and_reacquires_on_signal() {
    let (lock, condition) = lock_and_condition();
    let (tx, rx) = mpsc::channel();

    let waiter = {
        let lock = Arc::clone(&lock);
        let condition = Arc::clone(&condition);
        thread::spawn(move || {
            lock.lock();
            tx.send(()).unwrap();
            condition.wait().unwrap();
            let held = lock.is_held_by_current_thread();
            lock.unlock().unwrap();
            held
        })
    };
    rx.recv().unwrap();

    // Succeeding here proves wait() released the lock; the waiter parks
    // atomically with that release, so the signal below cannot be lost.
    lock.lock();
    condition.signal().unwrap();
    lock.unlock().unwrap();

    assert!(
        waiter.join().unwrap(),
        "waiter must hold the lock again when wait() returns"
    );
}

#[test]
fn test_wait_restores_recursion_depth() {
    let (lock, condition) = lock_and_condition();
    let (tx, rx) = mpsc::channel();

    let waiter = {
        let lock = Arc::clone(&lock);
        let condition = Arc::clone(&condition);
        thread::spawn(move || {
            lock.lock();
            lock.lock();
            tx.send(()).unwrap();
            condition.wait().unwrap();
            let depth = lock.hold_count();
            lock.unlock().unwrap();
            lock.unlock().unwrap();
            depth
        })
    };
    rx.recv().unwrap();

    lock.lock();
    condition.signal().unwrap();
    lock.unlock().unwrap();

    assert_eq!(waiter.join().unwrap(), 2);
}

#[test]
fn test_timed_wait_times_out_without_signal() {
    let (lock, condition) = lock_and_condition();

    lock.lock();
    let start = Instant::now();
    let signaled = condition.wait_for(100, TimeUnit::Milliseconds).unwrap();
    let elapsed = start.elapsed();
    assert!(lock.is_held_by_current_thread(), "lock re-acquired on timeout");
    lock.unlock().unwrap();

    assert!(!signaled);
    assert!(elapsed >= Duration::from_millis(100));
}

#[test]
fn test_timed_wait_returns_true_on_early_signal() {
    let (lock, condition) = lock_and_condition();
    let (tx, rx) = mpsc::channel();

    let waiter = {
        let lock = Arc::clone(&lock);
        let condition = Arc::clone(&condition);
        thread::spawn(move || {
            lock.lock();
            tx.send(()).unwrap();
            let signaled = condition.wait_for(10, TimeUnit::Seconds).unwrap();
            lock.unlock().unwrap();
            signaled
        })
    };
    rx.recv().unwrap();

    let start = Instant::now();
    lock.lock();
    condition.signal().unwrap();
    lock.unlock().unwrap();

    assert!(waiter.join().unwrap(), "signal before the deadline returns true");
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_wait_nanos_reports_elapsed_deadline() {
    let (lock, condition) = lock_and_condition();

    lock.lock();
    let remaining = condition.wait_nanos(50_000_000).unwrap(); // 50ms
    lock.unlock().unwrap();

    assert!(remaining <= 0, "no signal: remaining must be spent, got {remaining}");
}

#[test]
fn test_wait_nanos_reports_remaining_time_on_signal() {
    let (lock, condition) = lock_and_condition();
    let (tx, rx) = mpsc::channel();

    let waiter = {
        let lock = Arc::clone(&lock);
        let condition = Arc::clone(&condition);
        thread::spawn(move || {
            lock.lock();
            tx.send(()).unwrap();
            let remaining = condition.wait_nanos(60_000_000_000).unwrap(); // 60s
            lock.unlock().unwrap();
            remaining
        })
    };
    rx.recv().unwrap();

    lock.lock();
    condition.signal().unwrap();
    lock.unlock().unwrap();

    let remaining = waiter.join().unwrap();
    assert!(remaining > 0, "early signal leaves time on the clock: {remaining}");
}

#[test]
fn test_signal_all_wakes_every_waiter() {
    let (lock, condition) = lock_and_condition();
    let waiting = Arc::new(AtomicUsize::new(0));
    let waiters: usize = 3;

    let mut handles = vec![];
    for _ in 0..waiters {
        let lock = Arc::clone(&lock);
        let condition = Arc::clone(&condition);
        let waiting = Arc::clone(&waiting);
        handles.push(thread::spawn(move || {
            lock.lock();
            waiting.fetch_add(1, Ordering::SeqCst);
            condition.wait().unwrap();
            lock.unlock().unwrap();
        }));
    }

    // The counter is bumped while holding the lock, so once it reads 3 the
    // last waiter is between increment and park; taking the lock afterwards
    // guarantees all three are parked.
    while waiting.load(Ordering::SeqCst) < waiters {
        thread::sleep(Duration::from_millis(5));
    }
    lock.lock();
    condition.signal_all().unwrap();
    lock.unlock().unwrap();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_multiple_conditions_on_one_lock() {
    let lock = Arc::new(ReentrantLock::new());
    let first = Arc::new(lock.new_condition().unwrap());
    let second = Arc::new(lock.new_condition().unwrap());
    let (tx, rx) = mpsc::channel();

    let waiter = {
        let lock = Arc::clone(&lock);
        let first = Arc::clone(&first);
        thread::spawn(move || {
            lock.lock();
            tx.send(()).unwrap();
            let signaled = first.wait_for(10, TimeUnit::Seconds).unwrap();
            lock.unlock().unwrap();
            signaled
        })
    };
    rx.recv().unwrap();

    lock.lock();
    // Waking the wrong condition must not disturb the waiter on the first
    second.signal().unwrap();
    first.signal().unwrap();
    lock.unlock().unwrap();

    assert!(waiter.join().unwrap());
}
