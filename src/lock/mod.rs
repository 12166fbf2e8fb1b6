mod condition;
mod guard;
mod mutex;
mod reentrant;
mod rwlock;
mod traits;

pub use condition::LockCondition;
pub use guard::LockGuard;
pub use mutex::Mutex;
pub use reentrant::ReentrantLock;
pub use rwlock::{ReadLock, ReadWriteLock, WriteCondition, WriteLock};
pub use traits::{Condition, Lock};
