use super::{Locked, RawLock};
use std::cell::Cell;

const WRITING: isize = -1;

/// Lock policy for a skiplist owned by one thread. It is a `RefCell`-style
/// borrow flag: `!Sync`, so it never crosses threads, and it panics instead of
/// aliasing when an operation re-enters the same structure (for example from
/// inside the ordering predicate).
pub struct RawSingleThread(Cell<isize>);

impl RawLock for RawSingleThread {
    fn new() -> RawSingleThread {
        RawSingleThread(Cell::new(0))
    }

    unsafe fn lock_shared(&self) {
        let n = self.0.get();
        assert!(n != WRITING, "skiplist re-entered during a mutation");
        self.0.set(n + 1);
    }

    unsafe fn unlock_shared(&self) {
        self.0.set(self.0.get() - 1);
    }

    unsafe fn lock_exclusive(&self) {
        assert!(self.0.get() == 0, "skiplist re-entered during an operation");
        self.0.set(WRITING);
    }

    unsafe fn unlock_exclusive(&self) {
        self.0.set(0);
    }
}

pub type SingleThread<T> = Locked<RawSingleThread, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_reads_allowed() {
        let cell = SingleThread::new(3);
        let a = cell.read();
        let b = cell.read();
        assert_eq!(*a + *b, 6);
    }

    #[test]
    #[should_panic(expected = "re-entered")]
    fn test_write_during_read_panics() {
        let cell = SingleThread::new(3);
        let _a = cell.read();
        let _b = cell.write();
    }

    #[test]
    fn test_write_after_release() {
        let cell = SingleThread::new(3);
        {
            let _a = cell.read();
        }
        *cell.write() += 1;
        assert_eq!(*cell.read(), 4);
    }
}
