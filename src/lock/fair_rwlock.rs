use super::c_cond::CCond;
use super::c_mutex::CMutex;
use super::{Locked, RawLock};
use std::cell::UnsafeCell;

// Every field is only touched while `state_lock` is held.
struct LockContent {
    reader_n: u32,
    writing: bool,
    next_writer_id: u64,
    serving_writer_id: u64,
}

/// Reader/writer lock where writers take a ticket on arrival. Readers that
/// show up while any ticket is outstanding wait behind it, so a steady stream
/// of readers cannot starve a writer, and writers enter in arrival order.
pub struct RawFairRwLock {
    state_lock: CMutex,
    changed: CCond,
    content: UnsafeCell<LockContent>,
}

unsafe impl Send for RawFairRwLock {}

unsafe impl Sync for RawFairRwLock {}

impl RawFairRwLock {
    // Callers hold `state_lock` and drop the borrow before waiting.
    #[allow(clippy::mut_from_ref)]
    unsafe fn content(&self) -> &mut LockContent {
        &mut *self.content.get()
    }

    unsafe fn writer_pending(&self) -> bool {
        let content = self.content();
        content.writing || content.serving_writer_id != content.next_writer_id
    }

    unsafe fn may_write(&self, writer_id: u64) -> bool {
        let content = self.content();
        !content.writing && content.reader_n == 0 && content.serving_writer_id == writer_id
    }
}

impl RawLock for RawFairRwLock {
    fn new() -> RawFairRwLock {
        RawFairRwLock {
            state_lock: CMutex::new(),
            changed: CCond::new(),
            content: UnsafeCell::new(LockContent {
                reader_n: 0,
                writing: false,
                next_writer_id: 0,
                serving_writer_id: 0,
            }),
        }
    }

    unsafe fn lock_shared(&self) {
        self.state_lock.lock();
        while self.writer_pending() {
            self.changed.wait(&self.state_lock);
        }
        self.content().reader_n += 1;
        self.state_lock.unlock();
    }

    unsafe fn unlock_shared(&self) {
        self.state_lock.lock();
        let content = self.content();
        content.reader_n -= 1;
        if content.reader_n == 0 {
            self.changed.broadcast();
        }
        self.state_lock.unlock();
    }

    unsafe fn lock_exclusive(&self) {
        self.state_lock.lock();
        let writer_id = {
            let content = self.content();
            content.next_writer_id += 1;
            content.next_writer_id - 1
        };
        while !self.may_write(writer_id) {
            self.changed.wait(&self.state_lock);
        }
        self.content().writing = true;
        self.state_lock.unlock();
    }

    unsafe fn unlock_exclusive(&self) {
        self.state_lock.lock();
        let content = self.content();
        content.writing = false;
        content.serving_writer_id += 1;
        self.changed.broadcast();
        self.state_lock.unlock();
    }
}

pub type FairRwLock<T> = Locked<RawFairRwLock, T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_writers_exclusive_readers_consistent() {
        let lock = Arc::new(FairRwLock::new((0u64, 0u64)));
        let mut handlers = vec![];
        for i in 0..12 {
            let lock = Arc::clone(&lock);
            handlers.push(thread::spawn(move || {
                for _ in 0..200 {
                    if i % 3 == 0 {
                        let mut pair = lock.write();
                        pair.0 += 1;
                        pair.1 += 1;
                    } else {
                        let pair = lock.read();
                        assert_eq!(pair.0, pair.1);
                    }
                }
            }));
        }
        for handler in handlers {
            handler.join().unwrap();
        }
        assert_eq!(lock.read().0, 800);
    }

    #[test]
    fn test_readers_share() {
        let lock = Arc::new(FairRwLock::new(()));
        let inside = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(std::sync::Barrier::new(4));
        let mut handlers = vec![];
        for _ in 0..4 {
            let (lock, inside, barrier) = (lock.clone(), inside.clone(), barrier.clone());
            handlers.push(thread::spawn(move || {
                let _guard = lock.read();
                inside.fetch_add(1, Ordering::SeqCst);
                // all four readers must be able to sit here together
                barrier.wait();
            }));
        }
        for handler in handlers {
            handler.join().unwrap();
        }
        assert_eq!(inside.load(Ordering::SeqCst), 4);
    }
}
