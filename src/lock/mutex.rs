use super::c_mutex::CMutex;
use super::{Locked, RawLock};

/// One pthread mutex for everything: readers queue behind writers and behind
/// each other.
pub struct RawMutex(CMutex);

impl RawLock for RawMutex {
    fn new() -> RawMutex {
        RawMutex(CMutex::new())
    }

    unsafe fn lock_shared(&self) {
        self.0.lock();
    }

    unsafe fn unlock_shared(&self) {
        self.0.unlock();
    }

    unsafe fn lock_exclusive(&self) {
        self.0.lock();
    }

    unsafe fn unlock_exclusive(&self) {
        self.0.unlock();
    }
}

pub type Mutex<T> = Locked<RawMutex, T>;
