use super::c_mutex::CMutex;
use libc::{
    pthread_cond_broadcast, pthread_cond_destroy, pthread_cond_t, pthread_cond_wait,
    PTHREAD_COND_INITIALIZER,
};
use std::cell::UnsafeCell;

pub struct CCond(Box<UnsafeCell<pthread_cond_t>>);

unsafe impl Send for CCond {}

unsafe impl Sync for CCond {}

impl CCond {
    pub fn new() -> CCond {
        CCond(Box::new(UnsafeCell::new(PTHREAD_COND_INITIALIZER)))
    }

    /// # Safety
    ///
    /// The calling thread must hold `mutex`; it is held again on return.
    pub unsafe fn wait(&self, mutex: &CMutex) {
        let r = pthread_cond_wait(self.0.get(), mutex.raw());
        debug_assert_eq!(r, 0);
    }

    pub fn broadcast(&self) {
        unsafe {
            pthread_cond_broadcast(self.0.get());
        }
    }
}

impl Default for CCond {
    fn default() -> Self {
        CCond::new()
    }
}

impl Drop for CCond {
    fn drop(&mut self) {
        unsafe {
            pthread_cond_destroy(self.0.get());
        }
    }
}
