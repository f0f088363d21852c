use libc::{
    pthread_mutex_destroy, pthread_mutex_lock, pthread_mutex_t, pthread_mutex_unlock,
    PTHREAD_MUTEX_INITIALIZER,
};
use std::cell::UnsafeCell;

// Boxed so the pthread object never moves once handed out.
pub struct CMutex(Box<UnsafeCell<pthread_mutex_t>>);

unsafe impl Send for CMutex {}

unsafe impl Sync for CMutex {}

impl CMutex {
    pub fn new() -> CMutex {
        CMutex(Box::new(UnsafeCell::new(PTHREAD_MUTEX_INITIALIZER)))
    }

    /// # Safety
    ///
    /// The calling thread must not already hold this mutex.
    pub unsafe fn lock(&self) {
        let r = pthread_mutex_lock(self.0.get());
        debug_assert_eq!(r, 0);
    }

    /// # Safety
    ///
    /// The calling thread must hold this mutex.
    pub unsafe fn unlock(&self) {
        let r = pthread_mutex_unlock(self.0.get());
        debug_assert_eq!(r, 0);
    }

    pub(crate) fn raw(&self) -> *mut pthread_mutex_t {
        self.0.get()
    }
}

impl Default for CMutex {
    fn default() -> Self {
        CMutex::new()
    }
}

impl Drop for CMutex {
    fn drop(&mut self) {
        unsafe {
            pthread_mutex_destroy(self.0.get());
        }
    }
}
