//! Swappable locking policies.
//!
//! A [`Locked`] value pairs some data with a raw lock implementing
//! [`RawLock`]. The skiplist is generic over the raw lock, so the concurrent
//! and single-threaded variants share one implementation.
//!
//! `Locked` is only `Sync` when `R` is: a policy such as
//! [`RawSingleThread`] keeps the whole structure on one thread. Sharing also
//! needs `T: Send + Sync`, because a shared guard hands out `&T` to several
//! threads at once and an exclusive guard hands out `&mut T` to whichever
//! thread holds it.

mod c_cond;
mod c_mutex;
mod fair_rwlock;
mod mutex;
mod single;

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};

pub use c_cond::CCond;
pub use c_mutex::CMutex;
pub use fair_rwlock::{FairRwLock, RawFairRwLock};
pub use mutex::{Mutex, RawMutex};
pub use single::{RawSingleThread, SingleThread};

/// The lock half of a [`Locked`].
///
/// Policies without a reader/writer distinction implement the shared side
/// with the exclusive one.
pub trait RawLock {
    fn new() -> Self;

    /// # Safety
    ///
    /// Must be paired with exactly one `unlock_shared` on the same thread.
    unsafe fn lock_shared(&self);

    /// # Safety
    ///
    /// The caller must hold the shared side.
    unsafe fn unlock_shared(&self);

    /// # Safety
    ///
    /// Must be paired with exactly one `unlock_exclusive` on the same thread.
    unsafe fn lock_exclusive(&self);

    /// # Safety
    ///
    /// The caller must hold the exclusive side.
    unsafe fn unlock_exclusive(&self);
}

pub struct Locked<R: RawLock, T> {
    raw: R,
    data: UnsafeCell<T>,
}

pub struct SharedGuard<'a, R: RawLock, T> {
    locked: &'a Locked<R, T>,
}

pub struct ExclusiveGuard<'a, R: RawLock, T> {
    locked: &'a Locked<R, T>,
}

unsafe impl<R: RawLock + Send, T: Send> Send for Locked<R, T> {}

unsafe impl<R: RawLock + Sync, T: Send + Sync> Sync for Locked<R, T> {}

impl<'a, R: RawLock, T> Drop for SharedGuard<'a, R, T> {
    fn drop(&mut self) {
        unsafe {
            self.locked.raw.unlock_shared();
        }
    }
}

impl<'a, R: RawLock, T> Drop for ExclusiveGuard<'a, R, T> {
    fn drop(&mut self) {
        unsafe {
            self.locked.raw.unlock_exclusive();
        }
    }
}

impl<'a, R: RawLock, T> Deref for SharedGuard<'a, R, T> {
    type Target = T;
    fn deref(&self) -> &T {
        unsafe { &*self.locked.data.get() }
    }
}

impl<'a, R: RawLock, T> Deref for ExclusiveGuard<'a, R, T> {
    type Target = T;
    fn deref(&self) -> &T {
        unsafe { &*self.locked.data.get() }
    }
}

impl<'a, R: RawLock, T> DerefMut for ExclusiveGuard<'a, R, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.locked.data.get() }
    }
}

impl<R: RawLock, T> Locked<R, T> {
    pub fn new(data: T) -> Locked<R, T> {
        Locked {
            raw: R::new(),
            data: UnsafeCell::new(data),
        }
    }

    pub fn read(&self) -> SharedGuard<'_, R, T> {
        unsafe {
            self.raw.lock_shared();
        }
        SharedGuard { locked: self }
    }

    pub fn write(&self) -> ExclusiveGuard<'_, R, T> {
        unsafe {
            self.raw.lock_exclusive();
        }
        ExclusiveGuard { locked: self }
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}
