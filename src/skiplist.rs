use crate::config::SkiplistConfig;
use crate::error::{Result, SkiplistError};
use crate::layers::{Layers, Less};
use crate::level::LevelGenerator;
use crate::lock::{Locked, RawFairRwLock, RawLock, RawMutex, RawSingleThread};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// An ordered multiset kept as a skiplist.
///
/// Elements are ordered by a caller-supplied strict "less than". Equal
/// elements are kept side by side and counted, not merged. `less` must be a
/// strict total order that agrees with `==`: two values that are not less
/// than each other in either direction must compare equal. That contract is
/// not checked; breaking it makes `delete` and `count` miss elements.
///
/// Every operation goes through the lock policy `R`:
///
/// - [`RawMutex`] (the default) serializes all operations, reads included.
/// - [`RawFairRwLock`] lets `count`, `is_empty` and the dumps run side by side
///   while `insert` and `delete` stay exclusive.
/// - [`RawSingleThread`] is for a skiplist that never leaves its thread.
///
/// ```
/// use skiplist::ConcurrentSkiplist;
///
/// let list = ConcurrentSkiplist::new(4, |a: &i32, b: &i32| a < b).unwrap();
/// list.insert(1);
/// list.insert(1);
/// assert_eq!(list.count(&1), 2);
/// assert!(list.delete(&1));
/// assert_eq!(list.count(&1), 1);
/// ```
pub struct Skiplist<T, R: RawLock = RawMutex> {
    max_level: usize,
    layers: Locked<R, Layers<T>>,
}

pub type ConcurrentSkiplist<T> = Skiplist<T, RawMutex>;
pub type RwSkiplist<T> = Skiplist<T, RawFairRwLock>;
pub type LocalSkiplist<T> = Skiplist<T, RawSingleThread>;

impl<T, R: RawLock> Skiplist<T, R> {
    /// Fails with [`SkiplistError::MaxLevel`] when `max_level < 1`.
    pub fn new<F>(max_level: usize, less: F) -> Result<Self>
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self::with_config(&SkiplistConfig::new(max_level), less)
    }

    pub fn with_config<F>(config: &SkiplistConfig, less: F) -> Result<Self>
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let levels = config.level_generator()?;
        debug!(
            "new skiplist: max level {}, {:?} levels",
            config.max_level, config.distribution
        );
        Self::with_generator(levels, less)
    }

    /// The generator's `total()` becomes the max level.
    pub fn with_generator<F>(
        levels: Box<dyn LevelGenerator + Send + Sync>,
        less: F,
    ) -> Result<Self>
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let max_level = levels.total();
        if max_level < 1 {
            return Err(SkiplistError::MaxLevel(max_level));
        }
        let less: Less<T> = Box::new(less);
        Ok(Self {
            max_level,
            layers: Locked::new(Layers::new(levels, less)),
        })
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Whether no element is stored. O(1).
    pub fn is_empty(&self) -> bool {
        self.layers.read().is_empty()
    }

    /// Number of stored elements, duplicates included.
    pub fn len(&self) -> usize {
        self.layers.read().len()
    }

    /// Nodes over every layer. Always at least `len()`.
    pub fn node_count(&self) -> usize {
        self.layers.read().node_count()
    }
}

impl<T: Ord + 'static, R: RawLock> Skiplist<T, R> {
    /// A skiplist ordered by `T`'s own `Ord`.
    pub fn ordered(max_level: usize) -> Result<Self> {
        Self::new(max_level, |a: &T, b: &T| a < b)
    }
}

impl<T: Clone + PartialEq, R: RawLock> Skiplist<T, R> {
    /// Adds one occurrence of `val`.
    pub fn insert(&self, val: T) {
        self.layers.write().insert(val)
    }

    /// Removes one occurrence of `val`. Returns false, changing nothing, if
    /// there is none.
    pub fn delete(&self, val: &T) -> bool {
        self.layers.write().delete(val)
    }

    /// How many occurrences of `val` are stored.
    pub fn count(&self, val: &T) -> u64 {
        self.layers.read().count(val)
    }

    /// Dumps every layer, bottom first, as `"\nLayer:a,b,...,"` lines
    /// followed by a final newline.
    pub fn to_string_with<F>(&self, to_string: F) -> String
    where
        F: Fn(&T) -> String,
    {
        self.layers.read().to_string_with(to_string)
    }
}

impl<T: Clone + Eq + Hash, R: RawLock> Skiplist<T, R> {
    /// Element to occurrence count.
    pub fn to_map(&self) -> HashMap<T, u64> {
        self.layers.read().to_map()
    }
}

impl<T: Clone + PartialEq + fmt::Display, R: RawLock> fmt::Display for Skiplist<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with(|v| v.to_string()))
    }
}

impl<T, R: RawLock> fmt::Debug for Skiplist<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layers = self.layers.read();
        f.debug_struct("Skiplist")
            .field("max_level", &self.max_level)
            .field("len", &layers.len())
            .field("node_count", &layers.node_count())
            .finish()
    }
}

#[cfg(test)]
impl<T: fmt::Debug, R: RawLock> Skiplist<T, R> {
    fn check_invariants(&self) {
        self.layers.read().check_invariants()
    }
}
