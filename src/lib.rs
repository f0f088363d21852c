//! An ordered multiset backed by a skiplist.
//!
//! ```text
//! <head> ----------> [2] ---------------------------------> [7] ------------->
//! <head> ----------> [2] ----------> [4] -----------------> [7] ------------->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] ---->
//! ```
//!
//! Each layer is a circular doubly linked list around a header. An element
//! spans layers `0..=L`, one node per layer, chained vertically. Searches
//! start at the top header and walk right, then down.
//!
//! The top layer `L` of a new element is drawn uniformly from
//! `[0, max_level)` unless a geometric distribution is configured through
//! [`SkiplistConfig`].
//!
//! [`Skiplist`] is generic over a [`RawLock`](lock::RawLock) policy; see
//! [`ConcurrentSkiplist`], [`RwSkiplist`] and [`LocalSkiplist`].

mod config;
mod error;
mod layers;
mod level;
pub mod lock;
mod node;
mod skiplist;

pub use crate::config::{
    LevelDistribution, SkiplistConfig, DEFAULT_MAX_LEVEL, LEVELS_KEY, MAX_LEVEL_KEY, SEED_KEY,
};
pub use crate::error::{Result, SkiplistError};
pub use crate::level::{GeometricLevelGenerator, LevelGenerator, UniformLevelGenerator};
pub use crate::skiplist::{ConcurrentSkiplist, LocalSkiplist, RwSkiplist, Skiplist};
