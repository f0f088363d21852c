//! The unlocked skiplist: circular layers stored in a node arena.
//!
//! Layer `k`'s header lives in slot `k`, so a node index below `max_level` is
//! always a header. Layer 0 holds every element; a node at layer `k > 0` is
//! chained by `down` to the same element at layer `k - 1`.

use crate::level::LevelGenerator;
use crate::node::{NodeArena, SkipNode};
use log::trace;
use std::collections::HashMap;
use std::hash::Hash;

pub type Less<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

pub(crate) struct Layers<T> {
    arena: NodeArena<T>,
    max_level: usize,
    levels: Box<dyn LevelGenerator + Send + Sync>,
    less: Less<T>,
    len: usize,
}

impl<T> Layers<T> {
    /// `levels.total()` must be at least 1.
    pub fn new(levels: Box<dyn LevelGenerator + Send + Sync>, less: Less<T>) -> Self {
        let max_level = levels.total();
        let mut arena = NodeArena::new();
        for level in 0..max_level {
            let idx = arena.alloc(SkipNode::header(level));
            if level > 0 {
                arena.get_mut(idx).down = Some(level - 1);
                arena.get_mut(level - 1).up = Some(idx);
            }
        }
        Self {
            arena,
            max_level,
            levels,
            less,
            len: 0,
        }
    }

    #[inline]
    fn is_header(&self, idx: usize) -> bool {
        idx < self.max_level
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.arena.get(0).next == 0
    }

    /// Data nodes over all layers.
    pub fn node_count(&self) -> usize {
        self.arena.live() - self.max_level
    }

    fn precedes(&self, idx: usize, target: &T) -> bool {
        match &self.arena.get(idx).val {
            Some(val) => (self.less)(val, target),
            None => false,
        }
    }

    /// Moves right along one layer while the successor is still below
    /// `target`.
    fn advance(&self, mut cur: usize, target: &T) -> usize {
        loop {
            let next = self.arena.get(cur).next;
            if self.is_header(next) || !self.precedes(next, target) {
                return cur;
            }
            cur = next;
        }
    }

    /// Walks from the top header down to layer 0, calling `visit(level, idx)`
    /// with the rightmost node strictly below `target` on each layer (or the
    /// layer's header). Returns the layer-0 result.
    ///
    /// The cursor found on layer `k + 1` is carried down to layer `k` rather
    /// than restarting from the header.
    fn descend<F>(&self, target: &T, mut visit: F) -> usize
    where
        F: FnMut(usize, usize),
    {
        let mut cur = self.max_level - 1;
        for level in (0..self.max_level).rev() {
            cur = self.advance(cur, target);
            visit(level, cur);
            if level > 0 {
                // every node above layer 0 has a down link; the header
                // fallback only costs a longer walk
                cur = self.arena.get(cur).down.unwrap_or(level - 1);
            }
        }
        cur
    }

    /// Index `k` of the result belongs to layer `k`.
    fn predecessors(&self, target: &T) -> Vec<usize> {
        let mut preds = vec![0; self.max_level];
        self.descend(target, |level, idx| preds[level] = idx);
        preds
    }

    fn unsplice(&mut self, idx: usize) -> Option<usize> {
        let (prev, next) = {
            let node = self.arena.get(idx);
            (node.prev, node.next)
        };
        self.arena.get_mut(prev).next = next;
        if !self.is_header(next) {
            self.arena.get_mut(next).prev = prev;
        }
        self.arena.free(idx).down
    }
}

impl<T: Clone + PartialEq> Layers<T> {
    pub fn insert(&mut self, val: T) {
        let top = self.levels.random();
        trace!("inserting at layers 0..={}", top);
        let preds = self.predecessors(&val);
        // clone before linking anything, so a panicking clone leaves no
        // half-built chain behind
        let mut vals: Vec<T> = (0..top).map(|_| val.clone()).collect();
        vals.push(val);
        let mut below: Option<usize> = None;
        for (&pred, val) in preds.iter().zip(vals) {
            let next = self.arena.get(pred).next;
            let idx = self.arena.alloc(SkipNode::new(val, pred, next));
            self.arena.get_mut(pred).next = idx;
            if !self.is_header(next) {
                self.arena.get_mut(next).prev = idx;
            }
            if let Some(b) = below {
                self.arena.get_mut(idx).down = Some(b);
                self.arena.get_mut(b).up = Some(idx);
            }
            below = Some(idx);
        }
        self.len += 1;
    }

    /// Removes one occurrence of `target` with its whole vertical chain.
    pub fn delete(&mut self, target: &T) -> bool {
        let preds = self.predecessors(target);
        for level in (0..self.max_level).rev() {
            let candidate = self.arena.get(preds[level]).next;
            if self.is_header(candidate) || self.arena.get(candidate).val.as_ref() != Some(target)
            {
                continue;
            }
            trace!("deleting chain topped at layer {}", level);
            let mut node = Some(candidate);
            while let Some(idx) = node {
                node = self.unsplice(idx);
            }
            self.len -= 1;
            return true;
        }
        false
    }

    pub fn count(&self, target: &T) -> u64 {
        let base = self.descend(target, |_, _| {});
        let mut cnt = 0;
        let mut cur = self.arena.get(base).next;
        while !self.is_header(cur) {
            let node = self.arena.get(cur);
            if node.val.as_ref() != Some(target) {
                break;
            }
            cnt += 1;
            cur = node.next;
        }
        cnt
    }

    /// Every layer from 0 up, one `Layer:` line each.
    pub fn to_string_with<F>(&self, to_string: F) -> String
    where
        F: Fn(&T) -> String,
    {
        let mut res = String::new();
        for header in 0..self.max_level {
            res += "\nLayer:";
            let mut cur = self.arena.get(header).next;
            while !self.is_header(cur) {
                let node = self.arena.get(cur);
                if let Some(val) = &node.val {
                    res += &to_string(val);
                    res += ",";
                }
                cur = node.next;
            }
        }
        res += "\n";
        res
    }
}

impl<T: Clone + Eq + Hash> Layers<T> {
    pub fn to_map(&self) -> HashMap<T, u64> {
        let mut result = HashMap::new();
        let mut cur = self.arena.get(0).next;
        while !self.is_header(cur) {
            let node = self.arena.get(cur);
            if let Some(val) = &node.val {
                *result.entry(val.clone()).or_insert(0) += 1;
            }
            cur = node.next;
        }
        result
    }
}

#[cfg(test)]
impl<T: std::fmt::Debug> Layers<T> {
    /// Panics unless the layer and chain links are consistent.
    pub fn check_invariants(&self) {
        let mut data_nodes = 0;
        for level in 0..self.max_level {
            let mut prev = level;
            let mut cur = self.arena.get(level).next;
            let mut layer_len = 0;
            while !self.is_header(cur) {
                let node = self.arena.get(cur);
                assert_eq!(node.prev, prev, "broken prev link at layer {}", level);
                if !self.is_header(prev) {
                    let (a, b) = (&self.arena.get(prev).val, &node.val);
                    if let (Some(a), Some(b)) = (a, b) {
                        assert!(!(self.less)(b, a), "{:?} after {:?} at layer {}", b, a, level);
                    }
                }
                assert!(node.val.is_some(), "data node without a value");
                match node.down {
                    Some(d) => {
                        assert!(level > 0, "layer 0 node links down");
                        assert_eq!(self.arena.get(d).up, Some(cur));
                    }
                    None => assert_eq!(level, 0, "node at layer {} has no down link", level),
                }
                if let Some(u) = node.up {
                    assert_eq!(self.arena.get(u).down, Some(cur));
                }
                layer_len += 1;
                prev = cur;
                cur = node.next;
            }
            assert_eq!(cur, level, "layer {} does not wrap to its own header", level);
            if level == 0 {
                assert_eq!(layer_len, self.len);
            }
            data_nodes += layer_len;
        }
        assert_eq!(data_nodes, self.node_count());
    }
}
