/// One element at one layer. Headers carry no value.
///
/// Links are arena indices. `prev` of a header is never read; headers are
/// recognised by their slot, not by a missing link.
pub(crate) struct SkipNode<T> {
    pub val: Option<T>,
    pub next: usize,
    pub prev: usize,
    pub up: Option<usize>,
    pub down: Option<usize>,
}

impl<T> SkipNode<T> {
    pub fn header(idx: usize) -> Self {
        Self {
            val: None,
            next: idx,
            prev: idx,
            up: None,
            down: None,
        }
    }

    pub fn new(val: T, prev: usize, next: usize) -> Self {
        Self {
            val: Some(val),
            next,
            prev,
            up: None,
            down: None,
        }
    }
}

/// Node storage with a free list so unspliced slots are reused.
pub(crate) struct NodeArena<T> {
    nodes: Vec<SkipNode<T>>,
    free_list: Vec<usize>,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub fn alloc(&mut self, node: SkipNode<T>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = node;
            idx
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Drops the slot's value and makes the slot available again.
    pub fn free(&mut self, idx: usize) -> SkipNode<T> {
        self.free_list.push(idx);
        std::mem::replace(&mut self.nodes[idx], SkipNode::header(idx))
    }

    #[inline]
    pub fn get(&self, idx: usize) -> &SkipNode<T> {
        &self.nodes[idx]
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> &mut SkipNode<T> {
        &mut self.nodes[idx]
    }

    /// Slots currently in use, headers included.
    pub fn live(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_slots_are_reused() {
        let mut arena = NodeArena::new();
        let h = arena.alloc(SkipNode::header(0));
        let a = arena.alloc(SkipNode::new("a", h, h));
        let b = arena.alloc(SkipNode::new("b", a, h));
        assert_eq!(arena.live(), 3);
        let old = arena.free(a);
        assert_eq!(old.val, Some("a"));
        assert_eq!(arena.live(), 2);
        let c = arena.alloc(SkipNode::new("c", h, b));
        assert_eq!(c, a);
        assert_eq!(arena.get(c).val, Some("c"));
        arena.get_mut(b).prev = c;
        assert_eq!(arena.get(b).prev, c);
    }
}
