use std::ops::{Index, IndexMut};

/// `Vec`-backed node storage with slot reuse.
///
/// Removed nodes are only unlinked by the tree algorithms; [`release`]
/// records their slot so the next [`alloc`] overwrites it instead of growing
/// the vector.
///
/// [`release`]: NodeArena::release
/// [`alloc`]: NodeArena::alloc
#[derive(Clone, Debug)]
pub struct NodeArena<N> {
    nodes: Vec<N>,
    free: Vec<u32>,
}

impl<N> NodeArena<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, node: N) -> u32 {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx as usize] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as u32
            }
        }
    }

    pub fn release(&mut self, idx: u32) {
        debug_assert!((idx as usize) < self.nodes.len());
        debug_assert!(!self.free.contains(&idx), "slot {idx} released twice");
        self.free.push(idx);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
    }

    /// Number of slots in use.
    pub fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn as_slice(&self) -> &[N] {
        &self.nodes
    }

    pub fn as_mut_slice(&mut self) -> &mut [N] {
        &mut self.nodes
    }
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Index<u32> for NodeArena<N> {
    type Output = N;

    fn index(&self, idx: u32) -> &N {
        &self.nodes[idx as usize]
    }
}

impl<N> IndexMut<u32> for NodeArena<N> {
    fn index_mut(&mut self, idx: u32) -> &mut N {
        &mut self.nodes[idx as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_slots_are_reused() {
        let mut arena = NodeArena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!((a, b), (0, 1));
        arena.release(a);
        assert_eq!(arena.live(), 1);
        let c = arena.alloc("c");
        assert_eq!(c, a);
        assert_eq!(arena[c], "c");
        assert_eq!(arena.live(), 2);
        arena.clear();
        assert_eq!(arena.live(), 0);
        assert_eq!(arena.alloc("d"), 0);
    }
}
