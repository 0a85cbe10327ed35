use crate::types::{KeyNode, Node};

/// AVL tree node stored in an arena.
#[derive(Clone, Debug)]
pub struct AvlNode<K> {
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: K,
    /// Node count on the longest downward path, `1` for a leaf.
    pub height: u32,
}

impl<K> AvlNode<K> {
    pub fn new(k: K) -> Self {
        Self {
            l: None,
            r: None,
            k,
            height: 1,
        }
    }
}

impl<K> Node for AvlNode<K> {
    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }
}

impl<K> KeyNode<K> for AvlNode<K> {
    fn key(&self) -> &K {
        &self.k
    }
}

/// Pre-order snapshot of one node, for renderers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AvlNodeSnapshot<K> {
    pub key: K,
    pub height: u32,
    pub balance_factor: i32,
    pub depth: usize,
}
