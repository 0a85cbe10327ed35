use std::fmt;

use crate::types::{KeyNode, Node, ParentNode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::Red => "RED",
            Color::Black => "BLACK",
        })
    }
}

/// Red-black tree node stored in an arena.
///
/// A `None` link is the NIL leaf and counts as black.
#[derive(Clone, Debug)]
pub struct RbNode<K> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: K,
    pub color: Color,
}

impl<K> RbNode<K> {
    /// New nodes start red.
    pub fn new(k: K) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            k,
            color: Color::Red,
        }
    }
}

impl<K> Node for RbNode<K> {
    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }
}

impl<K> ParentNode for RbNode<K> {
    fn p(&self) -> Option<u32> {
        self.p
    }
}

impl<K> KeyNode<K> for RbNode<K> {
    fn key(&self) -> &K {
        &self.k
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ColoredKey<K> {
    pub key: K,
    pub color: Color,
}

/// Pre-order snapshot of one node, for renderers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RbNodeSnapshot<K> {
    pub key: K,
    pub color: Color,
    pub depth: usize,
}

/// Result of [`verify`](super::util::verify).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Verification {
    pub valid: bool,
    pub violations: Vec<crate::error::Violation>,
    /// Black nodes from the root down to a NIL leaf, counting the leaf and
    /// not the root. `0` for the empty tree.
    pub black_height: usize,
}
