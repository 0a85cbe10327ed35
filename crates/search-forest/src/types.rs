//! Node trait definitions.
//!
//! Nodes live in a caller-owned `Vec<N>` arena and link to each other through
//! `Option<u32>` indices. `None` plays the role of the empty subtree (the NIL
//! leaf of a red-black tree). All tree-manipulation helpers take the arena
//! as a slice and work with indices.

/// Child links (`l`, `r`). Trees relink nodes through their own fields.
pub trait Node {
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
}

/// Parent link (`p`), for trees that walk upwards.
pub trait ParentNode: Node {
    fn p(&self) -> Option<u32>;
}

/// Node carrying an ordered key.
pub trait KeyNode<K>: Node {
    fn key(&self) -> &K;
}

/// Comparator for any `PartialOrd` key.
///
/// Trees take any `Fn(&K, &K) -> i32` returning a negative number when
/// `a < b`, zero when equal and a positive number when `a > b`.
pub fn default_comparator<K: PartialOrd>(a: &K, b: &K) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// Outcome of a key lookup.
///
/// `path` lists the keys visited from the root, whether or not the key was
/// found.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SearchResult<K> {
    pub found: bool,
    pub path: Vec<K>,
}

/// Which rebalancing situation a rotation resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum RotationCase {
    /// Primitive left rotation.
    LeftRotation,
    /// Primitive right rotation.
    RightRotation,
    /// AVL: left-heavy, imbalance on the outer (left) side.
    LeftLeft,
    /// AVL: right-heavy, imbalance on the outer (right) side.
    RightRight,
    /// AVL: left-heavy, imbalance in the left child's right subtree.
    LeftRight,
    /// AVL: right-heavy, imbalance in the right child's left subtree.
    RightLeft,
    /// Red-black insert: red uncle, recolor and move up.
    RedUncle,
    /// Red-black insert: black uncle, inner grandchild.
    BlackUncleInner,
    /// Red-black insert: black uncle, outer grandchild.
    BlackUncleOuter,
    /// Red-black delete: red sibling.
    RedSibling,
    /// Red-black delete: black sibling with two black children.
    BlackNephews,
    /// Red-black delete: far nephew black, near nephew red.
    NearNephewRed,
    /// Red-black delete: far nephew red.
    FarNephewRed,
}

impl RotationCase {
    /// Whether this entry records an actual rotation (as opposed to a case
    /// classification).
    pub fn is_rotation(self) -> bool {
        matches!(self, RotationCase::LeftRotation | RotationCase::RightRotation)
    }
}

/// One entry of the per-operation rebalancing record.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RotationStep<K> {
    pub case: RotationCase,
    pub key: K,
    pub description: String,
}

/// Summary numbers for a search tree.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TreeStats {
    pub node_count: usize,
    pub height: usize,
    pub rotation_count: usize,
    pub is_balanced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black_height: Option<usize>,
}
