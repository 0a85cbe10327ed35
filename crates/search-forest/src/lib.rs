//! In-memory search and range-query structures.
//!
//! Four classic structures that keep their balance and aggregate invariants
//! across every mutation:
//!
//! - **AVL tree**: height-balanced ordered set, rebalanced on the way back
//!   up from each insert and delete.
//! - **Red-black tree**: color-balanced ordered set with bottom-up fixups.
//! - **Segment tree**: range aggregates (`sum`, `min`, `max`, `gcd`) over a
//!   fixed-length array, with lazily propagated additive range updates.
//! - **Trie**: string multiset with prefix search and autocomplete.
//!
//! Both binary search trees keep their nodes in a [`util::NodeArena`] and
//! link them by `Option<u32>` index; `None` is the empty subtree.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`], [`ParentNode`], [`KeyNode`] traits, shared result types |
//! [`util`] | Arena, traversals, `first`/`next`/`find` helpers |
//! [`avl`] | [`AvlTree`] and its rotation helpers |
//! [`red_black`] | [`RbTree`], recoloring helpers, [`red_black::verify`] |
//! [`segment`] | [`SegmentTree`] and [`Operator`] |
//! [`trie`] | [`Trie`] |
//! [`oplog`] | Bounded per-structure [`OperationLog`] |
//! [`print`] | Box-drawing debug dumps |
//! [`error`] | [`RangeError`], [`Violation`] |

pub mod avl;
pub mod error;
pub mod oplog;
pub mod print;
pub mod red_black;
pub mod segment;
pub mod trie;
pub mod types;
pub mod util;

pub use avl::AvlTree;
pub use error::{ParseOperatorError, RangeError, Violation};
pub use oplog::{LogEntry, OpKind, OperationLog, DEFAULT_LOG_CAPACITY};
pub use red_black::{Color, RbTree};
pub use segment::{Operator, QueryStep, SegmentTree};
pub use trie::{Trie, TrieSearch};
pub use types::{
    default_comparator, KeyNode, Node, ParentNode, RotationCase, RotationStep, SearchResult,
    TreeStats,
};
