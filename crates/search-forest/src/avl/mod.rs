//! AVL tree: height-balanced ordered set.

pub mod tree;
pub mod types;
pub mod util;

pub use tree::AvlTree;
pub use types::{AvlNode, AvlNodeSnapshot};
pub use util::{assert_avl_tree, balance_factor, is_balanced, print, rotate_left, rotate_right};
