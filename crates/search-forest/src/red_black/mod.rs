//! Red-black tree: color-balanced ordered set.

pub mod tree;
pub mod types;
pub mod util;

pub use tree::RbTree;
pub use types::{Color, ColoredKey, RbNode, RbNodeSnapshot, Verification};
pub use util::{assert_red_black_tree, print, verify};
