//! Prefix tree over normalized strings.
pub mod tree;
pub mod types;

pub use tree::Trie;
pub use types::{TrieNode, TrieNodeSnapshot, TrieSearch, TrieStats};
