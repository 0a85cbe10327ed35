use std::collections::BTreeMap;

/// Prefix tree node. Children are owned and ordered by character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrieNode {
    pub children: BTreeMap<char, TrieNode>,
    pub is_end_of_word: bool,
    /// Times the word ending here was inserted, `0` unless `is_end_of_word`.
    pub word_count: usize,
    /// Stored words (with multiplicity) whose path passes through this node.
    pub prefix_count: usize,
}

impl TrieNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Outcome of [`Trie::search`](super::Trie::search).
///
/// `found` means the whole path exists; `exact_match` means a stored word
/// ends there.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TrieSearch {
    pub found: bool,
    pub exact_match: bool,
    /// Characters walked, including the one that failed.
    pub path: Vec<char>,
    pub word_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TrieNodeSnapshot {
    /// Edge label, `None` for the root.
    #[serde(rename = "char")]
    pub ch: Option<char>,
    pub parent: Option<char>,
    pub depth: usize,
    pub is_end_of_word: bool,
    pub word_count: usize,
    pub prefix_count: usize,
    pub children: Vec<char>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TrieStats {
    pub node_count: usize,
    pub word_count: usize,
    pub height: usize,
    pub is_balanced: bool,
}
