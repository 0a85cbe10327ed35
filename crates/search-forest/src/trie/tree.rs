use std::collections::VecDeque;

use crate::oplog::{OpKind, OperationLog};

use super::types::{TrieNode, TrieNodeSnapshot, TrieSearch, TrieStats};

/// Lowercased, trimmed form every operation works on.
fn normalize(word: &str) -> Vec<char> {
    word.trim().to_lowercase().chars().collect()
}

/// Multiset of strings keyed by character path.
///
/// Input is normalized (trimmed, lowercased) before use. Blank input never
/// matches anything.
pub struct Trie {
    root: TrieNode,
    word_count: usize,
    node_count: usize,
    log: OperationLog,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            word_count: 0,
            node_count: 1,
            log: OperationLog::new(),
        }
    }

    /// Keeps at most `capacity` operation log entries.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log = OperationLog::with_capacity(capacity);
        self
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Distinct stored words.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Nodes including the root.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn operation_log(&self) -> &OperationLog {
        &self.log
    }

    /// Returns `false` only for blank input. Re-inserting a word bumps its
    /// count.
    pub fn insert(&mut self, word: &str) -> bool {
        let chars = normalize(word);
        if chars.is_empty() {
            return false;
        }

        let mut node = &mut self.root;
        let mut created = 0;
        for &c in &chars {
            node.prefix_count += 1;
            node = node.children.entry(c).or_insert_with(|| {
                created += 1;
                TrieNode::new()
            });
        }
        node.prefix_count += 1;
        node.word_count += 1;

        let word: String = chars.into_iter().collect();
        let message = if node.is_end_of_word {
            format!("Word \"{word}\" already exists. Count: {}", node.word_count)
        } else {
            node.is_end_of_word = true;
            self.word_count += 1;
            format!("Inserted word \"{word}\"")
        };
        self.node_count += created;
        self.log.push(OpKind::Insert, message);
        true
    }

    fn find(&self, chars: &[char]) -> Option<&TrieNode> {
        chars
            .iter()
            .try_fold(&self.root, |node, c| node.children.get(c))
    }

    /// Node at the end of a non-blank prefix.
    fn find_prefix(&self, prefix: &str) -> Option<(Vec<char>, &TrieNode)> {
        let chars = normalize(prefix);
        if chars.is_empty() {
            return None;
        }
        let node = self.find(&chars)?;
        Some((chars, node))
    }

    pub fn search(&self, word: &str) -> TrieSearch {
        let chars = normalize(word);
        let mut path = Vec::with_capacity(chars.len());
        let miss = |path: Vec<char>| TrieSearch {
            found: false,
            exact_match: false,
            path,
            word_count: 0,
        };
        if chars.is_empty() {
            return miss(path);
        }

        let mut node = &self.root;
        for c in chars {
            path.push(c);
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return miss(path),
            }
        }
        TrieSearch {
            found: true,
            exact_match: node.is_end_of_word,
            path,
            word_count: node.word_count,
        }
    }

    /// Exact-match shorthand for [`search`](Self::search).
    pub fn contains(&self, word: &str) -> bool {
        self.search(word).exact_match
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.find_prefix(prefix).is_some()
    }

    /// Stored words extending `prefix`, in lexicographic order.
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut words = Vec::new();
        if let Some((chars, node)) = self.find_prefix(prefix) {
            let mut buf: String = chars.into_iter().collect();
            collect_words(node, &mut buf, &mut words, usize::MAX);
        }
        words
    }

    /// Stored words extending `prefix`, counted with multiplicity.
    pub fn count_words_with_prefix(&self, prefix: &str) -> usize {
        self.find_prefix(prefix).map_or(0, |(_, node)| node.prefix_count)
    }

    /// First `limit` words of [`words_with_prefix`](Self::words_with_prefix).
    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut words = Vec::new();
        if let Some((chars, node)) = self.find_prefix(prefix) {
            let mut buf: String = chars.into_iter().collect();
            collect_words(node, &mut buf, &mut words, limit);
        }
        words
    }

    /// Longest prefix shared by every stored word.
    pub fn longest_common_prefix(&self) -> String {
        let mut prefix = String::new();
        let mut node = &self.root;
        while node.children.len() == 1 && !node.is_end_of_word {
            let Some((&c, child)) = node.children.iter().next() else {
                break;
            };
            prefix.push(c);
            node = child;
        }
        prefix
    }

    pub fn all_words(&self) -> Vec<String> {
        let mut words = Vec::new();
        collect_words(&self.root, &mut String::new(), &mut words, usize::MAX);
        words
    }

    /// Removes every occurrence of `word`. Nodes still on the path of
    /// another word are kept.
    pub fn delete(&mut self, word: &str) -> bool {
        let chars = normalize(word);
        let removed = match self.find(&chars) {
            Some(node) if !chars.is_empty() && node.is_end_of_word => node.word_count,
            _ => {
                log::trace!("trie: delete of missing word {word:?}");
                return false;
            }
        };

        let pruned = remove_at(&mut self.root, &chars, removed);
        self.node_count -= pruned;
        self.word_count -= 1;
        let word: String = chars.into_iter().collect();
        self.log
            .push(OpKind::Delete, format!("Deleted word \"{word}\""));
        true
    }

    /// Edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn walk(node: &TrieNode) -> usize {
            node.children
                .values()
                .map(|c| walk(c) + 1)
                .max()
                .unwrap_or(0)
        }
        walk(&self.root)
    }

    pub fn clear(&mut self) {
        self.root = TrieNode::new();
        self.word_count = 0;
        self.node_count = 1;
        self.log.push(OpKind::Info, "Trie cleared");
    }

    pub fn level_order(&self) -> Vec<Vec<TrieNodeSnapshot>> {
        let mut levels: Vec<Vec<TrieNodeSnapshot>> = Vec::new();
        let mut queue = VecDeque::from([(&self.root, None, None, 0usize)]);
        while let Some((node, ch, parent, depth)) = queue.pop_front() {
            if levels.len() == depth {
                levels.push(Vec::new());
            }
            levels[depth].push(snapshot(node, ch, parent, depth));
            for (&c, child) in &node.children {
                queue.push_back((child, Some(c), ch, depth + 1));
            }
        }
        levels
    }

    /// Pre-order listing of every node, root first.
    pub fn all_nodes(&self) -> Vec<TrieNodeSnapshot> {
        fn walk(
            node: &TrieNode,
            ch: Option<char>,
            parent: Option<char>,
            depth: usize,
            out: &mut Vec<TrieNodeSnapshot>,
        ) {
            out.push(snapshot(node, ch, parent, depth));
            for (&c, child) in &node.children {
                walk(child, Some(c), ch, depth + 1, out);
            }
        }

        let mut out = Vec::with_capacity(self.node_count);
        walk(&self.root, None, None, 0, &mut out);
        out
    }

    pub fn stats(&self) -> TrieStats {
        TrieStats {
            node_count: self.node_count,
            word_count: self.word_count,
            height: self.height(),
            is_balanced: true,
        }
    }

    /// Checks the counters against the structure.
    pub fn assert_valid(&self) -> Result<(), String> {
        fn walk(node: &TrieNode, path: &mut String) -> Result<(usize, usize), String> {
            if node.is_end_of_word != (node.word_count > 0) {
                return Err(format!("End-of-word flag mismatch at \"{path}\""));
            }
            let mut nodes = 1;
            let mut through = node.word_count;
            for (&c, child) in &node.children {
                path.push(c);
                let (n, w) = walk(child, path)?;
                path.pop();
                nodes += n;
                through += w;
            }
            if node.prefix_count != through {
                return Err(format!(
                    "Prefix count mismatch at \"{path}\": expected {through}, got {}",
                    node.prefix_count
                ));
            }
            Ok((nodes, through))
        }

        let (nodes, _) = walk(&self.root, &mut String::new())?;
        if nodes != self.node_count {
            return Err(format!(
                "Node count mismatch: expected {nodes}, got {}",
                self.node_count
            ));
        }
        let distinct = self.all_words().len();
        if distinct != self.word_count {
            return Err(format!(
                "Word count mismatch: expected {distinct}, got {}",
                self.word_count
            ));
        }
        Ok(())
    }
}

fn snapshot(
    node: &TrieNode,
    ch: Option<char>,
    parent: Option<char>,
    depth: usize,
) -> TrieNodeSnapshot {
    TrieNodeSnapshot {
        ch,
        parent,
        depth,
        is_end_of_word: node.is_end_of_word,
        word_count: node.word_count,
        prefix_count: node.prefix_count,
        children: node.children.keys().copied().collect(),
    }
}

fn collect_words(node: &TrieNode, buf: &mut String, out: &mut Vec<String>, limit: usize) {
    if out.len() >= limit {
        return;
    }
    if node.is_end_of_word {
        out.push(buf.clone());
    }
    for (&c, child) in &node.children {
        buf.push(c);
        collect_words(child, buf, out, limit);
        buf.pop();
    }
}

/// Unwinds `removed` words ending at `chars` below `node`. Returns the
/// number of nodes pruned.
fn remove_at(node: &mut TrieNode, chars: &[char], removed: usize) -> usize {
    node.prefix_count -= removed;
    let Some((c, rest)) = chars.split_first() else {
        node.is_end_of_word = false;
        node.word_count = 0;
        return 0;
    };
    let Some(child) = node.children.get_mut(c) else {
        return 0;
    };
    let mut pruned = remove_at(child, rest, removed);
    if child.is_leaf() && !child.is_end_of_word {
        node.children.remove(c);
        pruned += 1;
    }
    pruned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_counts_follow_multiplicity() {
        let mut trie = Trie::new();
        trie.insert("tea");
        trie.insert("tea");
        trie.insert("ten");
        assert_eq!(trie.root().prefix_count, 3);
        assert_eq!(trie.count_words_with_prefix("te"), 3);
        assert_eq!(trie.search("tea").word_count, 2);
        assert_eq!(trie.word_count(), 2);
        trie.assert_valid().unwrap();

        assert!(trie.delete("tea"));
        assert_eq!(trie.count_words_with_prefix("te"), 1);
        assert_eq!(trie.root().prefix_count, 1);
        assert_eq!(trie.node_count(), 4);
        trie.assert_valid().unwrap();
    }

    #[test]
    fn delete_keeps_word_that_is_a_prefix() {
        let mut trie = Trie::new();
        trie.insert("car");
        trie.insert("cart");
        assert!(trie.delete("cart"));
        assert!(trie.contains("car"));
        assert_eq!(trie.node_count(), 4);
        assert!(!trie.delete("ca"));
        trie.assert_valid().unwrap();
    }

    #[test]
    fn autocomplete_stops_at_limit() {
        let mut trie = Trie::new();
        for w in ["dog", "dot", "dove", "door", "dorm"] {
            trie.insert(w);
        }
        assert_eq!(trie.autocomplete("do", 2), vec!["dog", "door"]);
        assert_eq!(trie.autocomplete("do", 0), Vec::<String>::new());
    }
}
