use std::fmt::Debug;

use crate::oplog::{OpKind, OperationLog};
use crate::types::{default_comparator, RotationCase, RotationStep, SearchResult, TreeStats};
use crate::util::{self, NodeArena};

use super::types::{AvlNode, AvlNodeSnapshot};
use super::util::{
    assert_avl_tree, balance_factor, is_balanced, node_height, print, rotate_left, rotate_right,
    update_height,
};

// Rebalancing case descriptions, insert path then delete path.
const INSERT_LEFT_LEFT: &str = "New key is in the left subtree of the left child.";
const INSERT_LEFT_RIGHT: &str =
    "New key is in the right subtree of the left child. Performing double rotation.";
const INSERT_RIGHT_RIGHT: &str = "New key is in the right subtree of the right child.";
const INSERT_RIGHT_LEFT: &str =
    "New key is in the left subtree of the right child. Performing double rotation.";
const DELETE_LEFT_LEFT: &str = "After deletion the node is left-heavy. Performing right rotation.";
const DELETE_LEFT_RIGHT: &str =
    "After deletion the node is left-heavy. Performing left-right rotation.";
const DELETE_RIGHT_RIGHT: &str =
    "After deletion the node is right-heavy. Performing left rotation.";
const DELETE_RIGHT_LEFT: &str =
    "After deletion the node is right-heavy. Performing right-left rotation.";

/// Height-balanced ordered set.
///
/// Nodes live in an arena and are linked by index. Duplicate keys are
/// rejected. Every insert and delete rebalances the path it touched, so the
/// height stays within `1.44 * log2(n + 2)`.
pub struct AvlTree<K, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    arena: NodeArena<AvlNode<K>>,
    root: Option<u32>,
    len: usize,
    comparator: C,
    rotation_count: usize,
    steps: Vec<RotationStep<K>>,
    log: OperationLog,
}

impl<K> AvlTree<K, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }
}

impl<K> Default for AvlTree<K, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> AvlTree<K, C>
where
    C: Fn(&K, &K) -> i32,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            len: 0,
            comparator,
            rotation_count: 0,
            steps: Vec::new(),
            log: OperationLog::new(),
        }
    }

    /// Keeps at most `capacity` operation log entries.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log = OperationLog::with_capacity(capacity);
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree in nodes, `0` when empty.
    pub fn height(&self) -> usize {
        node_height(self.arena.as_slice(), self.root) as usize
    }

    pub fn rotation_count(&self) -> usize {
        self.rotation_count
    }

    pub fn contains(&self, key: &K) -> bool {
        util::find(self.arena.as_slice(), self.root, key, &self.comparator).is_some()
    }

    pub fn is_balanced(&self) -> bool {
        is_balanced(self.arena.as_slice(), self.root)
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        assert_avl_tree(self.arena.as_slice(), self.root, &self.comparator)?;
        let counted = util::size(self.arena.as_slice(), self.root);
        if counted != self.len {
            return Err(format!(
                "Size mismatch: counted {counted}, stored {}",
                self.len
            ));
        }
        Ok(())
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.len,
            height: self.height(),
            rotation_count: self.rotation_count,
            is_balanced: self.is_balanced(),
            black_height: None,
        }
    }

    /// Rebalancing record of the most recent insert or delete.
    pub fn last_rotation_steps(&self) -> &[RotationStep<K>] {
        &self.steps
    }

    pub fn operation_log(&self) -> &OperationLog {
        &self.log
    }
}

impl<K, C> AvlTree<K, C>
where
    K: Clone + Debug,
    C: Fn(&K, &K) -> i32,
{
    /// Inserts `key`. Returns `false`, leaving the tree untouched, when the
    /// key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.steps.clear();
        if self.contains(&key) {
            log::trace!("avl: duplicate key {key:?} rejected");
            return false;
        }

        let message = format!("Inserted value {key:?}");
        let n = self.arena.alloc(AvlNode::new(key));
        let root = self.insert_at(self.root, n);
        self.root = Some(root);
        self.len += 1;
        self.log.push(OpKind::Insert, message);
        true
    }

    fn insert_at(&mut self, node: Option<u32>, n: u32) -> u32 {
        let Some(i) = node else {
            return n;
        };

        if (self.comparator)(&self.arena[n].k, &self.arena[i].k) < 0 {
            let l = self.insert_at(self.arena[i].l, n);
            self.arena[i].l = Some(l);
        } else {
            let r = self.insert_at(self.arena[i].r, n);
            self.arena[i].r = Some(r);
        }

        self.rebalance_after_insert(i, n)
    }

    /// Restores balance at `i` after `n` was linked somewhere below it.
    ///
    /// Straight and zig-zag cases are told apart by comparing the new key
    /// against the heavy child's key.
    fn rebalance_after_insert(&mut self, i: u32, n: u32) -> u32 {
        update_height(self.arena.as_mut_slice(), i);
        let bf = balance_factor(self.arena.as_slice(), Some(i));

        if bf > 1 {
            let l = self.arena[i].l.expect("left-heavy node has a left child");
            let outer = (self.comparator)(&self.arena[n].k, &self.arena[l].k) < 0;
            if outer {
                self.record_case(RotationCase::LeftLeft, i, bf, INSERT_LEFT_LEFT);
                return self.rotate_right(i);
            }
            self.record_case(RotationCase::LeftRight, i, bf, INSERT_LEFT_RIGHT);
            let l = self.rotate_left(l);
            self.arena[i].l = Some(l);
            return self.rotate_right(i);
        }

        if bf < -1 {
            let r = self.arena[i].r.expect("right-heavy node has a right child");
            let outer = (self.comparator)(&self.arena[n].k, &self.arena[r].k) > 0;
            if outer {
                self.record_case(RotationCase::RightRight, i, bf, INSERT_RIGHT_RIGHT);
                return self.rotate_left(i);
            }
            self.record_case(RotationCase::RightLeft, i, bf, INSERT_RIGHT_LEFT);
            let r = self.rotate_right(r);
            self.arena[i].r = Some(r);
            return self.rotate_left(i);
        }

        i
    }

    /// Removes `key`. Returns `false` when it is not present.
    pub fn delete(&mut self, key: &K) -> bool {
        self.steps.clear();
        let (root, removed) = self.remove_at(self.root, key);
        self.root = root;
        let Some(idx) = removed else {
            log::trace!("avl: delete of missing key {key:?}");
            return false;
        };

        self.arena.release(idx);
        self.len -= 1;
        self.log.push(OpKind::Delete, format!("Deleted value {key:?}"));
        true
    }

    /// Returns the new subtree root and the unlinked node, if any.
    fn remove_at(&mut self, node: Option<u32>, key: &K) -> (Option<u32>, Option<u32>) {
        let Some(i) = node else {
            return (None, None);
        };

        let cmp = (self.comparator)(key, &self.arena[i].k);
        if cmp < 0 {
            let (l, removed) = self.remove_at(self.arena[i].l, key);
            if removed.is_none() {
                return (Some(i), None);
            }
            self.arena[i].l = l;
            return (Some(self.rebalance_after_delete(i)), removed);
        }
        if cmp > 0 {
            let (r, removed) = self.remove_at(self.arena[i].r, key);
            if removed.is_none() {
                return (Some(i), None);
            }
            self.arena[i].r = r;
            return (Some(self.rebalance_after_delete(i)), removed);
        }

        let (l, r) = (self.arena[i].l, self.arena[i].r);
        self.arena[i].l = None;
        self.arena[i].r = None;
        match (l, r) {
            (Some(_), Some(r)) => {
                // In-order successor takes the removed node's place.
                let (rest, successor) = self.remove_min(r);
                self.arena[successor].l = l;
                self.arena[successor].r = rest;
                (Some(self.rebalance_after_delete(successor)), Some(i))
            }
            _ => (l.or(r), Some(i)),
        }
    }

    /// Unlinks the minimum of the subtree at `i`.
    fn remove_min(&mut self, i: u32) -> (Option<u32>, u32) {
        match self.arena[i].l {
            None => {
                let r = self.arena[i].r.take();
                (r, i)
            }
            Some(l) => {
                let (rest, min) = self.remove_min(l);
                self.arena[i].l = rest;
                (Some(self.rebalance_after_delete(i)), min)
            }
        }
    }

    /// Restores balance at `i` on a deletion path.
    ///
    /// There is no inserted key to compare against, so the heavy child's
    /// own balance factor picks between the single and double rotation.
    fn rebalance_after_delete(&mut self, i: u32) -> u32 {
        update_height(self.arena.as_mut_slice(), i);
        let bf = balance_factor(self.arena.as_slice(), Some(i));

        if bf > 1 {
            let l = self.arena[i].l.expect("left-heavy node has a left child");
            if balance_factor(self.arena.as_slice(), Some(l)) >= 0 {
                self.record_case(RotationCase::LeftLeft, i, bf, DELETE_LEFT_LEFT);
                return self.rotate_right(i);
            }
            self.record_case(RotationCase::LeftRight, i, bf, DELETE_LEFT_RIGHT);
            let l = self.rotate_left(l);
            self.arena[i].l = Some(l);
            return self.rotate_right(i);
        }

        if bf < -1 {
            let r = self.arena[i].r.expect("right-heavy node has a right child");
            if balance_factor(self.arena.as_slice(), Some(r)) <= 0 {
                self.record_case(RotationCase::RightRight, i, bf, DELETE_RIGHT_RIGHT);
                return self.rotate_left(i);
            }
            self.record_case(RotationCase::RightLeft, i, bf, DELETE_RIGHT_LEFT);
            let r = self.rotate_right(r);
            self.arena[i].r = Some(r);
            return self.rotate_left(i);
        }

        i
    }

    fn rotate_right(&mut self, y: u32) -> u32 {
        let x = rotate_right(self.arena.as_mut_slice(), y);
        self.record_rotation(RotationCase::RightRotation, y, x);
        x
    }

    fn rotate_left(&mut self, x: u32) -> u32 {
        let y = rotate_left(self.arena.as_mut_slice(), x);
        self.record_rotation(RotationCase::LeftRotation, x, y);
        y
    }

    fn record_rotation(&mut self, case: RotationCase, pivot: u32, new_root: u32) {
        self.rotation_count += 1;
        let key = self.arena[pivot].k.clone();
        let side = if case == RotationCase::RightRotation { "Left" } else { "Right" };
        let direction = if case == RotationCase::RightRotation { "Right" } else { "Left" };
        let description = format!(
            "Rotating {} at node {key:?}. {side} child {:?} becomes new parent.",
            direction.to_lowercase(),
            self.arena[new_root].k
        );
        log::trace!("avl: {description}");
        self.log.push(
            OpKind::Rotation,
            format!("{direction} rotation performed at node {key:?}"),
        );
        self.steps.push(RotationStep {
            case,
            key,
            description,
        });
    }

    fn record_case(&mut self, case: RotationCase, i: u32, bf: i32, detail: &str) {
        let key = self.arena[i].k.clone();
        let description = format!("Node {key:?} has balance {bf}. {detail}");
        log::trace!("avl: {case:?}: {description}");
        self.steps.push(RotationStep {
            case,
            key,
            description,
        });
    }

    /// Looks `key` up without modifying anything.
    pub fn search(&self, key: &K) -> SearchResult<K> {
        let (found, path) =
            util::search_path(self.arena.as_slice(), self.root, key, &self.comparator);
        SearchResult {
            found,
            path: self.keys(&path),
        }
    }

    pub fn min(&self) -> Option<&K> {
        util::first(self.arena.as_slice(), self.root).map(|i| &self.arena[i].k)
    }

    pub fn max(&self) -> Option<&K> {
        util::last(self.arena.as_slice(), self.root).map(|i| &self.arena[i].k)
    }

    pub fn inorder(&self) -> Vec<K> {
        self.keys(&util::inorder(self.arena.as_slice(), self.root))
    }

    pub fn preorder(&self) -> Vec<K> {
        self.keys(&util::preorder(self.arena.as_slice(), self.root))
    }

    pub fn postorder(&self) -> Vec<K> {
        self.keys(&util::postorder(self.arena.as_slice(), self.root))
    }

    pub fn level_order(&self) -> Vec<Vec<K>> {
        util::level_order(self.arena.as_slice(), self.root)
            .iter()
            .map(|level| self.keys(level))
            .collect()
    }

    /// Pre-order node list for renderers.
    pub fn all_nodes(&self) -> Vec<AvlNodeSnapshot<K>> {
        fn walk<K: Clone>(
            arena: &[AvlNode<K>],
            node: Option<u32>,
            depth: usize,
            out: &mut Vec<AvlNodeSnapshot<K>>,
        ) {
            let Some(i) = node else {
                return;
            };
            let n = &arena[i as usize];
            out.push(AvlNodeSnapshot {
                key: n.k.clone(),
                height: n.height,
                balance_factor: balance_factor(arena, node),
                depth,
            });
            walk(arena, n.l, depth + 1, out);
            walk(arena, n.r, depth + 1, out);
        }

        let mut out = Vec::with_capacity(self.len);
        walk(self.arena.as_slice(), self.root, 0, &mut out);
        out
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
        self.rotation_count = 0;
        self.steps.clear();
        self.log.push(OpKind::Info, "Tree cleared");
    }

    pub fn print(&self) -> String {
        print(self.arena.as_slice(), self.root, "")
    }

    fn keys(&self, idx: &[u32]) -> Vec<K> {
        idx.iter().map(|&i| self.arena[i].k.clone()).collect()
    }
}
