use std::fmt::Debug;

use crate::oplog::{OpKind, OperationLog};
use crate::types::{default_comparator, RotationCase, RotationStep, SearchResult, TreeStats};
use crate::util::{self, NodeArena};

use super::types::{Color, ColoredKey, RbNode, RbNodeSnapshot, Verification};
use super::util::{
    assert_red_black_tree, is_black, print, rotate_left, rotate_right, set_color, transplant,
    verify,
};

// Fixup case descriptions, insert cases then delete cases.
const RED_UNCLE: &str = "Uncle is RED. Recoloring parent and uncle BLACK, grandparent RED.";
const BLACK_UNCLE_INNER: &str =
    "Uncle is BLACK and node is an inner grandchild. Rotating at parent.";
const BLACK_UNCLE_OUTER: &str =
    "Uncle is BLACK and node is an outer grandchild. Recoloring and rotating at grandparent.";
const RED_SIBLING: &str = "Sibling is RED. Recolor sibling BLACK, parent RED, rotate at parent.";
const BLACK_NEPHEWS: &str = "Sibling's children are both BLACK. Recolor sibling RED, move up.";
const NEAR_NEPHEW_RED: &str = "Far nephew is BLACK. Recolor and rotate at sibling.";
const FAR_NEPHEW_RED: &str = "Far nephew is RED. Recolor and rotate at parent.";

/// Color-balanced ordered set.
///
/// Nodes carry parent links so the fixups can walk upwards; the NIL leaf is
/// a `None` link. Duplicate keys are rejected. An insert performs at most two
/// rotations and a delete at most three.
pub struct RbTree<K, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    arena: NodeArena<RbNode<K>>,
    root: Option<u32>,
    len: usize,
    comparator: C,
    rotation_count: usize,
    steps: Vec<RotationStep<K>>,
    log: OperationLog,
}

impl<K> RbTree<K, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }
}

impl<K> Default for RbTree<K, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> RbTree<K, C>
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

    pub fn height(&self) -> usize {
        util::height(self.arena.as_slice(), self.root)
    }

    pub fn rotation_count(&self) -> usize {
        self.rotation_count
    }

    pub fn contains(&self, key: &K) -> bool {
        util::find(self.arena.as_slice(), self.root, key, &self.comparator).is_some()
    }

    pub fn root_color(&self) -> Option<Color> {
        self.root.map(|r| self.arena[r].color)
    }

    pub fn last_rotation_steps(&self) -> &[RotationStep<K>] {
        &self.steps
    }

    pub fn operation_log(&self) -> &OperationLog {
        &self.log
    }

    /// Ascending iteration over the keys.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        let arena = self.arena.as_slice();
        let mut curr = util::first(arena, self.root);
        std::iter::from_fn(move || {
            let i = curr?;
            curr = util::next(arena, i);
            Some(&arena[i as usize].k)
        })
    }

    /// Descending iteration over the keys.
    pub fn iter_rev(&self) -> impl Iterator<Item = &K> + '_ {
        let arena = self.arena.as_slice();
        let mut curr = util::last(arena, self.root);
        std::iter::from_fn(move || {
            let i = curr?;
            curr = util::prev(arena, i);
            Some(&arena[i as usize].k)
        })
    }

    pub fn min(&self) -> Option<&K> {
        self.iter().next()
    }

    pub fn max(&self) -> Option<&K> {
        self.iter_rev().next()
    }
}

impl<K, C> RbTree<K, C>
where
    K: Clone + Debug,
    C: Fn(&K, &K) -> i32,
{
    pub fn verify(&self) -> Verification {
        verify(self.arena.as_slice(), self.root, &self.comparator)
    }

    pub fn is_balanced(&self) -> bool {
        self.verify().valid
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        assert_red_black_tree(self.arena.as_slice(), self.root, &self.comparator)?;
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
        let report = self.verify();
        TreeStats {
            node_count: self.len,
            height: self.height(),
            rotation_count: self.rotation_count,
            is_balanced: report.valid,
            black_height: Some(report.black_height),
        }
    }

    /// Inserts `key` as a red node and repairs the coloring. Returns `false`
    /// when the key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.steps.clear();

        let mut parent = None;
        let mut go_left = false;
        let mut curr = self.root;
        while let Some(i) = curr {
            let cmp = (self.comparator)(&key, &self.arena[i].k);
            if cmp == 0 {
                log::trace!("rb: duplicate key {key:?} rejected");
                return false;
            }
            parent = Some(i);
            go_left = cmp < 0;
            curr = if go_left {
                self.arena[i].l
            } else {
                self.arena[i].r
            };
        }

        let message = format!("Inserted {key:?}");
        let n = self.arena.alloc(RbNode::new(key));
        self.arena[n].p = parent;
        self.len += 1;
        match parent {
            None => {
                self.root = Some(n);
                self.arena[n].color = Color::Black;
                self.log
                    .push(OpKind::Insert, format!("{message} as root (colored BLACK)"));
                return true;
            }
            Some(p) if go_left => self.arena[p].l = Some(n),
            Some(p) => self.arena[p].r = Some(n),
        }

        self.insert_fixup(n);
        self.log.push(OpKind::Insert, message);
        true
    }

    fn insert_fixup(&mut self, mut z: u32) {
        while let Some(p) = self.arena[z].p {
            if self.arena[p].color == Color::Black {
                break;
            }
            let g = self.arena[p].p.expect("red parent is never the root");
            let parent_is_left = self.arena[g].l == Some(p);
            let uncle = if parent_is_left {
                self.arena[g].r
            } else {
                self.arena[g].l
            };

            if let Some(u) = uncle.filter(|&u| self.arena[u].color == Color::Red) {
                self.record_case(RotationCase::RedUncle, z, RED_UNCLE);
                let arena = self.arena.as_mut_slice();
                set_color(arena, p, Color::Black);
                set_color(arena, u, Color::Black);
                set_color(arena, g, Color::Red);
                z = g;
                continue;
            }

            let z_is_left = self.arena[p].l == Some(z);
            if z_is_left != parent_is_left {
                self.record_case(RotationCase::BlackUncleInner, z, BLACK_UNCLE_INNER);
                z = p;
                if parent_is_left {
                    self.rotate_left(z);
                } else {
                    self.rotate_right(z);
                }
            }

            self.record_case(RotationCase::BlackUncleOuter, z, BLACK_UNCLE_OUTER);
            let p = self.arena[z].p.expect("outer grandchild has a parent");
            let g = self.arena[p].p.expect("outer grandchild has a grandparent");
            set_color(self.arena.as_mut_slice(), p, Color::Black);
            set_color(self.arena.as_mut_slice(), g, Color::Red);
            if parent_is_left {
                self.rotate_right(g);
            } else {
                self.rotate_left(g);
            }
        }

        if let Some(r) = self.root {
            set_color(self.arena.as_mut_slice(), r, Color::Black);
        }
    }

    /// Removes `key`. Returns `false` when it is not present.
    pub fn delete(&mut self, key: &K) -> bool {
        self.steps.clear();
        let Some(z) = util::find(self.arena.as_slice(), self.root, key, &self.comparator) else {
            log::trace!("rb: delete of missing key {key:?}");
            return false;
        };

        let (zl, zr, zp) = (self.arena[z].l, self.arena[z].r, self.arena[z].p);
        let mut removed_color = self.arena[z].color;
        // `x` takes the removed node's position; it may be NIL, so its
        // parent is tracked on the side.
        let x;
        let x_parent;

        match (zl, zr) {
            (None, _) => {
                x = zr;
                x_parent = zp;
                self.root = transplant(self.arena.as_mut_slice(), self.root, z, zr);
            }
            (Some(_), None) => {
                x = zl;
                x_parent = zp;
                self.root = transplant(self.arena.as_mut_slice(), self.root, z, zl);
            }
            (Some(zl), Some(zr)) => {
                let y = util::first(self.arena.as_slice(), Some(zr))
                    .expect("right subtree is not empty");
                removed_color = self.arena[y].color;
                x = self.arena[y].r;
                if self.arena[y].p == Some(z) {
                    x_parent = Some(y);
                } else {
                    x_parent = self.arena[y].p;
                    self.root = transplant(self.arena.as_mut_slice(), self.root, y, x);
                    self.arena[y].r = Some(zr);
                    self.arena[zr].p = Some(y);
                }
                self.root = transplant(self.arena.as_mut_slice(), self.root, z, Some(y));
                self.arena[y].l = Some(zl);
                self.arena[zl].p = Some(y);
                self.arena[y].color = self.arena[z].color;
            }
        }

        self.arena.release(z);
        self.len -= 1;

        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }

        self.log.push(OpKind::Delete, format!("Deleted {key:?}"));
        true
    }

    fn delete_fixup(&mut self, mut x: Option<u32>, mut parent: Option<u32>) {
        while x != self.root && is_black(self.arena.as_slice(), x) {
            let Some(p) = parent else {
                break;
            };
            let x_is_left = self.arena[p].l == x;
            let sibling = |arena: &NodeArena<RbNode<K>>| {
                let s = if x_is_left { arena[p].r } else { arena[p].l };
                s.expect("doubly black node has a sibling")
            };

            let mut w = sibling(&self.arena);
            if self.arena[w].color == Color::Red {
                self.record_case_at(RotationCase::RedSibling, x, p, RED_SIBLING);
                set_color(self.arena.as_mut_slice(), w, Color::Black);
                set_color(self.arena.as_mut_slice(), p, Color::Red);
                if x_is_left {
                    self.rotate_left(p);
                } else {
                    self.rotate_right(p);
                }
                w = sibling(&self.arena);
            }

            let (near, far) = if x_is_left {
                (self.arena[w].l, self.arena[w].r)
            } else {
                (self.arena[w].r, self.arena[w].l)
            };
            let near_black = is_black(self.arena.as_slice(), near);
            let far_black = is_black(self.arena.as_slice(), far);
            if near_black && far_black {
                self.record_case_at(RotationCase::BlackNephews, x, p, BLACK_NEPHEWS);
                set_color(self.arena.as_mut_slice(), w, Color::Red);
                x = Some(p);
                parent = self.arena[p].p;
                continue;
            }

            if far_black {
                self.record_case_at(RotationCase::NearNephewRed, x, p, NEAR_NEPHEW_RED);
                let near = near.expect("red near nephew exists");
                set_color(self.arena.as_mut_slice(), near, Color::Black);
                set_color(self.arena.as_mut_slice(), w, Color::Red);
                if x_is_left {
                    self.rotate_right(w);
                } else {
                    self.rotate_left(w);
                }
                w = sibling(&self.arena);
            }

            self.record_case_at(RotationCase::FarNephewRed, x, p, FAR_NEPHEW_RED);
            let far = if x_is_left {
                self.arena[w].r
            } else {
                self.arena[w].l
            };
            let parent_color = self.arena[p].color;
            set_color(self.arena.as_mut_slice(), w, parent_color);
            set_color(self.arena.as_mut_slice(), p, Color::Black);
            if let Some(far) = far {
                set_color(self.arena.as_mut_slice(), far, Color::Black);
            }
            if x_is_left {
                self.rotate_left(p);
            } else {
                self.rotate_right(p);
            }
            x = self.root;
            parent = None;
        }

        if let Some(x) = x {
            set_color(self.arena.as_mut_slice(), x, Color::Black);
        }
    }

    fn rotate_left(&mut self, x: u32) {
        self.root = rotate_left(self.arena.as_mut_slice(), self.root, x);
        self.record_rotation(RotationCase::LeftRotation, x);
    }

    fn rotate_right(&mut self, y: u32) {
        self.root = rotate_right(self.arena.as_mut_slice(), self.root, y);
        self.record_rotation(RotationCase::RightRotation, y);
    }

    fn record_rotation(&mut self, case: RotationCase, pivot: u32) {
        self.rotation_count += 1;
        let key = self.arena[pivot].k.clone();
        let (name, risen) = if case == RotationCase::LeftRotation {
            ("Left", "Right")
        } else {
            ("Right", "Left")
        };
        let new_parent = self.arena[pivot].p.map(|i| &self.arena[i].k);
        let description = format!(
            "{name} rotation at node {key:?}. {risen} child {new_parent:?} becomes new parent."
        );
        log::trace!("rb: {description}");
        self.log.push(
            OpKind::Rotation,
            format!("{name} rotation performed at node {key:?}"),
        );
        self.steps.push(RotationStep {
            case,
            key,
            description,
        });
    }

    fn record_case(&mut self, case: RotationCase, i: u32, description: &str) {
        let key = self.arena[i].k.clone();
        log::trace!("rb: {case:?} at {key:?}");
        self.steps.push(RotationStep {
            case,
            key,
            description: description.to_string(),
        });
    }

    /// Delete cases are keyed by the fixup cursor, which may be NIL; the
    /// parent's key stands in for it then.
    fn record_case_at(&mut self, case: RotationCase, x: Option<u32>, p: u32, description: &str) {
        self.record_case(case, x.unwrap_or(p), description);
    }

    pub fn search(&self, key: &K) -> SearchResult<K> {
        let (found, path) =
            util::search_path(self.arena.as_slice(), self.root, key, &self.comparator);
        SearchResult {
            found,
            path: path.iter().map(|&i| self.arena[i].k.clone()).collect(),
        }
    }

    pub fn inorder(&self) -> Vec<K> {
        self.iter().cloned().collect()
    }

    pub fn inorder_colored(&self) -> Vec<ColoredKey<K>> {
        self.colored(&util::inorder(self.arena.as_slice(), self.root))
    }

    pub fn preorder(&self) -> Vec<K> {
        util::preorder(self.arena.as_slice(), self.root)
            .into_iter()
            .map(|i| self.arena[i].k.clone())
            .collect()
    }

    pub fn postorder(&self) -> Vec<K> {
        util::postorder(self.arena.as_slice(), self.root)
            .into_iter()
            .map(|i| self.arena[i].k.clone())
            .collect()
    }

    pub fn level_order(&self) -> Vec<Vec<ColoredKey<K>>> {
        util::level_order(self.arena.as_slice(), self.root)
            .iter()
            .map(|level| self.colored(level))
            .collect()
    }

    /// Pre-order node list for renderers.
    pub fn all_nodes(&self) -> Vec<RbNodeSnapshot<K>> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<(u32, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();
        while let Some((i, depth)) = stack.pop() {
            let n = &self.arena[i];
            out.push(RbNodeSnapshot {
                key: n.k.clone(),
                color: n.color,
                depth,
            });
            stack.extend(n.r.map(|r| (r, depth + 1)));
            stack.extend(n.l.map(|l| (l, depth + 1)));
        }
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

    fn colored(&self, idx: &[u32]) -> Vec<ColoredKey<K>> {
        idx.iter()
            .map(|&i| ColoredKey {
                key: self.arena[i].k.clone(),
                color: self.arena[i].color,
            })
            .collect()
    }
}
