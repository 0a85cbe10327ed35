//! Arena tree utility functions.
//!
//! Read-only helpers work on any [`Node`] arena. `first`/`next` need parent
//! links and so require [`ParentNode`].

pub mod arena;

use std::collections::VecDeque;

use crate::types::{KeyNode, Node, ParentNode};

pub use arena::NodeArena;

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn get_p<N: ParentNode>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

/// Leftmost node in the tree.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(l) = get_l(arena, curr) {
        curr = l;
    }
    Some(curr)
}

/// Rightmost node in the tree.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(r) = get_r(arena, curr) {
        curr = r;
    }
    Some(curr)
}

/// In-order successor.
pub fn next<N: ParentNode>(arena: &[N], mut curr: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, curr) {
        return first(arena, Some(r));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: ParentNode>(arena: &[N], mut curr: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, curr) {
        return last(arena, Some(l));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// Number of nodes under `root`.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |i| {
        1 + size(arena, get_l(arena, i)) + size(arena, get_r(arena, i))
    })
}

/// Height of the subtree under `root`, counting nodes. Empty is 0.
pub fn height<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |i| {
        1 + height(arena, get_l(arena, i)).max(height(arena, get_r(arena, i)))
    })
}

/// Finds a node by key.
pub fn find<N, K, C>(arena: &[N], root: Option<u32>, key: &K, comparator: &C) -> Option<u32>
where
    N: KeyNode<K>,
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    while let Some(i) = curr {
        let cmp = comparator(key, arena[i as usize].key());
        if cmp == 0 {
            return Some(i);
        }
        curr = if cmp < 0 {
            get_l(arena, i)
        } else {
            get_r(arena, i)
        };
    }
    None
}

/// Iterative descent towards `key`.
///
/// Returns the visited node indices and whether the last one holds `key`.
pub fn search_path<N, K, C>(
    arena: &[N],
    root: Option<u32>,
    key: &K,
    comparator: &C,
) -> (bool, Vec<u32>)
where
    N: KeyNode<K>,
    C: Fn(&K, &K) -> i32,
{
    let mut path = Vec::new();
    let mut curr = root;
    while let Some(i) = curr {
        path.push(i);
        let cmp = comparator(key, arena[i as usize].key());
        if cmp == 0 {
            return (true, path);
        }
        curr = if cmp < 0 {
            get_l(arena, i)
        } else {
            get_r(arena, i)
        };
    }
    (false, path)
}

pub fn inorder<N: Node>(arena: &[N], root: Option<u32>) -> Vec<u32> {
    fn walk<N: Node>(arena: &[N], node: Option<u32>, out: &mut Vec<u32>) {
        if let Some(i) = node {
            walk(arena, get_l(arena, i), out);
            out.push(i);
            walk(arena, get_r(arena, i), out);
        }
    }
    let mut out = Vec::new();
    walk(arena, root, &mut out);
    out
}

pub fn preorder<N: Node>(arena: &[N], root: Option<u32>) -> Vec<u32> {
    fn walk<N: Node>(arena: &[N], node: Option<u32>, out: &mut Vec<u32>) {
        if let Some(i) = node {
            out.push(i);
            walk(arena, get_l(arena, i), out);
            walk(arena, get_r(arena, i), out);
        }
    }
    let mut out = Vec::new();
    walk(arena, root, &mut out);
    out
}

pub fn postorder<N: Node>(arena: &[N], root: Option<u32>) -> Vec<u32> {
    fn walk<N: Node>(arena: &[N], node: Option<u32>, out: &mut Vec<u32>) {
        if let Some(i) = node {
            walk(arena, get_l(arena, i), out);
            walk(arena, get_r(arena, i), out);
            out.push(i);
        }
    }
    let mut out = Vec::new();
    walk(arena, root, &mut out);
    out
}

/// Breadth-first traversal, one vector per depth.
pub fn level_order<N: Node>(arena: &[N], root: Option<u32>) -> Vec<Vec<u32>> {
    let mut levels = Vec::new();
    let mut queue: VecDeque<u32> = root.into_iter().collect();
    while !queue.is_empty() {
        let mut level = Vec::with_capacity(queue.len());
        for _ in 0..queue.len() {
            let Some(i) = queue.pop_front() else {
                break;
            };
            level.push(i);
            queue.extend(get_l(arena, i));
            queue.extend(get_r(arena, i));
        }
        levels.push(level);
    }
    levels
}

/// Checks that in-order keys are strictly increasing.
pub(crate) fn assert_strict_order<N, K, C>(
    arena: &[N],
    root: Option<u32>,
    comparator: &C,
) -> Result<(), String>
where
    N: KeyNode<K>,
    C: Fn(&K, &K) -> i32,
{
    let order = inorder(arena, root);
    for pair in order.windows(2) {
        let cmp = comparator(arena[pair[0] as usize].key(), arena[pair[1] as usize].key());
        if cmp >= 0 {
            return Err("Node order violated".to_string());
        }
    }
    Ok(())
}
