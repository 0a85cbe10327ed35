use std::fmt::Debug;

use crate::error::Violation;
use crate::print::print_binary;
use crate::util::inorder;

use super::types::{Color, RbNode, Verification};

/// NIL (`None`) is black.
#[inline]
pub fn is_black<K>(arena: &[RbNode<K>], node: Option<u32>) -> bool {
    node.map_or(true, |i| arena[i as usize].color == Color::Black)
}

#[inline]
pub fn set_color<K>(arena: &mut [RbNode<K>], i: u32, color: Color) {
    arena[i as usize].color = color;
}

/// Re-links `x`'s parent to `to` in place of `x`. Returns the new root.
fn replace_child<K>(
    arena: &mut [RbNode<K>],
    root: Option<u32>,
    x: u32,
    to: Option<u32>,
) -> Option<u32> {
    match arena[x as usize].p {
        None => to,
        Some(p) => {
            if arena[p as usize].l == Some(x) {
                arena[p as usize].l = to;
            } else {
                arena[p as usize].r = to;
            }
            root
        }
    }
}

/// Puts subtree `v` where `u` was. `v`'s parent is updated unless it is
/// NIL; `u` keeps its own links. Returns the new root.
pub fn transplant<K>(
    arena: &mut [RbNode<K>],
    root: Option<u32>,
    u: u32,
    v: Option<u32>,
) -> Option<u32> {
    let root = replace_child(arena, root, u, v);
    if let Some(v) = v {
        arena[v as usize].p = arena[u as usize].p;
    }
    root
}

/// Left rotation at `x`. Returns the new root of the whole tree.
///
/// ```text
///       x                y
///      / \              / \
///     a   y     ->     x   c
///        / \          / \
///       b   c        a   b
/// ```
pub fn rotate_left<K>(arena: &mut [RbNode<K>], root: Option<u32>, x: u32) -> Option<u32> {
    let y = arena[x as usize]
        .r
        .expect("left rotation needs a right child");
    let b = arena[y as usize].l;

    arena[x as usize].r = b;
    if let Some(b) = b {
        arena[b as usize].p = Some(x);
    }
    let root = replace_child(arena, root, x, Some(y));
    arena[y as usize].p = arena[x as usize].p;
    arena[y as usize].l = Some(x);
    arena[x as usize].p = Some(y);
    root
}

/// Right rotation at `y`. Returns the new root of the whole tree.
pub fn rotate_right<K>(arena: &mut [RbNode<K>], root: Option<u32>, y: u32) -> Option<u32> {
    let x = arena[y as usize]
        .l
        .expect("right rotation needs a left child");
    let b = arena[x as usize].r;

    arena[y as usize].l = b;
    if let Some(b) = b {
        arena[b as usize].p = Some(y);
    }
    let root = replace_child(arena, root, y, Some(x));
    arena[x as usize].p = arena[y as usize].p;
    arena[x as usize].r = Some(y);
    arena[y as usize].p = Some(x);
    root
}

/// Checks every red-black property plus parent links and key order.
pub fn verify<K, C>(arena: &[RbNode<K>], root: Option<u32>, comparator: &C) -> Verification
where
    K: Debug,
    C: Fn(&K, &K) -> i32,
{
    // Black nodes from `node` down to a leaf, counting both ends.
    fn walk<K: Debug>(
        arena: &[RbNode<K>],
        node: Option<u32>,
        violations: &mut Vec<Violation>,
    ) -> usize {
        let Some(i) = node else {
            return 1;
        };
        let n = &arena[i as usize];
        for child in [n.l, n.r].into_iter().flatten() {
            if arena[child as usize].p != Some(i) {
                violations.push(Violation::ParentLink(format!("{:?}", n.k)));
            }
        }
        if n.color == Color::Red && (!is_black(arena, n.l) || !is_black(arena, n.r)) {
            violations.push(Violation::RedRed(format!("{:?}", n.k)));
        }

        let left = walk(arena, n.l, violations);
        let right = walk(arena, n.r, violations);
        if left != right {
            violations.push(Violation::BlackHeightMismatch {
                key: format!("{:?}", n.k),
                left,
                right,
            });
        }
        left + usize::from(n.color == Color::Black)
    }

    let mut violations = Vec::new();
    let Some(r) = root else {
        return Verification {
            valid: true,
            violations,
            black_height: 0,
        };
    };

    if arena[r as usize].color != Color::Black {
        violations.push(Violation::RedRoot);
    }
    if arena[r as usize].p.is_some() {
        violations.push(Violation::ParentLink(format!("{:?}", arena[r as usize].k)));
    }
    let counted = walk(arena, root, &mut violations);
    let black_height = counted - usize::from(arena[r as usize].color == Color::Black);

    let order = inorder(arena, root);
    for pair in order.windows(2) {
        let (a, b) = (&arena[pair[0] as usize].k, &arena[pair[1] as usize].k);
        if comparator(a, b) >= 0 {
            violations.push(Violation::Order(format!("{b:?}")));
        }
    }

    Verification {
        valid: violations.is_empty(),
        violations,
        black_height,
    }
}

/// [`verify`] collapsed into the `Result` form used by `assert_valid`.
pub fn assert_red_black_tree<K, C>(
    arena: &[RbNode<K>],
    root: Option<u32>,
    comparator: &C,
) -> Result<(), String>
where
    K: Debug,
    C: Fn(&K, &K) -> i32,
{
    let report = verify(arena, root, comparator);
    match report.violations.first() {
        None => Ok(()),
        Some(v) => Err(v.to_string()),
    }
}

/// Debug printer for red-black trees.
pub fn print<K: Debug>(arena: &[RbNode<K>], node: Option<u32>, tab: &str) -> String {
    print_binary(arena, node, tab, &|i, n: &RbNode<K>| {
        format!("Node[{i}] {} {:?}", n.color, n.k)
    })
}
