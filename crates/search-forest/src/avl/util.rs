use std::fmt::Debug;

use crate::print::print_binary;
use crate::util::assert_strict_order;

use super::types::AvlNode;

#[inline]
pub fn node_height<K>(arena: &[AvlNode<K>], node: Option<u32>) -> u32 {
    node.map_or(0, |i| arena[i as usize].height)
}

/// `height(left) - height(right)`, `0` for the empty subtree.
#[inline]
pub fn balance_factor<K>(arena: &[AvlNode<K>], node: Option<u32>) -> i32 {
    node.map_or(0, |i| {
        let n = &arena[i as usize];
        node_height(arena, n.l) as i32 - node_height(arena, n.r) as i32
    })
}

#[inline]
pub fn update_height<K>(arena: &mut [AvlNode<K>], i: u32) {
    let n = &arena[i as usize];
    let h = 1 + node_height(arena, n.l).max(node_height(arena, n.r));
    arena[i as usize].height = h;
}

/// Right rotation at `y`, returns the new subtree root (`y`'s left child).
///
/// ```text
///         y                x
///        / \              / \
///       x   T3    ->    T1   y
///      / \                  / \
///     T1  T2              T2  T3
/// ```
pub fn rotate_right<K>(arena: &mut [AvlNode<K>], y: u32) -> u32 {
    let x = arena[y as usize]
        .l
        .expect("right rotation needs a left child");
    let t2 = arena[x as usize].r;

    arena[x as usize].r = Some(y);
    arena[y as usize].l = t2;

    // y is now below x.
    update_height(arena, y);
    update_height(arena, x);
    x
}

/// Left rotation at `x`, returns the new subtree root (`x`'s right child).
pub fn rotate_left<K>(arena: &mut [AvlNode<K>], x: u32) -> u32 {
    let y = arena[x as usize]
        .r
        .expect("left rotation needs a right child");
    let t2 = arena[y as usize].l;

    arena[y as usize].l = Some(x);
    arena[x as usize].r = t2;

    update_height(arena, x);
    update_height(arena, y);
    y
}

/// Checks `|bf| <= 1` at every node using stored heights.
pub fn is_balanced<K>(arena: &[AvlNode<K>], node: Option<u32>) -> bool {
    let Some(i) = node else {
        return true;
    };
    let n = &arena[i as usize];
    balance_factor(arena, node).abs() <= 1 && is_balanced(arena, n.l) && is_balanced(arena, n.r)
}

/// Full structural check: stored heights, AVL balance and key order.
pub fn assert_avl_tree<K, C>(
    arena: &[AvlNode<K>],
    root: Option<u32>,
    comparator: &C,
) -> Result<(), String>
where
    C: Fn(&K, &K) -> i32,
{
    fn validate_heights<K>(arena: &[AvlNode<K>], node: Option<u32>) -> Result<u32, String> {
        let Some(i) = node else {
            return Ok(0);
        };
        let n = &arena[i as usize];
        let lh = validate_heights(arena, n.l)?;
        let rh = validate_heights(arena, n.r)?;
        let expected = 1 + lh.max(rh);
        if n.height != expected {
            return Err(format!(
                "Height mismatch: expected {expected}, got {}",
                n.height
            ));
        }
        if (lh as i32 - rh as i32).abs() > 1 {
            return Err("AVL balance violated".to_string());
        }
        Ok(expected)
    }

    validate_heights(arena, root)?;
    assert_strict_order(arena, root, comparator)
}

/// Debug printer for AVL trees.
pub fn print<K: Debug>(arena: &[AvlNode<K>], node: Option<u32>, tab: &str) -> String {
    print_binary(arena, node, tab, &|i, n: &AvlNode<K>| {
        format!(
            "Node[{i}] [h={}, bf={}] {:?}",
            n.height,
            balance_factor(arena, Some(i)),
            n.k
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_left() -> Vec<AvlNode<i32>> {
        // 30 <- 20 <- 10, heights already consistent for an unbalanced chain.
        let mut arena = vec![AvlNode::new(30), AvlNode::new(20), AvlNode::new(10)];
        arena[0].l = Some(1);
        arena[1].l = Some(2);
        update_height(&mut arena, 2);
        update_height(&mut arena, 1);
        update_height(&mut arena, 0);
        arena
    }

    #[test]
    fn rotate_right_recomputes_heights_bottom_up() {
        let mut arena = chain_left();
        assert_eq!(balance_factor(&arena, Some(0)), 2);
        assert!(!is_balanced(&arena, Some(0)));

        let root = rotate_right(&mut arena, 0);
        assert_eq!(arena[root as usize].k, 20);
        assert_eq!(arena[root as usize].height, 2);
        assert_eq!(arena[0].height, 1);
        assert!(is_balanced(&arena, Some(root)));
        assert_avl_tree(&arena, Some(root), &|a: &i32, b: &i32| a - b).unwrap();
    }

    #[test]
    fn rotate_left_then_right_restores_shape() {
        let mut arena = chain_left();
        let root = rotate_right(&mut arena, 0);
        let back = rotate_left(&mut arena, root);
        assert_eq!(back, 0);
        assert_eq!(arena[0].height, 3);
    }

    #[test]
    fn detects_stale_height() {
        let mut arena = chain_left();
        let root = rotate_right(&mut arena, 0);
        arena[root as usize].height = 7;
        let err = assert_avl_tree(&arena, Some(root), &|a: &i32, b: &i32| a - b).unwrap_err();
        assert!(err.starts_with("Height mismatch"));
    }
}
