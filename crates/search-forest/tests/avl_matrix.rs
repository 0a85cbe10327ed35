use search_forest::avl::AvlTree;
use search_forest::{OpKind, RotationCase};
use search_forest_util::Fuzzer;

fn cases(tree: &AvlTree<i32>) -> Vec<RotationCase> {
    tree.last_rotation_steps().iter().map(|s| s.case).collect()
}

#[test]
fn avl_right_right_matrix() {
    let mut tree = AvlTree::new();
    for k in [10, 20, 30] {
        assert!(tree.insert(k));
        tree.assert_valid().unwrap();
    }
    assert_eq!(tree.level_order(), vec![vec![20], vec![10, 30]]);
    assert_eq!(
        cases(&tree),
        vec![RotationCase::RightRight, RotationCase::LeftRotation]
    );
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.rotation_count(), 1);
}

#[test]
fn avl_left_right_matrix() {
    let mut tree = AvlTree::new();
    for k in [30, 10, 20] {
        tree.insert(k);
    }
    assert_eq!(tree.preorder(), vec![20, 10, 30]);
    assert!(tree.is_balanced());

    let steps = tree.last_rotation_steps();
    assert_eq!(steps[0].key, 30);
    assert_eq!(
        steps[0].description,
        "Node 30 has balance 2. New key is in the right subtree of the left child. \
         Performing double rotation."
    );
    assert_eq!(steps[1].key, 10);
    assert_eq!(steps[2].key, 30);
}

#[test]
fn avl_right_left_and_left_left_matrix() {
    let mut tree = AvlTree::new();
    for k in [10, 30, 20] {
        tree.insert(k);
    }
    assert_eq!(cases(&tree)[0], RotationCase::RightLeft);
    assert_eq!(tree.preorder(), vec![20, 10, 30]);

    let mut tree = AvlTree::new();
    for k in [30, 20, 10] {
        tree.insert(k);
    }
    assert_eq!(
        cases(&tree),
        vec![RotationCase::LeftLeft, RotationCase::RightRotation]
    );
    assert_eq!(tree.preorder(), vec![20, 10, 30]);
}

#[test]
fn avl_duplicate_rejected_matrix() {
    let mut tree = AvlTree::new();
    assert!(tree.insert(5));
    let before = tree.operation_log().len();
    assert!(!tree.insert(5));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.operation_log().len(), before);
    assert!(tree.last_rotation_steps().is_empty());
}

#[test]
fn avl_delete_matrix() {
    let mut tree = AvlTree::new();
    for k in [50, 30, 70, 20, 40, 60, 80, 10] {
        tree.insert(k);
    }
    // Two children: successor 40 takes 30's place.
    assert!(tree.delete(&30));
    tree.assert_valid().unwrap();
    assert_eq!(tree.inorder(), vec![10, 20, 40, 50, 60, 70, 80]);

    // Leaf deletes that unbalance the left side.
    assert!(tree.delete(&60));
    assert!(tree.delete(&80));
    assert!(tree.delete(&70));
    tree.assert_valid().unwrap();
    assert_eq!(tree.inorder(), vec![10, 20, 40, 50]);

    assert!(!tree.delete(&999));
    assert_eq!(tree.len(), 4);
    assert_eq!(
        tree.operation_log().last().map(|e| e.kind),
        Some(OpKind::Delete)
    );
}

#[test]
fn avl_delete_root_until_empty_matrix() {
    let mut tree = AvlTree::new();
    for k in 1..=31 {
        tree.insert(k);
    }
    assert_eq!(tree.height(), 5);
    while let Some(&root) = tree.preorder().first() {
        assert!(tree.delete(&root));
        tree.assert_valid().unwrap();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
}

#[test]
fn avl_search_path_matrix() {
    let mut tree = AvlTree::new();
    for k in [10, 20, 30, 40, 50] {
        tree.insert(k);
    }
    let hit = tree.search(&50);
    assert!(hit.found);
    assert_eq!(hit.path, vec![20, 40, 50]);

    let miss = tree.search(&35);
    assert!(!miss.found);
    assert_eq!(miss.path, vec![20, 40, 30]);
}

#[test]
fn avl_search_is_read_only_matrix() {
    let mut tree = AvlTree::new();
    for k in [8, 3, 10, 1, 6, 14, 4, 7, 13] {
        tree.insert(k);
    }
    let stats = tree.stats();
    let log_len = tree.operation_log().len();
    for k in 0..20 {
        tree.search(&k);
        tree.contains(&k);
    }
    assert_eq!(tree.stats(), stats);
    assert_eq!(tree.operation_log().len(), log_len);
}

#[test]
fn avl_empty_tree_matrix() {
    let mut tree = AvlTree::<i32>::new();
    let result = tree.search(&1);
    assert!(!result.found);
    assert!(result.path.is_empty());
    assert!(!tree.delete(&1));
    assert_eq!(tree.min(), None);
    assert_eq!(tree.max(), None);
    assert!(tree.inorder().is_empty());
    assert!(tree.level_order().is_empty());
    assert_eq!(tree.print(), "∅");
    assert!(tree.is_balanced());
    tree.assert_valid().unwrap();
}

#[test]
fn avl_traversals_matrix() {
    let mut tree = AvlTree::new();
    for k in [4, 2, 6, 1, 3, 5, 7] {
        tree.insert(k);
    }
    assert_eq!(tree.inorder(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(tree.preorder(), vec![4, 2, 1, 3, 6, 5, 7]);
    assert_eq!(tree.postorder(), vec![1, 3, 2, 5, 7, 6, 4]);
    assert_eq!(tree.min(), Some(&1));
    assert_eq!(tree.max(), Some(&7));

    let nodes = tree.all_nodes();
    assert_eq!(nodes.len(), 7);
    assert_eq!((nodes[0].key, nodes[0].height, nodes[0].depth), (4, 3, 0));
    assert!(nodes.iter().all(|n| n.balance_factor == 0));
}

#[test]
fn avl_custom_comparator_matrix() {
    let mut tree = AvlTree::with_comparator(|a: &i32, b: &i32| b - a);
    for k in 1..=7 {
        tree.insert(k);
    }
    assert_eq!(tree.inorder(), vec![7, 6, 5, 4, 3, 2, 1]);
    tree.assert_valid().unwrap();

    let mut words = AvlTree::with_comparator(|a: &String, b: &String| {
        a.len() as i32 - b.len() as i32
    });
    assert!(words.insert("ab".to_string()));
    assert!(!words.insert("cd".to_string()));
    assert!(words.insert("abc".to_string()));
    assert_eq!(words.len(), 2);
}

#[test]
fn avl_clear_and_log_matrix() {
    let mut tree = AvlTree::new().with_log_capacity(4);
    for k in 1..=10 {
        tree.insert(k);
    }
    assert_eq!(tree.operation_log().len(), 4);
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.rotation_count(), 0);
    let last = tree.operation_log().last().unwrap();
    assert_eq!(last.kind, OpKind::Info);
    assert_eq!(last.message, "Tree cleared");
    assert!(tree.insert(1));
}

#[test]
fn avl_snapshot_serialization_matrix() {
    let mut tree = AvlTree::new();
    for k in [10, 20, 30] {
        tree.insert(k);
    }
    assert_eq!(
        serde_json::to_value(tree.stats()).unwrap(),
        serde_json::json!({
            "node_count": 3,
            "height": 2,
            "rotation_count": 1,
            "is_balanced": true,
        })
    );
    assert_eq!(
        serde_json::to_value(&tree.all_nodes()[0]).unwrap(),
        serde_json::json!({"key": 20, "height": 2, "balance_factor": 0, "depth": 0})
    );
    assert_eq!(
        serde_json::to_value(tree.search(&30)).unwrap(),
        serde_json::json!({"found": true, "path": [20, 30]})
    );
}

#[test]
fn avl_fuzzer_ladder_matrix() {
    for seed in 0..16 {
        let fuzzer = Fuzzer::new(Some(seed));
        let keys = fuzzer.shuffled(0, 199);
        let mut tree = AvlTree::new();
        for &k in &keys {
            assert!(tree.insert(k), "seed {seed}");
        }
        tree.assert_valid().unwrap();
        let bound = 1.44 * ((tree.len() + 2) as f64).log2();
        assert!((tree.height() as f64) <= bound, "seed {seed}");

        for &k in keys.iter().filter(|_| fuzzer.random_bool(0.6)) {
            assert!(tree.delete(&k), "seed {seed}");
            if let Err(err) = tree.assert_valid() {
                panic!("seed {seed}, after deleting {k}: {err}\n{}", tree.print());
            }
        }
        let mut expected: Vec<i64> = keys.iter().copied().filter(|k| tree.contains(k)).collect();
        expected.sort_unstable();
        assert_eq!(tree.inorder(), expected);
    }
}

mod property_based {
    use std::collections::BTreeSet;

    use search_forest::avl::AvlTree;

    proptest::proptest! {
        #[test]
        /// Any mix of inserts and deletes keeps the tree balanced and in
        /// agreement with a `BTreeSet`.
        fn matches_btree_set(ops: Vec<(bool, u8)>) {
            let mut tree = AvlTree::new();
            let mut model = BTreeSet::new();
            for (insert, key) in ops {
                if insert {
                    proptest::prop_assert_eq!(tree.insert(key), model.insert(key));
                } else {
                    proptest::prop_assert_eq!(tree.delete(&key), model.remove(&key));
                }
                proptest::prop_assert!(tree.assert_valid().is_ok());
            }
            proptest::prop_assert_eq!(tree.inorder(), model.into_iter().collect::<Vec<_>>());
        }
    }
}
