//! Property tests for the structural diff engine.

use proptest::prelude::*;
use stackdiff_core::diff::compute_structural_diff;
use stackdiff_core::tree::{Tree, Value};
use std::collections::BTreeSet;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-5i64..5).prop_map(Value::Integer),
        prop_oneof![Just(i64::MIN), Just(i64::MAX)].prop_map(Value::Integer),
        (0u64..3).prop_map(|d| Value::UInteger(u64::MAX - d)),
        prop_oneof![
            Just(f64::NAN),
            Just(0.0),
            Just(-0.0),
            Just(f64::INFINITY),
            (-2.0f64..2.0),
        ]
        .prop_map(Value::Float),
        "[a-c]{0,2}".prop_map(Value::String),
        prop::collection::vec(
            prop_oneof![
                (-2i64..2).prop_map(Value::Integer),
                Just(Value::Float(f64::NAN)),
            ],
            0..3
        )
        .prop_map(Value::Sequence),
    ]
}

fn arb_tree() -> impl Strategy<Value = Tree> {
    let value = leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-e]", inner, 0..4)
            .prop_map(|m| Value::Tree(m.into_iter().collect()))
    });
    prop::collection::btree_map("[a-e]", value, 0..5).prop_map(|m| m.into_iter().collect())
}

fn as_set(paths: &[String]) -> BTreeSet<String> {
    paths.iter().cloned().collect()
}

proptest! {
    #[test]
    fn prop_self_diff_has_no_differences(a in arb_tree()) {
        let diff = compute_structural_diff(&a, &a);

        prop_assert!(diff.left_not_right.is_empty());
        prop_assert!(diff.right_not_left.is_empty());
        prop_assert!(diff.same_key_diff_value.is_empty());
        prop_assert_eq!(as_set(&diff.same_key_same_value), as_set(&a.leaf_paths()));
    }

    #[test]
    fn prop_swapping_inputs_swaps_one_sided_lists(a in arb_tree(), b in arb_tree()) {
        let forward = compute_structural_diff(&a, &b);
        let backward = compute_structural_diff(&b, &a);

        prop_assert_eq!(as_set(&forward.left_not_right), as_set(&backward.right_not_left));
        prop_assert_eq!(as_set(&forward.right_not_left), as_set(&backward.left_not_right));
        prop_assert_eq!(as_set(&forward.same_key_same_value), as_set(&backward.same_key_same_value));
        prop_assert_eq!(as_set(&forward.same_key_diff_value), as_set(&backward.same_key_diff_value));
    }

    #[test]
    fn prop_every_path_is_classified_once(a in arb_tree(), b in arb_tree()) {
        let diff = compute_structural_diff(&a, &b);
        let mut seen = BTreeSet::new();
        for path in diff
            .left_not_right
            .iter()
            .chain(&diff.right_not_left)
            .chain(&diff.same_key_same_value)
            .chain(&diff.same_key_diff_value)
        {
            prop_assert!(seen.insert(path.clone()), "path {} classified twice", path);
        }
    }
}
