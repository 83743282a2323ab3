//! Structural diff computation.
//!
//! The core entry point is [`compute_structural_diff`]. It walks both trees
//! with an explicit work stack of `(prefix, node_a, node_b)` triples, so
//! arbitrarily deep configuration files never grow the call stack.

use crate::diff::model::StructuralDiff;
use crate::errors::Result;
use crate::tree::{child_path, parse_yaml_tree, Tree, Value};
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Classify every key path of `a` and `b`.
///
/// For each key of an A node:
/// - absent from the B node: `left_not_right`, not descended
/// - both values are trees: both empty gives `same_key_same_value`,
///   otherwise the pair is compared one level down
/// - equal leaves: `same_key_same_value`
/// - anything else, including a tree on one side and a leaf on the other:
///   `same_key_diff_value`
///
/// Keys only in the B node go to `right_not_left`, also not descended.
pub fn compute_structural_diff(a: &Tree, b: &Tree) -> StructuralDiff {
    let mut diff = StructuralDiff::default();
    let mut stack: Vec<(String, &Tree, &Tree)> = vec![(String::new(), a, b)];

    while let Some((prefix, node_a, node_b)) = stack.pop() {
        for (key, value_a) in node_a.iter() {
            let path = child_path(&prefix, key);

            let Some(value_b) = node_b.get(key) else {
                tracing::debug!(path = %path, "key only in left tree");
                diff.left_not_right.push(path);
                continue;
            };

            match (value_a, value_b) {
                (Value::Tree(sub_a), Value::Tree(sub_b)) => {
                    if sub_a.is_empty() && sub_b.is_empty() {
                        tracing::debug!(path = %path, "both subtrees empty");
                        diff.same_key_same_value.push(path);
                    } else {
                        stack.push((path, sub_a, sub_b));
                    }
                }
                (left, right) if left == right => {
                    tracing::debug!(path = %path, "same value");
                    diff.same_key_same_value.push(path);
                }
                (left, right) => {
                    tracing::debug!(
                        path = %path,
                        left = left.kind_name(),
                        right = right.kind_name(),
                        "different value"
                    );
                    diff.same_key_diff_value.push(path);
                }
            }
        }

        for key in node_b.keys() {
            if !node_a.contains_key(key) {
                let path = child_path(&prefix, key);
                tracing::debug!(path = %path, "key only in right tree");
                diff.right_not_left.push(path);
            }
        }
    }

    diff
}

/// Parse two YAML documents and diff them.
///
/// # Errors
///
/// Any error from [`parse_yaml_tree`] on either side.
pub fn compare_yaml_strings(a: &str, b: &str) -> Result<StructuralDiff> {
    log_op_start!("compare_yaml_strings");
    let start = Instant::now();

    let result: Result<(StructuralDiff, usize, usize)> = parse_yaml_tree(a).and_then(|tree_a| {
        let tree_b = parse_yaml_tree(b)?;
        let diff = compute_structural_diff(&tree_a, &tree_b);
        Ok((diff, tree_a.key_count(), tree_b.key_count()))
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok((diff, left_keys, right_keys)) => {
            log_op_end!(
                "compare_yaml_strings",
                duration_ms = duration_ms,
                left_keys = left_keys,
                right_keys = right_keys,
                left_not_right_len = diff.left_not_right.len(),
                right_not_left_len = diff.right_not_left.len(),
                same_key_same_value_len = diff.same_key_same_value.len(),
                same_key_diff_value_len = diff.same_key_diff_value.len()
            );
            Ok(diff)
        }
        Err(e) => {
            log_op_error!("compare_yaml_strings", e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}
