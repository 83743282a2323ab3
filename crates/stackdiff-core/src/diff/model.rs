//! Structural diff output type.

use serde::{Deserialize, Serialize};

/// Classification of every key path of two trees.
///
/// Paths are `/`-delimited (`/c/d`). Order within each list follows the
/// traversal order of the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StructuralDiff {
    /// Keys present in A and absent from B
    pub left_not_right: Vec<String>,
    /// Keys present in B and absent from A
    pub right_not_left: Vec<String>,
    /// Keys present in both with equal leaf values (or both empty subtrees)
    pub same_key_same_value: Vec<String>,
    /// Keys present in both with different values
    pub same_key_diff_value: Vec<String>,
}

impl StructuralDiff {
    /// True when both trees had at least one key and every key matched.
    ///
    /// Two empty trees are not "identical" in this sense: there is nothing
    /// to vouch for, so the batch still records them.
    pub fn is_identical(&self) -> bool {
        !self.has_differences() && !self.same_key_same_value.is_empty()
    }

    /// True when any of the three difference lists is non-empty.
    pub fn has_differences(&self) -> bool {
        !self.left_not_right.is_empty()
            || !self.right_not_left.is_empty()
            || !self.same_key_diff_value.is_empty()
    }

    pub fn total_paths(&self) -> usize {
        self.left_not_right.len()
            + self.right_not_left.len()
            + self.same_key_same_value.len()
            + self.same_key_diff_value.len()
    }

    /// The same diff seen from the other side.
    pub fn swapped(&self) -> Self {
        Self {
            left_not_right: self.right_not_left.clone(),
            right_not_left: self.left_not_right.clone(),
            same_key_same_value: self.same_key_same_value.clone(),
            same_key_diff_value: self.same_key_diff_value.clone(),
        }
    }
}
