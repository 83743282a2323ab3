use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::StructuralDiff;

/// `left_not_right` entry meaning "the whole file is missing on stack B".
pub const SENTINEL_PATH: &str = "/*";

/// Diff record as stored and served
///
/// One record is written per (stack pair, file) per comparison run. Only
/// `reviewed` (and with it `updated_at`) ever changes after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRecord {
    /// Unique identifier (UUID v7)
    #[serde(rename = "_id")]
    pub id: String,

    /// Reference stack
    pub stack_a: String,

    /// Compared stack
    pub stack_b: String,

    /// Folder of the compared configuration file
    pub file: String,

    pub left_not_right: Vec<String>,
    pub right_not_left: Vec<String>,
    pub same_key_diff_value: Vec<String>,

    /// Carried as `"true"` / `"false"` on the wire
    #[serde(with = "reviewed_flag")]
    pub reviewed: bool,

    /// Shared by every record of one comparison run
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

impl DiffRecord {
    /// True for the record written when stack B lacks the file entirely.
    pub fn is_sentinel(&self) -> bool {
        self.left_not_right.len() == 1
            && self.left_not_right[0] == SENTINEL_PATH
            && self.right_not_left.is_empty()
            && self.same_key_diff_value.is_empty()
    }
}

/// Insert payload for a diff record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiff {
    pub stack_a: String,
    pub stack_b: String,
    pub file: String,
    #[serde(default)]
    pub left_not_right: Vec<String>,
    #[serde(default)]
    pub right_not_left: Vec<String>,
    #[serde(default)]
    pub same_key_diff_value: Vec<String>,
}

impl NewDiff {
    /// Build the payload for a computed diff. `same_key_same_value` is not kept.
    pub fn from_diff(
        stack_a: impl Into<String>,
        stack_b: impl Into<String>,
        file: impl Into<String>,
        diff: &StructuralDiff,
    ) -> Self {
        Self {
            stack_a: stack_a.into(),
            stack_b: stack_b.into(),
            file: file.into(),
            left_not_right: diff.left_not_right.clone(),
            right_not_left: diff.right_not_left.clone(),
            same_key_diff_value: diff.same_key_diff_value.clone(),
        }
    }

    /// Payload recording that `file` exists on stack A only.
    pub fn sentinel(
        stack_a: impl Into<String>,
        stack_b: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            stack_a: stack_a.into(),
            stack_b: stack_b.into(),
            file: file.into(),
            left_not_right: vec![SENTINEL_PATH.to_string()],
            right_not_left: Vec::new(),
            same_key_diff_value: Vec::new(),
        }
    }

    /// Materialise the record the store will hold.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> DiffRecord {
        DiffRecord {
            id,
            stack_a: self.stack_a,
            stack_b: self.stack_b,
            file: self.file,
            left_not_right: self.left_not_right,
            right_not_left: self.right_not_left,
            same_key_diff_value: self.same_key_diff_value,
            reviewed: false,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Serde adapter for the string-encoded review flag.
///
/// Reads both the string form and a plain JSON boolean.
pub mod reviewed_flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Text(String),
        }

        match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => Ok(b),
            Flag::Text(s) => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(de::Error::custom(format!(
                    "reviewed must be \"true\" or \"false\", got {:?}",
                    other
                ))),
            },
        }
    }
}
