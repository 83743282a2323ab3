//! Tree and value types.
//!
//! A [`Tree`] is what a configuration file becomes once parsed: a mapping
//! from string key to [`Value`], where a value is either a leaf or another
//! tree. Keys are kept in a `BTreeMap`, so iteration (and therefore diff
//! output) is deterministic and independent of the source file's key order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Build the path of `key` under `prefix` (`""` + `a` -> `/a`).
pub fn child_path(prefix: &str, key: &str) -> String {
    let mut path = String::with_capacity(prefix.len() + key.len() + 1);
    path.push_str(prefix);
    path.push('/');
    path.push_str(key);
    path
}

/// Nested key-value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree(BTreeMap<String, Value>);

impl Tree {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Paths of every leaf and every empty subtree, in depth-first order.
    ///
    /// These are exactly the paths that land in `same_key_same_value` when a
    /// tree is compared with itself.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        let mut stack: Vec<(String, &Tree)> = vec![(String::new(), self)];

        while let Some((prefix, tree)) = stack.pop() {
            for (key, value) in tree.iter() {
                let path = child_path(&prefix, key);
                match value {
                    Value::Tree(sub) if !sub.is_empty() => stack.push((path, sub)),
                    _ => paths.push(path),
                }
            }
        }
        paths
    }

    /// Total number of keys at every depth.
    pub fn key_count(&self) -> usize {
        self.iter()
            .map(|(_, v)| match v {
                Value::Tree(sub) => 1 + sub.key_count(),
                _ => 1,
            })
            .sum()
    }
}

impl FromIterator<(String, Value)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A node of a configuration tree.
///
/// Everything except [`Value::Tree`] is a leaf for diff purposes. Sequences
/// are leaves too and compare element by element; there is no coercion
/// between variants (`Integer(1)`, `Float(1.0)` and `String("1")` all differ).
///
/// Equality is reflexive: a NaN float equals any other NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`
    UInteger(u64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Tree(Tree),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::UInteger(a), Value::UInteger(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Tree(a), Value::Tree(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    pub fn is_tree(&self) -> bool {
        matches!(self, Value::Tree(_))
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Value::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Short name of the variant, used in log lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) | Value::UInteger(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Tree(_) => "tree",
        }
    }
}

impl From<Tree> for Value {
    fn from(tree: Tree) -> Self {
        Value::Tree(tree)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Value::UInteger(n), Value::Integer)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}
