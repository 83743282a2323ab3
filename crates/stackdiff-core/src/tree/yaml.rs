//! YAML to [`Tree`] adapter.
//!
//! Parsing rules:
//! - an empty document (or a bare `null`) is an empty tree
//! - the root must otherwise be a mapping
//! - scalar keys are stringified (`80` -> `"80"`, `true` -> `"true"`)
//! - sequence or mapping keys are rejected, as are two keys of one mapping
//!   that stringify to the same segment
//! - tags are dropped and the tagged value is kept
//! - merge keys (`<<: *anchor`) are resolved before conversion
//! - integers keep their exact value; only non-integral numbers become floats

use crate::errors::{Result, StackDiffError};
use crate::tree::model::{child_path, Tree, Value};
use serde_yaml::Value as Yaml;

/// Parse YAML text into a [`Tree`].
///
/// # Errors
///
/// - `InvalidYaml`: the text is not valid YAML
/// - `YamlRootNotMapping`: the document root is a scalar or a sequence
/// - `UnsupportedKey` / `DuplicateKey`: a mapping key cannot become a path segment
pub fn parse_yaml_tree(text: &str) -> Result<Tree> {
    let mut root: Yaml = serde_yaml::from_str(text)?;
    root.apply_merge()?;

    match strip_tags(root) {
        Yaml::Null => Ok(Tree::new()),
        Yaml::Mapping(mapping) => mapping_to_tree(mapping, ""),
        other => Err(StackDiffError::YamlRootNotMapping {
            found: yaml_kind(&other).to_string(),
        }),
    }
}

fn strip_tags(value: Yaml) -> Yaml {
    match value {
        Yaml::Tagged(tagged) => strip_tags(tagged.value),
        other => other,
    }
}

fn yaml_kind(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "bool",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged value",
    }
}

fn mapping_to_tree(mapping: serde_yaml::Mapping, path: &str) -> Result<Tree> {
    let mut tree = Tree::new();
    for (key, value) in mapping {
        let segment = key_segment(strip_tags(key), path)?;
        let value_path = child_path(path, &segment);
        let converted = convert_value(value, &value_path)?;
        if tree.insert(segment, converted).is_some() {
            return Err(StackDiffError::DuplicateKey { path: value_path });
        }
    }
    Ok(tree)
}

fn key_segment(key: Yaml, path: &str) -> Result<String> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(StackDiffError::UnsupportedKey {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            found: yaml_kind(&other).to_string(),
        }),
    }
}

fn convert_value(value: Yaml, path: &str) -> Result<Value> {
    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInteger(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| convert_value(item, &child_path(path, &i.to_string())))
                .collect::<Result<Vec<_>>>()?,
        ),
        Yaml::Mapping(mapping) => Value::Tree(mapping_to_tree(mapping, path)?),
        Yaml::Tagged(tagged) => convert_value(tagged.value, path)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_mapping() {
        let tree = parse_yaml_tree("a: 1\nc:\n  d: 4\n  e: five\n").unwrap();
        assert_eq!(tree.get("a"), Some(&Value::Integer(1)));
        let c = tree.get("c").and_then(Value::as_tree).unwrap();
        assert_eq!(c.get("e"), Some(&Value::String("five".to_string())));
    }

    #[test]
    fn test_empty_document_is_empty_tree() {
        assert!(parse_yaml_tree("").unwrap().is_empty());
        assert!(parse_yaml_tree("~").unwrap().is_empty());
    }

    #[test]
    fn test_scalar_root_is_rejected() {
        let err = parse_yaml_tree("just a string").unwrap_err();
        assert_eq!(
            err,
            StackDiffError::YamlRootNotMapping {
                found: "string".to_string()
            }
        );
    }

    #[test]
    fn test_sequence_root_is_rejected() {
        let err = parse_yaml_tree("- a\n- b\n").unwrap_err();
        assert!(matches!(err, StackDiffError::YamlRootNotMapping { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_invalid_yaml() {
        let err = parse_yaml_tree("a: [1, 2\nb: }").unwrap_err();
        assert!(matches!(err, StackDiffError::InvalidYaml { .. }));
    }

    #[test]
    fn test_scalar_keys_are_stringified() {
        let tree = parse_yaml_tree("80: http\ntrue: yes\n").unwrap();
        assert_eq!(tree.get("80"), Some(&Value::String("http".to_string())));
        assert!(tree.contains_key("true"));
    }

    #[test]
    fn test_colliding_keys_are_rejected() {
        let err = parse_yaml_tree("1: a\n\"1\": b\n").unwrap_err();
        assert_eq!(
            err,
            StackDiffError::DuplicateKey {
                path: "/1".to_string()
            }
        );
    }

    #[test]
    fn test_sequence_key_is_rejected() {
        let err = parse_yaml_tree("outer:\n  ? [a, b]\n  : 1\n").unwrap_err();
        assert_eq!(
            err,
            StackDiffError::UnsupportedKey {
                path: "/outer".to_string(),
                found: "sequence".to_string()
            }
        );
    }

    #[test]
    fn test_no_type_coercion() {
        let tree = parse_yaml_tree("a: 1\nb: \"1\"\nc: 1.0\n").unwrap();
        assert_eq!(tree.get("a"), Some(&Value::Integer(1)));
        assert_eq!(tree.get("b"), Some(&Value::String("1".to_string())));
        assert_eq!(tree.get("c"), Some(&Value::Float(1.0)));
    }

    #[test]
    fn test_integers_beyond_i64_are_exact() {
        let tree = parse_yaml_tree("a: 18446744073709551615\nb: 18446744073709551614\n").unwrap();
        assert_eq!(tree.get("a"), Some(&Value::UInteger(u64::MAX)));
        assert_ne!(tree.get("a"), tree.get("b"));
    }

    #[test]
    fn test_nan_parses_to_float() {
        let tree = parse_yaml_tree("a: .nan\n").unwrap();
        assert!(matches!(tree.get("a"), Some(Value::Float(f)) if f.is_nan()));
        assert_eq!(tree, parse_yaml_tree("a: .nan\n").unwrap());
    }

    #[test]
    fn test_merge_keys_are_resolved() {
        let tree = parse_yaml_tree("base: &b\n  x: 1\nsvc:\n  <<: *b\n  y: 2\n").unwrap();
        let svc = tree.get("svc").and_then(Value::as_tree).unwrap();
        assert!(!svc.contains_key("<<"));
        assert_eq!(svc.get("x"), Some(&Value::Integer(1)));
        assert_eq!(svc.get("y"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_explicit_keys_override_merged_ones() {
        let tree = parse_yaml_tree("base: &b {x: 1, y: 1}\nsvc:\n  <<: *b\n  y: 2\n").unwrap();
        let svc = tree.get("svc").and_then(Value::as_tree).unwrap();
        assert_eq!(svc.get("y"), Some(&Value::Integer(2)));
        assert_eq!(svc.get("x"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_tags_are_dropped() {
        let tree = parse_yaml_tree("secret: !vault abc\n").unwrap();
        assert_eq!(tree.get("secret"), Some(&Value::String("abc".to_string())));
    }
}
