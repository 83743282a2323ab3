//! Configuration tree model and the YAML adapter that builds it.

pub mod model;
pub mod yaml;

pub use model::{child_path, Tree, Value};
pub use yaml::parse_yaml_tree;
