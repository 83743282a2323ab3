//! Where the comparison batch looks for configuration files.

/// Default per-subfolder configuration file
pub const DEFAULT_CONFIG_FILE_NAME: &str = "config-overrides.yml";

/// Discovery layout inside the reference stack
///
/// Subfolders of `<folder_path>/<folder_a>` and `<folder_path>/<folder_b>`
/// are compared, each through its `<config_file_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSettings {
    pub folder_path: String,
    pub folder_a: String,
    pub folder_b: String,
    pub config_file_name: String,
}

impl BatchSettings {
    pub fn new(folder_a: impl Into<String>, folder_b: impl Into<String>) -> Self {
        Self {
            folder_path: String::new(),
            folder_a: folder_a.into(),
            folder_b: folder_b.into(),
            config_file_name: DEFAULT_CONFIG_FILE_NAME.to_string(),
        }
    }

    pub fn with_folder_path(mut self, folder_path: impl Into<String>) -> Self {
        self.folder_path = folder_path.into();
        self
    }

    pub fn with_config_file_name(mut self, name: impl Into<String>) -> Self {
        self.config_file_name = name.into();
        self
    }

    /// The two discovery folders, in listing order
    pub fn discovery_folders(&self) -> [String; 2] {
        [
            join_path(&self.folder_path, &self.folder_a),
            join_path(&self.folder_path, &self.folder_b),
        ]
    }

    /// Configuration file of one subfolder
    pub fn config_path(&self, subfolder: &str) -> String {
        join_path(subfolder, &self.config_file_name)
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let name = name.trim_matches('/');
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}/{}", prefix, name),
    }
}
