use stackdiff_core_types::RequestId;
use thiserror::Error;

/// Result type alias using StackDiffError
pub type Result<T> = std::result::Result<T, StackDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in API responses, log events
/// and tests. The HTTP layer decides the status code from the kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    NotFound,
    /// Configuration text is not valid YAML or not a mapping at the root
    InvalidYaml,
    /// Remote content could not be decoded (base64 or UTF-8)
    Decode,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    ExternalService,
    Concurrency,
    Config,

    // Auth
    Unauthorised,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidYaml => "ERR_INVALID_YAML",
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used for programmatic handling plus the
/// context needed to debug a failed batch run.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (diff id, repository, file path)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// True when the error reports a missing repository, path or record
    pub fn is_not_found(&self) -> bool {
        self.kind == ExErrorKind::NotFound
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for stackdiff operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StackDiffError {
    // ===== Records =====
    /// No diff record with this id
    #[error("Diff not found: {diff_id}")]
    DiffNotFound { diff_id: String },

    /// The id is not a well-formed record identifier
    #[error("Invalid diff id: {diff_id}")]
    InvalidDiffId { diff_id: String },

    /// No comparison has been stored for this stack pair (and file)
    #[error("No comparison found for stacks {stack_a} and {stack_b}")]
    NoComparisonFound { stack_a: String, stack_b: String },

    // ===== Source control =====
    #[error("Repository not found: {repo}")]
    RepositoryNotFound { repo: String },

    #[error("Path not found: {repo}/{path}")]
    PathNotFound { repo: String, path: String },

    /// The path resolved to something other than a file
    #[error("Not a file: {repo}/{path}")]
    NotAFile { repo: String, path: String },

    /// Remote content was not valid base64 or not UTF-8
    #[error("Cannot decode content of {path}: {reason}")]
    Decode { path: String, reason: String },

    // ===== YAML =====
    #[error("Invalid YAML: {reason}")]
    InvalidYaml { reason: String },

    /// Root document is a scalar or a sequence
    #[error("YAML root must be a mapping, found {found}")]
    YamlRootNotMapping { found: String },

    /// Mapping key that cannot be turned into a path segment
    #[error("Unsupported mapping key at {path}: {found}")]
    UnsupportedKey { path: String, found: String },

    /// Two keys of the same mapping collapse to the same path segment
    #[error("Duplicate key at {path}")]
    DuplicateKey { path: String },

    // ===== Internal =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<StackDiffError> for ExError {
    fn from(err: StackDiffError) -> Self {
        match err {
            StackDiffError::DiffNotFound { diff_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(diff_id)
                .with_message("No diff found with this id"),

            StackDiffError::InvalidDiffId { diff_id } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(diff_id)
                .with_message("Malformed diff id"),

            StackDiffError::NoComparisonFound { stack_a, stack_b } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(format!("{}..{}", stack_a, stack_b))
                    .with_message("No comparison found for these stacks")
            }

            StackDiffError::RepositoryNotFound { repo } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(repo)
                .with_message("Could not find repo"),

            StackDiffError::PathNotFound { repo, path } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(format!("{}/{}", repo, path))
                .with_message("Could not find content"),

            StackDiffError::NotAFile { repo, path } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(format!("{}/{}", repo, path))
                .with_message("Path does not point to a file"),

            StackDiffError::Decode { path, reason } => ExError::new(ExErrorKind::Decode)
                .with_entity_id(path)
                .with_message(reason),

            StackDiffError::InvalidYaml { reason } => {
                ExError::new(ExErrorKind::InvalidYaml).with_message(reason)
            }

            StackDiffError::YamlRootNotMapping { found } => ExError::new(ExErrorKind::InvalidYaml)
                .with_message(format!("YAML root must be a mapping, found {}", found)),

            StackDiffError::UnsupportedKey { path, found } => {
                ExError::new(ExErrorKind::InvalidYaml)
                    .with_entity_id(path)
                    .with_message(format!("Unsupported mapping key: {}", found))
            }

            StackDiffError::DuplicateKey { path } => ExError::new(ExErrorKind::InvalidYaml)
                .with_entity_id(path)
                .with_message("Duplicate key after normalisation"),

            StackDiffError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            StackDiffError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for StackDiffError {
    fn from(err: serde_json::Error) -> Self {
        StackDiffError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for StackDiffError {
    fn from(err: serde_yaml::Error) -> Self {
        StackDiffError::InvalidYaml {
            reason: err.to_string(),
        }
    }
}
