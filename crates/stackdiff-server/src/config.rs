//! Server configuration from environment variables.

use axum::http::HeaderValue;
use stackdiff_core::logging_facility::Profile;
use stackdiff_core_types::Sensitive;
use stackdiff_engine::settings::DEFAULT_CONFIG_FILE_NAME;
use stackdiff_engine::BatchSettings;
use stackdiff_github::{api_base_url_for_host, GithubSettings};
use std::net::SocketAddr;

/// Allowed CORS origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Configuration for the stackdiff server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,

    /// SQLite path, or `:memory:`
    pub database_url: String,

    pub github_token: Sensitive<String>,
    pub organization: String,

    /// REST API base, derived from `HOSTNAME_GH` unless `GITHUB_API_URL` is set
    pub github_api_url: String,

    pub folder_path: String,
    pub folder_a: String,
    pub folder_b: String,
    pub config_file_name: String,

    pub cors_origins: CorsOrigins,
    pub log_profile: Profile,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_reader`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// # Errors
    ///
    /// `MissingVar` for an absent required variable, `InvalidValue` for one
    /// that does not parse.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let required = |key: &str| reader(key).map_err(|_| ConfigError::MissingVar(key.into()));

        let listen_addr = reader("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("LISTEN_ADDR".into(), e.to_string()))?;

        let database_url = required("DATABASE_URL")?;
        let github_token = Sensitive::new(required("ACCESS_TOKEN_GH")?);
        let organization = required("ORGANIZATION_GH")?;

        let hostname = reader("HOSTNAME_GH").unwrap_or_else(|_| "github.com".to_string());
        let github_api_url =
            reader("GITHUB_API_URL").unwrap_or_else(|_| api_base_url_for_host(&hostname));

        let folder_path = reader("FOLDER_PATH").unwrap_or_default();
        let folder_a = required("FOLDER_A_NAME")?;
        let folder_b = required("FOLDER_B_NAME")?;
        let config_file_name =
            reader("CONFIG_FILE_NAME").unwrap_or_else(|_| DEFAULT_CONFIG_FILE_NAME.to_string());

        let cors_origins = parse_origins(&required("ORIGINS")?)?;

        let log_profile = reader("LOG_PROFILE")
            .unwrap_or_else(|_| "development".to_string())
            .parse::<Profile>()
            .map_err(|e| ConfigError::InvalidValue("LOG_PROFILE".into(), e))?;

        Ok(Self {
            listen_addr,
            database_url,
            github_token,
            organization,
            github_api_url,
            folder_path,
            folder_a,
            folder_b,
            config_file_name,
            cors_origins,
            log_profile,
        })
    }

    pub fn github_settings(&self) -> GithubSettings {
        GithubSettings {
            api_base_url: self.github_api_url.clone(),
            organization: self.organization.clone(),
            token: self.github_token.clone(),
        }
    }

    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings::new(self.folder_a.clone(), self.folder_b.clone())
            .with_folder_path(self.folder_path.clone())
            .with_config_file_name(self.config_file_name.clone())
    }
}

fn parse_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let origins: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if origins.is_empty() {
        return Err(ConfigError::InvalidValue(
            "ORIGINS".into(),
            "at least one origin is required".into(),
        ));
    }
    if origins.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }

    origins
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| ConfigError::InvalidValue("ORIGINS".into(), format!("{}: {}", origin, e)))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
