use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone)]
pub struct Config {
    // Backend
    pub api_url: String,
    pub http_timeout: Duration,

    // Local session persistence
    pub session_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        let timeout_secs: u64 = env::var("PM_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PM_HTTP_TIMEOUT_SECS"))?;

        let session_file = match env::var("PM_SESSION_FILE") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_session_file()?,
        };

        Ok(Self {
            api_url: normalize_base_url(
                &env::var("PM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            )?,
            http_timeout: Duration::from_secs(timeout_secs),
            session_file,
        })
    }

    /// Config pointing at an explicit backend, used by tests and `--api-url`
    pub fn for_api(api_url: &str, session_file: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_base_url(api_url)?,
            http_timeout: Duration::from_secs(30),
            session_file,
        })
    }

    /// Override the backend base URL
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_base_url(api_url)?;
        Ok(self)
    }
}

/// Strip trailing slashes so endpoint paths can always start with `/`
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid("PM_API_URL"));
    }
    Ok(trimmed.to_string())
}

fn default_session_file() -> Result<PathBuf, ConfigError> {
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map_err(|_| ConfigError::Missing("PM_SESSION_FILE"))?;
    Ok(PathBuf::from(home)
        .join(".project-market")
        .join("session.json"))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
