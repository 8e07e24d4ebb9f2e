//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GIST_ID` - Id of the gist holding the portfolio document
//!
//! ## Optional
//! - `GIST_FILE_NAME` - Document file inside the gist (default: projects-config.json)
//! - `GIST_API_BASE` - Gist API base URL (default: <https://api.github.com>)
//! - `YOUTUBE_OEMBED_URL` - `YouTube` oEmbed endpoint (default: <https://www.youtube.com/oembed>)
//! - `VIMEO_API_BASE` - Vimeo simple API base (default: <https://vimeo.com/api/v2>)
//! - `SHOWREEL_SESSION_FILE` - Where the session credential is kept
//!   (default: `$XDG_RUNTIME_DIR/showreel/session`, else the temp dir)
//! - `SHOWREEL_TOKEN` - Credential used by `login` when none is typed in
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_GIST_API_BASE: &str = "https://api.github.com";
const DEFAULT_GIST_FILE_NAME: &str = "projects-config.json";
const DEFAULT_YOUTUBE_OEMBED_URL: &str = "https://www.youtube.com/oembed";
const DEFAULT_VIMEO_API_BASE: &str = "https://vimeo.com/api/v2";
const SESSION_DIR_NAME: &str = "showreel";
const SESSION_FILE_NAME: &str = "session";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Where the document lives
    pub gist: GistConfig,
    /// Video provider endpoints
    pub video: VideoConfig,
    /// Session credential file
    pub session_file: PathBuf,
    /// Credential from the environment, if provided
    pub token: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

/// Location of the portfolio document.
#[derive(Debug, Clone)]
pub struct GistConfig {
    /// API base URL, without trailing slash
    pub api_base: String,
    /// Gist id (public, not a secret)
    pub gist_id: String,
    /// File inside the gist holding the document JSON
    pub file_name: String,
}

/// Video provider endpoints.
#[derive(Debug, Clone)]
pub struct VideoConfig {
    /// `YouTube` oEmbed endpoint
    pub youtube_oembed_url: String,
    /// Vimeo simple API base URL
    pub vimeo_api_base: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            youtube_oembed_url: DEFAULT_YOUTUBE_OEMBED_URL.to_string(),
            vimeo_api_base: DEFAULT_VIMEO_API_BASE.to_string(),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `GIST_ID` is missing or malformed, or if
    /// `SHOWREEL_TOKEN` looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let gist = GistConfig::from_env()?;
        let video = VideoConfig {
            youtube_oembed_url: get_env_or_default(
                "YOUTUBE_OEMBED_URL",
                DEFAULT_YOUTUBE_OEMBED_URL,
            ),
            vimeo_api_base: get_env_or_default("VIMEO_API_BASE", DEFAULT_VIMEO_API_BASE),
        };
        let session_file = get_optional_env("SHOWREEL_SESSION_FILE")
            .map_or_else(default_session_file, PathBuf::from);
        let token = get_optional_env("SHOWREEL_TOKEN")
            .map(|token| {
                validate_not_placeholder(&token, "SHOWREEL_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            gist,
            video,
            session_file,
            token,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }
}

impl GistConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let gist_id = get_required_env("GIST_ID")?;
        validate_gist_id(&gist_id)?;

        Ok(Self {
            api_base: get_env_or_default("GIST_API_BASE", DEFAULT_GIST_API_BASE),
            gist_id,
            file_name: get_env_or_default("GIST_FILE_NAME", DEFAULT_GIST_FILE_NAME),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Session-scoped default location for the credential file.
///
/// `XDG_RUNTIME_DIR` is wiped when the login session ends, which matches the
/// "survives reloads, not restarts" lifetime of the session.
fn default_session_file() -> PathBuf {
    get_optional_env("XDG_RUNTIME_DIR")
        .map_or_else(std::env::temp_dir, PathBuf::from)
        .join(SESSION_DIR_NAME)
        .join(SESSION_FILE_NAME)
}

/// Gist ids are hex strings; accept any ASCII alphanumeric id.
fn validate_gist_id(gist_id: &str) -> Result<(), ConfigError> {
    if gist_id.is_empty() || !gist_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidEnvVar(
            "GIST_ID".to_string(),
            "must be a non-empty alphanumeric gist id".to_string(),
        ));
    }
    Ok(())
}

/// Reject values that look like a copied placeholder.
fn validate_not_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
