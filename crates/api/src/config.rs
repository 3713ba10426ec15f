use joba_core::upload::DEFAULT_MAX_FILE_SIZE_BYTES;
use joba_storage::StorageConfig;

use crate::auth::jwt::JwtConfig;
use crate::oauth::OAuthProviders;

/// Server configuration loaded from environment variables.
///
/// All fields except secrets and the storage bucket have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted single upload (default: 1 GiB).
    pub max_file_size_bytes: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Object storage bucket and addressing.
    pub storage: StorageConfig,
    /// Social login client credentials.
    pub oauth: OAuthProviders,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `MAX_FILE_SIZE_BYTES`     | `1073741824`               |
    /// | `STORAGE_BUCKET`          | required                   |
    /// | `STORAGE_REGION`          | `auto`                     |
    /// | `STORAGE_ENDPOINT`        | unset                      |
    /// | `STORAGE_PUBLIC_BASE_URL` | unset                      |
    ///
    /// JWT and OAuth variables are documented on [`JwtConfig::from_lookup`]
    /// and [`OAuthProviders::from_lookup`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers or a missing required variable, so
    /// misconfiguration fails at startup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &lookup("CORS_ORIGINS").unwrap_or_else(|| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_file_size_bytes: u64 = lookup("MAX_FILE_SIZE_BYTES")
            .map(|v| v.parse().expect("MAX_FILE_SIZE_BYTES must be a valid u64"))
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_BYTES);

        let storage = StorageConfig {
            bucket: lookup("STORAGE_BUCKET").expect("STORAGE_BUCKET must be set"),
            region: lookup("STORAGE_REGION").unwrap_or_else(|| "auto".into()),
            endpoint: lookup("STORAGE_ENDPOINT").filter(|v| !v.is_empty()),
            public_base_url: lookup("STORAGE_PUBLIC_BASE_URL").filter(|v| !v.is_empty()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_file_size_bytes,
            jwt: JwtConfig::from_lookup(&lookup),
            storage,
            oauth: OAuthProviders::from_lookup(&lookup),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
