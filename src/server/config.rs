use std::path::PathBuf;

/// Fallback signing key; only meant for local development.
pub const DEV_SECRET_KEY: &str = "dev-key-please-change";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Key used to sign session cookies.
    pub secret_key: String,
    /// Upper bound for request bodies in bytes (default: 64 MiB).
    pub max_content_length: usize,
    /// Directory receiving uploads while they are analyzed.
    pub upload_folder: PathBuf,
    /// Lifetime of a stored script before the sweep drops it (default: 7 days).
    pub script_ttl_secs: u64,
    /// Upper bound on sessions holding a script; the oldest is evicted beyond it (default: `10000`).
    pub max_sessions: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                 |
    /// |----------------------|-------------------------|
    /// | `HOST`               | `0.0.0.0`               |
    /// | `PORT`               | `5000`                  |
    /// | `SECRET_KEY`         | `dev-key-please-change` |
    /// | `MAX_CONTENT_LENGTH` | `67108864`              |
    /// | `UPLOAD_FOLDER`      | `uploads`               |
    /// | `SCRIPT_TTL_SECS`    | `604800`                |
    /// | `MAX_SESSIONS`       | `10000`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let secret_key = std::env::var("SECRET_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("SECRET_KEY not set, falling back to the development key");
                DEV_SECRET_KEY.into()
            });

        let max_content_length: usize = std::env::var("MAX_CONTENT_LENGTH")
            .unwrap_or_else(|_| (64 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_CONTENT_LENGTH must be a valid usize");

        let upload_folder = std::env::var("UPLOAD_FOLDER")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let script_ttl_secs: u64 = std::env::var("SCRIPT_TTL_SECS")
            .unwrap_or_else(|_| (7 * 24 * 60 * 60).to_string())
            .parse()
            .expect("SCRIPT_TTL_SECS must be a valid u64");

        let max_sessions: usize = std::env::var("MAX_SESSIONS")
            .unwrap_or_else(|_| "10000".into())
            .parse()
            .expect("MAX_SESSIONS must be a valid usize");

        Self {
            host,
            port,
            secret_key,
            max_content_length,
            upload_folder,
            script_ttl_secs,
            max_sessions,
        }
    }

    /// Upload ceiling in whole mebibytes, as shown to users.
    pub fn max_content_length_mb(&self) -> usize {
        self.max_content_length / (1024 * 1024)
    }
}
