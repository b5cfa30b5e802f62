use std::path::PathBuf;

use restyle_pipeline::DEFAULT_MAX_CONCURRENT;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). A generation request
    /// waits for every style, so this is far above a single remote call.
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes (default: 25 MiB).
    pub max_upload_bytes: usize,
    /// Directory holding transformed images, served under `/images`.
    pub output_dir: PathBuf,
    /// Directory holding original uploads, served under `/inputs`.
    pub input_dir: PathBuf,
    /// JSON file the style catalog is loaded from.
    pub styles_file: PathBuf,
    /// JSON history log.
    pub history_file: PathBuf,
    /// Admission limit for concurrent remote image API calls.
    pub max_concurrent_transforms: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                                      |
    /// |-----------------------------|----------------------------------------------|
    /// | `HOST`                      | `0.0.0.0`                                    |
    /// | `PORT`                      | `8000`                                       |
    /// | `CORS_ORIGINS`              | `http://localhost:3000`                      |
    /// | `REQUEST_TIMEOUT_SECS`      | `300`                                        |
    /// | `MAX_UPLOAD_BYTES`          | `26214400`                                   |
    /// | `OUTPUT_DIR`                | `./output/images`                            |
    /// | `INPUT_DIR`                 | `./output/inputs`                            |
    /// | `STYLES_FILE`               | `./styles.json`                              |
    /// | `HISTORY_FILE`              | `{OUTPUT_DIR}/logs/generation_history.json`  |
    /// | `MAX_CONCURRENT_TRANSFORMS` | `3`                                          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "26214400".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let output_dir =
            PathBuf::from(std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "./output/images".into()));
        let input_dir =
            PathBuf::from(std::env::var("INPUT_DIR").unwrap_or_else(|_| "./output/inputs".into()));
        let styles_file =
            PathBuf::from(std::env::var("STYLES_FILE").unwrap_or_else(|_| "./styles.json".into()));
        let history_file = std::env::var("HISTORY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| output_dir.join("logs").join("generation_history.json"));

        let max_concurrent_transforms: usize = std::env::var("MAX_CONCURRENT_TRANSFORMS")
            .unwrap_or_else(|_| DEFAULT_MAX_CONCURRENT.to_string())
            .parse()
            .expect("MAX_CONCURRENT_TRANSFORMS must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            output_dir,
            input_dir,
            styles_file,
            history_file,
            max_concurrent_transforms,
        }
    }
}
