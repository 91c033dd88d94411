use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Where generated documents are written.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// A directory on the local filesystem, served back by `GET /resumes/:filename`.
    Local { dir: PathBuf },
    /// An S3-compatible bucket (AWS or MinIO).
    S3(S3Settings),
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable required by the selected backend is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub storage: StorageBackend,
    /// Prefix of every download link handed back to clients.
    pub public_base_url: String,
    /// Upper bound on the character length of any single form field.
    pub max_field_len: usize,
    /// Frontend origin allowed by CORS. Permissive when unset.
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let storage = match optional_env("STORAGE_BACKEND")
            .unwrap_or_else(|| "local".to_string())
            .as_str()
        {
            "local" => StorageBackend::Local {
                dir: optional_env("STORAGE_DIR")
                    .unwrap_or_else(|| "./resumes".to_string())
                    .into(),
            },
            "s3" => StorageBackend::S3(S3Settings {
                bucket: require_env("S3_BUCKET")?,
                endpoint: require_env("S3_ENDPOINT")?,
                region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            other => bail!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        Ok(Config {
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            storage,
            public_base_url: optional_env("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}/resumes")),
            max_field_len: optional_env("MAX_FIELD_LEN")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_FIELD_LEN must be a positive integer")?
                .unwrap_or(5000),
            cors_allowed_origin: optional_env("CORS_ALLOWED_ORIGIN"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
