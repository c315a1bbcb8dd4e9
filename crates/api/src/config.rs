use std::path::PathBuf;

use bimfm_vision::config::{DEFAULT_IMAGE_SIZE, DEFAULT_THRESHOLD};
use bimfm_vision::VisionConfig;

/// Default request body cap: 500 MiB, enough for large model files.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`).
    pub request_timeout_secs: u64,
    /// Root directory for stored uploads and analysis results.
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// ONNX segmentation model. AI endpoints fail when unset.
    pub ai_model_path: Option<PathBuf>,
    pub ai_image_size: u32,
    pub ai_threshold: f32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                         |
    /// |------------------------|-------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                       |
    /// | `PORT`                 | `8000`                                          |
    /// | `CORS_ORIGINS`         | `http://localhost:3000,http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                                           |
    /// | `UPLOAD_DIR`           | `uploads`                                       |
    /// | `MAX_UPLOAD_BYTES`     | `524288000`                                     |
    /// | `AI_MODEL_PATH`        | unset                                           |
    /// | `AI_IMAGE_SIZE`        | `512`                                           |
    /// | `AI_THRESHOLD`         | `0.30`                                          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let ai_model_path = std::env::var("AI_MODEL_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let ai_image_size: u32 = std::env::var("AI_IMAGE_SIZE")
            .map(|v| v.parse().expect("AI_IMAGE_SIZE must be a valid u32"))
            .unwrap_or(DEFAULT_IMAGE_SIZE);

        let ai_threshold: f32 = std::env::var("AI_THRESHOLD")
            .map(|v| v.parse().expect("AI_THRESHOLD must be a valid f32"))
            .unwrap_or(DEFAULT_THRESHOLD);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            max_upload_bytes,
            ai_model_path,
            ai_image_size,
            ai_threshold,
        }
    }

    /// Detector settings, if a model is configured.
    pub fn vision_config(&self) -> Option<VisionConfig> {
        self.ai_model_path.as_ref().map(|path| VisionConfig {
            model_path: path.clone(),
            image_size: self.ai_image_size,
            threshold: self.ai_threshold,
        })
    }
}
