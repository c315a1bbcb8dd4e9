use std::sync::Arc;

use bimfm_vision::DefectDetector;
use tokio::sync::OnceCell;

use crate::config::ServerConfig;
use crate::error::AppError;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything inside is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bimfm_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Defect detector, loaded on first use.
    detector: Arc<OnceCell<Arc<DefectDetector>>>,
}

impl AppState {
    pub fn new(pool: bimfm_db::DbPool, config: Arc<ServerConfig>) -> Self {
        Self {
            pool,
            config,
            detector: Arc::new(OnceCell::new()),
        }
    }

    /// State with a detector already in place instead of loading from disk.
    pub fn with_detector(
        pool: bimfm_db::DbPool,
        config: Arc<ServerConfig>,
        detector: DefectDetector,
    ) -> Self {
        Self {
            pool,
            config,
            detector: Arc::new(OnceCell::new_with(Some(Arc::new(detector)))),
        }
    }

    /// The shared detector, loading the model on the first call.
    pub async fn detector(&self) -> Result<Arc<DefectDetector>, AppError> {
        let detector = self
            .detector
            .get_or_try_init(|| async {
                let vision = self
                    .config
                    .vision_config()
                    .ok_or_else(|| AppError::Analysis("AI_MODEL_PATH is not configured".into()))?;
                let loaded = tokio::task::spawn_blocking(move || DefectDetector::load(vision))
                    .await
                    .map_err(|e| AppError::Analysis(e.to_string()))?
                    .map_err(|e| AppError::Analysis(e.to_string()))?;
                Ok::<_, AppError>(Arc::new(loaded))
            })
            .await?;
        Ok(Arc::clone(detector))
    }
}
