use std::path::PathBuf;

/// Side length of the square model input.
pub const DEFAULT_IMAGE_SIZE: u32 = 512;

/// Probability above which a pixel counts as defect.
pub const DEFAULT_THRESHOLD: f32 = 0.30;

/// Minimum confidence for a detection to be flagged.
pub const DETECTION_CONFIDENCE: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// ONNX export of the segmentation network.
    pub model_path: PathBuf,
    pub image_size: u32,
    pub threshold: f32,
}

impl VisionConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            image_size: DEFAULT_IMAGE_SIZE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}
