use std::path::PathBuf;

use bimfm_core::ffmpeg::FfmpegError;

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Inference failed: {0}")]
    Inference(#[from] ort::Error),

    #[error("Unexpected model output: {0}")]
    OutputShape(String),

    #[error("Cannot read image {}: {reason}", .path.display())]
    UnreadableImage { path: PathBuf, reason: String },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Video frame extraction failed: {0}")]
    Video(#[from] FfmpegError),

    #[error("Analysis task failed: {0}")]
    Task(String),
}
