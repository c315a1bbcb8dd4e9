//! Defect detection on inspection photos and video frames.
//!
//! A binary segmentation model produces a per-pixel logit map. The
//! [`detector::DefectDetector`] turns that map into a confidence score,
//! a mask, a heatmap and a contour overlay written next to each input.

pub mod config;
pub mod detector;
pub mod error;
pub mod model;
pub mod postprocess;
pub mod preprocess;

pub use config::VisionConfig;
pub use detector::{AnalysisResult, DefectDetector, Detection, VideoAnalysis};
pub use error::VisionError;
pub use model::{OnnxSegmentationModel, SegmentationModel};
