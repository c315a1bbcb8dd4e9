//! Batch analysis of images and sampled video frames.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bimfm_core::ffmpeg;
use bimfm_core::uploads::file_stem;
use image::{DynamicImage, ImageReader};
use serde::Serialize;

use crate::config::{VisionConfig, DETECTION_CONFIDENCE};
use crate::error::VisionError;
use crate::model::{OnnxSegmentationModel, SegmentationModel};
use crate::postprocess::postprocess;
use crate::preprocess::preprocess;

/// Analysis of one input image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub image_path: String,
    pub confidence: f32,
    pub has_detection: bool,
    pub mask_path: String,
    pub heatmap_path: String,
    pub result_path: String,
}

/// Aggregate over a batch. Paths come from the first detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub detections: Vec<Detection>,
    /// Mean confidence across detections, 0 when none.
    pub confidence: f32,
    pub mask_path: Option<String>,
    pub heatmap_path: Option<String>,
    pub result_path: Option<String>,
}

impl AnalysisResult {
    pub fn from_detections(detections: Vec<Detection>) -> Self {
        let confidence = if detections.is_empty() {
            0.0
        } else {
            detections.iter().map(|d| d.confidence).sum::<f32>() / detections.len() as f32
        };
        let first = detections.first();
        Self {
            success: true,
            confidence,
            mask_path: first.map(|d| d.mask_path.clone()),
            heatmap_path: first.map(|d| d.heatmap_path.clone()),
            result_path: first.map(|d| d.result_path.clone()),
            detections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoAnalysis {
    pub frames_extracted: usize,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

pub struct DefectDetector {
    model: Box<dyn SegmentationModel>,
    config: VisionConfig,
}

impl DefectDetector {
    /// Load the ONNX model named by `config`.
    pub fn load(config: VisionConfig) -> Result<Self, VisionError> {
        let model = OnnxSegmentationModel::load(&config.model_path)?;
        Ok(Self::with_model(Box::new(model), config))
    }

    pub fn with_model(model: Box<dyn SegmentationModel>, config: VisionConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Analyze one image and write its mask, heatmap and overlay.
    pub fn analyze_image(&self, image_path: &Path, output_dir: &Path) -> Result<Detection, VisionError> {
        let image = open_image(image_path)?;
        let original = image.to_rgb8();

        let input = preprocess(&image, self.config.image_size);
        let logits = self.model.predict(&input)?;
        let out = postprocess(&logits, &original, self.config.threshold);

        let stem = file_stem(image_path);
        let mask_path = output_dir.join(format!("mask_{stem}.png"));
        let heatmap_path = output_dir.join(format!("heatmap_{stem}.png"));
        let result_path = output_dir.join(format!("result_{stem}.jpg"));

        out.mask
            .save(&mask_path)
            .map_err(|source| write_error(&mask_path, source))?;
        out.heatmap
            .save(&heatmap_path)
            .map_err(|source| write_error(&heatmap_path, source))?;
        out.overlay
            .save(&result_path)
            .map_err(|source| write_error(&result_path, source))?;

        Ok(Detection {
            image_path: path_string(image_path),
            confidence: out.confidence,
            has_detection: out.confidence > DETECTION_CONFIDENCE,
            mask_path: path_string(&mask_path),
            heatmap_path: path_string(&heatmap_path),
            result_path: path_string(&result_path),
        })
    }

    /// Analyze each image in turn. Images that cannot be read are skipped.
    pub fn analyze_images(
        &self,
        image_paths: &[PathBuf],
        output_dir: &Path,
    ) -> Result<AnalysisResult, VisionError> {
        std::fs::create_dir_all(output_dir)?;

        let mut detections = Vec::with_capacity(image_paths.len());
        for path in image_paths {
            match self.analyze_image(path, output_dir) {
                Ok(detection) => {
                    tracing::debug!(
                        image = %path.display(),
                        confidence = detection.confidence,
                        has_detection = detection.has_detection,
                        "Image analyzed"
                    );
                    detections.push(detection);
                }
                Err(e @ VisionError::UnreadableImage { .. }) => {
                    tracing::warn!(error = %e, "Skipping unreadable image");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(AnalysisResult::from_detections(detections))
    }

    /// Sample `fps` frames per second from a video into `frames_dir`, then
    /// analyze them. Inference runs on the blocking pool.
    pub async fn analyze_video(
        self: Arc<Self>,
        video_path: &Path,
        frames_dir: &Path,
        output_dir: &Path,
        fps: f64,
    ) -> Result<VideoAnalysis, VisionError> {
        let frames = ffmpeg::extract_frames(video_path, frames_dir, fps).await?;
        tracing::info!(
            video = %video_path.display(),
            frames = frames.len(),
            fps,
            "Video frames extracted"
        );

        let frames_extracted = frames.len();
        let output_dir = output_dir.to_path_buf();
        let analysis = tokio::task::spawn_blocking(move || self.analyze_images(&frames, &output_dir))
            .await
            .map_err(|e| VisionError::Task(e.to_string()))??;

        Ok(VideoAnalysis {
            frames_extracted,
            analysis,
        })
    }
}

/// Decode by content, so uploads without a usable extension still load.
fn open_image(path: &Path) -> Result<DynamicImage, VisionError> {
    let unreadable = |reason: String| VisionError::UnreadableImage {
        path: path.to_path_buf(),
        reason,
    };
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| unreadable(e.to_string()))?
        .decode()
        .map_err(|e| unreadable(e.to_string()))
}

fn write_error(path: &Path, source: image::ImageError) -> VisionError {
    VisionError::WriteOutput {
        path: path.to_path_buf(),
        source,
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
