//! Segmentation model seam and its ONNX Runtime implementation.

use std::path::Path;

use ndarray::{Array2, Array4};
use ort::{inputs, Session, SessionBuilder};

use crate::error::VisionError;

/// A network mapping a `1x3xHxW` tensor to an `HxW` logit map.
pub trait SegmentationModel: Send + Sync {
    fn predict(&self, input: &Array4<f32>) -> Result<Array2<f32>, VisionError>;
}

/// Binary segmentation network exported to ONNX.
///
/// The first graph input receives the image tensor; the first output is
/// read as logits of shape `[1, 1, H, W]`, `[1, H, W]` or `[H, W]`.
pub struct OnnxSegmentationModel {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OnnxSegmentationModel {
    pub fn load(model_path: &Path) -> Result<Self, VisionError> {
        if !model_path.is_file() {
            return Err(VisionError::ModelNotFound(model_path.to_path_buf()));
        }

        let session = SessionBuilder::new()?
            .with_parallel_execution(true)?
            .with_model_from_file(model_path)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| VisionError::OutputShape("model declares no inputs".into()))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| VisionError::OutputShape("model declares no outputs".into()))?;

        tracing::info!(
            model = %model_path.display(),
            input = %input_name,
            output = %output_name,
            "Segmentation model loaded"
        );

        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }
}

impl SegmentationModel for OnnxSegmentationModel {
    fn predict(&self, input: &Array4<f32>) -> Result<Array2<f32>, VisionError> {
        let outputs = self
            .session
            .run(inputs![self.input_name.as_str() => input.view()]?)?;
        let tensor = outputs[self.output_name.as_str()].extract_tensor::<f32>()?;
        let view = tensor.view();

        let shape = view.shape();
        if shape.len() < 2 {
            return Err(VisionError::OutputShape(format!("{shape:?}")));
        }
        let (h, w) = (shape[shape.len() - 2], shape[shape.len() - 1]);
        if view.len() != h * w {
            return Err(VisionError::OutputShape(format!(
                "expected a single {h}x{w} map, got {shape:?}"
            )));
        }

        Array2::from_shape_vec((h, w), view.iter().copied().collect())
            .map_err(|e| VisionError::OutputShape(e.to_string()))
    }
}
