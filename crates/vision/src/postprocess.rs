//! Turn a logit map into a score and the rendered analysis images.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::drawing::draw_line_segment_mut;
use ndarray::Array2;

const CONTOUR_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Rendered outputs for one image, at the original resolution.
pub struct Postprocessed {
    /// Fraction of pixels whose probability exceeds the threshold.
    pub confidence: f32,
    pub mask: GrayImage,
    pub heatmap: RgbImage,
    pub overlay: RgbImage,
}

pub fn sigmoid(logits: &Array2<f32>) -> Array2<f32> {
    logits.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

pub fn confidence(probabilities: &Array2<f32>, threshold: f32) -> f32 {
    if probabilities.is_empty() {
        return 0.0;
    }
    let above = probabilities.iter().filter(|&&p| p > threshold).count();
    above as f32 / probabilities.len() as f32
}

fn to_gray(map: &Array2<f32>, pixel: impl Fn(f32) -> u8) -> GrayImage {
    let (h, w) = map.dim();
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        Luma([pixel(map[[y as usize, x as usize]])])
    })
}

/// Binary mask (255 above threshold) resized to `width x height`.
pub fn mask_image(probabilities: &Array2<f32>, threshold: f32, width: u32, height: u32) -> GrayImage {
    let mask = to_gray(probabilities, |p| if p > threshold { 255 } else { 0 });
    imageops::resize(&mask, width, height, FilterType::Nearest)
}

/// JET-coloured probability heatmap resized to `width x height`.
pub fn heatmap_image(probabilities: &Array2<f32>, width: u32, height: u32) -> RgbImage {
    let gray = to_gray(probabilities, |p| (p.clamp(0.0, 1.0) * 255.0) as u8);
    let gray = imageops::resize(&gray, width, height, FilterType::Nearest);
    RgbImage::from_fn(width, height, |x, y| jet(gray.get_pixel(x, y).0[0]))
}

/// JET colormap: blue through cyan, yellow to red.
pub fn jet(value: u8) -> Rgb<u8> {
    let v = f32::from(value) / 255.0;
    let channel = |offset: f32| ((1.5 - (4.0 * v - offset).abs()).clamp(0.0, 1.0) * 255.0) as u8;
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

/// Draw the outer contours of `mask` on a copy of `original`, 2 px wide.
pub fn contour_overlay(original: &RgbImage, mask: &GrayImage) -> RgbImage {
    let mut overlay = original.clone();
    for contour in find_contours::<u32>(mask) {
        if contour.border_type != BorderType::Outer || contour.points.is_empty() {
            continue;
        }
        let points = &contour.points;
        for (i, start) in points.iter().enumerate() {
            let end = &points[(i + 1) % points.len()];
            for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
                draw_line_segment_mut(
                    &mut overlay,
                    (start.x as f32 + dx, start.y as f32 + dy),
                    (end.x as f32 + dx, end.y as f32 + dy),
                    CONTOUR_COLOR,
                );
            }
        }
    }
    overlay
}

pub fn postprocess(logits: &Array2<f32>, original: &RgbImage, threshold: f32) -> Postprocessed {
    let (width, height) = original.dimensions();
    let probabilities = sigmoid(logits);
    let mask = mask_image(&probabilities, threshold, width, height);
    let heatmap = heatmap_image(&probabilities, width, height);
    let overlay = contour_overlay(original, &mask);

    Postprocessed {
        confidence: confidence(&probabilities, threshold),
        mask,
        heatmap,
        overlay,
    }
}
