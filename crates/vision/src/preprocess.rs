//! Image to tensor conversion.

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Resize to `size x size` and normalize into a `1x3xHxW` tensor.
pub fn preprocess(image: &DynamicImage, size: u32) -> Array4<f32> {
    let rgb = image
        .resize_exact(size, size, FilterType::Triangle)
        .to_rgb8();
    let side = size as usize;
    let mut input = Array4::<f32>::zeros((1, 3, side, side));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..3 {
            let value = f32::from(pixel.0[c]) / 255.0;
            input[[0, c, y, x]] = (value - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn output_shape() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(40, 30));
        let tensor = preprocess(&img, 16);
        assert_eq!(tensor.shape(), &[1, 3, 16, 16]);
    }

    #[test]
    fn normalizes_per_channel() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 0, 128])));
        let tensor = preprocess(&img, 4);

        let red = tensor[[0, 0, 2, 2]];
        assert!((red - (1.0 - 0.485) / 0.229).abs() < 1e-4);

        let green = tensor[[0, 1, 2, 2]];
        assert!((green - (0.0 - 0.456) / 0.224).abs() < 1e-4);

        let blue = tensor[[0, 2, 2, 2]];
        let expected = (128.0 / 255.0 - 0.406) / 0.225;
        assert!((blue - expected).abs() < 1e-3);
    }
}
