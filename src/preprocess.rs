use image::imageops::{self, FilterType};
use tract_onnx::prelude::*;

use crate::error::PredictError;

pub const INPUT_WIDTH: u32 = 224;
pub const INPUT_HEIGHT: u32 = 224;

/// Decodes raw upload bytes into the `[1, 224, 224, 3]` float32 NHWC
/// tensor the classifier was trained on.
///
/// The resize filter (nearest-neighbor) and the `v / 127.5 - 1` rescale
/// to [-1, 1] reproduce the training pipeline. Swapping the filter or
/// applying the rescale twice does not raise an error, it silently
/// skews predictions, so both are pinned here and covered by tests.
pub fn preprocess(bytes: &[u8]) -> Result<tract_ndarray::Array4<f32>, PredictError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.to_rgb8();
    let resized = imageops::resize(&rgb, INPUT_WIDTH, INPUT_HEIGHT, FilterType::Nearest);

    let mut tensor =
        tract_ndarray::Array4::<f32>::zeros((1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 127.5 - 1.0;
        }
    }
    Ok(tensor)
}
