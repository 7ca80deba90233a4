//! Frame preprocessing.
//!
//! Turns encoded camera bytes into the network input: RGB, resized to
//! 224x224, scaled to `[0, 1]`, then normalized per channel with the
//! ImageNet statistics the model was trained with. Layout is NCHW with a
//! batch of one.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::classify::ClassifyError;

pub const INPUT_WIDTH: u32 = 224;
pub const INPUT_HEIGHT: u32 = 224;
pub const INPUT_CHANNELS: usize = 3;

pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Normalized network input for one frame.
///
/// Owned by a single classification call and dropped after inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameTensor {
    data: Vec<f32>,
}

impl FrameTensor {
    /// NCHW shape of the tensor.
    pub const SHAPE: [usize; 4] = [
        1,
        INPUT_CHANNELS,
        INPUT_HEIGHT as usize,
        INPUT_WIDTH as usize,
    ];

    pub fn zeros() -> Self {
        Self {
            data: vec![0.0; Self::SHAPE.iter().product()],
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Values of one channel plane, row-major.
    pub fn channel(&self, channel: usize) -> &[f32] {
        let plane = INPUT_WIDTH as usize * INPUT_HEIGHT as usize;
        &self.data[channel * plane..(channel + 1) * plane]
    }

    pub fn channel_mean(&self, channel: usize) -> f32 {
        let plane = self.channel(channel);
        plane.iter().sum::<f32>() / plane.len() as f32
    }
}

/// Decode encoded image bytes (JPEG from the device, PNG for local checks).
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ClassifyError> {
    image::load_from_memory(bytes).map_err(ClassifyError::Decode)
}

/// Resize and normalize a decoded image.
pub fn to_tensor(image: &DynamicImage) -> FrameTensor {
    let resized = image
        .resize_exact(INPUT_WIDTH, INPUT_HEIGHT, FilterType::Triangle)
        .into_rgb8();

    let plane = INPUT_WIDTH as usize * INPUT_HEIGHT as usize;
    let mut data = vec![0.0f32; plane * INPUT_CHANNELS];
    for (idx, pixel) in resized.pixels().enumerate() {
        for channel in 0..INPUT_CHANNELS {
            let scaled = pixel[channel] as f32 / 255.0;
            data[channel * plane + idx] = (scaled - CHANNEL_MEAN[channel]) / CHANNEL_STD[channel];
        }
    }
    FrameTensor { data }
}

/// Decode and normalize in one step.
pub fn prepare(bytes: &[u8]) -> Result<FrameTensor, ClassifyError> {
    let image = decode(bytes)?;
    Ok(to_tensor(&image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(image: RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut out, format)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn solid_color_normalizes_per_channel() {
        let bytes = encode(
            RgbImage::from_pixel(64, 48, Rgb([255, 0, 128])),
            ImageFormat::Png,
        );
        let tensor = prepare(&bytes).unwrap();
        assert_eq!(tensor.as_slice().len(), 3 * 224 * 224);

        let expected: [f32; 3] = [
            (1.0 - 0.485) / 0.229,
            (0.0 - 0.456) / 0.224,
            (128.0 / 255.0 - 0.406) / 0.225,
        ];
        for (channel, want) in expected.iter().enumerate() {
            for value in tensor.channel(channel) {
                assert!((value - want).abs() < 1e-4, "channel {channel}: {value}");
            }
        }
    }

    #[test]
    fn identical_bytes_yield_identical_tensors() {
        let mut image = RgbImage::new(320, 240);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
        }
        let bytes = encode(image, ImageFormat::Jpeg);

        let first = prepare(&bytes).unwrap();
        let second = prepare(&bytes).unwrap();
        for (a, b) in first.as_slice().iter().zip(second.as_slice()) {
            assert!((a - b).abs() <= f32::EPSILON);
        }
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = prepare(b"not an image").unwrap_err();
        assert!(matches!(err, ClassifyError::Decode(_)));
    }

    #[test]
    fn zeros_has_model_shape() {
        let tensor = FrameTensor::zeros();
        assert_eq!(
            tensor.as_slice().len(),
            FrameTensor::SHAPE.iter().product::<usize>()
        );
        assert_eq!(tensor.channel_mean(2), 0.0);
    }
}
