//! Image preparation for the classifiers
//!
//! Decodes an uploaded photo, resizes it to the model input size and scales
//! pixels to [0, 1] in NHWC order (batch of one).

use image::{imageops::FilterType, DynamicImage};

use crate::error::{AdvisorError, AdvisorResult};

/// Model input tensor, NHWC with a batch dimension of 1
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub data: Vec<f32>,
    pub height: usize,
    pub width: usize,
}

impl ImageTensor {
    pub const CHANNELS: usize = 3;

    /// Wrap an already-normalized buffer; length must be `height * width * 3`
    pub fn from_raw(data: Vec<f32>, height: usize, width: usize) -> AdvisorResult<Self> {
        let expected = height * width * Self::CHANNELS;
        if data.len() != expected {
            return Err(AdvisorError::InvalidImageInput(format!(
                "tensor has {} values, expected {}",
                data.len(),
                expected
            )));
        }
        Ok(Self { data, height, width })
    }

    /// Shape as the ONNX runtime expects it
    pub fn shape(&self) -> [i64; 4] {
        [1, self.height as i64, self.width as i64, Self::CHANNELS as i64]
    }
}

/// Decode, resize and normalize raw upload bytes
pub fn prepare(bytes: &[u8], image_size: u32, max_bytes: usize) -> AdvisorResult<ImageTensor> {
    if bytes.is_empty() {
        return Err(AdvisorError::InvalidImageInput("empty image".to_string()));
    }
    if bytes.len() > max_bytes {
        return Err(AdvisorError::InvalidImageInput(format!(
            "File size exceeds {:.1}MB limit",
            max_bytes as f64 / (1024.0 * 1024.0)
        )));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AdvisorError::InvalidImageInput(format!("could not decode image: {}", e)))?;

    Ok(to_tensor(&decoded, image_size))
}

/// Resize to `size`×`size` and scale RGB values to [0, 1]
pub fn to_tensor(image: &DynamicImage, size: u32) -> ImageTensor {
    let resized = image.resize_exact(size, size, FilterType::CatmullRom);
    let rgb = resized.to_rgb8();

    let data: Vec<f32> = rgb
        .pixels()
        .flat_map(|p| p.0)
        .map(|v| v as f32 / 255.0)
        .collect();

    ImageTensor {
        data,
        height: size as usize,
        width: size as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_prepare_resizes_and_scales() {
        let bytes = png_bytes(40, 30, [255, 0, 51]);
        let tensor = prepare(&bytes, 16, 1024 * 1024).unwrap();

        assert_eq!(tensor.height, 16);
        assert_eq!(tensor.width, 16);
        assert_eq!(tensor.data.len(), 16 * 16 * 3);
        assert_eq!(tensor.shape(), [1, 16, 16, 3]);

        // NHWC: first pixel's channels come first
        assert!((tensor.data[0] - 1.0).abs() < 1e-6);
        assert!(tensor.data[1].abs() < 1e-6);
        assert!((tensor.data[2] - 0.2).abs() < 1e-6);
        assert!(tensor.data.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_prepare_rejects_empty() {
        let err = prepare(&[], 16, 1024).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidImageInput(_)));
    }

    #[test]
    fn test_prepare_rejects_oversized() {
        let bytes = png_bytes(8, 8, [0, 0, 0]);
        let err = prepare(&bytes, 16, 10).unwrap_err();
        assert!(err.to_string().contains("File size exceeds"));
    }

    #[test]
    fn test_prepare_rejects_garbage() {
        let err = prepare(b"definitely not a png", 16, 1024).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidImageInput(_)));
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(ImageTensor::from_raw(vec![0.0; 12], 2, 2).is_ok());
        assert!(ImageTensor::from_raw(vec![0.0; 11], 2, 2).is_err());
    }
}
