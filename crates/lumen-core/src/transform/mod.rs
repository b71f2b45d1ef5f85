//! Pure image transforms applied by the pipeline stages.
//!
//! Each [`Transform`] takes a borrowed image and returns a new one; the input
//! is never mutated. The pixel math is delegated to the `image` crate.

pub mod blur;

pub use blur::RgbaMatrix;

use image::imageops::{self, FilterType};
use image::DynamicImage;

use crate::config::TransformConfig;

/// One step of the fixed transform sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Scale both dimensions by `scale` (Lanczos3)
    Resize { scale: f64 },
    /// Convert to luma, keeping alpha
    Grayscale,
    /// Add `delta` to each color channel, clamped to 0..=255
    Brightness { delta: i32 },
    /// Multiply the alpha channel by `factor` (clamped to 0.0..=1.0)
    Alpha { factor: f64 },
}

impl Transform {
    /// Short stage name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resize { .. } => "resize",
            Self::Grayscale => "grayscale",
            Self::Brightness { .. } => "brightness",
            Self::Alpha { .. } => "alpha",
        }
    }

    /// Apply the transform, returning a new image.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match *self {
            Self::Resize { scale } => resize(image, scale),
            Self::Grayscale => image.grayscale(),
            Self::Brightness { delta } => {
                DynamicImage::ImageRgba8(imageops::brighten(&image.to_rgba8(), delta))
            }
            Self::Alpha { factor } => adjust_alpha(image, factor),
        }
    }

    /// The resize → grayscale → brightness → alpha sequence, in order.
    ///
    /// Reordering changes the output, so both execution modes build their
    /// stages from this list.
    pub fn sequence(config: &TransformConfig) -> Vec<Transform> {
        vec![
            Self::Resize {
                scale: config.resize_scale,
            },
            Self::Grayscale,
            Self::Brightness {
                delta: config.brightness_delta,
            },
            Self::Alpha {
                factor: config.alpha_factor,
            },
        ]
    }
}

fn resize(image: &DynamicImage, scale: f64) -> DynamicImage {
    if scale.is_nan() || scale <= 0.0 {
        tracing::warn!("Invalid scale factor {:.2}, leaving image unchanged", scale);
        return image.clone();
    }

    let width = ((image.width() as f64 * scale) as u32).max(1);
    let height = ((image.height() as f64 * scale) as u32).max(1);
    if (width, height) == (image.width(), image.height()) {
        return image.clone();
    }

    image.resize_exact(width, height, FilterType::Lanczos3)
}

fn adjust_alpha(image: &DynamicImage, factor: f64) -> DynamicImage {
    let factor = factor.clamp(0.0, 1.0);
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        pixel.0[3] = (pixel.0[3] as f64 * factor) as u8;
    }
    DynamicImage::ImageRgba8(rgba)
}
