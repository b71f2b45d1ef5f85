//! Image loading and saving.
//!
//! Loading never fails loudly: a file that cannot be read or decoded becomes
//! an absent payload plus one warning. Saving returns a `PipelineResult` so
//! the terminal stage can turn it into a status.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::ImagePayload;

/// Stateless image codec backed by the `image` crate.
pub struct ImageCodec;

impl ImageCodec {
    /// Load an image, folding any failure into an absent payload.
    pub fn load(path: &Path) -> ImagePayload {
        match Self::try_load(path) {
            Ok(image) => ImagePayload::Present(image),
            Err(e) => {
                tracing::warn!("Failed to load image: {}", e);
                ImagePayload::absent(e)
            }
        }
    }

    /// Load an image, reporting why it could not be decoded.
    pub fn try_load(path: &Path) -> PipelineResult<DynamicImage> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PipelineError::FileNotFound(path.to_path_buf()),
            _ => PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot read file: {}", e),
            },
        })?;
        Self::decode_bytes(bytes, path)
    }

    /// Decode an in-memory buffer. Format is detected from content first and
    /// from the file extension second.
    fn decode_bytes(bytes: Vec<u8>, path: &Path) -> PipelineResult<DynamicImage> {
        let mut reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        if reader.format().is_none() {
            let format =
                ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    format: extension_of(path),
                })?;
            reader.set_format(format);
        }
        reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Encode `image` to `path`, picking the encoder from the extension.
    ///
    /// Parent directories are created as needed. JPEG has no alpha channel,
    /// so the image is flattened to RGB first.
    pub fn save(path: &Path, image: &DynamicImage) -> PipelineResult<()> {
        let encode_err = |message: String| PipelineError::Encode {
            path: path.to_path_buf(),
            message,
        };

        let format = match ImageFormat::from_path(path) {
            Ok(f @ (ImageFormat::Png | ImageFormat::Jpeg)) => f,
            _ => {
                return Err(PipelineError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    format: extension_of(path),
                })
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| encode_err(format!("Cannot create {}: {}", parent.display(), e)))?;
        }

        let result = match format {
            ImageFormat::Jpeg => {
                DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format)
            }
            _ => image.save_with_format(path, format),
        };
        result.map_err(|e| encode_err(e.to_string()))
    }

    /// Save a payload. An absent payload is never written and comes back
    /// as [`PipelineError::Absent`] carrying its reason.
    pub fn try_save_payload(path: &Path, payload: &ImagePayload) -> PipelineResult<()> {
        match payload {
            ImagePayload::Present(image) => Self::save(path, image),
            ImagePayload::Absent(reason) => Err(PipelineError::Absent {
                path: path.to_path_buf(),
                reason: reason.clone(),
            }),
        }
    }

    /// Save a payload, reporting only whether it reached disk.
    ///
    /// An absent payload is never written and yields `false`; an encode
    /// failure is logged once.
    pub fn save_payload(path: &Path, payload: &ImagePayload) -> bool {
        match Self::try_save_payload(path, payload) {
            Ok(()) => true,
            Err(PipelineError::Absent { .. }) => false,
            Err(e) => {
                tracing::warn!("Failed to save image: {}", e);
                false
            }
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("unknown")
        .to_string()
}
