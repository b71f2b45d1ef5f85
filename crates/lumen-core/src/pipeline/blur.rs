//! Standalone Gaussian blur pass over a batch of images.

use std::path::{Path, PathBuf};

use crate::config::BlurConfig;
use crate::transform::RgbaMatrix;
use crate::types::Status;

use super::codec::ImageCodec;
use super::discovery::DestinationPlanner;

/// Blurs each image and writes `<stem>_blurred.jpg`.
///
/// Runs independently of the main pipeline; one status per path.
#[derive(Debug, Clone)]
pub struct BlurPass {
    kernel_size: usize,
    sigma: f64,
    planner: DestinationPlanner,
}

impl BlurPass {
    pub fn new(config: &BlurConfig, planner: DestinationPlanner) -> Self {
        Self {
            kernel_size: config.kernel_size,
            sigma: config.sigma,
            planner,
        }
    }

    /// Blur every path in order on the calling thread.
    pub fn run(&self, paths: &[PathBuf]) -> Vec<Status> {
        paths.iter().map(|path| self.blur_one(path)).collect()
    }

    fn blur_one(&self, source: &Path) -> Status {
        let destination = self.planner.blurred_destination_for(source);
        let image = match ImageCodec::try_load(source) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Skipping blur: {}", e);
                return Status::failure(source.to_path_buf(), destination, e.to_string());
            }
        };

        let mut matrix = RgbaMatrix::from_image(&image);
        matrix.gaussian_blur(self.kernel_size, self.sigma);

        match ImageCodec::save(&destination, &matrix.to_image()) {
            Ok(()) => {
                tracing::debug!("Saved blurred image: {:?}", destination);
                Status::success(source.to_path_buf(), destination)
            }
            Err(e) => {
                tracing::warn!("Failed to save blurred image: {}", e);
                Status::failure(source.to_path_buf(), destination, e.to_string())
            }
        }
    }
}
