//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        let scale = self.transforms.resize_scale;
        if scale.is_nan() || scale <= 0.0 {
            return Err(ConfigError::ValidationError(
                "transforms.resize_scale must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.transforms.alpha_factor) {
            return Err(ConfigError::ValidationError(
                "transforms.alpha_factor must be between 0.0 and 1.0".into(),
            ));
        }
        if self.blur.kernel_size < 3 || self.blur.kernel_size % 2 == 0 {
            return Err(ConfigError::ValidationError(
                "blur.kernel_size must be odd and >= 3".into(),
            ));
        }
        if self.blur.sigma.is_nan() || self.blur.sigma <= 0.0 {
            return Err(ConfigError::ValidationError(
                "blur.sigma must be > 0".into(),
            ));
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be text, json or jsonl (got {:?})",
                self.output.format
            )));
        }
        Ok(())
    }
}
