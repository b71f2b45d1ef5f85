//! Sub-configuration structs and their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input discovery and output placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Directory scanned when no input is given on the command line
    pub input_dir: PathBuf,

    /// Directory receiving processed images (skipped during discovery)
    pub output_dir: PathBuf,

    /// Supported input extensions
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("images/output"),
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// Stage wiring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run stages concurrently (true) or the sequential baseline (false)
    pub concurrent: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { concurrent: true }
    }
}

/// Parameters for the resize → grayscale → brightness → alpha sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Resize factor applied to both dimensions
    pub resize_scale: f64,

    /// Value added to each color channel (negative darkens)
    pub brightness_delta: i32,

    /// Multiplier for the alpha channel, 0.0 (transparent) to 1.0 (unchanged)
    pub alpha_factor: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            resize_scale: 0.5,
            brightness_delta: 40,
            alpha_factor: 0.5,
        }
    }
}

/// Gaussian blur pass settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Whether to run the blur pass after the main pipeline
    pub enabled: bool,

    /// Kernel edge length (odd, >= 3)
    pub kernel_size: usize,

    /// Standard deviation of the Gaussian
    pub sigma: f64,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            kernel_size: 7,
            sigma: 2.0,
        }
    }
}

/// Status report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format: "text", "json" or "jsonl"
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
