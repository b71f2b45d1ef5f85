//! Lumen Core - concurrent image transformation pipeline.
//!
//! Lumen loads a batch of images, runs each one through a fixed chain of
//! transforms and writes the result, reporting one [`Status`] per input.
//!
//! # Architecture
//!
//! In concurrent mode every step is its own tokio task, linked to the next by
//! a bounded channel:
//!
//! ```text
//! paths → Load → Resize → Grayscale → Brightness → Alpha → Save → Status
//! ```
//!
//! A failure anywhere turns the item's payload absent; later steps pass it
//! along untouched and the save step reports it. Sequential mode runs the
//! same steps one item at a time and must produce the same statuses.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lumen_core::{Config, DestinationPlanner, Driver, FileDiscovery};
//!
//! #[tokio::main]
//! async fn main() -> lumen_core::Result<()> {
//!     let config = Config::load()?;
//!     let input = config.input_dir();
//!     let files = FileDiscovery::new(&config).discover(&input)?;
//!     let planner = DestinationPlanner::for_input(&input, config.output_dir());
//!
//!     let paths = files.into_iter().map(|f| f.path).collect();
//!     let summary = Driver::new(&config, planner).run(paths).await;
//!     println!("{} succeeded, {} failed", summary.succeeded(), summary.failed());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod transform;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, LumenError, PipelineError, PipelineResult, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{
    BlurPass, DestinationPlanner, DiscoveredFile, Driver, FileDiscovery, ImageCodec, Pipeline,
    PipelineRun, SequentialExecutor,
};
pub use transform::{RgbaMatrix, Transform};
pub use types::{ExecutionMode, ImagePayload, RunSummary, Status, WorkItem};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
