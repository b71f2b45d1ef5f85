//! Image processing pipeline components.
//!
//! - **channel**: Bounded channels for backpressure
//! - **stage**: One worker between two channels
//! - **codec**: Load and save images
//! - **discovery**: Find image files and plan their destinations
//! - **assembler**: The concurrent stage chain
//! - **sequential**: The same steps, one item at a time
//! - **driver**: Runs a batch in either mode
//! - **blur**: Standalone Gaussian blur pass

pub mod assembler;
pub mod blur;
pub mod channel;
pub mod codec;
pub mod discovery;
pub mod driver;
pub mod sequential;
pub mod stage;
mod steps;

// Re-exports for convenient access
pub use assembler::{Pipeline, PipelineRun};
pub use blur::BlurPass;
pub use codec::ImageCodec;
pub use discovery::{DestinationPlanner, DiscoveredFile, FileDiscovery};
pub use driver::Driver;
pub use sequential::SequentialExecutor;
pub use stage::Stage;
