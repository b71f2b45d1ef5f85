//! Sequential execution: each item runs every step before the next starts.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::transform::Transform;
use crate::types::Status;

use super::assembler::PipelineRun;
use super::channel::bounded_channel;
use super::discovery::DestinationPlanner;
use super::steps;

/// Runs the same steps as [`super::Pipeline`], one item at a time.
///
/// A failed load skips the remaining steps for that item; it still gets a
/// failure status so both modes report the same set of paths.
#[derive(Debug, Clone)]
pub struct SequentialExecutor {
    transforms: Vec<Transform>,
    planner: DestinationPlanner,
}

impl SequentialExecutor {
    pub fn new(config: &Config, planner: DestinationPlanner) -> Self {
        Self {
            transforms: Transform::sequence(&config.transforms),
            planner,
        }
    }

    pub fn with_transforms(mut self, transforms: Vec<Transform>) -> Self {
        self.transforms = transforms;
        self
    }

    /// Process every path on the calling thread.
    pub fn run(&self, paths: &[PathBuf]) -> Vec<Status> {
        paths.iter().map(|path| self.process_one(path)).collect()
    }

    /// Process `paths` on a blocking worker, streaming statuses as they finish.
    pub fn spawn(&self, paths: Vec<PathBuf>) -> PipelineRun {
        let (tx, rx) = bounded_channel();
        let executor = self.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let mut sent = 0usize;
            for path in &paths {
                let status = executor.process_one(path);
                if tx.blocking_send(status).is_err() {
                    tracing::warn!("Sequential run stopped: status receiver dropped");
                    break;
                }
                sent += 1;
            }
            sent
        });
        PipelineRun::new(rx, vec![handle])
    }

    fn process_one(&self, source: &Path) -> Status {
        let item = steps::load_item(source.to_path_buf(), &self.planner);
        if !item.payload.is_present() {
            tracing::debug!("Skipping remaining steps for {:?}", source);
            return steps::save_item(item);
        }

        let item = self
            .transforms
            .iter()
            .fold(item, |item, transform| steps::transform_item(*transform, item));
        steps::save_item(item)
    }
}
