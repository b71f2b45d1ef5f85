//! Batch driver: picks an execution mode, runs it to completion and gathers
//! the statuses.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::transform::Transform;
use crate::types::{ExecutionMode, RunSummary, Status};

use super::assembler::{Pipeline, PipelineRun};
use super::discovery::DestinationPlanner;
use super::sequential::SequentialExecutor;

/// Runs a batch of paths in either execution mode.
pub struct Driver {
    mode: ExecutionMode,
    pipeline: Pipeline,
    sequential: SequentialExecutor,
}

impl Driver {
    /// Create a driver; the mode comes from `pipeline.concurrent`.
    pub fn new(config: &Config, planner: DestinationPlanner) -> Self {
        Self {
            mode: ExecutionMode::from_concurrent_flag(config.pipeline.concurrent),
            pipeline: Pipeline::new(config, planner.clone()),
            sequential: SequentialExecutor::new(config, planner),
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Use the same transform sequence in both modes.
    pub fn with_transforms(mut self, transforms: Vec<Transform>) -> Self {
        self.sequential = self.sequential.with_transforms(transforms.clone());
        self.pipeline = self.pipeline.with_transforms(transforms);
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Start the batch without waiting for it.
    pub fn start(&self, paths: Vec<PathBuf>) -> PipelineRun {
        match self.mode {
            ExecutionMode::Concurrent => self.pipeline.spawn(paths),
            ExecutionMode::Sequential => self.sequential.spawn(paths),
        }
    }

    /// Run the batch to completion.
    pub async fn run(&self, paths: Vec<PathBuf>) -> RunSummary {
        self.run_with(paths, |_| {}).await
    }

    /// Run the batch to completion, calling `on_status` as each item finishes.
    ///
    /// Returns once the status stream has closed and every worker has exited.
    /// A path whose worker died before reporting gets a failure status here,
    /// so the summary always holds one status per input.
    pub async fn run_with<F>(&self, paths: Vec<PathBuf>, mut on_status: F) -> RunSummary
    where
        F: FnMut(&Status),
    {
        let start = Instant::now();
        let expected = paths.len();
        let mut pending: HashMap<PathBuf, usize> = HashMap::with_capacity(expected);
        for path in &paths {
            *pending.entry(path.clone()).or_default() += 1;
        }

        tracing::info!("Processing {} images ({} mode)", expected, self.mode);
        let mut run = self.start(paths);
        let mut statuses = Vec::with_capacity(expected);

        while let Some(status) = run.next().await {
            if status.succeeded {
                tracing::debug!("Processed: {:?}", status.source_path);
            } else {
                tracing::debug!("Failed: {:?}", status.source_path);
            }
            if let Some(count) = pending.get_mut(&status.source_path) {
                *count = count.saturating_sub(1);
            }
            on_status(&status);
            statuses.push(status);
        }

        let workers = run.worker_count();
        let clean = run.join().await;
        if clean != workers {
            tracing::error!("{} of {} workers did not exit cleanly", workers - clean, workers);
        }

        for (path, missing) in pending {
            for _ in 0..missing {
                tracing::error!("No status received for {:?}", path);
                let destination = self.pipeline.planner().destination_for(&path);
                let status = Status::failure(
                    path.clone(),
                    destination,
                    "worker exited before reporting",
                );
                on_status(&status);
                statuses.push(status);
            }
        }

        let summary = RunSummary {
            mode: self.mode,
            statuses,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "Finished {} images: {} succeeded, {} failed in {:.2}s",
            summary.total(),
            summary.succeeded(),
            summary.failed(),
            summary.elapsed.as_secs_f64()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn driver(dir: &Path, concurrent: bool) -> Driver {
        let mut config = Config::default();
        config.pipeline.concurrent = concurrent;
        Driver::new(&config, DestinationPlanner::new(dir, dir.join("out")))
    }

    #[test]
    fn test_mode_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(driver(dir.path(), true).mode(), ExecutionMode::Concurrent);
        assert_eq!(driver(dir.path(), false).mode(), ExecutionMode::Sequential);
        assert_eq!(
            driver(dir.path(), false)
                .with_mode(ExecutionMode::Concurrent)
                .mode(),
            ExecutionMode::Concurrent
        );
    }

    #[tokio::test]
    async fn test_empty_batch_in_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        for concurrent in [true, false] {
            let summary = driver(dir.path(), concurrent).run(Vec::new()).await;
            assert_eq!(summary.total(), 0);
        }
    }

    #[tokio::test]
    async fn test_callback_sees_every_status() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![dir.path().join("a.png"), dir.path().join("b.png")];

        let mut seen = Vec::new();
        let summary = driver(dir.path(), true)
            .run_with(paths, |s| seen.push(s.source_path.clone()))
            .await;

        assert_eq!(summary.total(), 2);
        assert_eq!(summary.failed(), 2);
        assert_eq!(seen.len(), 2);
        assert_eq!(summary.mode, ExecutionMode::Concurrent);
    }
}
