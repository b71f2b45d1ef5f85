//! Assembles the concurrent pipeline: a feeder, a load stage, one stage per
//! transform and a save stage, each linked to the next by a bounded channel.

use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};

use crate::config::Config;
use crate::error::PipelineError;
use crate::transform::Transform;
use crate::types::{ImagePayload, Status, WorkItem};

use super::channel::feed;
use super::discovery::DestinationPlanner;
use super::stage::Stage;
use super::steps;

/// A started batch: the status stream plus every worker feeding it.
///
/// Statuses arrive in completion order. `next` returns `None` once the last
/// stage has drained its input, which only happens after every upstream
/// stage has closed its output.
pub struct PipelineRun {
    statuses: mpsc::Receiver<Status>,
    workers: Vec<JoinHandle<usize>>,
}

impl PipelineRun {
    pub(crate) fn new(statuses: mpsc::Receiver<Status>, workers: Vec<JoinHandle<usize>>) -> Self {
        Self { statuses, workers }
    }

    /// Wait for the next terminal status.
    pub async fn next(&mut self) -> Option<Status> {
        self.statuses.recv().await
    }

    /// Number of tasks backing this run, feeder included.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Wait for every worker to exit and return how many exited cleanly.
    ///
    /// Statuses not yet received are dropped, so call this after `next` has
    /// returned `None`.
    pub async fn join(self) -> usize {
        let Self { statuses, workers } = self;
        drop(statuses);

        let mut clean = 0;
        for result in join_all(workers).await {
            match result {
                Ok(_) => clean += 1,
                Err(e) => tracing::error!("Pipeline worker failed: {}", e),
            }
        }
        clean
    }

    /// Receive every remaining status, then join the workers.
    pub async fn collect(mut self) -> Vec<Status> {
        let mut statuses = Vec::new();
        while let Some(status) = self.next().await {
            statuses.push(status);
        }
        self.join().await;
        statuses
    }
}

/// The concurrent stage chain for one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    transforms: Vec<Transform>,
    planner: DestinationPlanner,
}

impl Pipeline {
    pub fn new(config: &Config, planner: DestinationPlanner) -> Self {
        Self {
            transforms: Transform::sequence(&config.transforms),
            planner,
        }
    }

    /// Replace the transform sequence.
    pub fn with_transforms(mut self, transforms: Vec<Transform>) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn planner(&self) -> &DestinationPlanner {
        &self.planner
    }

    /// Number of stages between the feeder and the status stream.
    pub fn depth(&self) -> usize {
        self.transforms.len() + 2
    }

    /// Start every stage and begin feeding `paths`.
    ///
    /// Must be called inside a tokio runtime. Each stage is its own task and
    /// the returned run yields exactly one status per path.
    pub fn spawn(&self, paths: Vec<PathBuf>) -> PipelineRun {
        tracing::debug!(
            "Starting pipeline: {} paths, {} stages",
            paths.len(),
            self.depth()
        );
        let mut workers = Vec::with_capacity(self.depth() + 1);

        let (sources, feeder) = feed(paths);
        workers.push(feeder);

        let planner = self.planner.clone();
        let (mut items, loader) = Stage::spawn("load", sources, move |source| {
            load_stage(source, planner.clone())
        });
        workers.push(loader);

        for transform in self.transforms.iter().copied() {
            let (next, handle) = Stage::spawn(transform.name(), items, move |item| {
                transform_stage(transform, item)
            });
            items = next;
            workers.push(handle);
        }

        let (statuses, saver) = Stage::spawn("save", items, save_stage);
        workers.push(saver);

        PipelineRun::new(statuses, workers)
    }
}

async fn load_stage(source: PathBuf, planner: DestinationPlanner) -> WorkItem {
    let destination = planner.destination_for(&source);
    let path = source.clone();
    match spawn_blocking(move || steps::load_item(path, &planner)).await {
        Ok(item) => item,
        Err(e) => {
            let err = PipelineError::Decode {
                path: source.clone(),
                message: format!("load task failed: {e}"),
            };
            tracing::warn!("{}", err);
            WorkItem::new(source, destination, ImagePayload::absent(err))
        }
    }
}

async fn transform_stage(transform: Transform, item: WorkItem) -> WorkItem {
    if !item.payload.is_present() {
        return item;
    }
    let (source, destination) = (item.source.clone(), item.destination.clone());
    match spawn_blocking(move || steps::transform_item(transform, item)).await {
        Ok(item) => item,
        Err(e) => {
            let err = PipelineError::Transform {
                path: source.clone(),
                stage: transform.name(),
                message: e.to_string(),
            };
            tracing::warn!("{}", err);
            WorkItem::new(source, destination, ImagePayload::absent(err))
        }
    }
}

async fn save_stage(item: WorkItem) -> Status {
    if !item.payload.is_present() {
        return steps::save_item(item);
    }
    let (source, destination) = (item.source.clone(), item.destination.clone());
    match spawn_blocking(move || steps::save_item(item)).await {
        Ok(status) => status,
        Err(e) => failed_task_status(&source, destination, e),
    }
}

fn failed_task_status(source: &Path, destination: PathBuf, e: tokio::task::JoinError) -> Status {
    let err = PipelineError::Encode {
        path: destination.clone(),
        message: format!("save task failed: {e}"),
    };
    tracing::warn!("{}", err);
    Status::failure(source.to_path_buf(), destination, err.to_string())
}
