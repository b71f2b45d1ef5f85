//! Core data types flowing through the Lumen pipeline.
//!
//! A [`WorkItem`] travels from stage to stage and is owned by exactly one
//! stage at a time. Its payload is an explicit [`ImagePayload`] so that a
//! failure upstream is carried as data rather than a missing value. The only
//! thing that leaves the pipeline is a [`Status`], one per source path.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PipelineResult;

/// The image carried by a work item, or the reason it is missing.
///
/// Once a payload is `Absent` no stage turns it back into `Present`.
pub enum ImagePayload {
    /// A decoded image owned by the stage currently holding the item
    Present(DynamicImage),
    /// Processing failed upstream; the string says where and why
    Absent(String),
}

impl ImagePayload {
    /// Build an absent payload from anything displayable.
    pub fn absent(reason: impl fmt::Display) -> Self {
        Self::Absent(reason.to_string())
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Borrow the image, if there is one.
    pub fn image(&self) -> Option<&DynamicImage> {
        match self {
            Self::Present(image) => Some(image),
            Self::Absent(_) => None,
        }
    }

    /// Replace a present image with `f(image)`; an absent payload is returned as is.
    pub fn map(self, f: impl FnOnce(DynamicImage) -> DynamicImage) -> Self {
        match self {
            Self::Present(image) => Self::Present(f(image)),
            absent @ Self::Absent(_) => absent,
        }
    }

    /// Why the payload is absent, if it is.
    pub fn absent_reason(&self) -> Option<&str> {
        match self {
            Self::Present(_) => None,
            Self::Absent(reason) => Some(reason),
        }
    }
}

impl From<PipelineResult<DynamicImage>> for ImagePayload {
    fn from(result: PipelineResult<DynamicImage>) -> Self {
        match result {
            Ok(image) => Self::Present(image),
            Err(e) => Self::absent(e),
        }
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(image) => write!(
                f,
                "Present({}x{} {:?})",
                image.width(),
                image.height(),
                image.color()
            ),
            Self::Absent(reason) => f.debug_tuple("Absent").field(reason).finish(),
        }
    }
}

/// One unit of pipeline work.
///
/// Deliberately not `Clone`: an item moves through the channels, it is never
/// shared between stages.
#[derive(Debug)]
pub struct WorkItem {
    /// Where the image was read from
    pub source: PathBuf,
    /// Current state of the image
    pub payload: ImagePayload,
    /// Where the final image will be written
    pub destination: PathBuf,
}

impl WorkItem {
    pub fn new(source: PathBuf, destination: PathBuf, payload: ImagePayload) -> Self {
        Self {
            source,
            payload,
            destination,
        }
    }

    /// Build the terminal status for this item from the outcome of saving it.
    pub fn into_status(self, outcome: PipelineResult<()>) -> Status {
        match outcome {
            Ok(()) => Status::success(self.source, self.destination),
            Err(e) => Status::failure(self.source, self.destination, e.to_string()),
        }
    }
}

/// Terminal per-item record, emitted exactly once for every source path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// The source path this status belongs to
    pub source_path: PathBuf,

    /// The destination the image was (or would have been) written to
    pub destination_path: PathBuf,

    /// Whether the image made it to disk
    pub succeeded: bool,

    /// Why the item failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Status {
    pub fn success(source_path: PathBuf, destination_path: PathBuf) -> Self {
        Self {
            source_path,
            destination_path,
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(
        source_path: PathBuf,
        destination_path: PathBuf,
        error: impl Into<String>,
    ) -> Self {
        Self {
            source_path,
            destination_path,
            succeeded: false,
            error: Some(error.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.source_path
    }
}

/// How a batch is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One concurrent worker per stage, chained by channels
    Concurrent,
    /// Every item runs through every stage before the next item starts
    Sequential,
}

impl ExecutionMode {
    pub fn from_concurrent_flag(concurrent: bool) -> Self {
        if concurrent {
            Self::Concurrent
        } else {
            Self::Sequential
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concurrent => write!(f, "concurrent"),
            Self::Sequential => write!(f, "sequential"),
        }
    }
}

/// Aggregate of a finished batch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Mode the batch ran in
    pub mode: ExecutionMode,

    /// One status per input path, in completion order
    pub statuses: Vec<Status>,

    /// Wall-clock time for the whole batch
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.statuses.iter().filter(|s| s.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.statuses.len() - self.succeeded()
    }

    pub fn total(&self) -> usize {
        self.statuses.len()
    }

    /// Processing rate in images per second.
    pub fn images_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total() as f64 / secs
        } else {
            0.0
        }
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
