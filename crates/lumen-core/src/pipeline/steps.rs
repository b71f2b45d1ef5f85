//! Per-item work shared by the concurrent stages and the sequential executor.
//!
//! These are plain blocking functions; the concurrent stages call them from
//! `spawn_blocking`, the sequential executor calls them directly.

use std::path::PathBuf;

use crate::error::PipelineError;
use crate::transform::Transform;
use crate::types::{Status, WorkItem};

use super::codec::ImageCodec;
use super::discovery::DestinationPlanner;

/// Create the work item for `source`, decoding the image.
pub(crate) fn load_item(source: PathBuf, planner: &DestinationPlanner) -> WorkItem {
    let destination = planner.destination_for(&source);
    let payload = ImageCodec::load(&source);
    WorkItem::new(source, destination, payload)
}

/// Apply one transform. An absent payload passes through untouched.
pub(crate) fn transform_item(transform: Transform, item: WorkItem) -> WorkItem {
    let WorkItem {
        source,
        payload,
        destination,
    } = item;
    let payload = payload.map(|image| transform.apply(&image));
    WorkItem::new(source, destination, payload)
}

/// Terminal step: write the image and report the outcome.
///
/// An absent payload is reported as a failure without touching the disk.
pub(crate) fn save_item(item: WorkItem) -> Status {
    let outcome = ImageCodec::try_save_payload(&item.destination, &item.payload);
    match &outcome {
        Err(PipelineError::Absent { .. }) => {
            tracing::debug!("Not saving {:?}: payload absent", item.source);
        }
        Err(e) => tracing::warn!("Failed to save image: {}", e),
        Ok(()) => {}
    }
    item.into_status(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImagePayload;
    use image::{DynamicImage, GenericImageView};

    #[test]
    fn test_transform_item_short_circuits_absent() {
        let item = WorkItem::new(
            PathBuf::from("a.png"),
            PathBuf::from("a_final.png"),
            ImagePayload::absent("decode failed"),
        );
        let item = transform_item(Transform::Grayscale, item);
        assert_eq!(item.payload.absent_reason(), Some("decode failed"));
        assert_eq!(item.source, PathBuf::from("a.png"));
    }

    #[test]
    fn test_transform_item_replaces_payload() {
        let item = WorkItem::new(
            PathBuf::from("a.png"),
            PathBuf::from("a_final.png"),
            ImagePayload::Present(DynamicImage::new_rgba8(10, 4)),
        );
        let item = transform_item(Transform::Resize { scale: 0.5 }, item);
        assert_eq!(item.payload.image().unwrap().dimensions(), (5, 2));
        assert_eq!(item.destination, PathBuf::from("a_final.png"));
    }

    #[test]
    fn test_save_item_absent_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("a_final.png");
        let item = WorkItem::new(
            PathBuf::from("a.png"),
            destination.clone(),
            ImagePayload::absent("File not found: a.png"),
        );

        let status = save_item(item);
        assert!(!status.succeeded);
        assert!(status.error.unwrap().contains("File not found"));
        assert!(!destination.exists());
    }

    #[test]
    fn test_save_item_writes_present_payload() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("out/a_final.png");
        let item = WorkItem::new(
            PathBuf::from("a.png"),
            destination.clone(),
            ImagePayload::Present(DynamicImage::new_rgba8(2, 2)),
        );

        let status = save_item(item);
        assert!(status.succeeded);
        assert_eq!(status.destination_path, destination);
        assert!(destination.exists());
    }

    #[test]
    fn test_load_item_plans_destination() {
        let planner = DestinationPlanner::new("in", "out");
        let item = load_item(PathBuf::from("in/missing.png"), &planner);
        assert!(!item.payload.is_present());
        assert_eq!(item.destination, PathBuf::from("out/missing_final.png"));
    }
}
