//! Bounded channels linking pipeline stages.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Items a link between two stages can hold.
///
/// A tokio channel cannot have zero capacity; one slot is the closest it gets
/// to a synchronous handoff. Items in flight never exceed the pipeline depth.
pub const HANDOFF_CAPACITY: usize = 1;

/// Create a single-slot channel pair.
///
/// When the slot is full the sender waits, so an upstream stage can never
/// run more than one item ahead of the stage reading from it.
pub fn bounded_channel<T>() -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(HANDOFF_CAPACITY)
}

/// Feed `items` into a fresh bounded channel from a background task.
///
/// The channel closes once every item has been accepted downstream, which is
/// what lets the first stage observe the end of the batch. The task resolves
/// to the number of items handed over.
pub fn feed<T, I>(items: I) -> (mpsc::Receiver<T>, JoinHandle<usize>)
where
    T: Send + 'static,
    I: IntoIterator<Item = T> + Send + 'static,
    I::IntoIter: Send,
{
    let (tx, rx) = bounded_channel();
    let handle = tokio::spawn(async move {
        let mut fed = 0usize;
        for item in items {
            if tx.send(item).await.is_err() {
                tracing::warn!("Feed stopped: first stage hung up");
                break;
            }
            fed += 1;
        }
        fed
    });
    (rx, handle)
}
