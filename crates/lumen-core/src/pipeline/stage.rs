//! The stage abstraction: one worker between two channels.
//!
//! A stage pulls from its input, applies a function and pushes the result to
//! an output channel it owns. It never sees channels further down the chain.
//! When the input is closed and drained the stage drops its sender, closing
//! the output, so the end of the batch ripples through the whole chain
//! without any extra shutdown signal.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::channel::bounded_channel;

/// A pipeline stage that processes items one at a time with backpressure.
pub struct Stage<I, O> {
    name: &'static str,
    input: mpsc::Receiver<I>,
    output: mpsc::Sender<O>,
}

impl<I, O> Stage<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Create a new pipeline stage.
    pub fn new(name: &'static str, input: mpsc::Receiver<I>, output: mpsc::Sender<O>) -> Self {
        Self {
            name,
            input,
            output,
        }
    }

    /// Create the stage's output channel, start the worker and return the
    /// receiving end immediately.
    ///
    /// The worker runs until `input` is closed and drained.
    pub fn spawn<F, Fut>(
        name: &'static str,
        input: mpsc::Receiver<I>,
        f: F,
    ) -> (mpsc::Receiver<O>, JoinHandle<usize>)
    where
        F: FnMut(I) -> Fut + Send + 'static,
        Fut: Future<Output = O> + Send + 'static,
    {
        let (tx, rx) = bounded_channel();
        let stage = Self::new(name, input, tx);
        let handle = tokio::spawn(stage.run(f));
        (rx, handle)
    }

    /// Run the stage with a processing function.
    ///
    /// Every input produces exactly one output: failures must be encoded in
    /// `O`, never dropped. Returns the number of items forwarded.
    pub async fn run<F, Fut>(mut self, mut f: F) -> usize
    where
        F: FnMut(I) -> Fut,
        Fut: Future<Output = O>,
    {
        let mut forwarded = 0usize;
        while let Some(item) = self.input.recv().await {
            let result = f(item).await;
            if self.output.send(result).await.is_err() {
                tracing::warn!(stage = self.name, "Downstream closed, stopping stage");
                break;
            }
            forwarded += 1;
        }
        tracing::debug!(stage = self.name, forwarded, "Stage drained");
        forwarded
    }
}
