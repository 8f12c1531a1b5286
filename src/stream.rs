//! Producer/consumer result channels.
//!
//! A producer writes items into a [`ResultSink`] and completes the stream by
//! dropping it, or terminates it with [`ResultSink::fail`]. A consumer reads
//! them in order from the matching [`ResultStream`].
//!
//! # Cancellation
//! Cancellation is cooperative. Cancelling or dropping a stream raises a
//! shared flag and closes the read side; producers should poll
//! [`ResultSink::is_cancelled`] between units of work. A producer that is
//! already computing is **not** interrupted: cancellation is best-effort and
//! only stops further forwarding.
//!
//! The combinators ([`ResultStream::and_then`], [`ResultStream::fork`]) spawn
//! forwarding tasks and therefore need an ambient tokio runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::OptimizerError;

/// One stream item: a value or the terminal error.
pub type StreamItem<T> = Result<T, OptimizerError>;

/// Shared cooperative cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates a lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the flag was raised.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Creates a connected sink/stream pair.
pub fn channel<T>() -> (ResultSink<T>, ResultStream<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancellationFlag::new();
    (
        ResultSink {
            tx,
            cancel: cancel.clone(),
        },
        ResultStream { rx, cancel },
    )
}

/// Write side of a result channel.
///
/// The stream completes when the last sink clone is dropped.
#[derive(Debug)]
pub struct ResultSink<T> {
    tx: mpsc::UnboundedSender<StreamItem<T>>,
    cancel: CancellationFlag,
}

impl<T> Clone for ResultSink<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T> ResultSink<T> {
    /// Sends an item.
    ///
    /// Returns `false` if the consumer is gone; the producer should stop.
    pub fn emit(&self, item: T) -> bool {
        !self.is_cancelled() && self.tx.send(Ok(item)).is_ok()
    }

    /// Terminates the stream with an error.
    pub fn fail(self, error: OptimizerError) {
        // A consumer that already left does not need the error.
        let _ = self.tx.send(Err(error));
    }

    /// Completes the stream (same as dropping the sink).
    pub fn complete(self) {}

    /// Whether the consumer cancelled or went away.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    /// The flag shared with the consumer.
    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancel
    }
}

/// Read side of a result channel.
///
/// Yields items in emission order. After an `Err` item the stream is over.
#[derive(Debug)]
pub struct ResultStream<T> {
    rx: mpsc::UnboundedReceiver<StreamItem<T>>,
    cancel: CancellationFlag,
}

impl<T> ResultStream<T> {
    /// Waits for the next item; `None` once the stream has completed.
    pub async fn next(&mut self) -> Option<StreamItem<T>> {
        self.rx.recv().await
    }

    /// Stops reading and asks the producer to stop.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.rx.close();
    }

    /// Whether this stream was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Reads the stream to its end.
    ///
    /// Fails with the terminal error, discarding items read before it.
    pub async fn collect(mut self) -> Result<Vec<T>, OptimizerError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }
}

impl<T: Send + 'static> ResultStream<T> {
    /// Maps every item through `f` in a forwarding task.
    ///
    /// The first `Err` returned by `f`, or received from upstream, terminates
    /// the output stream and cancels upstream. Order is preserved.
    pub fn and_then<U, F>(mut self, mut f: F) -> Result<ResultStream<U>, OptimizerError>
    where
        U: Send + 'static,
        F: FnMut(T) -> Result<U, OptimizerError> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| OptimizerError::NoRuntime)?;
        let (sink, stream) = channel();

        runtime.spawn(async move {
            loop {
                let item = tokio::select! {
                    item = self.next() => item,
                    _ = sink.tx.closed() => break,
                };
                match item.map(|item| item.and_then(&mut f)) {
                    Some(Ok(value)) => {
                        if !sink.emit(value) {
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        sink.fail(err);
                        break;
                    }
                    None => break,
                }
            }
        });

        Ok(stream)
    }
}

impl<T: Clone + Send + 'static> ResultStream<T> {
    /// Splits the stream into two independent consumers.
    ///
    /// Both receive every item and the terminal error in order. Upstream is
    /// cancelled once both consumers are gone.
    pub fn fork(mut self) -> Result<(ResultStream<T>, ResultStream<T>), OptimizerError> {
        let runtime = Handle::try_current().map_err(|_| OptimizerError::NoRuntime)?;
        let (left, left_stream) = channel();
        let (right, right_stream) = channel();

        runtime.spawn(async move {
            let mut left = Some(left);
            let mut right = Some(right);
            while let Some(item) = self.next().await {
                for side in [&mut left, &mut right] {
                    let delivered = side.as_ref().is_some_and(|sink| {
                        !sink.is_cancelled() && sink.tx.send(item.clone()).is_ok()
                    });
                    if !delivered {
                        *side = None;
                    }
                }
                if item.is_err() || (left.is_none() && right.is_none()) {
                    break;
                }
            }
        });

        Ok((left_stream, right_stream))
    }
}

impl<T> Drop for ResultStream<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_items_arrive_in_order() {
        let (sink, stream) = channel();
        for i in 0..5 {
            assert!(sink.emit(i));
        }
        sink.complete();
        assert_eq!(stream.collect().await.unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_fail_terminates() {
        let (sink, mut stream) = channel::<u32>();
        sink.emit(1);
        sink.fail(OptimizerError::Strategy("boom".into()));

        assert_eq!(stream.next().await, Some(Ok(1)));
        assert_eq!(
            stream.next().await,
            Some(Err(OptimizerError::Strategy("boom".into())))
        );
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_cancel_signals_producer() {
        let (sink, mut stream) = channel::<u32>();
        assert!(!sink.is_cancelled());
        stream.cancel();
        assert!(sink.is_cancelled());
        assert!(!sink.emit(1));
    }

    #[tokio::test]
    async fn test_drop_signals_producer() {
        let (sink, stream) = channel::<u32>();
        drop(stream);
        assert!(sink.is_cancelled());
    }

    #[tokio::test]
    async fn test_and_then_maps_and_stops_on_error() {
        let (sink, stream) = channel();
        for i in 1..=4 {
            sink.emit(i);
        }
        sink.complete();

        let mapped = stream
            .and_then(|i: u32| {
                if i == 3 {
                    Err(OptimizerError::Strategy("three".into()))
                } else {
                    Ok(i * 10)
                }
            })
            .unwrap();

        let mut mapped = mapped;
        assert_eq!(mapped.next().await, Some(Ok(10)));
        assert_eq!(mapped.next().await, Some(Ok(20)));
        assert!(matches!(mapped.next().await, Some(Err(_))));
        assert_eq!(mapped.next().await, None);
    }

    #[tokio::test]
    async fn test_and_then_cancels_upstream_when_dropped() {
        let (sink, stream) = channel::<u32>();
        let mapped = stream.and_then(Ok).unwrap();
        drop(mapped);

        // The forwarding task notices the closed output and drops upstream.
        for _ in 0..100 {
            if sink.is_cancelled() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(sink.is_cancelled());
    }

    #[tokio::test]
    async fn test_fork_delivers_to_both() {
        let (sink, stream) = channel();
        let (left, right) = stream.fork().unwrap();
        sink.emit("a");
        sink.emit("b");
        sink.fail(OptimizerError::Strategy("end".into()));

        assert!(left.collect().await.is_err());

        let mut right = right;
        assert_eq!(right.next().await, Some(Ok("a")));
        assert_eq!(right.next().await, Some(Ok("b")));
        assert!(matches!(right.next().await, Some(Err(_))));
    }

    #[tokio::test]
    async fn test_fork_survives_one_side_leaving() {
        let (sink, stream) = channel();
        let (left, right) = stream.fork().unwrap();
        drop(left);
        sink.emit(1);
        sink.emit(2);
        sink.complete();
        assert_eq!(right.collect().await.unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_combinators_need_runtime() {
        let (_sink, stream) = channel::<u32>();
        assert_eq!(stream.and_then(Ok).err(), Some(OptimizerError::NoRuntime));
    }
}
