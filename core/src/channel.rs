//! Bounded work queue between the producer and the worker pool
//!
//! A thin wrapper over a bounded `tokio::sync::mpsc` channel whose receiving
//! half is shared between workers. The queue closes when the single
//! [`WorkSender`] is dropped; receivers then drain whatever is still buffered
//! and observe `None`.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::error::{BenchError, BenchResult};

/// Default work queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Channel buffer configuration for the work queue
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Maximum number of items buffered between producer and workers
    pub queue_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ChannelConfig {
    /// Create a new channel config with a custom queue capacity
    pub fn with_queue_capacity(mut self, size: usize) -> Self {
        self.queue_capacity = size;
        self
    }

    /// Open a work queue with this configuration
    pub fn open<T>(&self) -> BenchResult<(WorkSender<T>, WorkReceiver<T>)> {
        if self.queue_capacity == 0 {
            return Err(BenchError::config("queue capacity must be at least 1"));
        }
        Ok(work_queue(self.queue_capacity))
    }
}

/// Open a bounded work queue
///
/// # Panics
///
/// Panics if `capacity` is zero. Use [`ChannelConfig::open`] for a checked
/// variant.
pub fn work_queue<T>(capacity: usize) -> (WorkSender<T>, WorkReceiver<T>) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        WorkSender { tx },
        WorkReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producing half of the work queue
///
/// Not cloneable: there is exactly one producer, and dropping it is the
/// close signal.
#[derive(Debug)]
pub struct WorkSender<T> {
    tx: mpsc::Sender<T>,
}

impl<T> WorkSender<T> {
    /// Enqueue an item, waiting while the queue is full
    ///
    /// Fails only if every receiver has been dropped.
    pub async fn send(&self, item: T) -> BenchResult<()> {
        self.tx.send(item).await.map_err(|_| BenchError::shutdown())
    }

    /// Number of items that can be enqueued without waiting
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }

    /// Total queue capacity
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Close the queue
    ///
    /// Equivalent to dropping the sender; buffered items are still delivered.
    pub fn close(self) {}
}

/// Consuming half of the work queue, shared by all workers
///
/// Clones share one underlying receiver, so each item is delivered to exactly
/// one of them.
#[derive(Debug)]
pub struct WorkReceiver<T> {
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for WorkReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> WorkReceiver<T> {
    /// Take the next item, waiting while the queue is empty
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn recv(&self) -> Option<T> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }
}
