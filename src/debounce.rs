//! Cancellable delayed delivery of the last value in a burst

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// Quiet period applied to viewport resize bursts
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(120);

/// Delivers a triggered value once no newer trigger arrived for `delay`.
///
/// Every trigger cancels the pending one and schedules a fresh task. Values
/// come back through [`Debouncer::settled`]; a value whose task was
/// superseded after it already fired is discarded there.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<(u64, T)>,
    rx: mpsc::UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            generation: 0,
            pending: None,
            tx,
            rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, replacing anything still waiting
    pub fn trigger(&mut self, value: T) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Debounce superseded pending task");
            }
            handle.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        let delay = self.delay;
        let tx = self.tx.clone();

        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send((generation, value));
        }));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    /// Whether a triggered value has not been handed out yet
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the next value that survived its quiet period.
    ///
    /// Never resolves while nothing is pending.
    pub async fn settled(&mut self) -> T {
        while let Some((generation, value)) = self.rx.recv().await {
            if generation == self.generation {
                self.pending = None;
                return value;
            }
            debug!("Discarding stale debounced value");
        }
        // The sender half lives in self, so the channel never closes
        std::future::pending().await
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
