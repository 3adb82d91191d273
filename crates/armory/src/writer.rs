//! Ordered background persistence.
//!
//! Every registry mutation hands a serialized snapshot to a single writer
//! task. Because one task drains one channel, writes reach the store in the
//! order they were submitted and a slow write can never be overtaken by a
//! later one.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

use crate::store::PersistentStore;

/// A unit of work for the writer task.
#[derive(Debug)]
enum WriteCommand {
    /// Store this blob under the writer's key.
    Save(String),
    /// Acknowledge once every earlier command has been applied.
    Flush(oneshot::Sender<()>),
}

/// Handle to the background task that applies persistence writes in order.
///
/// Dropping the handle closes the queue; the task finishes the writes it
/// already accepted and then exits.
#[derive(Debug)]
pub struct PersistenceWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
    task: JoinHandle<()>,
}

impl PersistenceWriter {
    /// Spawn the writer task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn PersistentStore>, key: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, key.into(), rx));
        Self { tx, task }
    }

    /// Queue a blob for writing. Returns immediately.
    ///
    /// If the writer task is gone the blob is dropped and the loss is logged.
    pub fn save(&self, blob: String) {
        if self.tx.send(WriteCommand::Save(blob)).is_err() {
            error!("Persistence writer stopped; dropping write");
        }
    }

    /// Wait until every write queued before this call has been applied.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    /// Close the queue and wait for the task to drain it.
    pub async fn shutdown(self) {
        let Self { tx, task } = self;
        drop(tx);
        if let Err(e) = task.await {
            error!("Persistence writer task failed: {e}");
        }
    }
}

async fn run(
    store: Arc<dyn PersistentStore>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriteCommand>,
) {
    debug!(key = %key, "Persistence writer started");
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Save(blob) => match store.set(&key, &blob).await {
                Ok(()) => trace!(bytes = blob.len(), "Persisted snapshot"),
                Err(e) => error!("Error saving weapons: {e}"),
            },
            WriteCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("Persistence writer stopped");
}
