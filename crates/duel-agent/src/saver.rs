//! Background policy writer.
//!
//! Saves are queued from the simulation thread and written on a tokio task,
//! so a slow disk never stalls a tick. Bursts of requests collapse into one
//! write of the newest table.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::store::PolicyStore;
use crate::table::QTable;

/// Handle to the writer task
pub struct PolicySaver {
    tx: Option<mpsc::UnboundedSender<QTable>>,
    worker: Option<JoinHandle<()>>,
}

impl PolicySaver {
    /// Start the writer. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn PolicyStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(writer_task(store, rx));
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queue a snapshot of `table` and return immediately
    pub fn request_save(&self, table: &QTable) {
        match &self.tx {
            Some(tx) => {
                if tx.send(table.clone()).is_err() {
                    warn!("Policy writer is gone, save dropped");
                }
            }
            None => warn!("Policy saver already shut down, save dropped"),
        }
    }

    /// Close the queue and wait for pending writes to land
    pub async fn shutdown(mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                error!("Policy writer task failed: {}", e);
            }
        }
    }
}

async fn writer_task(store: Arc<dyn PolicyStore>, mut rx: mpsc::UnboundedReceiver<QTable>) {
    while let Some(mut table) = rx.recv().await {
        let mut skipped = 0usize;
        while let Ok(newer) = rx.try_recv() {
            table = newer;
            skipped += 1;
        }
        if skipped > 0 {
            debug!(skipped, "Coalesced queued policy saves");
        }

        let store = Arc::clone(&store);
        let states = table.len();
        match tokio::task::spawn_blocking(move || store.save(&table)).await {
            Ok(Ok(())) => info!(states, "Saved policy table"),
            Ok(Err(e)) => error!("Failed to save policy table: {}", e),
            Err(e) => error!("Policy save task panicked: {}", e),
        }
    }
    debug!("Policy writer stopped");
}
