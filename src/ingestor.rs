use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::event::{self, NotificationEvent};
use crate::parser;
use crate::remote::RemoteClient;
use crate::repository::{BacklogPolicy, TransactionRepository};

/// Dispatches inbound notification events to worker threads so event
/// delivery returns immediately; extraction and persistence happen off
/// the delivery path.
pub struct Ingestor<C: RemoteClient + 'static> {
    repository: Arc<TransactionRepository<C>>,
    user_id: String,
    sync_running: Arc<AtomicBool>,
}

impl<C: RemoteClient + 'static> Ingestor<C> {
    pub fn new(repository: Arc<TransactionRepository<C>>, user_id: &str) -> Self {
        Self {
            repository,
            user_id: user_id.to_string(),
            sync_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle one event on its own thread. Events from untargeted sources
    /// and text with no extractable transaction are dropped quietly.
    pub fn dispatch(&self, event: NotificationEvent) -> JoinHandle<()> {
        let repository = Arc::clone(&self.repository);
        let user_id = self.user_id.clone();
        thread::spawn(move || {
            let Some(bank) = event::bank_label(&event.source_label) else {
                log::debug!("ignoring notification from {}", event.source_label);
                return;
            };
            let Some(candidate) = parser::extract(&event.combined_text, bank) else {
                log::debug!("no transaction in text: {}", event.combined_text);
                return;
            };
            match repository.save_and_sync(&user_id, &candidate, &event.combined_text) {
                Ok(outcome) if outcome.synced => {
                    log::debug!("ingested and synced id={}", outcome.id)
                }
                Ok(outcome) => log::debug!("ingested id={}, sync pending", outcome.id),
                // Local durability failed; the event is lost and that must
                // be visible.
                Err(e) => log::error!("failed to persist transaction: {e}"),
            }
        })
    }

    /// Kick off one backlog pass on a worker thread. Single-flight: while
    /// a pass is running, further calls are a no-op, so the same backlog
    /// is never submitted twice concurrently.
    pub fn sync_pending(&self, policy: BacklogPolicy) -> Option<JoinHandle<()>> {
        if self
            .sync_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("sync pass already running, skipping");
            return None;
        }
        let repository = Arc::clone(&self.repository);
        let user_id = self.user_id.clone();
        let running = Arc::clone(&self.sync_running);
        Some(thread::spawn(move || {
            match repository.sync_pending(&user_id, policy) {
                Ok(report) => log::debug!(
                    "sync pass done: {}/{} flushed",
                    report.flushed,
                    report.attempted
                ),
                Err(e) => log::warn!("sync pass failed: {e}"),
            }
            running.store(false, Ordering::SeqCst);
        }))
    }
}
