use std::sync::Arc;

use crate::error::Result;
use crate::models::{NewTransaction, TransactionCandidate};
use crate::remote::{RemoteClient, TransactionRequest};
use crate::store::TransactionStore;

/// What a sync pass does after a remote attempt fails.
///
/// A single failure usually means connectivity is down for everything
/// behind it, so stopping is the default; it is a heuristic, not a law,
/// hence the override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacklogPolicy {
    StopOnFirstFailure,
    ContinueOnFailure,
}

#[derive(Debug, Clone, Copy)]
pub struct SaveOutcome {
    pub id: i64,
    pub synced: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncReport {
    pub attempted: usize,
    pub flushed: usize,
}

/// Offline-first orchestration of the local store and the remote client.
///
/// Every candidate becomes a durable local record before any network
/// attempt; remote failures never propagate, they only leave records in
/// the backlog for a later [`sync_pending`](Self::sync_pending) pass.
pub struct TransactionRepository<C: RemoteClient> {
    store: Arc<TransactionStore>,
    client: C,
}

impl<C: RemoteClient> TransactionRepository<C> {
    pub fn new(store: Arc<TransactionStore>, client: C) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// Persist one candidate, then make a best-effort remote attempt.
    ///
    /// The insert is the durability point and its failure is the only
    /// error this returns. A failed remote attempt is absorbed here by
    /// contract: ingestion must never fail because the network did.
    pub fn save_and_sync(
        &self,
        user_id: &str,
        candidate: &TransactionCandidate,
        raw_text: &str,
    ) -> Result<SaveOutcome> {
        let tx = NewTransaction::from_candidate(candidate, raw_text);
        let id = self.store.insert(&tx)?;
        log::debug!("stored transaction id={id}: {} {}원", tx.vendor, tx.amount);

        match self.client.create_transaction(&request_for(user_id, &tx)) {
            Ok(response) => {
                self.store.mark_synced(id, response.category.as_deref())?;
                log::info!(
                    "synced transaction id={id}: server_id={}, category={:?}",
                    response.id,
                    response.category
                );
                Ok(SaveOutcome { id, synced: true })
            }
            Err(e) => {
                log::warn!("sync failed for id={id}, will retry later: {e}");
                Ok(SaveOutcome { id, synced: false })
            }
        }
    }

    /// Flush the backlog in insertion order. Partial progress is normal;
    /// remote failures are handled per `policy` and never returned.
    pub fn sync_pending(&self, user_id: &str, policy: BacklogPolicy) -> Result<SyncReport> {
        let backlog = self.store.list_unsynced()?;
        let mut report = SyncReport::default();
        if backlog.is_empty() {
            return Ok(report);
        }

        log::debug!("syncing {} pending transaction(s)", backlog.len());
        for record in &backlog {
            report.attempted += 1;
            let request = TransactionRequest {
                user_id: user_id.to_string(),
                amount: record.amount,
                vendor: record.vendor.clone(),
                raw_text: record.raw_text.clone(),
                transaction_date: record.transaction_date.clone(),
            };
            match self.client.create_transaction(&request) {
                Ok(response) => {
                    self.store.mark_synced(record.id, response.category.as_deref())?;
                    report.flushed += 1;
                    log::debug!("synced backlog id={}", record.id);
                }
                Err(e) => {
                    log::warn!("backlog sync failed at id={}: {e}", record.id);
                    if policy == BacklogPolicy::StopOnFirstFailure {
                        break;
                    }
                }
            }
        }
        Ok(report)
    }
}

fn request_for(user_id: &str, tx: &NewTransaction) -> TransactionRequest {
    TransactionRequest {
        user_id: user_id.to_string(),
        amount: tx.amount,
        vendor: tx.vendor.clone(),
        raw_text: tx.raw_text.clone(),
        transaction_date: tx.transaction_date.clone(),
    }
}
