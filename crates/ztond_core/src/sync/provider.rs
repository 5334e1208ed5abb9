//! Provider seam and push cycle driver.
//!
//! # Responsibility
//! - Define the contract a hosted sync backend adapter implements.
//! - Drain the local journal in batches and acknowledge accepted entries.

use super::config::{SyncConfig, SyncStatus};
use super::journal::{ChangeJournal, ChangeRecord};
use super::SyncError;
use log::{info, warn};
use serde::Serialize;

const DEFAULT_BATCH_SIZE: u32 = 100;

/// Adapter for one hosted sync backend.
pub trait SyncProvider {
    /// Stable provider id for logs and errors.
    fn provider_id(&self) -> &str;

    /// Pushes one batch to `database_url`.
    ///
    /// Returns the highest `seq` the remote accepted, or `None` when it
    /// accepted nothing. Accepted entries must form a prefix of `changes`.
    fn push(&self, database_url: &str, changes: &[ChangeRecord]) -> Result<Option<i64>, String>;
}

/// Outcome of one push cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SyncReport {
    /// Journal entries acknowledged during this cycle.
    pub pushed: usize,
    /// Journal entries still pending afterwards.
    pub remaining: u64,
}

/// Sync use-case service over a change journal.
pub struct SyncService<J: ChangeJournal> {
    journal: J,
    config: SyncConfig,
    batch_size: u32,
}

impl<J: ChangeJournal> SyncService<J> {
    pub fn new(journal: J, config: SyncConfig) -> Self {
        Self {
            journal,
            config,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Overrides the push batch size (minimum 1).
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn status(&self, credentials_present: bool) -> Result<SyncStatus, SyncError> {
        self.config.status(credentials_present)
    }

    pub fn pending_count(&self) -> Result<u64, SyncError> {
        Ok(self.journal.pending_count()?)
    }

    /// Pending journal entries, oldest first.
    pub fn pending(&self, limit: u32) -> Result<Vec<ChangeRecord>, SyncError> {
        Ok(self.journal.pending(limit)?)
    }

    /// Pushes pending changes until the journal is empty or the provider
    /// stops accepting.
    ///
    /// # Errors
    /// - `Disabled` when no endpoint is configured.
    /// - `AuthRequired` when auth is required and no credentials are present.
    /// - `Provider` when the adapter fails; entries acknowledged earlier in
    ///   the same cycle stay acknowledged.
    pub fn sync_once(
        &self,
        provider: &dyn SyncProvider,
        credentials_present: bool,
    ) -> Result<SyncReport, SyncError> {
        let database_url = match self.config.status(credentials_present)? {
            SyncStatus::Disabled => return Err(SyncError::Disabled),
            SyncStatus::AwaitingAuth { .. } => return Err(SyncError::AuthRequired),
            SyncStatus::Ready { database_url } => database_url,
        };

        let provider_id = provider.provider_id().to_string();
        info!("event=sync_push module=sync status=start provider={provider_id}");

        let mut pushed = 0usize;
        loop {
            let batch = self.journal.pending(self.batch_size)?;
            let Some(last) = batch.last() else {
                break;
            };
            let last_seq = last.seq;

            let accepted = provider.push(&database_url, &batch).map_err(|message| {
                warn!(
                    "event=sync_push module=sync status=error provider={provider_id} pushed={pushed}"
                );
                SyncError::Provider {
                    provider_id: provider_id.clone(),
                    message,
                }
            })?;

            let Some(accepted_seq) = accepted.filter(|seq| *seq >= batch[0].seq) else {
                break;
            };
            pushed += self.journal.acknowledge(accepted_seq.min(last_seq))?;
            if accepted_seq < last_seq {
                break;
            }
        }

        let remaining = self.journal.pending_count()?;
        info!(
            "event=sync_push module=sync status=ok provider={provider_id} pushed={pushed} remaining={remaining}"
        );
        Ok(SyncReport { pushed, remaining })
    }
}
