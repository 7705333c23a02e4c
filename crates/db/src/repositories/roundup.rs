//! In-memory round-up repository.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;
use untether_core::roundup::{RepositoryError, RoundupRecord, RoundupRepository};
use untether_shared::types::{RoundupId, UserId};

/// Round-up repository backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct InMemoryRoundupRepository {
    records: DashMap<RoundupId, RoundupRecord>,
}

impl InMemoryRoundupRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by ID regardless of owner.
    #[must_use]
    pub fn get(&self, id: RoundupId) -> Option<RoundupRecord> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    /// User's records matching `filter`, newest first.
    fn collect_for_user(
        &self,
        user_id: UserId,
        filter: impl Fn(&RoundupRecord) -> bool,
    ) -> Vec<RoundupRecord> {
        let mut records: Vec<RoundupRecord> = self
            .records
            .iter()
            .filter(|r| r.user_id == Some(user_id) && filter(r.value()))
            .map(|r| r.value().clone())
            .collect();

        // IDs are UUID v7, so they break timestamp ties in creation order.
        records.sort_by_key(|r| Reverse((r.created_at, r.id)));
        records
    }
}

#[async_trait]
impl RoundupRepository for InMemoryRoundupRepository {
    async fn insert(&self, record: RoundupRecord) -> Result<(), RepositoryError> {
        debug!(roundup_id = %record.id, "Storing round-up record");
        self.records.insert(record.id, record);
        Ok(())
    }

    async fn insert_many(&self, records: Vec<RoundupRecord>) -> Result<(), RepositoryError> {
        debug!(count = records.len(), "Storing round-up records");
        for record in records {
            self.records.insert(record.id, record);
        }
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<RoundupRecord>, RepositoryError> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(self
            .collect_for_user(user_id, |_| true)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn list_by_user_between(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RoundupRecord>, RepositoryError> {
        Ok(self.collect_for_user(user_id, |r| r.created_at >= from && r.created_at <= to))
    }

    async fn delete(&self, id: RoundupId, user_id: UserId) -> Result<bool, RepositoryError> {
        Ok(self
            .records
            .remove_if(&id, |_, r| r.user_id == Some(user_id))
            .is_some())
    }
}
