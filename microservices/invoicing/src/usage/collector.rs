//! Usage Collector
//!
//! Buffers metered API call events and serves filtered slices to invoicing
//! runs. Outcome values arriving as raw strings are parsed strictly here;
//! an unknown value rejects the record instead of counting as zero.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use openbill_core::{AccountId, CallOutcome, Result};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::selection::PeriodScope;
use crate::types::{RawUsageRecord, UsageEvent};

#[derive(Clone, Default)]
pub struct UsageCollector {
    buffer: Arc<DashMap<Uuid, UsageEvent>>,
}

impl UsageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an already-typed event
    pub async fn record(&self, event: UsageEvent) -> Uuid {
        let id = event.id;
        self.buffer.insert(id, event);
        id
    }

    /// Record a call from raw feed values; the outcome string must be one of
    /// the known vocabulary or the record is rejected
    pub async fn record_call(
        &self,
        account_id: AccountId,
        called_at: DateTime<Utc>,
        outcome: &str,
    ) -> Result<Uuid> {
        let outcome: CallOutcome = outcome.parse()?;
        let event = UsageEvent {
            id: Uuid::new_v4(),
            account_id,
            called_at,
            outcome,
        };
        Ok(self.record(event).await)
    }

    /// Record a batch of raw feed records. Every outcome is validated before
    /// any event is stored: one bad record rejects the whole batch, so a
    /// corrected retry never double-counts the valid prefix.
    pub async fn record_batch(&self, records: Vec<RawUsageRecord>) -> Result<usize> {
        let mut events = Vec::with_capacity(records.len());
        for record in records {
            let outcome: CallOutcome = record.outcome.parse()?;
            events.push(UsageEvent {
                id: Uuid::new_v4(),
                account_id: record.account_id,
                called_at: record.called_at,
                outcome,
            });
        }

        let count = events.len();
        for event in events {
            self.record(event).await;
        }
        Ok(count)
    }

    /// Fetch events matching a run's period scope and account filter,
    /// ordered by account then timestamp
    pub async fn fetch(
        &self,
        scope: &PeriodScope,
        accounts: Option<&HashSet<AccountId>>,
    ) -> Vec<UsageEvent> {
        let mut events: Vec<UsageEvent> = self
            .buffer
            .iter()
            .filter(|e| scope.contains(&e.value().called_at))
            .filter(|e| accounts.map_or(true, |set| set.contains(&e.value().account_id)))
            .map(|e| e.value().clone())
            .collect();
        events.sort_by(|a, b| {
            a.account_id
                .cmp(&b.account_id)
                .then(a.called_at.cmp(&b.called_at))
        });
        events
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
