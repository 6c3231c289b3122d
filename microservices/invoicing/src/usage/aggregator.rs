//! Usage Aggregator
//!
//! Folds a flat event sequence into per-account, per-period success/failure
//! counts. Pure; emission order is account then period so runs are
//! reproducible.

use openbill_core::{BillingPeriod, CallOutcome};
use std::collections::BTreeMap;

use crate::types::{PeriodKey, UsageAggregate, UsageEvent};

pub fn aggregate(events: &[UsageEvent]) -> Vec<UsageAggregate> {
    let mut buckets: BTreeMap<PeriodKey, (u64, u64)> = BTreeMap::new();

    for event in events {
        let key = PeriodKey {
            account_id: event.account_id.clone(),
            period: BillingPeriod::from_timestamp(&event.called_at),
        };
        let counts = buckets.entry(key).or_default();
        match event.outcome {
            CallOutcome::Success => counts.0 += 1,
            CallOutcome::Failure => counts.1 += 1,
        }
    }

    buckets
        .into_iter()
        .map(|(key, (success_count, failure_count))| UsageAggregate {
            key,
            success_count,
            failure_count,
        })
        .collect()
}
