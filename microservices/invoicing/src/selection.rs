//! Run scoping
//!
//! A run is bounded by a period scope (one month, one year, or the whole
//! history) and an account selection. Both arrive from the caller already
//! structured; invalid parameters fail with a Validation error instead of
//! being re-prompted.

use chrono::{DateTime, Utc};
use openbill_core::{AccountId, BillingPeriod, OpenbillError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::directory::AccountDirectory;
use crate::types::AccountStatus;

/// Date range a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodScope {
    Month(BillingPeriod),
    Year(i32),
    All,
}

impl PeriodScope {
    pub fn month(year: i32, month: u32) -> Result<Self> {
        Ok(Self::Month(BillingPeriod::new(year, month)?))
    }

    pub fn year(year: i32) -> Result<Self> {
        if year < 1900 {
            return Err(OpenbillError::Validation(format!("year out of range: {}", year)));
        }
        Ok(Self::Year(year))
    }

    /// Build a scope from optional year/month parameters: both present is a
    /// single month, year alone is a full year, neither is the whole history.
    pub fn from_parts(year: Option<i32>, month: Option<u32>) -> Result<Self> {
        match (year, month) {
            (Some(y), Some(m)) => Self::month(y, m),
            (Some(y), None) => Self::year(y),
            (None, None) => Ok(Self::All),
            (None, Some(_)) => Err(OpenbillError::Validation(
                "month given without a year".to_string(),
            )),
        }
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        let period = BillingPeriod::from_timestamp(ts);
        match self {
            Self::Month(scoped) => period == *scoped,
            Self::Year(year) => period.year == *year,
            Self::All => true,
        }
    }
}

/// Which accounts a run covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountSelection {
    All,
    Active,
    Inactive,
    Ids { ids: Vec<AccountId> },
}

impl AccountSelection {
    /// Resolve to a concrete account filter. `None` means no filter.
    pub fn resolve(&self, directory: &AccountDirectory) -> Option<HashSet<AccountId>> {
        match self {
            Self::All => None,
            Self::Active => Some(directory.ids_with_status(AccountStatus::Active)),
            Self::Inactive => Some(directory.ids_with_status(AccountStatus::Inactive)),
            Self::Ids { ids } => Some(ids.iter().cloned().collect()),
        }
    }
}
