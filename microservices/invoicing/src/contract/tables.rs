//! Tariff and Discount Table Builders
//!
//! Normalize raw contract rows into per-account tier lists sorted by
//! threshold descending. The sort is stable: rows sharing a threshold keep
//! their input order, which the layered rating pass then consumes as-is.
//! Accounts with no rows get no entry; absence resolves to the zero tier at
//! assembly time, not here.

use openbill_core::{AccountId, Result};
use std::collections::HashMap;

use crate::types::{DiscountRow, DiscountTier, TariffRow, TariffTier};

#[derive(Debug, Clone, Default)]
pub struct TariffTable {
    entries: HashMap<AccountId, Vec<TariffTier>>,
}

impl TariffTable {
    pub fn from_rows(rows: &[TariffRow]) -> Result<Self> {
        let mut entries: HashMap<AccountId, Vec<TariffTier>> = HashMap::new();
        for row in rows {
            let tier = TariffTier::new(row.unit_price, row.threshold)?;
            entries.entry(row.account_id.clone()).or_default().push(tier);
        }
        for tiers in entries.values_mut() {
            tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        }
        Ok(Self { entries })
    }

    pub fn tiers(&self, account_id: &AccountId) -> Option<&[TariffTier]> {
        self.entries.get(account_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiscountTable {
    entries: HashMap<AccountId, Vec<DiscountTier>>,
}

impl DiscountTable {
    pub fn from_rows(rows: &[DiscountRow]) -> Result<Self> {
        let mut entries: HashMap<AccountId, Vec<DiscountTier>> = HashMap::new();
        for row in rows {
            let tier = DiscountTier::new(row.rate, row.threshold)?;
            entries.entry(row.account_id.clone()).or_default().push(tier);
        }
        for tiers in entries.values_mut() {
            tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        }
        Ok(Self { entries })
    }

    pub fn tiers(&self, account_id: &AccountId) -> Option<&[DiscountTier]> {
        self.entries.get(account_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
