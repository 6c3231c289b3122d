//! Contract Store
//!
//! Holds the raw tariff and discount rows supplied by the contract feed.
//! Rows are validated on the way in; each invoicing run snapshots the store
//! into freshly built tables, so no contract state persists implicitly
//! across runs.

use dashmap::DashMap;
use openbill_core::{AccountId, Result};
use std::sync::Arc;

use crate::contract::tables::{DiscountTable, TariffTable};
use crate::types::{DiscountRow, DiscountTier, TariffRow, TariffTier};

#[derive(Clone, Default)]
pub struct ContractStore {
    tariff_rows: Arc<DashMap<AccountId, Vec<TariffRow>>>,
    discount_rows: Arc<DashMap<AccountId, Vec<DiscountRow>>>,
}

impl ContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tariff row for an account
    pub async fn add_tariff(&self, row: TariffRow) -> Result<()> {
        TariffTier::new(row.unit_price, row.threshold)?;
        self.tariff_rows
            .entry(row.account_id.clone())
            .or_default()
            .push(row);
        Ok(())
    }

    /// Add a discount row for an account
    pub async fn add_discount(&self, row: DiscountRow) -> Result<()> {
        DiscountTier::new(row.rate, row.threshold)?;
        self.discount_rows
            .entry(row.account_id.clone())
            .or_default()
            .push(row);
        Ok(())
    }

    /// Build tier tables from the current rows
    pub fn snapshot(&self) -> Result<(TariffTable, DiscountTable)> {
        let tariff_rows: Vec<TariffRow> = self
            .tariff_rows
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        let discount_rows: Vec<DiscountRow> = self
            .discount_rows
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        Ok((
            TariffTable::from_rows(&tariff_rows)?,
            DiscountTable::from_rows(&discount_rows)?,
        ))
    }

    pub fn tariff_row_count(&self) -> usize {
        self.tariff_rows.iter().map(|e| e.value().len()).sum()
    }

    pub fn discount_row_count(&self) -> usize {
        self.discount_rows.iter().map(|e| e.value().len()).sum()
    }
}
