//! Invoicing Types

use chrono::{DateTime, Utc};
use openbill_core::{AccountId, BillingPeriod, CallOutcome, OpenbillError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::selection::{AccountSelection, PeriodScope};

/// One metered API call, as delivered by the usage feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: Uuid,
    pub account_id: AccountId,
    pub called_at: DateTime<Utc>,
    pub outcome: CallOutcome,
}

/// Usage record as it arrives from the feed, outcome still unvalidated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUsageRecord {
    pub account_id: AccountId,
    pub called_at: DateTime<Utc>,
    pub outcome: String,
}

/// Identifies one aggregation bucket: one account in one period
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodKey {
    pub account_id: AccountId,
    pub period: BillingPeriod,
}

/// Per-account, per-period success/failure counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageAggregate {
    pub key: PeriodKey,
    pub success_count: u64,
    pub failure_count: u64,
}

/// One pricing step: for usage above `threshold`, each unit costs
/// `unit_price`, before folding into the next lower tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffTier {
    pub unit_price: Decimal,
    pub threshold: u64,
}

impl TariffTier {
    pub fn new(unit_price: Decimal, threshold: u64) -> openbill_core::Result<Self> {
        if unit_price.is_sign_negative() {
            return Err(OpenbillError::DataIntegrity(format!(
                "negative tariff unit price: {}",
                unit_price
            )));
        }
        Ok(Self { unit_price, threshold })
    }

    /// The implicit tier used when an account has no tariff contract.
    pub const fn zero() -> Self {
        Self {
            unit_price: Decimal::ZERO,
            threshold: 0,
        }
    }
}

/// One discount step: a flat rate granted once failures reach `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub rate: Decimal,
    pub threshold: u64,
}

impl DiscountTier {
    pub fn new(rate: Decimal, threshold: u64) -> openbill_core::Result<Self> {
        if rate.is_sign_negative() || rate >= Decimal::ONE {
            return Err(OpenbillError::DataIntegrity(format!(
                "discount rate must be in [0, 1), got {}",
                rate
            )));
        }
        Ok(Self { rate, threshold })
    }

    /// The implicit tier used when an account has no discount contract.
    pub const fn zero() -> Self {
        Self {
            rate: Decimal::ZERO,
            threshold: 0,
        }
    }
}

/// Raw tariff contract row as supplied by the contract feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffRow {
    pub account_id: AccountId,
    pub unit_price: Decimal,
    pub threshold: u64,
}

/// Raw discount contract row as supplied by the contract feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRow {
    pub account_id: AccountId,
    pub rate: Decimal,
    pub threshold: u64,
}

/// One billable row: one account's activity in one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub period: BillingPeriod,
    pub account_id: AccountId,
    pub success_count: u64,
    pub failure_count: u64,
    pub billed_amount: Decimal,
    pub discount_rate: Decimal,
}

/// An invoice line with discount and tax applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedInvoiceLine {
    #[serde(flatten)]
    pub line: InvoiceLine,
    pub net_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_due: Decimal,
}

/// Account lifecycle state in the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// Directory entry: billing contact details for one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    pub account_id: AccountId,
    pub name: String,
    pub tax_id: String,
    pub contact_email: String,
    pub status: AccountStatus,
}

/// One executed invoicing run and its output lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRun {
    pub id: Uuid,
    pub scope: PeriodScope,
    pub selection: AccountSelection,
    pub executed_at: DateTime<Utc>,
    pub currency: String,
    pub event_count: usize,
    pub lines: Vec<FinalizedInvoiceLine>,
}
