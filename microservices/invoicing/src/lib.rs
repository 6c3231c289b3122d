//! Invoicing Service
//!
//! Periodic invoicing for commerce accounts based on metered API usage:
//! - Usage event collection and per-period aggregation
//! - Per-account tiered tariffs for successful calls (marginal/layered)
//! - Threshold-based discounts tied to failed-call volume (single pick)
//! - Invoice line assembly, discount/tax finalization, and run reports

pub mod api;
pub mod contract;
pub mod directory;
pub mod invoice;
pub mod rating;
pub mod selection;
pub mod types;
pub mod usage;

#[cfg(test)]
mod tests;

pub use contract::{ContractStore, DiscountTable, TariffTable};
pub use directory::AccountDirectory;
pub use invoice::InvoiceService;
pub use selection::{AccountSelection, PeriodScope};
pub use types::*;
pub use usage::UsageCollector;
