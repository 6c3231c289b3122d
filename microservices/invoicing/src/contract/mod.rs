//! Contract tariff and discount tables

mod store;
mod tables;

pub use store::ContractStore;
pub use tables::{DiscountTable, TariffTable};
