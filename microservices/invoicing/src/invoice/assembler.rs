//! Invoice Assembler
//!
//! Joins aggregated usage with the contract tables to emit invoice lines,
//! and finalizes lines into payable amounts. Accounts missing from either
//! table fall back to a single zero tier; a missing contract is zero charge
//! and zero discount, never an error.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::contract::{DiscountTable, TariffTable};
use crate::rating::{billed_amount, discount_for};
use crate::types::{DiscountTier, FinalizedInvoiceLine, InvoiceLine, TariffTier, UsageAggregate};

/// VAT applied uniformly to every invoice line
pub const TAX_RATE: Decimal = dec!(0.19);

pub fn assemble(
    aggregates: &[UsageAggregate],
    tariffs: &TariffTable,
    discounts: &DiscountTable,
) -> Vec<InvoiceLine> {
    let default_tariff = [TariffTier::zero()];
    let default_discount = [DiscountTier::zero()];

    aggregates
        .iter()
        .map(|agg| {
            let tariff_tiers = tariffs
                .tiers(&agg.key.account_id)
                .unwrap_or(&default_tariff);
            let discount_tiers = discounts
                .tiers(&agg.key.account_id)
                .unwrap_or(&default_discount);

            InvoiceLine {
                period: agg.key.period,
                account_id: agg.key.account_id.clone(),
                success_count: agg.success_count,
                failure_count: agg.failure_count,
                billed_amount: billed_amount(agg.success_count, tariff_tiers),
                discount_rate: discount_for(agg.failure_count, discount_tiers),
            }
        })
        .collect()
}

/// Apply discount and tax to one invoice line
pub fn finalize(line: InvoiceLine) -> FinalizedInvoiceLine {
    let net_amount = line.billed_amount * (Decimal::ONE - line.discount_rate);
    let tax_amount = net_amount * TAX_RATE;
    let total_due = net_amount + tax_amount;

    FinalizedInvoiceLine {
        line,
        net_amount,
        tax_amount,
        total_due,
    }
}
