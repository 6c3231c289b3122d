//! Invoice Report
//!
//! Left-joins finalized lines with the account directory into report rows.
//! Accounts missing from the directory keep their amounts; the contact
//! columns are simply empty.

use openbill_core::{AccountId, BillingPeriod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::directory::AccountDirectory;
use crate::types::FinalizedInvoiceLine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceReportRow {
    pub period: BillingPeriod,
    pub account_id: AccountId,
    pub account_name: Option<String>,
    pub tax_id: Option<String>,
    pub contact_email: Option<String>,
    pub success_count: u64,
    pub failure_count: u64,
    pub billed_amount: Decimal,
    pub discount_rate: Decimal,
    pub net_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_due: Decimal,
}

pub fn build_report(
    lines: &[FinalizedInvoiceLine],
    directory: &AccountDirectory,
) -> Vec<InvoiceReportRow> {
    lines
        .iter()
        .map(|finalized| {
            let profile = directory.get(&finalized.line.account_id);
            InvoiceReportRow {
                period: finalized.line.period,
                account_id: finalized.line.account_id.clone(),
                account_name: profile.as_ref().map(|p| p.name.clone()),
                tax_id: profile.as_ref().map(|p| p.tax_id.clone()),
                contact_email: profile.as_ref().map(|p| p.contact_email.clone()),
                success_count: finalized.line.success_count,
                failure_count: finalized.line.failure_count,
                billed_amount: finalized.line.billed_amount,
                discount_rate: finalized.line.discount_rate,
                net_amount: finalized.net_amount,
                tax_amount: finalized.tax_amount,
                total_due: finalized.total_due,
            }
        })
        .collect()
}
