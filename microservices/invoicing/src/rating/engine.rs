//! Rating Engine
//!
//! The two pricing primitives of the platform. Both take tier lists already
//! sorted by threshold descending (the table builders' output order) and are
//! pure functions over their inputs.
//!
//! The two algorithms are deliberately different: tariffs are layered
//! (every tier bills its own slice of the volume), discounts are a single
//! threshold lookup (exactly one rate wins, never a sum).

use rust_decimal::Decimal;

use crate::types::{DiscountTier, TariffTier};

/// Marginal/layered billing over successful calls.
///
/// Each tier bills only the portion of the remaining volume above its own
/// threshold; that portion is then removed before the next lower tier is
/// evaluated. A tier list without a zero-threshold tier leaves the
/// sub-threshold residue unbilled; contract tables in the wild rely on that,
/// so it is not treated as an error.
pub fn billed_amount(success_count: u64, tiers: &[TariffTier]) -> Decimal {
    let mut remaining = success_count;
    let mut total = Decimal::ZERO;

    for tier in tiers {
        let excess = remaining.saturating_sub(tier.threshold);
        total += tier.unit_price * Decimal::from(excess);
        remaining -= excess;
    }

    total
}

/// Threshold-lookup discount over failed calls.
///
/// Returns the rate of the highest-threshold tier the failure count
/// qualifies for, or zero when none matches.
pub fn discount_for(failure_count: u64, tiers: &[DiscountTier]) -> Decimal {
    tiers
        .iter()
        .find(|tier| failure_count >= tier.threshold)
        .map(|tier| tier.rate)
        .unwrap_or(Decimal::ZERO)
}
