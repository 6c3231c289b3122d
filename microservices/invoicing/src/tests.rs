//! Unit tests for Invoicing Service

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use openbill_core::{AccountId, BillingPeriod, CallOutcome};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::contract::{ContractStore, DiscountTable, TariffTable};
    use crate::invoice::{assemble, finalize, TAX_RATE};
    use crate::rating::{billed_amount, discount_for};
    use crate::selection::PeriodScope;
    use crate::types::{
        DiscountRow, DiscountTier, InvoiceLine, PeriodKey, RawUsageRecord, TariffRow, TariffTier,
        UsageAggregate, UsageEvent,
    };
    use crate::usage::{aggregate, UsageCollector};

    fn event(account: &str, year: i32, month: u32, outcome: CallOutcome) -> UsageEvent {
        UsageEvent {
            id: Uuid::new_v4(),
            account_id: AccountId::new(account),
            called_at: Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap(),
            outcome,
        }
    }

    fn tariff(price: Decimal, threshold: u64) -> TariffTier {
        TariffTier::new(price, threshold).unwrap()
    }

    fn discount(rate: Decimal, threshold: u64) -> DiscountTier {
        DiscountTier::new(rate, threshold).unwrap()
    }

    // Billing calculator

    #[test]
    fn layered_billing_charges_each_slice_at_its_tier() {
        let tiers = vec![tariff(dec!(100), 10), tariff(dec!(50), 5)];
        // 5 calls above 10 at 100, then 5 above 5 at 50, 5 below 5 unbilled
        assert_eq!(billed_amount(15, &tiers), dec!(750));
    }

    #[test]
    fn billing_is_monotonic_over_volume() {
        let tiers = vec![tariff(dec!(30), 200), tariff(dec!(50), 100), tariff(dec!(10), 0)];
        let mut previous = Decimal::ZERO;
        for n in 0..400 {
            let amount = billed_amount(n, &tiers);
            assert!(amount >= previous, "decreased at n={}", n);
            previous = amount;
        }
    }

    #[test]
    fn billing_with_no_tiers_is_zero() {
        assert_eq!(billed_amount(1_000, &[]), Decimal::ZERO);
    }

    #[test]
    fn zero_price_zero_threshold_tier_bills_nothing() {
        let tiers = [TariffTier::zero()];
        for n in [0u64, 1, 17, 10_000] {
            assert_eq!(billed_amount(n, &tiers), Decimal::ZERO);
        }
    }

    #[test]
    fn volume_below_lowest_threshold_stays_unbilled() {
        // No zero-threshold tier: the first 100 calls are free by contract
        let tiers = vec![tariff(dec!(10), 100)];
        assert_eq!(billed_amount(50, &tiers), Decimal::ZERO);
        assert_eq!(billed_amount(100, &tiers), Decimal::ZERO);
        assert_eq!(billed_amount(103, &tiers), dec!(30));
    }

    #[test]
    fn billing_does_not_mutate_tiers() {
        let tiers = vec![tariff(dec!(100), 10), tariff(dec!(50), 5)];
        let before = tiers.clone();
        let _ = billed_amount(42, &tiers);
        assert_eq!(tiers, before);
    }

    // Discount resolver

    #[test]
    fn discount_picks_highest_qualifying_threshold() {
        let tiers = vec![discount(dec!(0.20), 5), discount(dec!(0.10), 3)];
        assert_eq!(discount_for(6, &tiers), dec!(0.20));
        assert_eq!(discount_for(5, &tiers), dec!(0.20));
        assert_eq!(discount_for(4, &tiers), dec!(0.10));
        assert_eq!(discount_for(2, &tiers), Decimal::ZERO);
    }

    #[test]
    fn discount_is_a_single_pick_never_a_sum() {
        let tiers = vec![discount(dec!(0.20), 5), discount(dec!(0.10), 3)];
        let rate = discount_for(100, &tiers);
        // qualifies for both tiers; only the highest-threshold rate applies
        assert_eq!(rate, dec!(0.20));
    }

    #[test]
    fn discount_only_returns_rates_from_the_table() {
        let tiers = vec![discount(dec!(0.15), 30), discount(dec!(0.05), 80)];
        for n in 0..200 {
            let rate = discount_for(n, &tiers);
            assert!(
                rate == Decimal::ZERO || tiers.iter().any(|t| t.rate == rate),
                "foreign rate {} at n={}",
                rate,
                n
            );
        }
    }

    #[test]
    fn discount_with_no_tiers_is_zero() {
        assert_eq!(discount_for(50, &[]), Decimal::ZERO);
    }

    // Usage aggregation

    #[test]
    fn aggregation_counts_per_account_and_period() {
        let events = vec![
            event("A", 2024, 3, CallOutcome::Success),
            event("A", 2024, 3, CallOutcome::Failure),
            event("A", 2024, 4, CallOutcome::Success),
            event("B", 2024, 3, CallOutcome::Success),
        ];

        let aggregates = aggregate(&events);

        assert_eq!(
            aggregates,
            vec![
                UsageAggregate {
                    key: PeriodKey {
                        account_id: AccountId::new("A"),
                        period: BillingPeriod::new(2024, 3).unwrap(),
                    },
                    success_count: 1,
                    failure_count: 1,
                },
                UsageAggregate {
                    key: PeriodKey {
                        account_id: AccountId::new("A"),
                        period: BillingPeriod::new(2024, 4).unwrap(),
                    },
                    success_count: 1,
                    failure_count: 0,
                },
                UsageAggregate {
                    key: PeriodKey {
                        account_id: AccountId::new("B"),
                        period: BillingPeriod::new(2024, 3).unwrap(),
                    },
                    success_count: 1,
                    failure_count: 0,
                },
            ]
        );
    }

    #[test]
    fn aggregation_order_is_independent_of_input_order() {
        let mut events = vec![
            event("B", 2024, 3, CallOutcome::Success),
            event("A", 2024, 4, CallOutcome::Success),
            event("A", 2024, 3, CallOutcome::Failure),
            event("A", 2024, 3, CallOutcome::Success),
        ];
        let forward = aggregate(&events);
        events.reverse();
        let backward = aggregate(&events);
        assert_eq!(forward, backward);
    }

    // Table builders

    #[test]
    fn tariff_table_sorts_descending_by_threshold() {
        let rows = vec![
            TariffRow { account_id: AccountId::new("B"), unit_price: dec!(40), threshold: 50 },
            TariffRow { account_id: AccountId::new("B"), unit_price: dec!(20), threshold: 150 },
            TariffRow { account_id: AccountId::new("B"), unit_price: dec!(10), threshold: 300 },
        ];

        let table = TariffTable::from_rows(&rows).unwrap();
        let tiers = table.tiers(&AccountId::new("B")).unwrap();
        let thresholds: Vec<u64> = tiers.iter().map(|t| t.threshold).collect();
        assert_eq!(thresholds, vec![300, 150, 50]);
    }

    #[test]
    fn duplicate_thresholds_keep_input_order() {
        let rows = vec![
            DiscountRow { account_id: AccountId::new("A"), rate: dec!(0.10), threshold: 50 },
            DiscountRow { account_id: AccountId::new("A"), rate: dec!(0.25), threshold: 50 },
            DiscountRow { account_id: AccountId::new("A"), rate: dec!(0.30), threshold: 80 },
        ];

        let table = DiscountTable::from_rows(&rows).unwrap();
        let tiers = table.tiers(&AccountId::new("A")).unwrap();
        let rates: Vec<Decimal> = tiers.iter().map(|t| t.rate).collect();
        // stable sort: the two threshold-50 rows stay in feed order
        assert_eq!(rates, vec![dec!(0.30), dec!(0.10), dec!(0.25)]);
    }

    #[test]
    fn tariff_rows_with_negative_price_are_rejected() {
        let rows = vec![TariffRow {
            account_id: AccountId::new("A"),
            unit_price: dec!(-1),
            threshold: 0,
        }];
        assert!(TariffTable::from_rows(&rows).is_err());
    }

    #[test]
    fn discount_rates_outside_unit_interval_are_rejected() {
        assert!(DiscountTier::new(dec!(1.0), 0).is_err());
        assert!(DiscountTier::new(dec!(-0.1), 0).is_err());
        assert!(DiscountTier::new(dec!(0.99), 0).is_ok());
    }

    // Assembler and finalizer

    #[test]
    fn accounts_without_contracts_resolve_to_zero() {
        let aggregates = vec![UsageAggregate {
            key: PeriodKey {
                account_id: AccountId::new("ghost"),
                period: BillingPeriod::new(2024, 3).unwrap(),
            },
            success_count: 999,
            failure_count: 999,
        }];

        let lines = assemble(&aggregates, &TariffTable::default(), &DiscountTable::default());

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].billed_amount, Decimal::ZERO);
        assert_eq!(lines[0].discount_rate, Decimal::ZERO);
    }

    #[test]
    fn assembler_carries_counts_and_applies_both_tables() {
        let rows = vec![
            TariffRow { account_id: AccountId::new("A"), unit_price: dec!(100), threshold: 10 },
            TariffRow { account_id: AccountId::new("A"), unit_price: dec!(50), threshold: 5 },
        ];
        let discounts = vec![DiscountRow {
            account_id: AccountId::new("A"),
            rate: dec!(0.10),
            threshold: 3,
        }];

        let aggregates = vec![UsageAggregate {
            key: PeriodKey {
                account_id: AccountId::new("A"),
                period: BillingPeriod::new(2024, 3).unwrap(),
            },
            success_count: 15,
            failure_count: 4,
        }];

        let lines = assemble(
            &aggregates,
            &TariffTable::from_rows(&rows).unwrap(),
            &DiscountTable::from_rows(&discounts).unwrap(),
        );

        assert_eq!(lines[0].success_count, 15);
        assert_eq!(lines[0].failure_count, 4);
        assert_eq!(lines[0].billed_amount, dec!(750));
        assert_eq!(lines[0].discount_rate, dec!(0.10));
    }

    #[test]
    fn finalizer_applies_discount_then_tax() {
        let line = InvoiceLine {
            period: BillingPeriod::new(2024, 3).unwrap(),
            account_id: AccountId::new("A"),
            success_count: 10,
            failure_count: 5,
            billed_amount: dec!(1000),
            discount_rate: dec!(0.1),
        };

        let finalized = finalize(line);

        assert_eq!(finalized.net_amount, dec!(900));
        assert_eq!(finalized.tax_amount, dec!(171));
        assert_eq!(finalized.total_due, dec!(1071));
    }

    #[test]
    fn tax_rate_is_nineteen_percent() {
        assert_eq!(TAX_RATE, dec!(0.19));
    }

    // Run scoping

    #[test]
    fn scope_from_parts_maps_the_three_billing_modes() {
        assert_eq!(
            PeriodScope::from_parts(Some(2024), Some(3)).unwrap(),
            PeriodScope::Month(BillingPeriod::new(2024, 3).unwrap())
        );
        assert_eq!(PeriodScope::from_parts(Some(2024), None).unwrap(), PeriodScope::Year(2024));
        assert_eq!(PeriodScope::from_parts(None, None).unwrap(), PeriodScope::All);
        assert!(PeriodScope::from_parts(None, Some(3)).is_err());
        assert!(PeriodScope::from_parts(Some(2024), Some(13)).is_err());
        assert!(PeriodScope::from_parts(Some(1800), None).is_err());
    }

    #[test]
    fn month_scope_filters_timestamps() {
        let scope = PeriodScope::month(2024, 3).unwrap();
        let inside = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();
        let outside = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        assert!(scope.contains(&inside));
        assert!(!scope.contains(&outside));
    }

    // Collector intake

    #[tokio::test]
    async fn collector_rejects_unknown_outcome_values() {
        let collector = UsageCollector::new();
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let err = collector
            .record_call(AccountId::new("A"), ts, "Approved")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "DATA_INTEGRITY");
        assert!(collector.is_empty());

        collector
            .record_call(AccountId::new("A"), ts, "Successful")
            .await
            .unwrap();
        assert_eq!(collector.len(), 1);
    }

    #[tokio::test]
    async fn batch_with_unknown_outcome_records_nothing() {
        let collector = UsageCollector::new();
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let record = |outcome: &str| RawUsageRecord {
            account_id: AccountId::new("A"),
            called_at: ts,
            outcome: outcome.to_string(),
        };

        let err = collector
            .record_batch(vec![
                record("Successful"),
                record("Successful"),
                record("Approved"),
            ])
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "DATA_INTEGRITY");
        // the valid prefix must not be retained
        assert!(collector.is_empty());

        // a corrected retry lands exactly once
        let recorded = collector
            .record_batch(vec![
                record("Successful"),
                record("Successful"),
                record("Unsuccessful"),
            ])
            .await
            .unwrap();
        assert_eq!(recorded, 3);
        assert_eq!(collector.len(), 3);
    }

    #[tokio::test]
    async fn contract_store_snapshot_builds_fresh_tables() {
        let store = ContractStore::new();
        store
            .add_tariff(TariffRow {
                account_id: AccountId::new("A"),
                unit_price: dec!(5),
                threshold: 0,
            })
            .await
            .unwrap();

        let (tariffs, discounts) = store.snapshot().unwrap();
        assert_eq!(tariffs.len(), 1);
        assert!(discounts.is_empty());

        store
            .add_discount(DiscountRow {
                account_id: AccountId::new("A"),
                rate: dec!(0.2),
                threshold: 10,
            })
            .await
            .unwrap();

        // the earlier snapshot is unaffected by later rows
        assert!(discounts.is_empty());
        let (_, discounts_now) = store.snapshot().unwrap();
        assert_eq!(discounts_now.len(), 1);
    }
}
