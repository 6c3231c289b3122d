//! Invoice Service
//!
//! Orchestrates invoicing runs: fetch the scoped event slice, aggregate,
//! snapshot the contract tables, assemble and finalize lines. Executed runs
//! are kept in memory for retrieval.

use chrono::Utc;
use dashmap::DashMap;
use openbill_core::{OpenbillError, Result};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::contract::ContractStore;
use crate::directory::AccountDirectory;
use crate::invoice::assembler::{assemble, finalize};
use crate::invoice::report::{build_report, InvoiceReportRow};
use crate::selection::{AccountSelection, PeriodScope};
use crate::types::BillingRun;
use crate::usage::{aggregate, UsageCollector};

#[derive(Clone)]
pub struct InvoiceService {
    collector: UsageCollector,
    contracts: ContractStore,
    directory: AccountDirectory,
    runs: Arc<DashMap<Uuid, BillingRun>>,
    default_currency: String,
}

impl InvoiceService {
    pub fn new(
        collector: UsageCollector,
        contracts: ContractStore,
        directory: AccountDirectory,
        default_currency: &str,
    ) -> Self {
        Self {
            collector,
            contracts,
            directory,
            runs: Arc::new(DashMap::new()),
            default_currency: default_currency.to_string(),
        }
    }

    /// Execute one invoicing run over the selected accounts and period scope
    pub async fn execute_run(
        &self,
        scope: PeriodScope,
        selection: AccountSelection,
    ) -> Result<BillingRun> {
        let filter = selection.resolve(&self.directory);
        let events = self.collector.fetch(&scope, filter.as_ref()).await;
        let aggregates = aggregate(&events);
        let (tariffs, discounts) = self.contracts.snapshot()?;

        let lines = assemble(&aggregates, &tariffs, &discounts)
            .into_iter()
            .map(finalize)
            .collect::<Vec<_>>();

        let run = BillingRun {
            id: Uuid::new_v4(),
            scope,
            selection,
            executed_at: Utc::now(),
            currency: self.default_currency.clone(),
            event_count: events.len(),
            lines,
        };

        info!(
            run_id = %run.id,
            events = run.event_count,
            lines = run.lines.len(),
            "Invoicing run completed"
        );

        self.runs.insert(run.id, run.clone());
        Ok(run)
    }

    /// Get a run by ID
    pub async fn get_run(&self, id: Uuid) -> Option<BillingRun> {
        self.runs.get(&id).map(|r| r.clone())
    }

    /// List all executed runs, newest first
    pub async fn list_runs(&self) -> Vec<BillingRun> {
        let mut runs: Vec<BillingRun> = self.runs.iter().map(|r| r.value().clone()).collect();
        runs.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
        runs
    }

    /// Build the decorated report for one run
    pub async fn report(&self, run_id: Uuid) -> Result<Vec<InvoiceReportRow>> {
        let run = self
            .get_run(run_id)
            .await
            .ok_or_else(|| OpenbillError::NotFound(format!("run {}", run_id)))?;
        Ok(build_report(&run.lines, &self.directory))
    }
}
