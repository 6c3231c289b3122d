//! Invoicing REST API

use axum::http::StatusCode;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use openbill_core::OpenbillError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::ContractStore;
use crate::directory::AccountDirectory;
use crate::invoice::{InvoiceReportRow, InvoiceService};
use crate::selection::{AccountSelection, PeriodScope};
use crate::types::{AccountProfile, BillingRun, DiscountRow, RawUsageRecord, TariffRow};
use crate::usage::UsageCollector;

#[derive(Clone)]
pub struct AppState {
    pub collector: UsageCollector,
    pub contracts: ContractStore,
    pub directory: AccountDirectory,
    pub invoice_service: InvoiceService,
}

pub fn create_router(
    collector: UsageCollector,
    contracts: ContractStore,
    directory: AccountDirectory,
    invoice_service: InvoiceService,
) -> Router {
    let state = AppState {
        collector,
        contracts,
        directory,
        invoice_service,
    };

    Router::new()
        // Health
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Usage intake
        .route("/v1/usage", post(ingest_usage))
        // Contracts
        .route("/v1/contracts/tariffs", post(add_tariff_rows))
        .route("/v1/contracts/discounts", post(add_discount_rows))
        // Directory
        .route("/v1/accounts", post(upsert_account))
        // Runs
        .route("/v1/runs", post(execute_run).get(list_runs))
        .route("/v1/runs/{id}", get(get_run))
        .route("/v1/runs/{id}/report", get(get_report))
        .with_state(state)
}

async fn health() -> &'static str { "OK" }
async fn ready() -> &'static str { "OK" }

fn error_response(err: OpenbillError) -> (StatusCode, Json<serde_json::Value>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(serde_json::json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
}

// Usage endpoints

#[derive(Serialize)]
struct IngestResponse {
    recorded: usize,
}

/// Batch intake is all-or-nothing: one record with an unknown outcome
/// rejects the whole batch before anything is stored
async fn ingest_usage(
    State(state): State<AppState>,
    Json(records): Json<Vec<RawUsageRecord>>,
) -> Result<Json<IngestResponse>, (StatusCode, Json<serde_json::Value>)> {
    let recorded = state
        .collector
        .record_batch(records)
        .await
        .map_err(error_response)?;
    Ok(Json(IngestResponse { recorded }))
}

// Contract endpoints

#[derive(Serialize)]
struct RowsResponse {
    accepted: usize,
}

async fn add_tariff_rows(
    State(state): State<AppState>,
    Json(rows): Json<Vec<TariffRow>>,
) -> Result<Json<RowsResponse>, (StatusCode, Json<serde_json::Value>)> {
    let accepted = rows.len();
    for row in rows {
        state.contracts.add_tariff(row).await.map_err(error_response)?;
    }
    Ok(Json(RowsResponse { accepted }))
}

async fn add_discount_rows(
    State(state): State<AppState>,
    Json(rows): Json<Vec<DiscountRow>>,
) -> Result<Json<RowsResponse>, (StatusCode, Json<serde_json::Value>)> {
    let accepted = rows.len();
    for row in rows {
        state.contracts.add_discount(row).await.map_err(error_response)?;
    }
    Ok(Json(RowsResponse { accepted }))
}

// Directory endpoints

async fn upsert_account(
    State(state): State<AppState>,
    Json(profile): Json<AccountProfile>,
) -> StatusCode {
    state.directory.upsert(profile);
    StatusCode::NO_CONTENT
}

// Run endpoints

#[derive(Deserialize)]
struct RunRequest {
    year: Option<i32>,
    month: Option<u32>,
    #[serde(default = "default_selection")]
    accounts: AccountSelection,
}

fn default_selection() -> AccountSelection {
    AccountSelection::All
}

async fn execute_run(
    State(state): State<AppState>,
    Json(req): Json<RunRequest>,
) -> Result<Json<BillingRun>, (StatusCode, Json<serde_json::Value>)> {
    let scope = PeriodScope::from_parts(req.year, req.month).map_err(error_response)?;
    let run = state
        .invoice_service
        .execute_run(scope, req.accounts)
        .await
        .map_err(error_response)?;
    Ok(Json(run))
}

async fn list_runs(State(state): State<AppState>) -> Json<Vec<BillingRun>> {
    Json(state.invoice_service.list_runs().await)
}

async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BillingRun>, (StatusCode, Json<serde_json::Value>)> {
    state
        .invoice_service
        .get_run(id)
        .await
        .map(Json)
        .ok_or_else(|| error_response(OpenbillError::NotFound(format!("run {}", id))))
}

async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<InvoiceReportRow>>, (StatusCode, Json<serde_json::Value>)> {
    state
        .invoice_service
        .report(id)
        .await
        .map(Json)
        .map_err(error_response)
}
