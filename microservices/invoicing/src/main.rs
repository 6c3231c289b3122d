//! Invoicing Service binary

use invoicing::api;
use invoicing::{AccountDirectory, ContractStore, InvoiceService, UsageCollector};
use openbill_core::{
    DependencyStatus, HealthStatus, MicroserviceRuntime, OpenbillService, ReadinessStatus, Result,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("invoicing=debug".parse().expect("valid tracing directive")),
        )
        .json()
        .init();

    info!("Starting Invoicing Service");

    let service = Arc::new(InvoicingService::new()?);
    MicroserviceRuntime::run(service).await
}

pub struct InvoicingService {
    config: InvoicingConfig,
    collector: UsageCollector,
    contracts: ContractStore,
    directory: AccountDirectory,
    invoice_service: InvoiceService,
    start_time: std::time::Instant,
}

#[derive(Debug, Clone)]
pub struct InvoicingConfig {
    pub http_bind: String,
    pub default_currency: String,
}

impl InvoicingConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_bind: std::env::var("HTTP_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            default_currency: std::env::var("DEFAULT_CURRENCY")
                .unwrap_or_else(|_| "COP".to_string()),
        })
    }
}

impl InvoicingService {
    pub fn new() -> Result<Self> {
        let config = InvoicingConfig::from_env()?;

        let collector = UsageCollector::new();
        let contracts = ContractStore::new();
        let directory = AccountDirectory::new();
        let invoice_service = InvoiceService::new(
            collector.clone(),
            contracts.clone(),
            directory.clone(),
            &config.default_currency,
        );

        Ok(Self {
            config,
            collector,
            contracts,
            directory,
            invoice_service,
            start_time: std::time::Instant::now(),
        })
    }
}

#[async_trait::async_trait]
impl OpenbillService for InvoicingService {
    fn service_id(&self) -> &'static str {
        "invoicing"
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: self.service_id().to_string(),
            version: self.version().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    async fn ready(&self) -> ReadinessStatus {
        ReadinessStatus {
            ready: true,
            dependencies: vec![DependencyStatus {
                name: "usage-feed".to_string(),
                available: true,
                latency_ms: Some(1),
            }],
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down Invoicing Service");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        info!(http = %self.config.http_bind, "Starting Invoicing server");

        let rest_router = api::rest::create_router(
            self.collector.clone(),
            self.contracts.clone(),
            self.directory.clone(),
            self.invoice_service.clone(),
        );

        let listener = tokio::net::TcpListener::bind(&self.config.http_bind).await?;
        axum::serve(listener, rest_router).await?;

        Ok(())
    }
}
