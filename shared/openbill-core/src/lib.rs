//! Openbill Core - Shared domain types and service infrastructure
//!
//! This crate provides:
//! - Standard service trait all platform services implement
//! - Common domain types (AccountId, BillingPeriod, etc.)
//! - Error handling utilities
//! - Configuration management

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use domain::*;
pub use error::{OpenbillError, Result};
pub use service::{DependencyStatus, HealthStatus, MicroserviceRuntime, OpenbillService, ReadinessStatus};
