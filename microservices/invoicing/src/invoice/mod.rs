//! Invoice assembly and run orchestration

mod assembler;
mod report;
mod service;

pub use assembler::{assemble, finalize, TAX_RATE};
pub use report::{build_report, InvoiceReportRow};
pub use service::InvoiceService;
