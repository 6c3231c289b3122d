//! Usage intake and aggregation

mod aggregator;
mod collector;

pub use aggregator::aggregate;
pub use collector::UsageCollector;
