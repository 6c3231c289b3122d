//! Rating core

mod engine;

pub use engine::{billed_amount, discount_for};
