//! Per-tab orchestration: each flow runs its service calls one after another.

pub mod market;
pub mod trip;

pub use market::market_report;
pub use trip::plan_trip;

#[cfg(test)]
pub(crate) mod fakes;
