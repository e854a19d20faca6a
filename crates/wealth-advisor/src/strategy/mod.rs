//! Planning Strategies
//!
//! Allocation lookup, monthly investment math and trailing growth estimates.

mod allocation;
mod annuity;
mod growth;

pub use allocation::allocate;
pub use annuity::{solve_future_from_monthly, solve_monthly_from_target, InvestmentPlan, PlanMode};
pub use growth::{
    average_growth, cagr, GrowthEstimate, GrowthEstimator, GrowthReport, DEFAULT_LOOKBACK_YEARS,
};
