//! # wealth-advisor
//!
//! Personal wealth planning for Indian retail investors: a risk-based
//! three-bucket allocation, monthly investment plans, trailing growth
//! estimates and LLM-written explanations.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UserProfile { age: 30, income: 50,000, risk: Medium }      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  allocate(Medium)                                           │
//! │    Equity   50% ██████████                                  │
//! │    Debt     40% ████████                                    │
//! │    Gold     10% ██                                          │
//! │                                                             │
//! │  InvestmentPlan::goal(45,00,000, 12%, 10y)                  │
//! │    → INR 19,562/month                                       │
//! │                                                             │
//! │  GrowthEstimator (^NSEI, ICICIBANK.NS, GOLDBEES.NS)         │
//! │    → trailing CAGR per asset class + average                │
//! │                                                             │
//! │  Advisor::explain → Report (text | PDF)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Allocation, plan math and CAGR are pure functions. Only the advisor and
//! the price-history sources do I/O.

pub mod advisory;
pub mod error;
pub mod market;
pub mod model;
pub mod report;
pub mod strategy;

pub use advisory::{Advisor, AdvisoryPrompt};
pub use error::{AdvisorError, Result};
pub use market::{MockPriceHistory, PriceHistorySource, YahooHistoryClient};
pub use model::{Allocation, AssetClass, PricePoint, PriceSeries, Rating, RiskProfile, UserProfile};
pub use report::Report;
pub use strategy::{
    allocate, average_growth, cagr, solve_future_from_monthly, solve_monthly_from_target,
    GrowthEstimate, GrowthEstimator, GrowthReport, InvestmentPlan, PlanMode,
};
