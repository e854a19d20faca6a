//! Domain Models
//!
//! Core data types for the advisory flow. Monetary values use
//! `rust_decimal`; growth rates are statistics over market prices and stay
//! in `f64`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// Coarse risk tolerance chosen by the user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

impl RiskProfile {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskProfile {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(AdvisorError::UnknownRiskLevel(s.to_string())),
        }
    }
}

/// Asset classes in the static allocation table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Equity,
    Debt,
    Gold,
}

impl AssetClass {
    /// Fixed presentation order
    pub const ALL: [Self; 3] = [Self::Equity, Self::Debt, Self::Gold];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Equity => "Equity",
            Self::Debt => "Debt",
            Self::Gold => "Gold",
        }
    }

    /// Ticker whose price history stands in for the whole asset class
    pub const fn benchmark_ticker(self) -> &'static str {
        match self {
            Self::Equity => "^NSEI",
            Self::Debt => "ICICIBANK.NS",
            Self::Gold => "GOLDBEES.NS",
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Target percentages per asset class
///
/// Serializes as `{"Equity": 50, "Debt": 40, "Gold": 10}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(rename = "Equity")]
    pub equity: u8,

    #[serde(rename = "Debt")]
    pub debt: u8,

    #[serde(rename = "Gold")]
    pub gold: u8,
}

impl Allocation {
    pub const fn percent(&self, asset: AssetClass) -> u8 {
        match asset {
            AssetClass::Equity => self.equity,
            AssetClass::Debt => self.debt,
            AssetClass::Gold => self.gold,
        }
    }

    /// `(asset, percent)` pairs in Equity, Debt, Gold order
    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, u8)> + '_ {
        AssetClass::ALL.into_iter().map(|a| (a, self.percent(a)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, p)| u32::from(p)).sum()
    }

    /// Horizontal bar chart, one block per 5%
    pub fn chart(&self) -> String {
        let mut out = String::new();
        for (asset, percent) in self.iter() {
            let bar = "█".repeat(usize::from(percent / 5));
            out.push_str(&format!("{:<7}{:>4}% {}\n", asset.label(), percent, bar));
        }
        out
    }

    /// Inline form used in prompts: `Equity: 50%, Debt: 40%, Gold: 10%`
    pub fn describe(&self) -> String {
        self.iter()
            .map(|(asset, percent)| format!("{asset}: {percent}%"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parameters collected from the user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default = "default_name")]
    pub name: String,

    pub age: u8,

    /// Monthly income in INR
    pub monthly_income: Decimal,

    pub risk: RiskProfile,

    /// Free-form goal, e.g. "retirement" or "house"
    #[serde(default)]
    pub goal: String,
}

fn default_name() -> String {
    "User".into()
}

pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 70;

impl UserProfile {
    pub fn new(age: u8, monthly_income: Decimal, risk: RiskProfile, goal: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            age,
            monthly_income,
            risk,
            goal: goal.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Range checks the input form would otherwise enforce
    pub fn validate(&self) -> Result<()> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(AdvisorError::InvalidProfile(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}, got {}",
                self.age
            )));
        }
        if self.monthly_income.is_sign_negative() {
            return Err(AdvisorError::InvalidProfile(
                "monthly income cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

/// End-of-session rating
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Rating {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }
}

impl FromStr for Rating {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "average" => Ok(Self::Average),
            "poor" => Ok(Self::Poor),
            _ => Err(AdvisorError::UnknownRating(s.to_string())),
        }
    }
}

/// One daily observation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,

    pub close: f64,

    /// Split/dividend adjusted close; absent when the source omits it
    pub adj_close: Option<f64>,
}

impl PricePoint {
    pub const fn new(date: NaiveDate, close: f64, adj_close: Option<f64>) -> Self {
        Self {
            date,
            close,
            adj_close,
        }
    }
}

/// Chronological (oldest first) price history for one ticker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Format a whole-currency amount with thousands separators (`4,500,000`)
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_risk_profile_parse() {
        assert_eq!("low".parse::<RiskProfile>().unwrap(), RiskProfile::Low);
        assert_eq!(" High ".parse::<RiskProfile>().unwrap(), RiskProfile::High);
        assert!("reckless".parse::<RiskProfile>().is_err());
    }

    #[test]
    fn test_allocation_serializes_by_label() {
        let alloc = Allocation {
            equity: 50,
            debt: 40,
            gold: 10,
        };
        let json = serde_json::to_value(alloc).unwrap();
        assert_eq!(json, serde_json::json!({"Equity": 50, "Debt": 40, "Gold": 10}));
        assert_eq!(alloc.describe(), "Equity: 50%, Debt: 40%, Gold: 10%");
    }

    #[test]
    fn test_allocation_chart() {
        let alloc = Allocation {
            equity: 70,
            debt: 20,
            gold: 10,
        };
        let chart = alloc.chart();
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Equity"));
        assert_eq!(lines[0].matches('█').count(), 14);
        assert_eq!(lines[2].matches('█').count(), 2);
    }

    #[test]
    fn test_profile_validation() {
        let ok = UserProfile::new(30, dec!(50000), RiskProfile::Medium, "house");
        assert!(ok.validate().is_ok());

        let young = UserProfile::new(12, dec!(50000), RiskProfile::Medium, "house");
        assert!(young.validate().is_err());

        let negative = UserProfile::new(30, dec!(-1), RiskProfile::Low, "");
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_profile_defaults_name() {
        let json = r#"{"age": 30, "monthly_income": 50000, "risk": "Low"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "User");
        assert!(profile.goal.is_empty());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(4500000)), "4,500,000");
        assert_eq!(format_amount(dec!(19561.93)), "19,562");
        assert_eq!(format_amount(dec!(999)), "999");
        assert_eq!(format_amount(dec!(-1234)), "-1,234");
        assert_eq!(format_amount(Decimal::ZERO), "0");
    }

    #[test]
    fn test_benchmark_tickers() {
        assert_eq!(AssetClass::Equity.benchmark_ticker(), "^NSEI");
        assert_eq!(AssetClass::Debt.benchmark_ticker(), "ICICIBANK.NS");
        assert_eq!(AssetClass::Gold.benchmark_ticker(), "GOLDBEES.NS");
    }
}
