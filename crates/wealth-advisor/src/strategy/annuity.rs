//! Monthly Investment Plan
//!
//! Ordinary-annuity math: contributions at the end of each month,
//! compounded monthly at `annual_rate_percent / 100 / 12`.
//!
//! ```text
//! FV = PMT × ((1 + r)^n − 1) / r        r = 0  →  FV = PMT × n
//! ```

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::model::format_amount;

const MONTHS_PER_YEAR: u32 = 12;

/// Which side of the annuity relation the user supplied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    /// Target corpus known, solve for the monthly contribution
    Goal,
    /// Monthly contribution known, solve for the future value
    Monthly,
}

/// Validate the terms and return the number of monthly contributions
fn check_terms(annual_rate_percent: Decimal, years: u32) -> Result<u32> {
    if years == 0 {
        return Err(AdvisorError::InvalidPlan(
            "duration must be at least one year".into(),
        ));
    }
    if annual_rate_percent.is_sign_negative() && !annual_rate_percent.is_zero() {
        return Err(AdvisorError::InvalidPlan(format!(
            "expected return cannot be negative, got {annual_rate_percent}%"
        )));
    }
    years.checked_mul(MONTHS_PER_YEAR).ok_or_else(|| {
        AdvisorError::InvalidPlan(format!("duration of {years} years is too long"))
    })
}

fn out_of_range(annual_rate_percent: Decimal, years: u32) -> AdvisorError {
    AdvisorError::InvalidPlan(format!(
        "plan at {annual_rate_percent}% over {years} years is outside the representable range"
    ))
}

/// Future value of one currency unit contributed monthly
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Compounding {
    /// `((1 + r)^n − 1) / r`, or `n` when the rate does not register
    Factor(Decimal),
    /// `(1 + r)^n` exceeds the `Decimal` range
    Overflow { rate: Decimal },
}

fn compounding(annual_rate_percent: Decimal, months: u32) -> Compounding {
    let flat = Compounding::Factor(Decimal::from(months));
    let nominal = annual_rate_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR);

    // Rate as carried by `1 + r` after rounding, so gain and rate agree
    let Some(base) = Decimal::ONE.checked_add(nominal) else {
        return Compounding::Overflow { rate: nominal };
    };
    let rate = base - Decimal::ONE;
    if rate.is_zero() {
        return flat;
    }

    let Some(growth) = base.checked_powi(i64::from(months)) else {
        return Compounding::Overflow { rate };
    };
    let gain = growth - Decimal::ONE;
    if gain.is_zero() {
        return flat;
    }

    gain.checked_div(rate)
        .map_or(Compounding::Overflow { rate }, Compounding::Factor)
}

/// Monthly contribution needed to reach `target` after `years`
///
/// Rounded to whole currency units. When `(1 + r)^n` is too large to
/// represent the exact payment rounds to zero, unless the target is so
/// large that it might not.
pub fn solve_monthly_from_target(
    target: Decimal,
    annual_rate_percent: Decimal,
    years: u32,
) -> Result<Decimal> {
    let months = check_terms(annual_rate_percent, years)?;

    let monthly = match compounding(annual_rate_percent, months) {
        Compounding::Factor(factor) => target.checked_div(factor),
        Compounding::Overflow { rate } => {
            // payment = target × r / ((1 + r)^n − 1) < target × r / Decimal::MAX
            target
                .checked_div(Decimal::MAX)
                .and_then(|share| share.checked_mul(rate))
                .filter(|ceiling| ceiling.abs() < dec!(0.5))
                .map(|_| Decimal::ZERO)
        }
    }
    .ok_or_else(|| out_of_range(annual_rate_percent, years))?;

    Ok(monthly.round())
}

/// Corpus accumulated by contributing `monthly` for `years`
///
/// Rounded to whole currency units.
pub fn solve_future_from_monthly(
    monthly: Decimal,
    annual_rate_percent: Decimal,
    years: u32,
) -> Result<Decimal> {
    let months = check_terms(annual_rate_percent, years)?;

    let future = match compounding(annual_rate_percent, months) {
        Compounding::Factor(factor) => monthly.checked_mul(factor),
        Compounding::Overflow { .. } => monthly.is_zero().then_some(Decimal::ZERO),
    }
    .ok_or_else(|| out_of_range(annual_rate_percent, years))?;

    Ok(future.round())
}

/// A solved monthly investment plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentPlan {
    pub mode: PlanMode,

    /// Contribution per month (solved in `Goal` mode)
    pub monthly: Decimal,

    pub years: u32,

    pub annual_rate_percent: Decimal,

    /// Target corpus in `Goal` mode, projected corpus in `Monthly` mode
    pub future_value: Decimal,
}

impl InvestmentPlan {
    /// Solve for the monthly contribution
    pub fn goal(target: Decimal, annual_rate_percent: Decimal, years: u32) -> Result<Self> {
        let monthly = solve_monthly_from_target(target, annual_rate_percent, years)?;
        Ok(Self {
            mode: PlanMode::Goal,
            monthly,
            years,
            annual_rate_percent,
            future_value: target,
        })
    }

    /// Solve for the future value
    pub fn monthly(monthly: Decimal, annual_rate_percent: Decimal, years: u32) -> Result<Self> {
        let future_value = solve_future_from_monthly(monthly, annual_rate_percent, years)?;
        Ok(Self {
            mode: PlanMode::Monthly,
            monthly,
            years,
            annual_rate_percent,
            future_value,
        })
    }

    /// Dispatch on `mode`; `amount` is the target or the contribution
    pub fn solve(mode: PlanMode, amount: Decimal, annual_rate_percent: Decimal, years: u32) -> Result<Self> {
        match mode {
            PlanMode::Goal => Self::goal(amount, annual_rate_percent, years),
            PlanMode::Monthly => Self::monthly(amount, annual_rate_percent, years),
        }
    }

    pub const fn months(&self) -> u32 {
        self.years.saturating_mul(MONTHS_PER_YEAR)
    }

    /// Sum of contributions before any growth, `None` past `Decimal::MAX`
    pub fn total_contributed(&self) -> Option<Decimal> {
        self.monthly.checked_mul(Decimal::from(self.months()))
    }

    /// One-line result sentence
    pub fn summary(&self) -> String {
        let rate = self.annual_rate_percent.normalize();
        match self.mode {
            PlanMode::Goal => format!(
                "To reach INR {} in {} years at {}% return, invest INR {}/month.",
                format_amount(self.future_value),
                self.years,
                rate,
                format_amount(self.monthly),
            ),
            PlanMode::Monthly => format!(
                "Invest INR {}/month for {} years at {}% to get INR {}",
                format_amount(self.monthly),
                self.years,
                rate,
                format_amount(self.future_value),
            ),
        }
    }
}
