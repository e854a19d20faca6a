//! Report Formatter
//!
//! Collects everything produced during an advisory session into one report
//! with one section per input category, rendered as plain text or PDF.

mod pdf;
mod text;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{format_amount, Allocation, UserProfile};
use crate::strategy::{allocate, GrowthReport, InvestmentPlan, PlanMode};

pub const REPORT_TITLE: &str = "Wealth Advisor Report";

/// Titled block of report lines
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl Section {
    fn new(title: &'static str, lines: Vec<String>) -> Self {
        Self { title, lines }
    }
}

#[derive(Clone, Debug)]
pub struct Report {
    pub profile: UserProfile,
    pub allocation: Allocation,
    pub explanation: String,
    pub plan: Option<InvestmentPlan>,
    pub growth: Option<GrowthReport>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Report for `profile`; the allocation follows the profile's risk level
    pub fn new(profile: UserProfile, explanation: impl Into<String>) -> Self {
        Self {
            allocation: allocate(profile.risk),
            profile,
            explanation: explanation.into(),
            plan: None,
            growth: None,
            generated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_plan(mut self, plan: InvestmentPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    #[must_use]
    pub fn with_growth(mut self, growth: GrowthReport) -> Self {
        self.growth = Some(growth);
        self
    }

    #[must_use]
    pub const fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn generated_label(&self) -> String {
        format!("Generated {}", self.generated_at.format("%Y-%m-%d %H:%M UTC"))
    }

    /// Report body in display order; plan and growth only when present
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = vec![
            self.profile_section(),
            self.allocation_section(),
            Section::new(
                "Advisor's Explanation",
                self.explanation.lines().map(str::to_string).collect(),
            ),
        ];
        if let Some(plan) = &self.plan {
            sections.push(plan_section(plan));
        }
        if let Some(growth) = &self.growth {
            sections.push(growth_section(growth));
        }
        sections
    }

    pub fn render_text(&self) -> String {
        text::render(self)
    }

    /// A4 PDF document bytes
    pub fn render_pdf(&self) -> Result<Vec<u8>> {
        pdf::render(self)
    }

    fn profile_section(&self) -> Section {
        let p = &self.profile;
        let goal = if p.goal.trim().is_empty() { "-" } else { p.goal.trim() };
        Section::new(
            "Profile",
            vec![
                format!(
                    "Name: {} | Age: {} | Income: INR {}",
                    p.name,
                    p.age,
                    format_amount(p.monthly_income)
                ),
                format!("Risk Tolerance: {} | Goal: {}", p.risk, goal),
            ],
        )
    }

    fn allocation_section(&self) -> Section {
        Section::new(
            "Portfolio Allocation",
            self.allocation
                .iter()
                .map(|(asset, percent)| format!("{asset}: {percent}%"))
                .collect(),
        )
    }
}

fn plan_section(plan: &InvestmentPlan) -> Section {
    let invest = format!(
        "Invest INR {}/month for {} years at {}% expected return.",
        format_amount(plan.monthly),
        plan.years,
        plan.annual_rate_percent.normalize()
    );
    let corpus = format_amount(plan.future_value);
    let lines = match plan.mode {
        PlanMode::Goal => vec![format!("Target: INR {corpus}"), invest],
        PlanMode::Monthly => vec![invest, format!("Future Corpus: INR {corpus}")],
    };
    Section::new("Monthly Investment Plan", lines)
}

fn growth_section(growth: &GrowthReport) -> Section {
    let mut lines: Vec<String> = growth
        .estimates
        .iter()
        .map(|e| {
            let value = e
                .cagr_percent
                .map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}%"));
            format!("{} ({}): {}", e.asset, e.ticker, value)
        })
        .collect();
    lines.push(growth.average_percent.map_or_else(
        || "Average CAGR: n/a".to_string(),
        |avg| format!("Average CAGR across asset classes: {avg:.2}%"),
    ));
    Section::new("Return Estimates", lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetClass, RiskProfile};
    use crate::strategy::GrowthEstimate;
    use rust_decimal_macros::dec;

    fn report() -> Report {
        let profile = UserProfile::new(30, dec!(50000), RiskProfile::Medium, "retirement")
            .with_name("Asha");
        Report::new(profile, "Line one.\nLine two.")
    }

    #[test]
    fn test_minimal_report_sections() {
        let titles: Vec<_> = report().sections().iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["Profile", "Portfolio Allocation", "Advisor's Explanation"]
        );
    }

    #[test]
    fn test_profile_and_allocation_lines() {
        let sections = report().sections();
        assert_eq!(
            sections[0].lines[0],
            "Name: Asha | Age: 30 | Income: INR 50,000"
        );
        assert_eq!(sections[1].lines, vec!["Equity: 50%", "Debt: 40%", "Gold: 10%"]);
        assert_eq!(sections[2].lines.len(), 2);
    }

    #[test]
    fn test_plan_section_by_mode() {
        let goal = report().with_plan(InvestmentPlan::goal(dec!(4500000), dec!(12), 10).unwrap());
        let plan = &goal.sections()[3];
        assert_eq!(plan.lines[0], "Target: INR 4,500,000");
        assert!(plan.lines[1].starts_with("Invest INR 19,562/month"));

        let monthly = report().with_plan(InvestmentPlan::monthly(dec!(5000), dec!(12), 10).unwrap());
        let plan = &monthly.sections()[3];
        assert_eq!(plan.lines[1], "Future Corpus: INR 1,150,193");
    }

    #[test]
    fn test_growth_section() {
        let growth = GrowthReport::new(
            5,
            vec![GrowthEstimate {
                asset: AssetClass::Debt,
                ticker: "ICICIBANK.NS".into(),
                cagr_percent: None,
                observations: 0,
            }],
        );
        let sections = report().with_growth(growth).sections();
        let last = sections.last().unwrap();

        assert_eq!(last.title, "Return Estimates");
        assert_eq!(last.lines[0], "Debt (ICICIBANK.NS): n/a");
        assert_eq!(last.lines[1], "Average CAGR: n/a");
    }
}
