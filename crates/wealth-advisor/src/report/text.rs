//! Plain-text rendering

use super::{Report, REPORT_TITLE};

const WIDTH: usize = 60;

pub(super) fn render(report: &Report) -> String {
    let mut output = String::new();
    output.push_str(&"═".repeat(WIDTH));
    output.push('\n');
    output.push_str(REPORT_TITLE);
    output.push('\n');
    output.push_str(&report.generated_label());
    output.push('\n');
    output.push_str(&"═".repeat(WIDTH));
    output.push('\n');

    for section in report.sections() {
        output.push('\n');
        output.push_str(section.title);
        output.push('\n');
        output.push_str(&"─".repeat(WIDTH));
        output.push('\n');
        for line in &section.lines {
            output.push_str(line);
            output.push('\n');
        }
    }

    // Bars only make sense in a monospaced rendering
    output.push('\n');
    output.push_str(&report.allocation.chart());
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskProfile, UserProfile};
    use crate::strategy::InvestmentPlan;
    use rust_decimal_macros::dec;

    #[test]
    fn test_text_contains_every_section() {
        let profile = UserProfile::new(45, dec!(120000), RiskProfile::High, "house");
        let report = Report::new(profile, "Stay invested.")
            .with_plan(InvestmentPlan::monthly(dec!(5000), dec!(12), 10).unwrap());

        let text = report.render_text();
        assert!(text.contains(REPORT_TITLE));
        for title in [
            "Profile",
            "Portfolio Allocation",
            "Advisor's Explanation",
            "Monthly Investment Plan",
        ] {
            assert!(text.contains(title), "missing section {title}");
        }
        assert!(text.contains("Risk Tolerance: High | Goal: house"));
        assert!(text.contains("Equity: 70%"));
        assert!(text.contains("Stay invested."));
        assert!(!text.contains("Return Estimates"));
    }
}
