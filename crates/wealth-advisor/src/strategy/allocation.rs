//! Allocation Table
//!
//! Static three-bucket split keyed by risk tolerance. Gold stays at 10%
//! throughout; equity trades off against debt.

use crate::model::{Allocation, RiskProfile};

/// Target allocation for a risk profile
pub const fn allocate(risk: RiskProfile) -> Allocation {
    match risk {
        RiskProfile::Low => Allocation {
            equity: 30,
            debt: 60,
            gold: 10,
        },
        RiskProfile::Medium => Allocation {
            equity: 50,
            debt: 40,
            gold: 10,
        },
        RiskProfile::High => Allocation {
            equity: 70,
            debt: 20,
            gold: 10,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssetClass;

    #[test]
    fn test_every_profile_sums_to_100() {
        for risk in RiskProfile::ALL {
            assert_eq!(allocate(risk).total(), 100, "{risk}");
        }
    }

    #[test]
    fn test_table_values() {
        let low = allocate(RiskProfile::Low);
        assert_eq!((low.equity, low.debt, low.gold), (30, 60, 10));

        let medium = allocate(RiskProfile::Medium);
        assert_eq!((medium.equity, medium.debt, medium.gold), (50, 40, 10));

        let high = allocate(RiskProfile::High);
        assert_eq!(high.percent(AssetClass::Equity), 70);
        assert_eq!(high.percent(AssetClass::Debt), 20);
        assert_eq!(high.percent(AssetClass::Gold), 10);
    }

    #[test]
    fn test_equity_rises_with_risk() {
        let equities: Vec<u8> = RiskProfile::ALL.iter().map(|r| allocate(*r).equity).collect();
        assert!(equities.windows(2).all(|w| w[0] < w[1]));
    }
}
