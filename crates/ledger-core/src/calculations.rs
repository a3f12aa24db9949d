use crate::models::Amount;

// ── FinanceCalculator ─────────────────────────────────────────────────────────

/// Stateless collection of the small arithmetic rules shared by the engine.
///
/// Every operation that could divide by zero returns `None` instead.
pub struct FinanceCalculator;

impl FinanceCalculator {
    /// `max(spent - raised, 0)` for one filing.
    ///
    /// Missing when either side is missing.
    pub fn deficit(raised: Amount, spent: Amount) -> Amount {
        match (raised.value(), spent.value()) {
            (Some(r), Some(s)) => Amount::new((s - r).max(0.0)),
            _ => Amount::MISSING,
        }
    }

    /// `spent / raised`, or `None` when nothing was raised.
    pub fn spend_ratio(total_raised: f64, total_spent: f64) -> Option<f64> {
        if total_raised > 0.0 {
            Some(total_spent / total_raised)
        } else {
            None
        }
    }

    /// `count / total`, or `None` for an empty population.
    pub fn share(count: usize, total: usize) -> Option<f64> {
        if total == 0 {
            None
        } else {
            Some(count as f64 / total as f64)
        }
    }

    /// `true` when `a` and `b` agree within `tolerance` relative to the larger
    /// magnitude (absolute near zero).
    pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        let scale = a.abs().max(b.abs()).max(1.0);
        (a - b).abs() <= tolerance * scale
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deficit_positive() {
        let d = FinanceCalculator::deficit(Amount::new(100_000.0), Amount::new(150_000.0));
        assert_eq!(d.value(), Some(50_000.0));
    }

    #[test]
    fn test_deficit_clamped_at_zero() {
        let d = FinanceCalculator::deficit(Amount::new(200.0), Amount::new(150.0));
        assert_eq!(d.value(), Some(0.0));
    }

    #[test]
    fn test_deficit_missing_side() {
        assert!(FinanceCalculator::deficit(Amount::MISSING, Amount::new(1.0)).is_missing());
        assert!(FinanceCalculator::deficit(Amount::new(1.0), Amount::MISSING).is_missing());
    }

    #[test]
    fn test_spend_ratio() {
        let r = FinanceCalculator::spend_ratio(500_000.0, 650_000.0).unwrap();
        assert!((r - 1.3).abs() < 1e-12);
        assert_eq!(FinanceCalculator::spend_ratio(0.0, 10.0), None);
    }

    #[test]
    fn test_share() {
        assert_eq!(FinanceCalculator::share(6, 10), Some(0.6));
        assert_eq!(FinanceCalculator::share(0, 0), None);
    }

    #[test]
    fn test_approx_eq_relative() {
        assert!(FinanceCalculator::approx_eq(1_000_000.0, 1_000_000.5, 1e-6));
        assert!(!FinanceCalculator::approx_eq(1_000_000.0, 1_000_010.0, 1e-6));
        assert!(FinanceCalculator::approx_eq(0.0, 1e-9, 1e-6));
    }
}
