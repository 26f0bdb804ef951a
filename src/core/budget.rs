/// Inclusive price interval a lead is willing to pay
///
/// An unset minimum is 0 and an unset maximum is unbounded, so a lead that
/// never stated a budget accepts every price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.unwrap_or(0.0),
            max: max.unwrap_or(f64::INFINITY),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// `min <= price <= max`; a NaN price is never inside
    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for BudgetRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Full budget weight when the price falls inside the range, otherwise 0
#[inline]
pub fn budget_points(price: f64, range: &BudgetRange, weight: u32) -> u32 {
    if range.contains(price) {
        weight
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let range = BudgetRange::new(Some(50_000.0), Some(90_000.0));

        assert_eq!(budget_points(50_000.0, &range, 15), 15);
        assert_eq!(budget_points(90_000.0, &range, 15), 15);
        assert_eq!(budget_points(49_999.99, &range, 15), 0);
        assert_eq!(budget_points(90_000.01, &range, 15), 0);
    }

    #[test]
    fn test_unset_budget_accepts_any_price() {
        let range = BudgetRange::unbounded();

        assert_eq!(range.min, 0.0);
        assert!(range.max.is_infinite());
        assert_eq!(budget_points(0.0, &range, 15), 15);
        assert_eq!(budget_points(1.0e12, &range, 15), 15);
    }

    #[test]
    fn test_only_maximum_set() {
        let range = BudgetRange::new(None, Some(100.0));

        assert_eq!(budget_points(10.0, &range, 15), 15);
        assert_eq!(budget_points(150.0, &range, 15), 0);
    }

    #[test]
    fn test_nan_price_never_matches() {
        assert_eq!(budget_points(f64::NAN, &BudgetRange::unbounded(), 15), 0);
    }
}
