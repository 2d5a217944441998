use super::types::{Annualization, CanonicalRate, ProjectionResult};

pub const DEFAULT_GROWTH_RATE: f64 = 0.07;
pub const DEFAULT_HORIZON_YEARS: f64 = 10.0;
pub const MAX_HORIZON_YEARS: f64 = 100.0;
pub const WEEKS_PER_MONTH: f64 = 4.33;
pub const WEEKS_PER_YEAR: f64 = 52.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectionOptions {
    pub annual_override: Option<f64>,
    pub monthly_override: Option<f64>,
    pub years: f64,
    pub rate: f64,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            annual_override: None,
            monthly_override: None,
            years: DEFAULT_HORIZON_YEARS,
            rate: DEFAULT_GROWTH_RATE,
        }
    }
}

impl ProjectionOptions {
    pub fn with_years(mut self, years: f64) -> Self {
        self.years = years;
        self
    }

    /// Fills the annual/monthly overrides the annualization calls for.
    pub fn annualized(mut self, weekly: f64, annualization: Annualization) -> Self {
        match annualization {
            Annualization::FiftyTwoWeeks => {
                self.annual_override = None;
                self.monthly_override = None;
            }
            Annualization::WeeksPerYear(weeks) => {
                let annual = weekly * weeks.max(0.0);
                self.annual_override = Some(annual);
                self.monthly_override = Some(annual / 12.0);
            }
            Annualization::MonthlyTimesTwelve(monthly) => {
                self.annual_override = Some(monthly * 12.0);
                self.monthly_override = Some(monthly);
            }
        }
        self
    }
}

pub fn project(weekly: f64, options: &ProjectionOptions) -> ProjectionResult {
    let weekly = non_negative(weekly);
    let years = non_negative(options.years);
    let monthly = options
        .monthly_override
        .map(non_negative)
        .unwrap_or(weekly * WEEKS_PER_MONTH);
    let annual = options
        .annual_override
        .map(non_negative)
        .unwrap_or(weekly * WEEKS_PER_YEAR);

    ProjectionResult {
        weekly,
        monthly: saturate(monthly),
        annual: saturate(annual),
        n_year: saturate(annual * years),
        invested: saturate(future_value_of_annuity(annual, options.rate, years)),
        years,
    }
}

pub fn project_rate(rate: &CanonicalRate, options: &ProjectionOptions) -> ProjectionResult {
    let weekly = rate.weekly_spend();
    let options = options.annualized(weekly, rate.annualization());
    project(weekly, &options)
}

/// Future value of `annual` paid at the end of each year for `years` years,
/// compounded yearly at `rate`.
pub fn future_value_of_annuity(annual: f64, rate: f64, years: f64) -> f64 {
    let rate = non_negative(rate);
    if annual == 0.0 {
        return 0.0;
    }
    if rate == 0.0 {
        return annual * years;
    }
    annual * (((1.0 + rate).powf(years) - 1.0) / rate)
}

// NaN collapses to zero as well.
fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

// Overflow pins at the largest finite amount.
fn saturate(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.min(f64::MAX) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn oracle_coffee_weekly_25_matches_hand_calculation() {
        let result = project(25.0, &ProjectionOptions::default());
        assert_approx(result.weekly, 25.0);
        assert_approx(result.monthly, 108.25);
        assert_approx(result.annual, 1300.0);
        assert_approx(result.n_year, 13_000.0);
        let factor = (1.07_f64.powi(10) - 1.0) / 0.07;
        assert_approx(result.invested, 1300.0 * factor);
        assert_approx_tol(result.invested, 17_961.0, 1.0);
    }

    #[test]
    fn zero_rate_annuity_is_plain_sum() {
        assert_approx(future_value_of_annuity(1000.0, 0.0, 10.0), 10_000.0);
        let options = ProjectionOptions {
            rate: 0.0,
            ..ProjectionOptions::default()
        };
        let result = project(10.0, &options);
        assert!(result.invested.is_finite());
        assert_approx(result.invested, result.n_year);
    }

    #[test]
    fn one_year_annuity_is_one_contribution() {
        assert_approx(future_value_of_annuity(500.0, 0.07, 1.0), 500.0);
    }

    #[test]
    fn weeks_per_year_annualization_overrides_monthly_and_annual() {
        let options = ProjectionOptions::default().annualized(10.0, Annualization::WeeksPerYear(26.0));
        let result = project(10.0, &options);
        assert_approx(result.annual, 260.0);
        assert_approx(result.monthly, 260.0 / 12.0);
        assert_approx(result.n_year, 2600.0);
    }

    #[test]
    fn monthly_times_twelve_annualization_uses_monthly_aggregate() {
        let weekly = 20.49 * 12.0 / 52.0;
        let options =
            ProjectionOptions::default().annualized(weekly, Annualization::MonthlyTimesTwelve(20.49));
        let result = project(weekly, &options);
        assert_approx(result.monthly, 20.49);
        assert_approx(result.annual, 245.88);
    }

    #[test]
    fn fifty_two_weeks_clears_stale_overrides() {
        let options = ProjectionOptions {
            annual_override: Some(1.0),
            monthly_override: Some(1.0),
            ..ProjectionOptions::default()
        }
        .annualized(10.0, Annualization::FiftyTwoWeeks);
        let result = project(10.0, &options);
        assert_approx(result.annual, 520.0);
        assert_approx(result.monthly, 43.3);
    }

    #[test]
    fn project_rate_uses_per_occurrence_product() {
        let rate = CanonicalRate::PerOccurrence {
            cost_per_occurrence: 5.0,
            occurrences_per_week: 5.0,
        };
        let result = project_rate(&rate, &ProjectionOptions::default());
        assert_approx(result.weekly, 25.0);
        assert_approx(result.annual, 1300.0);
    }

    #[test]
    fn negative_and_non_finite_spend_project_to_zero() {
        for weekly in [-5.0, f64::NAN, f64::INFINITY] {
            let result = project(weekly, &ProjectionOptions::default());
            assert_eq!(result.weekly, 0.0);
            assert_eq!(result.annual, 0.0);
            assert_eq!(result.invested, 0.0);
        }
    }

    #[test]
    fn custom_horizon_scales_n_year_and_invested() {
        let result = project(10.0, &ProjectionOptions::default().with_years(5.0));
        assert_approx(result.n_year, 2600.0);
        let factor = (1.07_f64.powi(5) - 1.0) / 0.07;
        assert_approx(result.invested, 520.0 * factor);
        assert_approx(result.years, 5.0);
    }

    #[test]
    fn overflowing_projection_saturates_to_finite() {
        let long = project(100.0, &ProjectionOptions::default().with_years(20_000.0));
        assert!(long.invested.is_finite());
        assert_eq!(long.invested, f64::MAX);
        assert_approx(long.n_year, 5200.0 * 20_000.0);

        let huge = project(f64::MAX / 2.0, &ProjectionOptions::default());
        for value in [huge.monthly, huge.annual, huge.n_year, huge.invested] {
            assert!(value.is_finite());
            assert!(value >= 0.0);
        }
    }

    #[test]
    fn max_horizon_stays_finite() {
        let result = project(1_000_000.0, &ProjectionOptions::default().with_years(MAX_HORIZON_YEARS));
        assert!(result.invested.is_finite());
        assert!(result.invested < f64::MAX);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_projection_is_linear_in_weekly_spend(weekly_cents in 0u32..5_000_000) {
            let weekly = weekly_cents as f64 / 100.0;
            let options = ProjectionOptions::default();
            let full = project(weekly, &options);
            let half = project(weekly / 2.0, &options);
            let tol = 1e-9 * full.annual.max(1.0);
            prop_assert!((full.annual - 2.0 * half.annual).abs() <= tol);
            prop_assert!((full.invested - 2.0 * half.invested).abs() <= tol * 20.0);
        }

        #[test]
        fn prop_outputs_are_finite_and_non_negative(
            weekly_cents in 0u32..5_000_000,
            rate_bp in 0u32..3_000,
            years in 0u32..60
        ) {
            let options = ProjectionOptions {
                rate: rate_bp as f64 / 10_000.0,
                years: years as f64,
                ..ProjectionOptions::default()
            };
            let result = project(weekly_cents as f64 / 100.0, &options);
            for value in [result.weekly, result.monthly, result.annual, result.n_year, result.invested] {
                prop_assert!(value.is_finite());
                prop_assert!(value >= 0.0);
            }
        }

        #[test]
        fn prop_annual_never_decreases_as_spend_grows(
            weekly_cents in 0u32..5_000_000,
            bump_cents in 0u32..100_000
        ) {
            let options = ProjectionOptions::default();
            let base = project(weekly_cents as f64 / 100.0, &options);
            let bumped = project((weekly_cents + bump_cents) as f64 / 100.0, &options);
            prop_assert!(bumped.annual >= base.annual);
            prop_assert!(bumped.invested >= base.invested);
        }

        #[test]
        fn prop_repeated_projection_is_bit_identical(weekly_cents in 0u32..5_000_000) {
            let options = ProjectionOptions::default();
            let weekly = weekly_cents as f64 / 100.0;
            prop_assert_eq!(project(weekly, &options), project(weekly, &options));
        }
    }
}
