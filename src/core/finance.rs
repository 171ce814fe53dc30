pub const DEFAULT_TERM_YEARS: u32 = 30;

pub fn amortization_payment(principal: f64, annual_rate: f64, term_years: u32) -> f64 {
    let n_payments = (term_years * 12) as f64;
    if principal == 0.0 || n_payments == 0.0 {
        return 0.0;
    }

    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return principal / n_payments;
    }

    let growth = (1.0 + monthly_rate).powf(n_payments);
    principal * (monthly_rate * growth) / (growth - 1.0)
}

pub fn total_interest_paid(principal: f64, annual_rate: f64, term_years: u32) -> f64 {
    let total_paid = amortization_payment(principal, annual_rate, term_years) * (term_years * 12) as f64;
    total_paid - principal
}

fn monthly_growth(value: f64, annual_rate: f64, months: u32) -> f64 {
    value * (1.0 + annual_rate).powf(months as f64 / 12.0)
}

// Contributions land after each month's growth.
pub fn compound_with_contribution(
    value: f64,
    annual_rate: f64,
    months: u32,
    monthly_contribution: f64,
) -> f64 {
    if monthly_contribution == 0.0 {
        return monthly_growth(value, annual_rate, months);
    }

    (0..months).fold(value, |total, _| {
        monthly_growth(total, annual_rate, 1) + monthly_contribution
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn thirty_year_payment_matches_reference() {
        assert_approx_tol(amortization_payment(300_000.0, 0.06, 30), 1798.65, 0.01);
    }

    #[test]
    fn fifteen_year_payment_matches_reference() {
        assert_approx_tol(amortization_payment(200_000.0, 0.045, 15), 1529.99, 0.01);
    }

    #[test]
    fn zero_principal_has_zero_payment_for_any_rate() {
        assert_eq!(amortization_payment(0.0, 0.05, 30), 0.0);
        assert_eq!(amortization_payment(0.0, 0.0, 30), 0.0);
    }

    #[test]
    fn zero_rate_spreads_principal_evenly() {
        assert_approx_tol(amortization_payment(360_000.0, 0.0, 30), 1000.0, 1e-9);
    }

    #[test]
    fn total_interest_matches_reference() {
        assert_approx_tol(total_interest_paid(300_000.0, 0.06, 30), 347_514.57, 0.01);
        assert_approx_tol(total_interest_paid(200_000.0, 0.045, 15), 75_397.58, 0.01);
    }

    #[test]
    fn growth_without_contribution_is_closed_form() {
        assert_approx_tol(compound_with_contribution(100_000.0, 0.05, 12, 0.0), 105_000.0, 1e-6);
    }

    #[test]
    fn growth_with_contribution_compounds_monthly() {
        assert_approx_tol(
            compound_with_contribution(100_000.0, 0.05, 12, 1000.0),
            117_272.58,
            0.01,
        );
        assert_approx_tol(compound_with_contribution(0.0, 0.07, 24, 500.0), 12_813.61, 0.01);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_payment_covers_first_month_interest(
            principal in 1_000u32..2_000_000,
            rate_bp in 1u32..2000,
            term in 5u32..41,
        ) {
            let principal = principal as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let payment = amortization_payment(principal, rate, term);
            prop_assert!(payment.is_finite());
            prop_assert!(payment > principal * rate / 12.0);
        }
    }
}
