use super::finance::{DEFAULT_TERM_YEARS, amortization_payment};
use super::solver::{IRR_DEFAULT_GUESS, internal_rate_of_return};
use super::types::{Config, SimulationResult, SummaryMetrics, YearlyRecord};
use super::{closing_costs, loan_amount, out_of_pocket_cost};

const FIVE_YEAR_INDEX: usize = 4;
const ONE_PERCENT_RULE: f64 = 0.01;

pub fn summarize(config: &Config, result: &SimulationResult) -> SummaryMetrics {
    let loan = loan_amount(config);
    let (total_pmi_paid, total_property_tax_paid, total_interest_paid) = result
        .monthly_data
        .iter()
        .fold((0.0, 0.0, 0.0), |(pmi, tax, interest), m| {
            (
                pmi + m.flows.pmi_exp,
                tax + m.flows.property_tax_exp,
                interest + m.flows.interest_exp,
            )
        });

    let first_year = result.yearly_data.first();
    let first_rent = first_year.map_or(0.0, |y| y.totals.rent_income);
    let gross_rent_multiplier = first_year
        .filter(|_| first_rent > 0.0)
        .map(|y| (y.home_value / first_rent) as u32);
    let one_percent_ratio = first_year.map_or(0.0, |y| y.averages.rent_income / config.home_price);

    SummaryMetrics {
        closing_costs: closing_costs(config),
        cash_outlay: out_of_pocket_cost(config),
        loan_amount: loan,
        monthly_payment: amortization_payment(loan.max(0.0), config.interest_rate, DEFAULT_TERM_YEARS),
        total_pmi_paid,
        total_property_tax_paid,
        total_interest_paid,
        gross_rent_multiplier,
        cap_rate: first_year.map_or(0.0, |y| y.totals.noi / config.home_price),
        first_month_cash_flow: first_year.map_or(0.0, |y| y.averages.niaf),
        five_year_annualized_roi: result
            .yearly_data
            .get(FIVE_YEAR_INDEX)
            .map(|y| y.annualized_roi),
        one_percent_ratio,
        meets_one_percent_rule: one_percent_ratio >= ONE_PERCENT_RULE,
    }
}

// Selling at the end of year k adds the sale proceeds to that year's flow.
pub fn yearly_irr(config: &Config, yearly: &[YearlyRecord]) -> Vec<f64> {
    let out_of_pocket = out_of_pocket_cost(config);
    let mut cashflows = Vec::with_capacity(yearly.len() + 1);
    cashflows.push(-out_of_pocket);

    yearly
        .iter()
        .map(|year| {
            cashflows.push(year.totals.niaf);
            let mut with_sale = cashflows.clone();
            if let Some(last) = with_sale.last_mut() {
                *last += year.sale_proceeds;
            }
            internal_rate_of_return(&with_sale, IRR_DEFAULT_GUESS)
        })
        .collect()
}
