use super::types::{Config, Flows, MonthlyAverages, MonthlyRecord, YearlyRecord};

pub const MONTHS_PER_YEAR: usize = 12;
pub const MAX_YEARS: usize = 30;

#[derive(Debug, Default, Clone, Copy)]
struct RunningTotals {
    niaf: f64,
    rent_exp: f64,
    interest_exp: f64,
    principal_exp: f64,
}

// A short final window averages over its own length.
pub fn aggregate_yearly(
    config: &Config,
    monthly: &[MonthlyRecord],
    out_of_pocket: f64,
) -> Vec<YearlyRecord> {
    let mut running = RunningTotals::default();

    monthly
        .chunks(MONTHS_PER_YEAR)
        .take(MAX_YEARS)
        .enumerate()
        .filter_map(|(year, window)| {
            let last = window.last()?;
            let totals = window.iter().fold(Flows::default(), |mut acc, m| {
                acc.accumulate(&m.flows);
                acc
            });

            running.niaf += totals.niaf;
            running.rent_exp += totals.rent_exp;
            running.interest_exp += totals.interest_exp;
            running.principal_exp += totals.principal_exp;

            Some(build_year(
                config,
                year as u32,
                window.len(),
                last,
                totals,
                running,
                out_of_pocket,
            ))
        })
        .collect()
}

fn build_year(
    config: &Config,
    year: u32,
    months: usize,
    last: &MonthlyRecord,
    totals: Flows,
    running: RunningTotals,
    out_of_pocket: f64,
) -> YearlyRecord {
    let home_value = last.home_value;
    let loan_balance = last.loan_balance;

    let equity = home_value - loan_balance;
    let capital_gains_tax = (home_value - config.home_price) * config.capital_gains_tax_rate;
    let realtor_fee = home_value * config.realtor_rate;
    let sale_proceeds = equity - capital_gains_tax - realtor_fee;

    let total_return = sale_proceeds - out_of_pocket;
    let roi = ratio(total_return, out_of_pocket);

    YearlyRecord {
        year,
        months,
        loan_balance,
        home_value,
        rent_comparison_portfolio: last.rent_comparison_portfolio,
        extra_payments_portfolio: last.extra_payments_portfolio,
        totals,
        averages: MonthlyAverages::from_totals(&totals, months),
        equity,
        sale_proceeds,
        coc_roi: ratio(totals.niaf, out_of_pocket),
        total_return,
        net_worth: equity + totals.niaf,
        roi,
        annualized_roi: (1.0 + roi).powf(1.0 / (year as f64 + 1.0)) - 1.0,
        rent_vs_own_savings: total_return - (last.rent_comparison_portfolio - out_of_pocket),
        cum_niaf: running.niaf,
        cum_rent_exp: running.rent_exp,
        cum_interest_exp: running.interest_exp,
        cum_principal_exp: running.principal_exp,
    }
}

// A zero cash basis has no meaningful return ratio.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
