mod aggregate;
mod engine;
mod finance;
mod metrics;
mod pmi;
mod solver;
mod types;

pub use aggregate::{MAX_YEARS, MONTHS_PER_YEAR, aggregate_yearly};
pub use engine::{SIMULATION_MONTHS, run_monthly_simulation};
pub use finance::{
    DEFAULT_TERM_YEARS, amortization_payment, compound_with_contribution, total_interest_paid,
};
pub use metrics::{summarize, yearly_irr};
pub use pmi::{cancel_pmi_from_equity, cancel_pmi_from_loan_balance, monthly_pmi};
pub use solver::{IRR_DEFAULT_GUESS, IrrSolve, internal_rate_of_return, solve_irr};
pub use types::{
    Config, DisplayMode, Flows, MonthlyAverages, MonthlyRecord, SimulationResult, SummaryMetrics,
    YearlyRecord,
};

pub fn loan_amount(config: &Config) -> f64 {
    config.home_price + config.rehab - config.down_payment
}

pub fn closing_costs(config: &Config) -> f64 {
    config.home_price * config.closing_costs_rate
}

pub fn out_of_pocket_cost(config: &Config) -> f64 {
    config.down_payment + closing_costs(config) + config.rehab
}

pub fn run_simulation(config: &Config, include_extra_payments: bool) -> SimulationResult {
    let out_of_pocket = out_of_pocket_cost(config);
    let monthly_data = run_monthly_simulation(
        config,
        loan_amount(config),
        out_of_pocket,
        include_extra_payments,
    );
    let yearly_data = aggregate_yearly(config, &monthly_data, out_of_pocket);

    log::debug!(
        "simulated {} months / {} years (extra payments: {})",
        monthly_data.len(),
        yearly_data.len(),
        include_extra_payments
    );

    SimulationResult {
        monthly_data,
        yearly_data,
    }
}
