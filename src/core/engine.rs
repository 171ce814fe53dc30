use super::finance::{DEFAULT_TERM_YEARS, amortization_payment, compound_with_contribution};
use super::pmi::monthly_pmi;
use super::types::{Config, Flows, MonthlyRecord};

pub const SIMULATION_MONTHS: u32 = DEFAULT_TERM_YEARS * 12;

#[derive(Debug, Clone, Copy)]
struct LoanTerms {
    monthly_rate: f64,
    monthly_payment: f64,
}

#[derive(Debug, Clone, Copy)]
struct LoopState {
    loan_balance: f64,
    home_value: f64,
    pmi_exp: f64,
    pmi_required: bool,
    property_tax_exp: f64,
    insurance_exp: f64,
    maintenance_exp: f64,
    hoa_exp: f64,
    utility_exp: f64,
    management_exp: f64,
    rent_income: f64,
    other_income: f64,
    rent_exp: f64,
    rent_comparison_portfolio: f64,
    extra_payments_portfolio: f64,
}

impl LoopState {
    fn initial(config: &Config, loan_amount: f64, out_of_pocket: f64) -> Self {
        let loan_balance = loan_amount.max(0.0);
        let pmi_exp = monthly_pmi(
            config.home_price,
            loan_balance,
            config.pmi_rate,
            config.home_price,
        );

        Self {
            loan_balance,
            home_value: config.home_price,
            pmi_exp,
            pmi_required: pmi_exp > 0.0,
            property_tax_exp: config.home_price * config.yr_property_tax_rate / 12.0,
            insurance_exp: config.home_price * config.yr_insurance_rate / 12.0,
            maintenance_exp: config.home_price * config.yr_maintenance / 12.0,
            hoa_exp: config.mo_hoa_fees,
            utility_exp: config.mo_utility,
            management_exp: config.management_rate * config.mo_rent_income,
            rent_income: config.mo_rent_income,
            other_income: config.mo_other_income,
            rent_exp: config.rent_exp,
            rent_comparison_portfolio: out_of_pocket,
            extra_payments_portfolio: 0.0,
        }
    }
}

pub fn run_monthly_simulation(
    config: &Config,
    loan_amount: f64,
    out_of_pocket: f64,
    include_extra_payments: bool,
) -> Vec<MonthlyRecord> {
    let terms = LoanTerms {
        monthly_rate: config.interest_rate / 12.0,
        monthly_payment: amortization_payment(
            loan_amount.max(0.0),
            config.interest_rate,
            DEFAULT_TERM_YEARS,
        ),
    };

    let mut state = LoopState::initial(config, loan_amount, out_of_pocket);
    let mut records = Vec::with_capacity(SIMULATION_MONTHS as usize);

    for month in 0..SIMULATION_MONTHS {
        let (next, record) = step(config, terms, include_extra_payments, state, month);
        state = next;
        records.push(record);
        if state.loan_balance <= 0.0 {
            break;
        }
    }

    records
}

fn step(
    config: &Config,
    terms: LoanTerms,
    include_extra_payments: bool,
    mut state: LoopState,
    month: u32,
) -> (LoopState, MonthlyRecord) {
    let balance = state.loan_balance;
    let interest_exp = balance * terms.monthly_rate;
    // The last scheduled payment also clears floating-point residue.
    let principal_exp = if month + 1 == SIMULATION_MONTHS {
        balance
    } else {
        (terms.monthly_payment - interest_exp).min(balance).max(0.0)
    };

    let extra_payment_exp = if include_extra_payments && month < config.num_extra_payments {
        (balance - principal_exp).min(config.mo_extra_payment).max(0.0)
    } else {
        0.0
    };

    state.loan_balance = balance - principal_exp - extra_payment_exp;

    // Charge decided at the end of the previous month.
    if !state.pmi_required {
        state.pmi_exp = 0.0;
    }

    let op_exp = state.property_tax_exp
        + state.insurance_exp
        + state.hoa_exp
        + state.maintenance_exp
        + state.pmi_exp
        + state.utility_exp
        + state.management_exp;
    let total_exp = op_exp + interest_exp + principal_exp + extra_payment_exp;
    let adj_total_income = (state.rent_income + state.other_income) * (1.0 - config.vacancy_rate);
    let noi = adj_total_income - op_exp;
    let mut niaf = adj_total_income - total_exp;
    if niaf > 0.0 {
        niaf *= 1.0 - config.income_tax_rate;
    }

    state.pmi_required = monthly_pmi(
        state.home_value,
        state.loan_balance,
        config.pmi_rate,
        config.home_price,
    ) > 0.0;

    if total_exp > state.rent_exp {
        state.rent_comparison_portfolio += total_exp - state.rent_exp;
    }

    if extra_payment_exp > 0.0 {
        state.extra_payments_portfolio = compound_with_contribution(
            state.extra_payments_portfolio,
            config.extra_payments_portfolio_growth,
            1,
            extra_payment_exp,
        );
    }

    // Rent, income and management reported on an anniversary month already
    // carry the raise; the month's cash flow above used the old amounts.
    if month > 0 && month % 12 == 0 {
        let growth = 1.0 + config.yr_rent_increase;
        state.rent_exp *= growth;
        state.rent_income *= growth;
        state.other_income *= growth;
        state.management_exp = config.management_rate * state.rent_income;
    }

    state.home_value = compound_with_contribution(state.home_value, config.yr_home_appreciation, 1, 0.0);

    let record = MonthlyRecord {
        month,
        loan_balance: state.loan_balance,
        home_value: state.home_value,
        flows: Flows {
            interest_exp,
            principal_exp,
            extra_payment_exp,
            property_tax_exp: state.property_tax_exp,
            insurance_exp: state.insurance_exp,
            hoa_exp: state.hoa_exp,
            maintenance_exp: state.maintenance_exp,
            pmi_exp: state.pmi_exp,
            utility_exp: state.utility_exp,
            management_exp: state.management_exp,
            op_exp,
            total_exp,
            rent_income: state.rent_income,
            other_income: state.other_income,
            adj_total_income,
            noi,
            niaf,
            rent_exp: state.rent_exp,
        },
        rent_comparison_portfolio: state.rent_comparison_portfolio,
        extra_payments_portfolio: state.extra_payments_portfolio,
    };

    (state, record)
}
