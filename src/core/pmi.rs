
const EQUITY_THRESHOLD: f64 = 0.20;
const ORIGINAL_VALUE_THRESHOLD: f64 = 0.80;

pub fn cancel_pmi_from_equity(home_value: f64, loan_balance: f64) -> bool {
    home_value - loan_balance >= EQUITY_THRESHOLD * home_value
}

pub fn cancel_pmi_from_loan_balance(initial_home_value: f64, loan_balance: f64) -> bool {
    loan_balance <= ORIGINAL_VALUE_THRESHOLD * initial_home_value
}

pub fn monthly_pmi(home_value: f64, loan_balance: f64, pmi_rate: f64, initial_home_value: f64) -> f64 {
    if cancel_pmi_from_equity(home_value, loan_balance)
        || cancel_pmi_from_loan_balance(initial_home_value, loan_balance)
    {
        0.0
    } else {
        loan_balance * pmi_rate / 12.0
    }
}
