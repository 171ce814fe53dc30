use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum, error::ErrorKind};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    Config, DEFAULT_TERM_YEARS, DisplayMode, MonthlyRecord, SummaryMetrics, YearlyRecord,
    amortization_payment, loan_amount, out_of_pocket_cost, run_simulation, summarize, yearly_irr,
};

// Percent per year.
pub const ALT_INVESTMENTS: [(&str, f64); 7] = [
    ("Savings Account", 0.5),
    ("10 Year CDs", 1.1),
    ("SP500 Dividends", 1.8),
    ("Money Market", 2.5),
    ("10 Year US Treasury", 4.3),
    ("30 Year US Treasury", 4.4),
    ("SP500", 7.0),
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be >= 0 (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be > 0")]
    NonPositive { field: &'static str },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("down payment {down_payment} exceeds home price plus rehab {cost}")]
    DownPaymentExceedsCost { down_payment: f64, cost: f64 },

    #[error("{0}")]
    Arguments(String),

    // Help or version text requested on the command line.
    #[error("{0}")]
    Help(String),

    #[error("failed to encode output: {0}")]
    Output(String),

    #[error("invalid payload: {0}")]
    Payload(String),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CliDisplayMode {
    #[serde(alias = "Lines")]
    Lines,
    #[serde(alias = "Dots")]
    Dots,
}

impl From<CliDisplayMode> for DisplayMode {
    fn from(value: CliDisplayMode) -> Self {
        match value {
            CliDisplayMode::Lines => DisplayMode::Lines,
            CliDisplayMode::Dots => DisplayMode::Dots,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "mortgage-sim",
    version,
    about = "Month-by-month mortgage, rental cash flow and return projection"
)]
struct Cli {
    #[arg(long, default_value_t = 300_000.0)]
    home_price: f64,
    #[arg(long, default_value_t = 1_000.0, help = "Rehab cost, financed with the loan")]
    rehab: f64,
    #[arg(long, default_value_t = 50_000.0)]
    down_payment: f64,
    #[arg(long, default_value_t = 3.0, help = "Closing costs in percent of home price")]
    closing_costs_rate: f64,
    #[arg(long, default_value_t = 6.5, help = "Fixed annual interest rate in percent")]
    interest_rate: f64,
    #[arg(long, default_value_t = 0.5, help = "Annual PMI rate in percent of loan balance")]
    pmi_rate: f64,
    #[arg(long, default_value_t = 1.0, help = "Annual property tax in percent of home price")]
    yr_property_tax_rate: f64,
    #[arg(long, default_value_t = 0.35, help = "Annual insurance in percent of home price")]
    yr_insurance_rate: f64,
    #[arg(long, default_value_t = 1.5, help = "Annual maintenance in percent of home price")]
    yr_maintenance: f64,
    #[arg(long, default_value_t = 3.0, help = "Annual home appreciation in percent")]
    yr_home_appreciation: f64,
    #[arg(long, default_value_t = 3.0, help = "Annual inflation in percent")]
    yr_inflation_rate: f64,
    #[arg(long, default_value_t = 3.0, help = "Annual rent increase in percent")]
    yr_rent_increase: f64,
    #[arg(long, default_value_t = 0.0)]
    mo_hoa_fees: f64,
    #[arg(long, default_value_t = 200.0)]
    mo_utility: f64,
    #[arg(long, default_value_t = 0.0)]
    mo_rent_income: f64,
    #[arg(long, default_value_t = 0.0)]
    mo_other_income: f64,
    #[arg(long, default_value_t = 1_500.0, help = "Monthly rent paid if not buying")]
    rent_exp: f64,
    #[arg(long, default_value_t = 5.0, help = "Vacancy rate in percent")]
    vacancy_rate: f64,
    #[arg(long, default_value_t = 10.0, help = "Property management fee in percent of rent")]
    management_rate: f64,
    #[arg(long, default_value_t = 15.0, help = "Capital gains tax rate in percent")]
    capital_gains_tax_rate: f64,
    #[arg(long, default_value_t = 25.0, help = "Income tax rate on positive cash flow in percent")]
    income_tax_rate: f64,
    #[arg(long, default_value_t = 6.0, help = "Realtor fee on sale in percent")]
    realtor_rate: f64,
    #[arg(long, default_value_t = 300.0)]
    mo_extra_payment: f64,
    #[arg(long, default_value_t = 12, help = "Number of monthly extra payments")]
    num_extra_payments: u32,
    #[arg(
        long,
        default_value_t = 0.5,
        help = "Growth of the portfolio funded by extra payments in percent"
    )]
    extra_payments_portfolio_growth: f64,
    #[arg(
        long,
        default_value_t = 0.5,
        help = "Growth of the portfolio funded by renting instead in percent"
    )]
    rent_surplus_portfolio_growth: f64,
    #[arg(long, default_value_t = 30, help = "Chart horizon in years")]
    xlim: u32,
    #[arg(long, value_enum, default_value_t = CliDisplayMode::Lines)]
    chart_mode: CliDisplayMode,
    #[arg(long, help = "Apply the configured extra payments to principal")]
    include_extra_payments: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    home_price: Option<f64>,
    rehab: Option<f64>,
    down_payment: Option<f64>,
    closing_costs_rate: Option<f64>,
    interest_rate: Option<f64>,
    pmi_rate: Option<f64>,
    yr_property_tax_rate: Option<f64>,
    yr_insurance_rate: Option<f64>,
    yr_maintenance: Option<f64>,
    yr_home_appreciation: Option<f64>,
    yr_inflation_rate: Option<f64>,
    yr_rent_increase: Option<f64>,
    mo_hoa_fees: Option<f64>,
    mo_utility: Option<f64>,
    mo_rent_income: Option<f64>,
    mo_other_income: Option<f64>,
    rent_exp: Option<f64>,
    vacancy_rate: Option<f64>,
    management_rate: Option<f64>,
    capital_gains_tax_rate: Option<f64>,
    income_tax_rate: Option<f64>,
    realtor_rate: Option<f64>,
    mo_extra_payment: Option<f64>,
    num_extra_payments: Option<u32>,
    extra_payments_portfolio_growth: Option<f64>,
    rent_surplus_portfolio_growth: Option<f64>,
    xlim: Option<u32>,
    chart_mode: Option<CliDisplayMode>,
    include_extra_payments: Option<bool>,
}

#[derive(Debug)]
struct ApiRequest {
    config: Config,
    include_extra_payments: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    display_mode: DisplayMode,
    xlim: u32,
    include_extra_payments: bool,
    loan_amount: f64,
    out_of_pocket_cost: f64,
    monthly_payment: f64,
    metrics: SummaryMetrics,
    yearly_irr: Vec<f64>,
    monthly_data: Vec<MonthlyRecord>,
    yearly_data: Vec<YearlyRecord>,
}

#[derive(Debug, Serialize)]
struct AltInvestment {
    label: &'static str,
    rate: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    check_amount("--home-price", cli.home_price)?;
    if cli.home_price == 0.0 {
        return Err(ConfigError::NonPositive {
            field: "--home-price",
        });
    }

    for (name, value) in [
        ("--rehab", cli.rehab),
        ("--down-payment", cli.down_payment),
        ("--mo-hoa-fees", cli.mo_hoa_fees),
        ("--mo-utility", cli.mo_utility),
        ("--mo-rent-income", cli.mo_rent_income),
        ("--mo-other-income", cli.mo_other_income),
        ("--rent-exp", cli.rent_exp),
        ("--mo-extra-payment", cli.mo_extra_payment),
    ] {
        check_amount(name, value)?;
    }

    if cli.down_payment > cli.home_price + cli.rehab {
        return Err(ConfigError::DownPaymentExceedsCost {
            down_payment: cli.down_payment,
            cost: cli.home_price + cli.rehab,
        });
    }

    check_range("--interest-rate", cli.interest_rate, 0.0, 20.0)?;
    for (name, value) in [
        ("--closing-costs-rate", cli.closing_costs_rate),
        ("--pmi-rate", cli.pmi_rate),
        ("--yr-property-tax-rate", cli.yr_property_tax_rate),
        ("--yr-insurance-rate", cli.yr_insurance_rate),
        ("--yr-maintenance", cli.yr_maintenance),
        ("--yr-home-appreciation", cli.yr_home_appreciation),
        ("--yr-inflation-rate", cli.yr_inflation_rate),
        ("--yr-rent-increase", cli.yr_rent_increase),
        ("--vacancy-rate", cli.vacancy_rate),
        ("--management-rate", cli.management_rate),
        ("--capital-gains-tax-rate", cli.capital_gains_tax_rate),
        ("--income-tax-rate", cli.income_tax_rate),
        ("--realtor-rate", cli.realtor_rate),
        ("--extra-payments-portfolio-growth", cli.extra_payments_portfolio_growth),
        ("--rent-surplus-portfolio-growth", cli.rent_surplus_portfolio_growth),
    ] {
        check_range(name, value, 0.0, 99.0)?;
    }

    if !(5..=30).contains(&cli.xlim) {
        return Err(ConfigError::OutOfRange {
            field: "--xlim",
            min: 5.0,
            max: 30.0,
            value: cli.xlim as f64,
        });
    }

    Ok(Config {
        home_price: cli.home_price,
        rehab: cli.rehab,
        down_payment: cli.down_payment,
        closing_costs_rate: cli.closing_costs_rate / 100.0,
        interest_rate: cli.interest_rate / 100.0,
        pmi_rate: cli.pmi_rate / 100.0,
        yr_property_tax_rate: cli.yr_property_tax_rate / 100.0,
        yr_insurance_rate: cli.yr_insurance_rate / 100.0,
        yr_maintenance: cli.yr_maintenance / 100.0,
        yr_home_appreciation: cli.yr_home_appreciation / 100.0,
        yr_inflation_rate: cli.yr_inflation_rate / 100.0,
        yr_rent_increase: cli.yr_rent_increase / 100.0,
        mo_hoa_fees: cli.mo_hoa_fees,
        mo_utility: cli.mo_utility,
        mo_rent_income: cli.mo_rent_income,
        mo_other_income: cli.mo_other_income,
        rent_exp: cli.rent_exp,
        vacancy_rate: cli.vacancy_rate / 100.0,
        management_rate: cli.management_rate / 100.0,
        capital_gains_tax_rate: cli.capital_gains_tax_rate / 100.0,
        income_tax_rate: cli.income_tax_rate / 100.0,
        realtor_rate: cli.realtor_rate / 100.0,
        mo_extra_payment: cli.mo_extra_payment,
        num_extra_payments: cli.num_extra_payments,
        extra_payments_portfolio_growth: cli.extra_payments_portfolio_growth / 100.0,
        rent_surplus_portfolio_growth: cli.rent_surplus_portfolio_growth / 100.0,
        xlim: cli.xlim,
        display_mode: cli.chart_mode.into(),
    })
}

pub fn run_cli<I, T>(args: I) -> Result<String, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ConfigError::Help(e.to_string()),
        _ => ConfigError::Arguments(e.to_string()),
    })?;
    let request = ApiRequest {
        config: build_config(&cli)?,
        include_extra_payments: cli.include_extra_payments,
    };
    let response = build_simulate_response(request);
    serde_json::to_string_pretty(&response).map_err(|e| ConfigError::Output(e.to_string()))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route("/api/alt-investments", get(alt_investments_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("mortgage simulation API listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn alt_investments_handler() -> Response {
    let options = ALT_INVESTMENTS
        .iter()
        .map(|&(label, rate)| AltInvestment { label, rate })
        .collect::<Vec<_>>();
    json_response(StatusCode::OK, options)
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => {
            log::warn!("rejected simulate request: {err}");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    json_response(StatusCode::OK, build_simulate_response(request))
}

fn build_simulate_response(request: ApiRequest) -> SimulateResponse {
    let config = &request.config;
    let result = run_simulation(config, request.include_extra_payments);
    let metrics = summarize(config, &result);
    let irr = yearly_irr(config, &result.yearly_data);
    let loan = loan_amount(config);

    SimulateResponse {
        display_mode: config.display_mode,
        xlim: config.xlim,
        include_extra_payments: request.include_extra_payments,
        loan_amount: loan,
        out_of_pocket_cost: out_of_pocket_cost(config),
        monthly_payment: amortization_payment(loan.max(0.0), config.interest_rate, DEFAULT_TERM_YEARS),
        metrics,
        yearly_irr: irr,
        monthly_data: result.monthly_data,
        yearly_data: result.yearly_data,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, ConfigError> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| ConfigError::Payload(e.to_string()))?;
    api_request_from_payload(payload)
}

macro_rules! overlay {
    ($cli:ident, $payload:ident; $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $payload.$field {
                $cli.$field = v;
            }
        )+
    };
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, ConfigError> {
    let mut cli = default_cli_for_api();

    overlay!(cli, payload;
        home_price,
        rehab,
        down_payment,
        closing_costs_rate,
        interest_rate,
        pmi_rate,
        yr_property_tax_rate,
        yr_insurance_rate,
        yr_maintenance,
        yr_home_appreciation,
        yr_inflation_rate,
        yr_rent_increase,
        mo_hoa_fees,
        mo_utility,
        mo_rent_income,
        mo_other_income,
        rent_exp,
        vacancy_rate,
        management_rate,
        capital_gains_tax_rate,
        income_tax_rate,
        realtor_rate,
        mo_extra_payment,
        num_extra_payments,
        extra_payments_portfolio_growth,
        rent_surplus_portfolio_growth,
        xlim,
        chart_mode,
        include_extra_payments,
    );

    Ok(ApiRequest {
        config: build_config(&cli)?,
        include_extra_payments: cli.include_extra_payments,
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        home_price: 300_000.0,
        rehab: 1_000.0,
        down_payment: 50_000.0,
        closing_costs_rate: 3.0,
        interest_rate: 6.5,
        pmi_rate: 0.5,
        yr_property_tax_rate: 1.0,
        yr_insurance_rate: 0.35,
        yr_maintenance: 1.5,
        yr_home_appreciation: 3.0,
        yr_inflation_rate: 3.0,
        yr_rent_increase: 3.0,
        mo_hoa_fees: 0.0,
        mo_utility: 200.0,
        mo_rent_income: 0.0,
        mo_other_income: 0.0,
        rent_exp: 1_500.0,
        vacancy_rate: 5.0,
        management_rate: 10.0,
        capital_gains_tax_rate: 15.0,
        income_tax_rate: 25.0,
        realtor_rate: 6.0,
        mo_extra_payment: 300.0,
        num_extra_payments: 12,
        extra_payments_portfolio_growth: 0.5,
        rent_surplus_portfolio_growth: 0.5,
        xlim: 30,
        chart_mode: CliDisplayMode::Lines,
        include_extra_payments: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn clap_defaults_match_api_defaults() {
        let parsed = Cli::try_parse_from(["mortgage-sim"]).expect("defaults parse");
        let from_flags = build_config(&parsed).expect("valid defaults");
        let from_api = build_config(&sample_cli()).expect("valid defaults");

        assert_approx(from_flags.home_price, from_api.home_price);
        assert_approx(from_flags.interest_rate, from_api.interest_rate);
        assert_approx(from_flags.yr_insurance_rate, from_api.yr_insurance_rate);
        assert_approx(from_flags.rent_exp, from_api.rent_exp);
        assert_eq!(from_flags.num_extra_payments, from_api.num_extra_payments);
        assert_eq!(from_flags.display_mode, from_api.display_mode);
        assert!(!parsed.include_extra_payments);
    }

    #[test]
    fn build_config_converts_percentages_to_fractions() {
        let config = build_config(&sample_cli()).expect("valid inputs");
        assert_approx(config.interest_rate, 0.065);
        assert_approx(config.pmi_rate, 0.005);
        assert_approx(config.closing_costs_rate, 0.03);
        assert_approx(config.yr_insurance_rate, 0.0035);
        assert_approx(config.vacancy_rate, 0.05);
        assert_approx(config.extra_payments_portfolio_growth, 0.005);
        assert_approx(config.home_price, 300_000.0);
        assert_approx(config.mo_utility, 200.0);
    }

    #[test]
    fn build_config_rejects_negative_amounts() {
        let mut cli = sample_cli();
        cli.rehab = -1.0;
        let err = build_config(&cli).expect_err("must reject negative rehab");
        assert!(err.to_string().contains("--rehab"));
    }

    #[test]
    fn build_config_rejects_zero_home_price() {
        let mut cli = sample_cli();
        cli.home_price = 0.0;
        cli.down_payment = 0.0;
        cli.rehab = 0.0;
        let err = build_config(&cli).expect_err("must reject zero price");
        assert_eq!(
            err,
            ConfigError::NonPositive {
                field: "--home-price"
            }
        );
    }

    #[test]
    fn build_config_rejects_out_of_range_rates() {
        let mut cli = sample_cli();
        cli.interest_rate = 25.0;
        let err = build_config(&cli).expect_err("must reject 25% interest");
        assert!(err.to_string().contains("--interest-rate"));

        let mut cli = sample_cli();
        cli.vacancy_rate = 120.0;
        let err = build_config(&cli).expect_err("must reject 120% vacancy");
        assert!(err.to_string().contains("--vacancy-rate"));

        let mut cli = sample_cli();
        cli.pmi_rate = f64::NAN;
        let err = build_config(&cli).expect_err("must reject NaN");
        assert_eq!(err, ConfigError::NotFinite { field: "--pmi-rate" });
    }

    #[test]
    fn build_config_rejects_down_payment_above_cost() {
        let mut cli = sample_cli();
        cli.down_payment = 400_000.0;
        let err = build_config(&cli).expect_err("must reject oversized down payment");
        assert!(matches!(err, ConfigError::DownPaymentExceedsCost { .. }));
    }

    #[test]
    fn build_config_rejects_short_horizon() {
        let mut cli = sample_cli();
        cli.xlim = 2;
        let err = build_config(&cli).expect_err("must reject 2 year horizon");
        assert!(err.to_string().contains("--xlim"));
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "homePrice": 400000,
          "rehab": 10000,
          "downPayment": 80000,
          "interestRate": 7,
          "pmiRate": 0.6,
          "yrPropertyTaxRate": 1.2,
          "moRentIncome": 2500,
          "moHoaFees": 75,
          "rentExp": 1800,
          "numExtraPayments": 24,
          "moExtraPayment": 500,
          "extraPaymentsPortfolioGrowth": 7.0,
          "xlim": 15,
          "chartMode": "Dots",
          "includeExtraPayments": true
        }"#;
        let request = api_request_from_json(json).expect("json should parse");
        let config = request.config;

        assert!(request.include_extra_payments);
        assert_approx(config.home_price, 400_000.0);
        assert_approx(config.rehab, 10_000.0);
        assert_approx(config.down_payment, 80_000.0);
        assert_approx(config.interest_rate, 0.07);
        assert_approx(config.pmi_rate, 0.006);
        assert_approx(config.yr_property_tax_rate, 0.012);
        assert_approx(config.mo_rent_income, 2_500.0);
        assert_approx(config.mo_hoa_fees, 75.0);
        assert_approx(config.rent_exp, 1_800.0);
        assert_eq!(config.num_extra_payments, 24);
        assert_approx(config.mo_extra_payment, 500.0);
        assert_approx(config.extra_payments_portfolio_growth, 0.07);
        assert_eq!(config.xlim, 15);
        assert_eq!(config.display_mode, DisplayMode::Dots);
        // Untouched fields keep their defaults.
        assert_approx(config.yr_insurance_rate, 0.0035);
    }

    #[test]
    fn api_request_from_json_reports_invalid_values() {
        let err = api_request_from_json(r#"{"homePrice": "lots"}"#).expect_err("must fail");
        assert!(matches!(err, ConfigError::Payload(_)));

        let err = api_request_from_json(r#"{"vacancyRate": 150}"#).expect_err("must fail");
        assert!(err.to_string().contains("--vacancy-rate"));
    }

    #[test]
    fn simulate_response_serialization_contains_expected_fields() {
        let request = api_request_from_json(r#"{"moRentIncome": 2000}"#).expect("valid");
        let response = build_simulate_response(request);
        assert!(!response.monthly_data.is_empty());
        assert_eq!(response.yearly_irr.len(), response.yearly_data.len());

        let json = serde_json::to_string(&response).expect("response should serialize");
        for key in [
            "\"displayMode\":\"lines\"",
            "\"loanAmount\"",
            "\"outOfPocketCost\"",
            "\"monthlyPayment\"",
            "\"metrics\"",
            "\"yearlyIrr\"",
            "\"monthlyData\"",
            "\"yearlyData\"",
            "\"interestExp_mo\"",
            "\"rent_vs_own_savings\"",
            "\"grossRentMultiplier\"",
        ] {
            assert!(json.contains(key), "missing {key}");
        }
    }

    #[test]
    fn extra_payments_flag_reaches_the_engine() {
        let base = build_simulate_response(
            api_request_from_json(r#"{"includeExtraPayments": false}"#).expect("valid"),
        );
        let extra = build_simulate_response(
            api_request_from_json(r#"{"includeExtraPayments": true}"#).expect("valid"),
        );
        assert!(extra.monthly_data.len() < base.monthly_data.len());
        assert!(extra.monthly_data[0].flows.extra_payment_exp > 0.0);
    }

    #[test]
    fn run_cli_prints_simulation_json() {
        let json = run_cli([
            "mortgage-sim",
            "--home-price",
            "250000",
            "--down-payment",
            "50000",
            "--include-extra-payments",
            "--chart-mode",
            "dots",
        ])
        .expect("cli should run");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["displayMode"], "dots");
        assert_eq!(value["includeExtraPayments"], true);
        assert_eq!(value["loanAmount"], 201_000.0);
    }

    #[test]
    fn run_cli_reports_bad_flags() {
        let err = run_cli(["mortgage-sim", "--interest-rate", "abc"]).expect_err("must fail");
        assert!(matches!(err, ConfigError::Arguments(_)));
    }

    #[test]
    fn output_errors_are_not_reported_as_payload_errors() {
        let err = ConfigError::Output("key must be a string".to_string());
        assert_eq!(err.to_string(), "failed to encode output: key must be a string");
        assert!(!err.to_string().contains("payload"));
    }

    #[test]
    fn run_cli_returns_help_and_version_text() {
        let err = run_cli(["mortgage-sim", "--help"]).expect_err("help is not a simulation");
        match err {
            ConfigError::Help(text) => assert!(text.contains("--home-price"), "{text}"),
            other => panic!("expected help text, got {other:?}"),
        }

        let err = run_cli(["mortgage-sim", "--version"]).expect_err("version is not a simulation");
        match err {
            ConfigError::Help(text) => assert!(text.contains(env!("CARGO_PKG_VERSION")), "{text}"),
            other => panic!("expected version text, got {other:?}"),
        }
    }

    #[test]
    fn alt_investment_rates_are_valid_portfolio_growth() {
        for (label, rate) in ALT_INVESTMENTS {
            let mut cli = sample_cli();
            cli.extra_payments_portfolio_growth = rate;
            cli.rent_surplus_portfolio_growth = rate;
            assert!(build_config(&cli).is_ok(), "{label} should be accepted");
        }
    }
}
