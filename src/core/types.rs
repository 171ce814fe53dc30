use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Lines,
    Dots,
}

// Rates are decimal fractions: 6.5 % is 0.065.
#[derive(Debug, Clone)]
pub struct Config {
    pub home_price: f64,
    pub rehab: f64,
    pub down_payment: f64,
    pub closing_costs_rate: f64,
    pub interest_rate: f64,
    pub pmi_rate: f64,
    pub yr_property_tax_rate: f64,
    pub yr_insurance_rate: f64,
    pub yr_maintenance: f64,
    pub yr_home_appreciation: f64,
    pub yr_inflation_rate: f64,
    pub yr_rent_increase: f64,
    pub mo_hoa_fees: f64,
    pub mo_utility: f64,
    pub mo_rent_income: f64,
    pub mo_other_income: f64,
    pub rent_exp: f64,
    pub vacancy_rate: f64,
    pub management_rate: f64,
    pub capital_gains_tax_rate: f64,
    pub income_tax_rate: f64,
    pub realtor_rate: f64,
    pub mo_extra_payment: f64,
    pub num_extra_payments: u32,
    pub extra_payments_portfolio_growth: f64,
    pub rent_surplus_portfolio_growth: f64,
    pub xlim: u32,
    pub display_mode: DisplayMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flows {
    pub interest_exp: f64,
    pub principal_exp: f64,
    pub extra_payment_exp: f64,
    pub property_tax_exp: f64,
    pub insurance_exp: f64,
    pub hoa_exp: f64,
    pub maintenance_exp: f64,
    pub pmi_exp: f64,
    pub utility_exp: f64,
    pub management_exp: f64,
    pub op_exp: f64,
    pub total_exp: f64,
    pub rent_income: f64,
    pub other_income: f64,
    pub adj_total_income: f64,
    pub noi: f64,
    pub niaf: f64,
    pub rent_exp: f64,
}

impl Flows {
    pub fn accumulate(&mut self, other: &Flows) {
        self.interest_exp += other.interest_exp;
        self.principal_exp += other.principal_exp;
        self.extra_payment_exp += other.extra_payment_exp;
        self.property_tax_exp += other.property_tax_exp;
        self.insurance_exp += other.insurance_exp;
        self.hoa_exp += other.hoa_exp;
        self.maintenance_exp += other.maintenance_exp;
        self.pmi_exp += other.pmi_exp;
        self.utility_exp += other.utility_exp;
        self.management_exp += other.management_exp;
        self.op_exp += other.op_exp;
        self.total_exp += other.total_exp;
        self.rent_income += other.rent_income;
        self.other_income += other.other_income;
        self.adj_total_income += other.adj_total_income;
        self.noi += other.noi;
        self.niaf += other.niaf;
        self.rent_exp += other.rent_exp;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyAverages {
    #[serde(rename = "interestExp_mo")]
    pub interest_exp: f64,
    #[serde(rename = "principalExp_mo")]
    pub principal_exp: f64,
    #[serde(rename = "extraPaymentExp_mo")]
    pub extra_payment_exp: f64,
    #[serde(rename = "propertyTaxExp_mo")]
    pub property_tax_exp: f64,
    #[serde(rename = "insuranceExp_mo")]
    pub insurance_exp: f64,
    #[serde(rename = "hoaExp_mo")]
    pub hoa_exp: f64,
    #[serde(rename = "maintenanceExp_mo")]
    pub maintenance_exp: f64,
    #[serde(rename = "pmiExp_mo")]
    pub pmi_exp: f64,
    #[serde(rename = "utilityExp_mo")]
    pub utility_exp: f64,
    #[serde(rename = "managementExp_mo")]
    pub management_exp: f64,
    #[serde(rename = "opExp_mo")]
    pub op_exp: f64,
    #[serde(rename = "totalExp_mo")]
    pub total_exp: f64,
    #[serde(rename = "rentIncome_mo")]
    pub rent_income: f64,
    #[serde(rename = "otherIncome_mo")]
    pub other_income: f64,
    #[serde(rename = "adjTotalIncome_mo")]
    pub adj_total_income: f64,
    #[serde(rename = "noi_mo")]
    pub noi: f64,
    #[serde(rename = "niaf_mo")]
    pub niaf: f64,
    #[serde(rename = "rentExp_mo")]
    pub rent_exp: f64,
}

impl MonthlyAverages {
    pub fn from_totals(totals: &Flows, months: usize) -> Self {
        let n = months.max(1) as f64;
        Self {
            interest_exp: totals.interest_exp / n,
            principal_exp: totals.principal_exp / n,
            extra_payment_exp: totals.extra_payment_exp / n,
            property_tax_exp: totals.property_tax_exp / n,
            insurance_exp: totals.insurance_exp / n,
            hoa_exp: totals.hoa_exp / n,
            maintenance_exp: totals.maintenance_exp / n,
            pmi_exp: totals.pmi_exp / n,
            utility_exp: totals.utility_exp / n,
            management_exp: totals.management_exp / n,
            op_exp: totals.op_exp / n,
            total_exp: totals.total_exp / n,
            rent_income: totals.rent_income / n,
            other_income: totals.other_income / n,
            adj_total_income: totals.adj_total_income / n,
            noi: totals.noi / n,
            niaf: totals.niaf / n,
            rent_exp: totals.rent_exp / n,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub month: u32,
    pub loan_balance: f64,
    pub home_value: f64,
    #[serde(flatten)]
    pub flows: Flows,
    pub rent_comparison_portfolio: f64,
    pub extra_payments_portfolio: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    pub year: u32,
    pub months: usize,
    pub loan_balance: f64,
    pub home_value: f64,
    pub rent_comparison_portfolio: f64,
    pub extra_payments_portfolio: f64,
    #[serde(flatten)]
    pub totals: Flows,
    #[serde(flatten)]
    pub averages: MonthlyAverages,
    pub equity: f64,
    pub sale_proceeds: f64,
    #[serde(rename = "coc_roi")]
    pub coc_roi: f64,
    #[serde(rename = "total_return")]
    pub total_return: f64,
    #[serde(rename = "net_worth")]
    pub net_worth: f64,
    pub roi: f64,
    #[serde(rename = "annualized_roi")]
    pub annualized_roi: f64,
    #[serde(rename = "rent_vs_own_savings")]
    pub rent_vs_own_savings: f64,
    #[serde(rename = "cum_niaf")]
    pub cum_niaf: f64,
    #[serde(rename = "cum_rent_exp")]
    pub cum_rent_exp: f64,
    #[serde(rename = "cum_interest_exp")]
    pub cum_interest_exp: f64,
    #[serde(rename = "cum_principal_exp")]
    pub cum_principal_exp: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub monthly_data: Vec<MonthlyRecord>,
    pub yearly_data: Vec<YearlyRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub closing_costs: f64,
    pub cash_outlay: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_pmi_paid: f64,
    pub total_property_tax_paid: f64,
    pub total_interest_paid: f64,
    pub gross_rent_multiplier: Option<u32>,
    pub cap_rate: f64,
    pub first_month_cash_flow: f64,
    pub five_year_annualized_roi: Option<f64>,
    pub one_percent_ratio: f64,
    pub meets_one_percent_rule: bool,
}
