use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Accumulation,
    Retirement,
}

// Rates are percentage points.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulationInputs {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub initial_gross_salary: f64,
    pub monthly_expenses: f64,
    pub initial_assets: f64,
    pub salary_growth_rate: f64,
    pub savings_rate: f64,
    pub desired_monthly_retirement: f64,
    pub expected_pension: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetirementInputs {
    pub current_age: u32,
    pub life_expectancy: u32,
    pub current_assets: f64,
    pub annual_income: f64,
    pub annual_expenses: f64,
    pub income_growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketAssumptions {
    pub investment_return_rate: f64,
    pub inflation_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InheritanceEvent {
    pub enabled: bool,
    pub amount: f64,
    pub year: i32,
}

impl InheritanceEvent {
    pub fn amount_for_year(&self, year: i32) -> f64 {
        if self.enabled && year == self.year {
            self.amount
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionParameters {
    pub retirement_mode: bool,
    pub start_year: i32,
    pub accumulation: AccumulationInputs,
    pub retirement: RetirementInputs,
    pub market: MarketAssumptions,
    pub inheritance: InheritanceEvent,
}

impl ProjectionParameters {
    pub fn mode(&self) -> ProjectionMode {
        if self.retirement_mode {
            ProjectionMode::Retirement
        } else {
            ProjectionMode::Accumulation
        }
    }

    pub fn retirement_start_year(&self) -> i32 {
        if self.retirement_mode {
            return self.start_year;
        }
        let working_years = i64::from(self.accumulation.retirement_age)
            - i64::from(self.accumulation.current_age);
        let year = i64::from(self.start_year) + working_years;
        year.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl Default for ProjectionParameters {
    fn default() -> Self {
        Self {
            retirement_mode: false,
            start_year: 2024,
            accumulation: AccumulationInputs {
                current_age: 29,
                retirement_age: 69,
                life_expectancy: 95,
                initial_gross_salary: 40_000.0,
                monthly_expenses: 2_200.0,
                initial_assets: 60_000.0,
                salary_growth_rate: 3.0,
                savings_rate: 80.0,
                desired_monthly_retirement: 3_000.0,
                expected_pension: 1_200.0,
            },
            retirement: RetirementInputs {
                current_age: 65,
                life_expectancy: 95,
                current_assets: 500_000.0,
                annual_income: 24_000.0,
                annual_expenses: 36_000.0,
                income_growth_rate: 1.5,
            },
            market: MarketAssumptions {
                investment_return_rate: 6.0,
                inflation_rate: 2.0,
            },
            inheritance: InheritanceEvent {
                enabled: false,
                amount: 150_000.0,
                year: 2045,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    pub year: i32,
    pub age: u32,
    pub gross_salary: i64,
    pub net_salary: i64,
    pub monthly_net_salary: i64,
    pub monthly_expenses: i64,
    pub monthly_disposable_income: i64,
    pub monthly_savings_amount: i64,
    pub annual_net_income: i64,
    pub total_assets: i64,
    pub real_total_assets: i64,
    pub investment_gains: i64,
    pub net_investment_gains: i64,
    pub retirement_withdrawal: i64,
    pub real_retirement_withdrawal: i64,
    pub coverage_gap: i64,
    pub assets_at_year_start: i64,
}

pub type ProjectionResult = Vec<YearlyRecord>;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionOutcome {
    pub years: ProjectionResult,
    pub depletion_age: Option<u32>,
    pub withdrawal_start_assets: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementGoal {
    pub assets_at_retirement: i64,
    pub real_assets_at_retirement: i64,
    pub sustainable_monthly_income: f64,
    pub total_expected_monthly_income: f64,
    pub desired_monthly_income: f64,
    pub goal_met: bool,
    pub gap_or_surplus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub mode: ProjectionMode,
    pub retirement_start_year: i32,
    pub accumulation_years: usize,
    pub retirement_years: usize,
    pub funded_retirement_years: usize,
    pub depletion_age: Option<u32>,
    pub withdrawal_start_assets: Option<i64>,
    pub final_total_assets: i64,
    pub final_real_total_assets: i64,
    pub retirement_goal: Option<RetirementGoal>,
}
