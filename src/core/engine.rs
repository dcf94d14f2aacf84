use super::tax::{compute_net_salary, net_investment_gains};
use super::types::{
    AccumulationInputs, MarketAssumptions, ProjectionOutcome, ProjectionParameters,
    ProjectionResult, RetirementInputs, YearlyRecord,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum RetirementPhase {
    NotYetRetired,
    Retired {
        retirement_expenses: f64,
        assets_at_retirement: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AccumulationState {
    assets: f64,
    gross_salary: f64,
    annual_expenses: f64,
    last_annual_net_salary: f64,
    phase: RetirementPhase,
    depletion_age: Option<u32>,
}

impl AccumulationState {
    fn initial(inputs: &AccumulationInputs) -> Self {
        Self {
            assets: inputs.initial_assets,
            gross_salary: inputs.initial_gross_salary,
            annual_expenses: inputs.monthly_expenses * 12.0,
            last_annual_net_salary: 0.0,
            phase: RetirementPhase::NotYetRetired,
            depletion_age: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RetireeState {
    assets: f64,
    annual_income: f64,
    annual_expenses: f64,
    depletion_age: Option<u32>,
}

impl RetireeState {
    fn initial(inputs: &RetirementInputs) -> Self {
        Self {
            assets: inputs.current_assets,
            annual_income: inputs.annual_income,
            annual_expenses: inputs.annual_expenses,
            depletion_age: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct InvestmentYield {
    gross: f64,
    net: f64,
}

#[derive(Debug, Clone, Copy)]
struct YearIndex {
    index: u32,
    year: i32,
    age: u32,
}

pub fn project(params: &ProjectionParameters) -> ProjectionResult {
    project_outcome(params).years
}

pub fn project_outcome(params: &ProjectionParameters) -> ProjectionOutcome {
    tracing::debug!(mode = ?params.mode(), start_year = params.start_year, "running projection");
    if params.retirement_mode {
        run_retirement(params)
    } else {
        run_accumulation(params)
    }
}

pub fn project_accumulation(params: &ProjectionParameters) -> ProjectionResult {
    run_accumulation(params).years
}

pub fn project_retirement(params: &ProjectionParameters) -> ProjectionResult {
    run_retirement(params).years
}

fn run_accumulation(params: &ProjectionParameters) -> ProjectionOutcome {
    let inputs = &params.accumulation;
    let mut state = AccumulationState::initial(inputs);
    let mut years = Vec::new();

    let span = year_indices(params.start_year, inputs.current_age, inputs.life_expectancy);
    for year_index in span {
        let (next, record) = accumulation_step(params, state, year_index);
        state = next;
        years.push(record);
    }

    let withdrawal_start_assets = match state.phase {
        RetirementPhase::Retired {
            assets_at_retirement,
            ..
        } => Some(round_currency(assets_at_retirement)),
        RetirementPhase::NotYetRetired => None,
    };

    ProjectionOutcome {
        years,
        depletion_age: state.depletion_age,
        withdrawal_start_assets,
    }
}

fn run_retirement(params: &ProjectionParameters) -> ProjectionOutcome {
    let inputs = &params.retirement;
    let mut state = RetireeState::initial(inputs);
    let mut years = Vec::new();

    let span = year_indices(params.start_year, inputs.current_age, inputs.life_expectancy);
    for year_index in span {
        let (next, record) = retirement_step(params, state, year_index);
        state = next;
        years.push(record);
    }

    ProjectionOutcome {
        years,
        depletion_age: state.depletion_age,
        withdrawal_start_assets: Some(round_currency(inputs.current_assets)),
    }
}

fn year_indices(
    start_year: i32,
    current_age: u32,
    life_expectancy: u32,
) -> impl Iterator<Item = YearIndex> {
    let span = life_expectancy.checked_sub(current_age);
    span.into_iter()
        .flat_map(|span| 0..=span)
        // Stops at the last representable calendar year.
        .map_while(move |index| {
            let offset = i32::try_from(index).ok()?;
            Some(YearIndex {
                index,
                year: start_year.checked_add(offset)?,
                age: current_age + index,
            })
        })
}

fn accumulation_step(
    params: &ProjectionParameters,
    mut state: AccumulationState,
    at: YearIndex,
) -> (AccumulationState, YearlyRecord) {
    let inputs = &params.accumulation;
    let market = &params.market;
    let inflation = percent(market.inflation_rate);
    let retirement_start_year = params.retirement_start_year();

    let assets_at_year_start = state.assets;
    let gains = investment_yield(assets_at_year_start, market);
    let inflation_factor = inflation_factor(market, at.index);

    let mut record = YearlyRecord {
        year: at.year,
        age: at.age,
        gross_salary: 0,
        net_salary: 0,
        monthly_net_salary: 0,
        monthly_expenses: 0,
        monthly_disposable_income: 0,
        monthly_savings_amount: 0,
        annual_net_income: 0,
        total_assets: 0,
        real_total_assets: 0,
        investment_gains: round_currency(gains.gross),
        net_investment_gains: round_currency(gains.net),
        retirement_withdrawal: 0,
        real_retirement_withdrawal: 0,
        coverage_gap: 0,
        assets_at_year_start: round_currency(assets_at_year_start),
    };

    if at.year < retirement_start_year {
        if at.index > 0 {
            state.gross_salary *= 1.0 + percent(inputs.salary_growth_rate);
            // Living costs track inflation.
            state.annual_expenses *= 1.0 + inflation;
        }

        let net_salary = compute_net_salary(state.gross_salary);
        state.last_annual_net_salary = net_salary;

        let savings_share = percent(inputs.savings_rate);
        let annual_disposable = net_salary - state.annual_expenses;
        let annual_savings = positive_share(annual_disposable, savings_share);

        let monthly_net_salary = net_salary / 12.0;
        let monthly_disposable = monthly_net_salary - state.annual_expenses / 12.0;

        state.assets += gains.net + annual_savings;

        record.gross_salary = round_currency(state.gross_salary);
        record.net_salary = round_currency(net_salary);
        record.monthly_net_salary = round_currency(monthly_net_salary);
        record.monthly_disposable_income = round_currency(monthly_disposable);
        record.monthly_savings_amount =
            round_currency(positive_share(monthly_disposable, savings_share));
    } else {
        let retirement_expenses = match state.phase {
            RetirementPhase::NotYetRetired => {
                let desired_annual = inputs.desired_monthly_retirement * 12.0;
                let retirement_expenses = if desired_annual > 0.0 {
                    desired_annual
                } else {
                    state.last_annual_net_salary
                };
                tracing::debug!(
                    year = at.year,
                    assets = state.assets,
                    retirement_expenses,
                    "entering withdrawal phase"
                );
                state.phase = RetirementPhase::Retired {
                    retirement_expenses,
                    assets_at_retirement: state.assets,
                };
                retirement_expenses
            }
            RetirementPhase::Retired {
                retirement_expenses,
                assets_at_retirement,
            } => {
                let inflated = retirement_expenses * (1.0 + inflation);
                state.phase = RetirementPhase::Retired {
                    retirement_expenses: inflated,
                    assets_at_retirement,
                };
                inflated
            }
        };

        let years_retired = years_since_retirement(inputs, at);
        debug_assert_eq!(
            i64::from(years_retired),
            (i64::from(at.year) - i64::from(retirement_start_year)).max(0)
        );
        let annual_pension =
            inputs.expected_pension * 12.0 * (1.0 + inflation).powi(years_retired as i32);
        let net_withdrawal_needed = (retirement_expenses - annual_pension).max(0.0);

        state.assets += gains.net - net_withdrawal_needed;

        record.retirement_withdrawal = round_currency(retirement_expenses);
        record.real_retirement_withdrawal = round_currency(retirement_expenses / inflation_factor);
        record.coverage_gap = round_currency((net_withdrawal_needed - gains.net).max(0.0));
    }

    (state.assets, state.depletion_age) =
        settle_year(params, state.assets, state.depletion_age, at);

    record.monthly_expenses = round_currency(state.annual_expenses / 12.0);
    record.total_assets = round_currency(state.assets);
    record.real_total_assets = round_currency(state.assets / inflation_factor);

    (state, record)
}

fn retirement_step(
    params: &ProjectionParameters,
    mut state: RetireeState,
    at: YearIndex,
) -> (RetireeState, YearlyRecord) {
    let inputs = &params.retirement;
    let market = &params.market;

    if at.index > 0 {
        state.annual_expenses *= 1.0 + percent(market.inflation_rate);
        state.annual_income *= 1.0 + percent(inputs.income_growth_rate);
    }

    let assets_at_year_start = state.assets;
    let gains = investment_yield(assets_at_year_start, market);
    let total_income = state.annual_income + gains.net;
    let coverage_gap = (state.annual_expenses - total_income).max(0.0);

    state.assets += total_income - state.annual_expenses;
    (state.assets, state.depletion_age) =
        settle_year(params, state.assets, state.depletion_age, at);

    let inflation_factor = inflation_factor(market, at.index);
    let record = YearlyRecord {
        year: at.year,
        age: at.age,
        gross_salary: 0,
        net_salary: 0,
        monthly_net_salary: 0,
        monthly_expenses: 0,
        monthly_disposable_income: 0,
        monthly_savings_amount: 0,
        annual_net_income: round_currency(state.annual_income),
        total_assets: round_currency(state.assets),
        real_total_assets: round_currency(state.assets / inflation_factor),
        investment_gains: round_currency(gains.gross),
        net_investment_gains: round_currency(gains.net),
        retirement_withdrawal: round_currency(state.annual_expenses),
        real_retirement_withdrawal: round_currency(state.annual_expenses / inflation_factor),
        coverage_gap: round_currency(coverage_gap),
        assets_at_year_start: round_currency(assets_at_year_start),
    };

    (state, record)
}

fn investment_yield(assets: f64, market: &MarketAssumptions) -> InvestmentYield {
    let gross = assets * percent(market.investment_return_rate);
    InvestmentYield {
        gross,
        net: net_investment_gains(gross),
    }
}

// A zero balance can recover in later years.
fn settle_year(
    params: &ProjectionParameters,
    assets: f64,
    depletion_age: Option<u32>,
    at: YearIndex,
) -> (f64, Option<u32>) {
    let assets = assets + params.inheritance.amount_for_year(at.year);
    let mut depletion_age = depletion_age;
    if assets <= 0.0 && depletion_age.is_none() {
        tracing::debug!(age = at.age, year = at.year, "assets depleted");
        depletion_age = Some(at.age);
    }
    (assets.max(0.0), depletion_age)
}

fn years_since_retirement(inputs: &AccumulationInputs, at: YearIndex) -> u32 {
    let working_years = i64::from(inputs.retirement_age) - i64::from(inputs.current_age);
    (i64::from(at.index) - working_years).max(0) as u32
}

fn inflation_factor(market: &MarketAssumptions, years: u32) -> f64 {
    (1.0 + percent(market.inflation_rate)).powi(years as i32)
}

fn positive_share(amount: f64, share: f64) -> f64 {
    if amount > 0.0 { amount * share } else { 0.0 }
}

fn percent(rate: f64) -> f64 {
    rate / 100.0
}

pub(crate) fn round_currency(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
