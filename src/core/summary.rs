use super::types::{
    ProjectionMode, ProjectionOutcome, ProjectionParameters, ProjectionSummary, RetirementGoal,
    YearlyRecord,
};

pub const SAFE_WITHDRAWAL_RATE: f64 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSplit<'a> {
    pub accumulation: &'a [YearlyRecord],
    pub retirement: &'a [YearlyRecord],
}

pub fn split_phases(years: &[YearlyRecord], retirement_start_year: i32) -> PhaseSplit<'_> {
    let boundary = years.partition_point(|r| r.year < retirement_start_year);
    let (accumulation, retirement) = years.split_at(boundary);
    PhaseSplit {
        accumulation,
        retirement,
    }
}

pub fn summarize(params: &ProjectionParameters, outcome: &ProjectionOutcome) -> ProjectionSummary {
    let retirement_start_year = params.retirement_start_year();
    let phases = split_phases(&outcome.years, retirement_start_year);
    let last = outcome.years.last();

    let retirement_goal = match params.mode() {
        ProjectionMode::Accumulation => Some(retirement_goal(
            params,
            &outcome.years,
            retirement_start_year,
        )),
        ProjectionMode::Retirement => None,
    };

    ProjectionSummary {
        mode: params.mode(),
        retirement_start_year,
        accumulation_years: phases.accumulation.len(),
        retirement_years: phases.retirement.len(),
        funded_retirement_years: phases
            .retirement
            .iter()
            .filter(|r| r.total_assets > 0)
            .count(),
        depletion_age: outcome.depletion_age,
        withdrawal_start_assets: outcome.withdrawal_start_assets,
        final_total_assets: last.map_or(0, |r| r.total_assets),
        final_real_total_assets: last.map_or(0, |r| r.real_total_assets),
        retirement_goal,
    }
}

fn retirement_goal(
    params: &ProjectionParameters,
    years: &[YearlyRecord],
    retirement_start_year: i32,
) -> RetirementGoal {
    let at_retirement = years.iter().find(|r| r.year == retirement_start_year);
    let assets_at_retirement = at_retirement.map_or(0, |r| r.total_assets);
    let real_assets_at_retirement = at_retirement.map_or(0, |r| r.real_total_assets);

    let sustainable_monthly_income = assets_at_retirement as f64 * SAFE_WITHDRAWAL_RATE / 12.0;
    let total_expected_monthly_income =
        sustainable_monthly_income + params.accumulation.expected_pension;
    let desired_monthly_income = params.accumulation.desired_monthly_retirement;

    RetirementGoal {
        assets_at_retirement,
        real_assets_at_retirement,
        sustainable_monthly_income,
        total_expected_monthly_income,
        desired_monthly_income,
        goal_met: total_expected_monthly_income >= desired_monthly_income,
        gap_or_surplus: total_expected_monthly_income - desired_monthly_income,
    }
}
