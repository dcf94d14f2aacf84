use thiserror::Error;

use super::types::ProjectionParameters;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be >= 0")]
    Negative { field: &'static str },
    #[error("{field} must be between 0 and 100")]
    RateOutOfRange { field: &'static str },
    #[error("{life_field} must be > {age_field}")]
    LifeExpectancyTooLow {
        life_field: &'static str,
        age_field: &'static str,
    },
    #[error("{field} must be <= {max}", max = MAX_AGE)]
    AgeTooHigh { field: &'static str },
    #[error("retirementAge must be >= currentAge")]
    RetirementBeforeCurrentAge,
    #[error(
        "startYear must be between {min} and {max}",
        min = MIN_START_YEAR,
        max = MAX_START_YEAR
    )]
    StartYearOutOfRange,
}

pub const MAX_AGE: u32 = 150;
pub const MIN_START_YEAR: i32 = 1900;
pub const MAX_START_YEAR: i32 = 3000;

pub fn validate(params: &ProjectionParameters) -> Result<(), ValidationError> {
    if !(MIN_START_YEAR..=MAX_START_YEAR).contains(&params.start_year) {
        return Err(ValidationError::StartYearOutOfRange);
    }
    rate("investmentReturnRate", params.market.investment_return_rate)?;
    rate("inflationRate", params.market.inflation_rate)?;
    if params.inheritance.enabled {
        money("inheritanceAmount", params.inheritance.amount)?;
    }

    if params.retirement_mode {
        let inputs = &params.retirement;
        if inputs.life_expectancy > MAX_AGE {
            return Err(ValidationError::AgeTooHigh {
                field: "retireeLifeExpectancy",
            });
        }
        if inputs.life_expectancy <= inputs.current_age {
            return Err(ValidationError::LifeExpectancyTooLow {
                life_field: "retireeLifeExpectancy",
                age_field: "retireeCurrentAge",
            });
        }
        money("retireeCurrentAssets", inputs.current_assets)?;
        money("retireeAnnualIncome", inputs.annual_income)?;
        money("retireeAnnualExpenses", inputs.annual_expenses)?;
        rate("retireeIncomeGrowthRate", inputs.income_growth_rate)?;
        return Ok(());
    }

    let inputs = &params.accumulation;
    if inputs.life_expectancy > MAX_AGE {
        return Err(ValidationError::AgeTooHigh {
            field: "lifeExpectancy",
        });
    }
    if inputs.life_expectancy <= inputs.current_age {
        return Err(ValidationError::LifeExpectancyTooLow {
            life_field: "lifeExpectancy",
            age_field: "currentAge",
        });
    }
    if inputs.retirement_age < inputs.current_age {
        return Err(ValidationError::RetirementBeforeCurrentAge);
    }
    if inputs.retirement_age > MAX_AGE {
        return Err(ValidationError::AgeTooHigh {
            field: "retirementAge",
        });
    }
    for (field, value) in [
        ("initialGrossSalary", inputs.initial_gross_salary),
        ("monthlyExpenses", inputs.monthly_expenses),
        ("initialAssets", inputs.initial_assets),
        ("desiredMonthlyRetirement", inputs.desired_monthly_retirement),
        ("expectedPension", inputs.expected_pension),
    ] {
        money(field, value)?;
    }
    rate("salaryGrowthRate", inputs.salary_growth_rate)?;
    rate("savingsRate", inputs.savings_rate)?;

    Ok(())
}

fn money(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

fn rate(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::RateOutOfRange { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_in_both_modes() {
        let mut params = ProjectionParameters::default();
        assert_eq!(validate(&params), Ok(()));
        params.retirement_mode = true;
        assert_eq!(validate(&params), Ok(()));
    }

    #[test]
    fn rejects_life_expectancy_not_above_current_age() {
        let mut params = ProjectionParameters::default();
        params.accumulation.life_expectancy = params.accumulation.current_age;
        let err = validate(&params).expect_err("must reject");
        assert!(err.to_string().contains("lifeExpectancy"));
    }

    #[test]
    fn rejects_retirement_before_current_age() {
        let mut params = ProjectionParameters::default();
        params.accumulation.retirement_age = 20;
        assert_eq!(
            validate(&params),
            Err(ValidationError::RetirementBeforeCurrentAge)
        );
    }

    #[test]
    fn rejects_negative_money_and_out_of_range_rates() {
        let mut params = ProjectionParameters::default();
        params.accumulation.monthly_expenses = -1.0;
        assert_eq!(
            validate(&params),
            Err(ValidationError::Negative {
                field: "monthlyExpenses"
            })
        );

        let mut params = ProjectionParameters::default();
        params.accumulation.savings_rate = 120.0;
        assert_eq!(
            validate(&params),
            Err(ValidationError::RateOutOfRange {
                field: "savingsRate"
            })
        );

        let mut params = ProjectionParameters::default();
        params.market.inflation_rate = f64::NAN;
        assert_eq!(
            validate(&params),
            Err(ValidationError::NotFinite {
                field: "inflationRate"
            })
        );
    }

    #[test]
    fn only_active_mode_is_checked() {
        let mut params = ProjectionParameters::default();
        params.retirement.annual_expenses = -5.0;
        assert_eq!(validate(&params), Ok(()));

        params.retirement_mode = true;
        assert_eq!(
            validate(&params),
            Err(ValidationError::Negative {
                field: "retireeAnnualExpenses"
            })
        );
    }

    #[test]
    fn rejects_implausible_start_year() {
        for start_year in [1899, 3001, i32::MAX - 50, i32::MIN] {
            let mut params = ProjectionParameters::default();
            params.start_year = start_year;
            assert_eq!(
                validate(&params),
                Err(ValidationError::StartYearOutOfRange)
            );
        }

        let mut params = ProjectionParameters::default();
        params.start_year = MAX_START_YEAR;
        params.accumulation.life_expectancy = MAX_AGE;
        assert_eq!(validate(&params), Ok(()));
    }

    #[test]
    fn rejects_life_expectancy_above_maximum_age_in_both_modes() {
        let mut params = ProjectionParameters::default();
        params.accumulation.current_age = 0;
        params.accumulation.retirement_age = 0;
        params.accumulation.life_expectancy = u32::MAX;
        assert_eq!(
            validate(&params),
            Err(ValidationError::AgeTooHigh {
                field: "lifeExpectancy"
            })
        );

        let mut params = ProjectionParameters::default();
        params.retirement_mode = true;
        params.retirement.life_expectancy = MAX_AGE + 1;
        let err = validate(&params).expect_err("must reject");
        assert!(err.to_string().contains("retireeLifeExpectancy"));
        assert!(err.to_string().contains("150"));

        params.retirement.life_expectancy = MAX_AGE;
        assert_eq!(validate(&params), Ok(()));
    }

    #[test]
    fn rejects_retirement_age_above_maximum() {
        let mut params = ProjectionParameters::default();
        params.accumulation.retirement_age = u32::MAX;
        assert_eq!(
            validate(&params),
            Err(ValidationError::AgeTooHigh {
                field: "retirementAge"
            })
        );

        params.accumulation.retirement_age = 120;
        assert_eq!(validate(&params), Ok(()));
    }

    #[test]
    fn disabled_inheritance_amount_is_not_checked() {
        let mut params = ProjectionParameters::default();
        params.inheritance.amount = -10.0;
        assert_eq!(validate(&params), Ok(()));
        params.inheritance.enabled = true;
        assert!(validate(&params).is_err());
    }
}
