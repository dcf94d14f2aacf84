const HEALTH_INSURANCE_CEILING: f64 = 62_100.0;
const PENSION_INSURANCE_CEILING: f64 = 90_600.0;
// General rate plus average supplementary contribution.
const HEALTH_INSURANCE_RATE: f64 = 0.073 + 0.0085;
const NURSING_CARE_RATE: f64 = 0.023;
const PENSION_INSURANCE_RATE: f64 = 0.093;
const UNEMPLOYMENT_INSURANCE_RATE: f64 = 0.013;

const EMPLOYEE_LUMP_SUM_DEDUCTION: f64 = 1_264.0;
const BASIC_TAX_FREE_ALLOWANCE: f64 = 11_604.0;
const FIRST_PROGRESSION_LIMIT: f64 = 17_005.0;
const SECOND_PROGRESSION_LIMIT: f64 = 66_760.0;
const TOP_RATE_THRESHOLD: f64 = 277_825.0;

const SOLIDARITY_THRESHOLD: f64 = 18_130.0;
const SOLIDARITY_FULL_RATE_THRESHOLD: f64 = 34_332.0;
const SOLIDARITY_RATE: f64 = 0.055;
const SOLIDARITY_PHASE_IN_RATE: f64 = 0.119;

pub const CAPITAL_GAINS_TAX_RATE: f64 = 0.25;
pub const CAPITAL_GAINS_ALLOWANCE: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetSalaryBreakdown {
    pub gross: f64,
    pub social_contributions: f64,
    pub taxable_income: f64,
    pub income_tax: f64,
    pub solidarity_surcharge: f64,
    pub net: f64,
}

pub fn compute_net_salary(gross_annual_salary: f64) -> f64 {
    net_salary_breakdown(gross_annual_salary).net
}

pub fn net_salary_breakdown(gross_annual_salary: f64) -> NetSalaryBreakdown {
    let gross = gross_annual_salary;
    let social_contributions = social_contributions(gross);
    let taxable_income = gross - social_contributions - EMPLOYEE_LUMP_SUM_DEDUCTION;
    let income_tax = income_tax(taxable_income);
    let solidarity_surcharge = solidarity_surcharge(income_tax);

    NetSalaryBreakdown {
        gross,
        social_contributions,
        taxable_income,
        income_tax,
        solidarity_surcharge,
        net: gross - social_contributions - income_tax - solidarity_surcharge,
    }
}

pub fn social_contributions(gross: f64) -> f64 {
    let health_base = gross.min(HEALTH_INSURANCE_CEILING);
    let pension_base = gross.min(PENSION_INSURANCE_CEILING);

    health_base * HEALTH_INSURANCE_RATE
        + health_base * NURSING_CARE_RATE
        + pension_base * PENSION_INSURANCE_RATE
        + pension_base * UNEMPLOYMENT_INSURANCE_RATE
}

// Branch order and coefficients are fixed.
pub fn income_tax(taxable_income: f64) -> f64 {
    if taxable_income <= BASIC_TAX_FREE_ALLOWANCE {
        0.0
    } else if taxable_income <= FIRST_PROGRESSION_LIMIT {
        let y = (taxable_income - BASIC_TAX_FREE_ALLOWANCE) / 10_000.0;
        (979.18 * y + 1_400.0) * y
    } else if taxable_income <= SECOND_PROGRESSION_LIMIT {
        let z = (taxable_income - FIRST_PROGRESSION_LIMIT) / 10_000.0;
        (192.59 * z + 2_397.0) * z + 975.79
    } else if taxable_income <= TOP_RATE_THRESHOLD {
        0.42 * taxable_income - 10_253.81
    } else {
        0.45 * taxable_income - 18_588.56
    }
}

pub fn solidarity_surcharge(income_tax: f64) -> f64 {
    if income_tax <= SOLIDARITY_THRESHOLD {
        return 0.0;
    }
    if income_tax > SOLIDARITY_FULL_RATE_THRESHOLD {
        return SOLIDARITY_RATE * income_tax;
    }
    (SOLIDARITY_RATE * income_tax)
        .min(SOLIDARITY_PHASE_IN_RATE * (income_tax - SOLIDARITY_THRESHOLD))
}

pub fn net_investment_gains(gross_gains: f64) -> f64 {
    if gross_gains > CAPITAL_GAINS_ALLOWANCE {
        let taxable = gross_gains - CAPITAL_GAINS_ALLOWANCE;
        CAPITAL_GAINS_ALLOWANCE + taxable * (1.0 - CAPITAL_GAINS_TAX_RATE)
    } else {
        gross_gains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn zero_gross_has_zero_net() {
        let breakdown = net_salary_breakdown(0.0);
        assert_eq!(breakdown.social_contributions, 0.0);
        assert_eq!(breakdown.income_tax, 0.0);
        assert_eq!(breakdown.solidarity_surcharge, 0.0);
        assert_eq!(compute_net_salary(0.0), 0.0);
    }

    #[test]
    fn middle_income_matches_hand_calculation() {
        // Contributions: 40000 * (0.0815 + 0.023 + 0.093 + 0.013) = 8420
        // Taxable: 40000 - 8420 - 1264 = 30316, second progression zone.
        let breakdown = net_salary_breakdown(40_000.0);
        assert_approx_tol(breakdown.social_contributions, 8_420.0, 1e-6);
        assert_approx_tol(breakdown.taxable_income, 30_316.0, 1e-6);
        assert_approx_tol(breakdown.income_tax, 4_507.6729, 1e-3);
        assert_eq!(breakdown.solidarity_surcharge, 0.0);
        assert_approx_tol(breakdown.net, 27_072.3271, 1e-3);
    }

    #[test]
    fn contributions_stop_growing_above_ceilings() {
        let capped = social_contributions(90_600.0);
        assert_approx_tol(capped, 62_100.0 * 0.1045 + 90_600.0 * 0.106, 1e-6);
        assert_approx_tol(social_contributions(250_000.0), capped, 1e-9);
    }

    #[test]
    fn top_earner_pays_full_surcharge() {
        let breakdown = net_salary_breakdown(300_000.0);
        assert_approx_tol(breakdown.social_contributions, 16_093.05, 1e-6);
        assert_approx_tol(breakdown.income_tax, 108_600.7675, 1e-6);
        assert_approx_tol(breakdown.solidarity_surcharge, 0.055 * 108_600.7675, 1e-6);
        assert_approx_tol(breakdown.net, 169_333.1403, 1e-3);
    }

    #[test]
    fn income_below_allowance_is_untaxed() {
        assert_eq!(income_tax(11_604.0), 0.0);
        assert_eq!(income_tax(-500.0), 0.0);
        assert!(income_tax(11_605.0) > 0.0);
    }

    #[test]
    fn income_tax_is_continuous_at_top_rate_threshold() {
        let below = income_tax(TOP_RATE_THRESHOLD);
        let above = income_tax(TOP_RATE_THRESHOLD + 0.01);
        assert_approx_tol(above - below, 0.0045, 1e-3);
    }

    #[test]
    fn progression_zone_boundaries_jump_by_less_than_one_percent_of_income() {
        for boundary in [FIRST_PROGRESSION_LIMIT, SECOND_PROGRESSION_LIMIT] {
            let jump = (income_tax(boundary + 0.01) - income_tax(boundary)).abs();
            assert!(
                jump < boundary * 0.01,
                "jump of {jump} at {boundary} is not negligible"
            );
        }
    }

    #[test]
    fn surcharge_is_continuous_at_both_thresholds() {
        assert_eq!(solidarity_surcharge(SOLIDARITY_THRESHOLD), 0.0);
        assert!(solidarity_surcharge(SOLIDARITY_THRESHOLD + 0.01) < 0.01);

        let below = solidarity_surcharge(SOLIDARITY_FULL_RATE_THRESHOLD);
        let above = solidarity_surcharge(SOLIDARITY_FULL_RATE_THRESHOLD + 0.01);
        assert_approx_tol(above - below, 0.01 * SOLIDARITY_RATE, 1e-6);
    }

    #[test]
    fn surcharge_phase_in_caps_at_flat_rate() {
        assert_approx_tol(solidarity_surcharge(20_000.0), 0.119 * 1_870.0, 1e-9);
        assert_approx_tol(solidarity_surcharge(34_000.0), 0.055 * 34_000.0, 1e-9);
    }

    #[test]
    fn net_salary_crossing_first_zone_boundary_moves_little() {
        // Gross where taxable income lands just on either side of 17005.
        let gross_at_boundary =
            (FIRST_PROGRESSION_LIMIT + EMPLOYEE_LUMP_SUM_DEDUCTION) / (1.0 - 0.2105);
        let below = compute_net_salary(gross_at_boundary - 0.01);
        let above = compute_net_salary(gross_at_boundary + 0.01);
        assert!((above - below).abs() < gross_at_boundary * 0.01);
    }

    #[test]
    fn capital_gains_allowance_is_tax_free() {
        assert_eq!(net_investment_gains(800.0), 800.0);
        assert_eq!(net_investment_gains(1_000.0), 1_000.0);
        assert_approx_tol(net_investment_gains(3_600.0), 2_950.0, 1e-9);
        assert_eq!(net_investment_gains(-200.0), -200.0);
    }
}
