mod engine;
mod summary;
mod tax;
mod types;
mod validation;

pub use engine::{project, project_accumulation, project_outcome, project_retirement};
pub use summary::{PhaseSplit, SAFE_WITHDRAWAL_RATE, split_phases, summarize};
pub use tax::{NetSalaryBreakdown, compute_net_salary, net_investment_gains, net_salary_breakdown};
pub use types::{
    AccumulationInputs, InheritanceEvent, MarketAssumptions, ProjectionMode, ProjectionOutcome,
    ProjectionParameters, ProjectionResult, ProjectionSummary, RetirementGoal, RetirementInputs,
    YearlyRecord,
};
pub use validation::{MAX_AGE, MAX_START_YEAR, MIN_START_YEAR, ValidationError, validate};
