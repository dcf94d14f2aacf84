use axum::{
    Router,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Datelike;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    AccumulationInputs, InheritanceEvent, MarketAssumptions, ProjectionMode, ProjectionParameters,
    ProjectionSummary, RetirementInputs, ValidationError, YearlyRecord, project_outcome,
    summarize, validate,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    is_retirement_mode: Option<bool>,
    start_year: Option<i32>,

    current_age: Option<u32>,
    retirement_age: Option<u32>,
    life_expectancy: Option<u32>,
    initial_gross_salary: Option<f64>,
    salary_growth_rate: Option<f64>,
    monthly_expenses: Option<f64>,
    savings_rate: Option<f64>,
    initial_assets: Option<f64>,
    desired_monthly_retirement: Option<f64>,
    expected_pension: Option<f64>,

    retiree_current_age: Option<u32>,
    retiree_life_expectancy: Option<u32>,
    retiree_current_assets: Option<f64>,
    retiree_annual_income: Option<f64>,
    retiree_annual_expenses: Option<f64>,
    retiree_income_growth_rate: Option<f64>,

    investment_return_rate: Option<f64>,
    inflation_rate: Option<f64>,

    inheritance_enabled: Option<bool>,
    inheritance_amount: Option<f64>,
    inheritance_year: Option<i32>,
}

#[derive(Parser, Debug)]
#[command(
    name = "networth project",
    about = "Deterministic net-worth projection from today until life expectancy"
)]
pub struct Cli {
    #[arg(long, help = "Project someone who is already retired")]
    retirement_mode: bool,
    #[arg(long, help = "Calendar year of the first row; defaults to the current year")]
    start_year: Option<i32>,

    #[arg(long, default_value_t = 29)]
    current_age: u32,
    #[arg(long, default_value_t = 69)]
    retirement_age: u32,
    #[arg(long, default_value_t = 95)]
    life_expectancy: u32,
    #[arg(long, default_value_t = 40_000.0, help = "Annual gross salary")]
    initial_gross_salary: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual salary growth in percent"
    )]
    salary_growth_rate: f64,
    #[arg(long, default_value_t = 2_200.0)]
    monthly_expenses: f64,
    #[arg(
        long,
        default_value_t = 80.0,
        help = "Share of disposable income saved, in percent"
    )]
    savings_rate: f64,
    #[arg(long, default_value_t = 60_000.0)]
    initial_assets: f64,
    #[arg(
        long,
        default_value_t = 3_000.0,
        help = "Desired monthly spending in retirement; 0 falls back to the last net salary"
    )]
    desired_monthly_retirement: f64,
    #[arg(long, default_value_t = 1_200.0, help = "Expected monthly statutory pension")]
    expected_pension: f64,

    #[arg(long, default_value_t = 65)]
    retiree_current_age: u32,
    #[arg(long, default_value_t = 95)]
    retiree_life_expectancy: u32,
    #[arg(long, default_value_t = 500_000.0)]
    retiree_current_assets: f64,
    #[arg(long, default_value_t = 24_000.0, help = "Annual net income in retirement")]
    retiree_annual_income: f64,
    #[arg(long, default_value_t = 36_000.0)]
    retiree_annual_expenses: f64,
    #[arg(
        long,
        default_value_t = 1.5,
        help = "Annual growth of retirement income in percent"
    )]
    retiree_income_growth_rate: f64,

    #[arg(
        long,
        default_value_t = 6.0,
        help = "Expected annual investment return in percent"
    )]
    investment_return_rate: f64,
    #[arg(long, default_value_t = 2.0, help = "Expected annual inflation in percent")]
    inflation_rate: f64,

    #[arg(long)]
    inheritance_enabled: bool,
    #[arg(long, default_value_t = 150_000.0)]
    inheritance_amount: f64,
    #[arg(long, default_value_t = 2045)]
    inheritance_year: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    mode: ProjectionMode,
    retirement_start_year: i32,
    summary: ProjectionSummary,
    years: Vec<YearlyRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn build_parameters(cli: Cli) -> Result<ProjectionParameters, ValidationError> {
    let params = ProjectionParameters {
        retirement_mode: cli.retirement_mode,
        start_year: cli.start_year.unwrap_or_else(current_year),
        accumulation: AccumulationInputs {
            current_age: cli.current_age,
            retirement_age: cli.retirement_age,
            life_expectancy: cli.life_expectancy,
            initial_gross_salary: cli.initial_gross_salary,
            monthly_expenses: cli.monthly_expenses,
            initial_assets: cli.initial_assets,
            salary_growth_rate: cli.salary_growth_rate,
            savings_rate: cli.savings_rate,
            desired_monthly_retirement: cli.desired_monthly_retirement,
            expected_pension: cli.expected_pension,
        },
        retirement: RetirementInputs {
            current_age: cli.retiree_current_age,
            life_expectancy: cli.retiree_life_expectancy,
            current_assets: cli.retiree_current_assets,
            annual_income: cli.retiree_annual_income,
            annual_expenses: cli.retiree_annual_expenses,
            income_growth_rate: cli.retiree_income_growth_rate,
        },
        market: MarketAssumptions {
            investment_return_rate: cli.investment_return_rate,
            inflation_rate: cli.inflation_rate,
        },
        inheritance: InheritanceEvent {
            enabled: cli.inheritance_enabled,
            amount: cli.inheritance_amount,
            year: cli.inheritance_year,
        },
    };

    validate(&params)?;
    Ok(params)
}

pub fn build_project_response(params: &ProjectionParameters) -> ProjectResponse {
    let outcome = project_outcome(params);
    let summary = summarize(params, &outcome);
    ProjectResponse {
        mode: params.mode(),
        retirement_start_year: summary.retirement_start_year,
        summary,
        years: outcome.years,
    }
}

pub fn run_cli<I, T>(args: I) -> Result<String, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
    let params = build_parameters(cli).map_err(|e| e.to_string())?;
    let response = build_project_response(&params);
    serde_json::to_string_pretty(&response).map_err(|e| e.to_string())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/healthz", get(healthz_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "net-worth projection API listening");

    axum::serve(listener, app).await
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let params = match api_request_from_payload(payload) {
        Ok(params) => params,
        Err(e) => {
            tracing::warn!(error = %e, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    let response = build_project_response(&params);
    tracing::info!(
        mode = ?response.mode,
        years = response.years.len(),
        depletion_age = ?response.summary.depletion_age,
        "projection served"
    );
    json_response(StatusCode::OK, response)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
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
fn api_request_from_json(json: &str) -> Result<ProjectionParameters, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(
    payload: ProjectPayload,
) -> Result<ProjectionParameters, ValidationError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.is_retirement_mode {
        cli.retirement_mode = v;
    }
    if let Some(v) = payload.start_year {
        cli.start_year = Some(v);
    }

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.life_expectancy {
        cli.life_expectancy = v;
    }
    if let Some(v) = payload.initial_gross_salary {
        cli.initial_gross_salary = v;
    }
    if let Some(v) = payload.salary_growth_rate {
        cli.salary_growth_rate = v;
    }
    if let Some(v) = payload.monthly_expenses {
        cli.monthly_expenses = v;
    }
    if let Some(v) = payload.savings_rate {
        cli.savings_rate = v;
    }
    if let Some(v) = payload.initial_assets {
        cli.initial_assets = v;
    }
    if let Some(v) = payload.desired_monthly_retirement {
        cli.desired_monthly_retirement = v;
    }
    if let Some(v) = payload.expected_pension {
        cli.expected_pension = v;
    }

    if let Some(v) = payload.retiree_current_age {
        cli.retiree_current_age = v;
    }
    if let Some(v) = payload.retiree_life_expectancy {
        cli.retiree_life_expectancy = v;
    }
    if let Some(v) = payload.retiree_current_assets {
        cli.retiree_current_assets = v;
    }
    if let Some(v) = payload.retiree_annual_income {
        cli.retiree_annual_income = v;
    }
    if let Some(v) = payload.retiree_annual_expenses {
        cli.retiree_annual_expenses = v;
    }
    if let Some(v) = payload.retiree_income_growth_rate {
        cli.retiree_income_growth_rate = v;
    }

    if let Some(v) = payload.investment_return_rate {
        cli.investment_return_rate = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }

    if let Some(v) = payload.inheritance_enabled {
        cli.inheritance_enabled = v;
    }
    if let Some(v) = payload.inheritance_amount {
        cli.inheritance_amount = v;
    }
    if let Some(v) = payload.inheritance_year {
        cli.inheritance_year = v;
    }

    build_parameters(cli)
}

fn default_cli_for_api() -> Cli {
    let defaults = ProjectionParameters::default();
    Cli {
        retirement_mode: defaults.retirement_mode,
        start_year: None,
        current_age: defaults.accumulation.current_age,
        retirement_age: defaults.accumulation.retirement_age,
        life_expectancy: defaults.accumulation.life_expectancy,
        initial_gross_salary: defaults.accumulation.initial_gross_salary,
        salary_growth_rate: defaults.accumulation.salary_growth_rate,
        monthly_expenses: defaults.accumulation.monthly_expenses,
        savings_rate: defaults.accumulation.savings_rate,
        initial_assets: defaults.accumulation.initial_assets,
        desired_monthly_retirement: defaults.accumulation.desired_monthly_retirement,
        expected_pension: defaults.accumulation.expected_pension,
        retiree_current_age: defaults.retirement.current_age,
        retiree_life_expectancy: defaults.retirement.life_expectancy,
        retiree_current_assets: defaults.retirement.current_assets,
        retiree_annual_income: defaults.retirement.annual_income,
        retiree_annual_expenses: defaults.retirement.annual_expenses,
        retiree_income_growth_rate: defaults.retirement.income_growth_rate,
        investment_return_rate: defaults.market.investment_return_rate,
        inflation_rate: defaults.market.inflation_rate,
        inheritance_enabled: defaults.inheritance.enabled,
        inheritance_amount: defaults.inheritance.amount,
        inheritance_year: defaults.inheritance.year,
    }
}
