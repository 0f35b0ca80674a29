use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    PlannerError,
    currency::Rates,
    models::{City, CurrencyCode, Recommendation, currency::SUPPORTED_CURRENCIES},
    planner::{TripPlan, TripPlanner, TripRequest, parse_budget, parse_departure_date},
    recommendation::{RecommendationPreferences, default_departure_date},
    trip_detail::TripDetail,
};

pub type AppState = Arc<TripPlanner>;

type ApiResult<T> = Result<Json<T>, PlannerError>;

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
            PlannerError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlannerError::NoAffordableTransport { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PlannerError::Api { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

impl From<QueryRejection> for PlannerError {
    fn from(rejection: QueryRejection) -> Self {
        PlannerError::validation(rejection.body_text())
    }
}

#[derive(Deserialize)]
pub struct CitiesParams {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct TransportParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
    pub budget: Option<String>,
    pub currency: Option<String>,
}

#[derive(Deserialize)]
pub struct RecommendationParams {
    pub from: Option<String>,
    pub budget: Option<String>,
    #[serde(default)]
    pub return_trip: bool,
    /// Comma separated region names
    pub regions: Option<String>,
    /// Comma separated city ids
    pub excluded: Option<String>,
}

#[derive(Deserialize)]
pub struct SurpriseParams {
    pub from: Option<String>,
    pub budget: Option<String>,
    pub currency: Option<String>,
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct RatesParams {
    pub base: Option<String>,
    /// Amount in `base` to convert, requires `to`
    pub amount: Option<f64>,
    pub to: Option<String>,
}

#[derive(Deserialize)]
pub struct TripDetailParams {
    pub budget: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cities: usize,
}

#[derive(Serialize)]
pub struct RatesResponse {
    pub base: CurrencyCode,
    pub rates: Rates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<Conversion>,
}

#[derive(Serialize)]
pub struct Conversion {
    pub amount: f64,
    pub to: CurrencyCode,
    pub converted: f64,
    /// Converted amount with the target currency symbol, e.g. `€92.00`
    pub display: String,
}

#[derive(Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cities", get(search_cities))
        .route("/transport", get(search_transport))
        .route("/recommendations", get(recommendations))
        .route("/surprise", get(surprise_trip))
        .route("/rates", get(exchange_rates))
        .route("/currencies", get(currencies))
        .route("/trips/{city_id}", get(trip_detail))
        .with_state(state)
}

fn currency_or_default(planner: &TripPlanner, code: Option<&str>) -> crate::Result<CurrencyCode> {
    match code {
        Some(code) if !code.trim().is_empty() => code.parse(),
        _ => planner.default_currency(),
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

async fn health(State(planner): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
        cities: planner.catalog().len(),
    })
}

async fn search_cities(
    State(planner): State<AppState>,
    params: Result<Query<CitiesParams>, QueryRejection>,
) -> ApiResult<Vec<City>> {
    let Query(params) = params?;
    Ok(Json(planner.search_cities(params.q.as_deref().unwrap_or_default())))
}

async fn search_transport(
    State(planner): State<AppState>,
    params: Result<Query<TransportParams>, QueryRejection>,
) -> ApiResult<TripPlan> {
    let Query(params) = params?;
    let budget = parse_budget(params.budget.as_deref())?;
    let departure_date = match params.date.as_deref() {
        Some(date) if !date.trim().is_empty() => Some(parse_departure_date(date)?),
        _ => None,
    };
    let request = TripRequest {
        from: params.from,
        to: params.to,
        budget,
        currency: currency_or_default(&planner, params.currency.as_deref())?,
        departure_date,
        return_trip: false,
        surprise: false,
    };
    Ok(Json(planner.plan_trip(&request).await?))
}

async fn recommendations(
    State(planner): State<AppState>,
    params: Result<Query<RecommendationParams>, QueryRejection>,
) -> ApiResult<Vec<Recommendation>> {
    let Query(params) = params?;
    let budget = parse_budget(params.budget.as_deref())?;
    let (Some(from), Some(budget)) = (params.from.as_deref(), budget) else {
        return Err(PlannerError::validation(
            "Please select a departure city and enter your budget",
        ));
    };
    let from = planner.catalog().require(from)?.clone();
    let preferences = RecommendationPreferences {
        preferred_regions: split_list(params.regions.as_deref()),
        excluded_cities: split_list(params.excluded.as_deref()),
        ..Default::default()
    };

    let recommendations = planner
        .recommend(&from, budget, params.return_trip, preferences)
        .await?;
    Ok(Json(recommendations))
}

async fn surprise_trip(
    State(planner): State<AppState>,
    params: Result<Query<SurpriseParams>, QueryRejection>,
) -> ApiResult<TripPlan> {
    let Query(params) = params?;
    let budget = parse_budget(params.budget.as_deref())?;
    let departure_date = match params.date.as_deref() {
        Some(date) if !date.trim().is_empty() => parse_departure_date(date)?,
        _ => default_departure_date(),
    };
    let request = TripRequest {
        from: params.from,
        to: None,
        budget,
        currency: currency_or_default(&planner, params.currency.as_deref())?,
        departure_date: Some(departure_date),
        return_trip: false,
        surprise: true,
    };
    Ok(Json(planner.plan_trip(&request).await?))
}

async fn exchange_rates(
    State(planner): State<AppState>,
    params: Result<Query<RatesParams>, QueryRejection>,
) -> ApiResult<RatesResponse> {
    let Query(params) = params?;
    let base = currency_or_default(&planner, params.base.as_deref())?;
    let rates = planner.exchange_rates(&base).await?;

    let conversion = match (params.amount, params.to.as_deref()) {
        (Some(amount), Some(to)) => {
            let to: CurrencyCode = to.parse()?;
            let converted = planner.convert(amount, &base, &to).await?;
            Some(Conversion {
                amount,
                display: format!("{}{:.2}", to.symbol(), converted),
                to,
                converted,
            })
        }
        (None, None) => None,
        _ => {
            return Err(PlannerError::validation(
                "Conversion needs both an amount and a target currency",
            ));
        }
    };

    Ok(Json(RatesResponse {
        base,
        rates,
        conversion,
    }))
}

async fn currencies() -> Json<Vec<CurrencyInfo>> {
    Json(
        SUPPORTED_CURRENCIES
            .iter()
            .map(|&(code, symbol, name)| CurrencyInfo { code, symbol, name })
            .collect(),
    )
}

async fn trip_detail(
    State(planner): State<AppState>,
    Path(city_id): Path<String>,
    params: Result<Query<TripDetailParams>, QueryRejection>,
) -> ApiResult<TripDetail> {
    let Query(params) = params?;
    let budget = parse_budget(params.budget.as_deref())?;
    Ok(Json(planner.trip_detail(&city_id, budget)?))
}
