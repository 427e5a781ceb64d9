//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{CashFlowQuery, DispatchQuery, ErrorResponse, SummaryResponse};
use crate::calc::CalcResults;
use crate::finance::CashFlowYear;
use crate::sim::types::{Season, SeasonalProfile};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

async fn stored(state: &AppState) -> Result<Arc<CalcResults>, ApiError> {
    state
        .runner
        .latest()
        .await
        .ok_or_else(|| error(StatusCode::SERVICE_UNAVAILABLE, "no calculation result yet"))
}

/// Returns the headline sizing, energy and financial numbers.
///
/// `GET /results` → 200 + `SummaryResponse` JSON
/// `GET /results` before the first run → 503 + `ErrorResponse`
pub async fn get_results(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let results = stored(&state).await?;
    Ok(Json(SummaryResponse::new(&results, state.runner.is_busy())))
}

/// Returns seasonal dispatch days, optionally a single season.
///
/// `GET /dispatch` → 200 + four `SeasonalProfile`s
/// `GET /dispatch?season=winter` → 200 + one `SeasonalProfile`
/// `GET /dispatch?season=monsoon` → 400 + `ErrorResponse`
pub async fn get_dispatch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DispatchQuery>,
) -> Result<Json<Vec<SeasonalProfile>>, ApiError> {
    let filter = query
        .season
        .as_deref()
        .map(str::parse::<Season>)
        .transpose()
        .map_err(|e| error(StatusCode::BAD_REQUEST, e))?;

    let results = stored(&state).await?;
    let profiles = results
        .seasons
        .iter()
        .filter(|p| filter.is_none_or(|s| p.season == s))
        .cloned()
        .collect();
    Ok(Json(profiles))
}

/// Returns cash-flow years, optionally filtered by year range.
///
/// `GET /cashflow` → 200 + every `CashFlowYear`
/// `GET /cashflow?from=N&to=M` → filtered range (inclusive)
/// `GET /cashflow?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_cashflow(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CashFlowQuery>,
) -> Result<Json<Vec<CashFlowYear>>, ApiError> {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(u32::MAX);
    if from > to {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        ));
    }

    let results = stored(&state).await?;
    let years = results
        .financials
        .cash_flows
        .iter()
        .filter(|y| (from..=to).contains(&y.year))
        .cloned()
        .collect();
    Ok(Json(years))
}
