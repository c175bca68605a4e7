use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::dto::{
    AlertList, BudgetList, CountResponse, CreateBudgetReq, CreateGoalReq, CreateTransactionReq,
    CredentialsReq, GoalCompleteReq, GoalList, GoalProgressReq, InsightList, ReportQuery, SpentReq,
    SummaryResponse, TransactionList, UserQuery, UserResponse,
};
use super::error::ApiError;
use super::AppState;
use crate::error::FintrackError;
use crate::models::{Budget, BudgetAlert, Goal, NewUser, Transaction};
use crate::reports::Report;
use crate::service::{self, AlertFeed, FinanceData};

type ApiResult<T> = std::result::Result<T, ApiError>;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn query<T>(params: std::result::Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let new = NewUser::try_from(body(payload)?)?;
    info!(username = %new.username, "register");
    let user = service::register(&mut **state.store.lock(), new)?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsReq>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let creds = NewUser::try_from(body(payload)?)?;
    let user = service::login(&**state.store.lock(), &creds.username, &creds.password)?;
    Ok(Json(UserResponse { user }))
}

pub async fn current_user(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = query(params)?.user_id()?;
    let user = service::require_user(&**state.store.lock(), user_id)?;
    Ok(Json(UserResponse { user }))
}

// ---------------------------------------------------------------------------
// Transactions and budgets
// ---------------------------------------------------------------------------

pub async fn list_transactions(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<TransactionList>> {
    let user_id = query(params)?.user_id()?;
    let transactions = service::transactions(&**state.store.lock(), user_id)?;
    Ok(Json(TransactionList { transactions }))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
    payload: std::result::Result<Json<CreateTransactionReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let new = body(payload)?.into_new(query(params)?.user_id)?;
    let txn = service::add_transaction(&mut **state.store.lock(), new, today())?;
    Ok((StatusCode::CREATED, Json(txn)))
}

pub async fn list_budgets(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<BudgetList>> {
    let user_id = query(params)?.user_id()?;
    let budgets = service::budgets(&**state.store.lock(), user_id, today())?;
    Ok(Json(BudgetList { budgets }))
}

pub async fn create_budget(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
    payload: std::result::Result<Json<CreateBudgetReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let new = body(payload)?.into_new(query(params)?.user_id)?;
    let budget = service::add_budget(&mut **state.store.lock(), new, today())?;
    Ok((StatusCode::CREATED, Json(budget)))
}

pub async fn update_budget_spent(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: std::result::Result<Json<SpentReq>, JsonRejection>,
) -> ApiResult<Json<Budget>> {
    let spent = body(payload)?
        .spent
        .ok_or_else(|| FintrackError::validation("spent is required"))?;
    let budget = service::set_budget_spent(&mut **state.store.lock(), id, spent)?;
    Ok(Json(budget))
}

/// `If-None-Match` uses weak comparison, so a `W/` prefix is ignored.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|tag| {
        tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag
    })
}

/// Transactions and budgets in one cacheable payload.
///
/// Store failures degrade to empty lists. The `ETag` is a SHA-256 of the body;
/// a matching `If-None-Match` gets a bodiless 304.
pub async fn finance_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> Response {
    let user_id = match query(params).and_then(|q| q.user_id().map_err(ApiError::from)) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let data = {
        let store = state.store.lock();
        service::finance_data(&**store, user_id, today())
    }
    .unwrap_or_else(|e| {
        warn!(user_id, error = %e, "finance data unavailable, serving empty lists");
        FinanceData::default()
    });

    let bytes = match serde_json::to_vec(&data) {
        Ok(bytes) => bytes,
        Err(e) => return ApiError::from(FintrackError::from(e)).into_response(),
    };
    let etag = format!("\"{}\"", hex::encode(Sha256::digest(&bytes)));

    let matches = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| etag_matches(v, &etag));

    let etag_header = match HeaderValue::from_str(&etag) {
        Ok(v) => v,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    if matches {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag_header)]).into_response();
    }
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::ETAG, etag_header),
        ],
        bytes,
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

pub async fn list_goals(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<GoalList>> {
    let user_id = query(params)?.user_id()?;
    let goals = service::goals(&**state.store.lock(), user_id)?;
    Ok(Json(GoalList { goals }))
}

pub async fn create_goal(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
    payload: std::result::Result<Json<CreateGoalReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let new = body(payload)?.into_new(query(params)?.user_id)?;
    let goal = service::add_goal(&mut **state.store.lock(), new)?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal_progress(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
    payload: std::result::Result<Json<GoalProgressReq>, JsonRejection>,
) -> ApiResult<Json<Goal>> {
    let req = body(payload)?;
    let user_id = req
        .user_id
        .or(query(params)?.user_id)
        .ok_or_else(|| FintrackError::validation("userId is required"))?;
    let amount = req
        .current_amount
        .ok_or_else(|| FintrackError::validation("currentAmount is required"))?;
    let goal = service::update_goal_progress(&mut **state.store.lock(), user_id, id, amount)?;
    Ok(Json(goal))
}

pub async fn set_goal_completed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
    payload: std::result::Result<Json<GoalCompleteReq>, JsonRejection>,
) -> ApiResult<Json<Goal>> {
    let req = body(payload)?;
    let user_id = req
        .user_id
        .or(query(params)?.user_id)
        .ok_or_else(|| FintrackError::validation("userId is required"))?;
    let completed = req
        .is_completed
        .ok_or_else(|| FintrackError::validation("isCompleted is required"))?;
    let goal = service::set_goal_completed(&mut **state.store.lock(), user_id, id, completed)?;
    Ok(Json(goal))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let user_id = query(params)?.user_id()?;
    service::delete_goal(&mut **state.store.lock(), user_id, id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Summary, reports, insights
// ---------------------------------------------------------------------------

pub async fn summary(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<SummaryResponse>> {
    let user_id = query(params)?.user_id()?;
    let summary = service::summary(&**state.store.lock(), user_id, today())?;
    Ok(Json(summary.into()))
}

pub async fn report(
    State(state): State<AppState>,
    params: std::result::Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<Report>> {
    let q = query(params)?;
    let user_id = q.user_id()?;
    let frame = q.time_frame()?;
    let report = service::report(&**state.store.lock(), user_id, frame, today())?;
    Ok(Json(report))
}

pub async fn insights(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<InsightList>> {
    let user_id = query(params)?.user_id()?;
    let insights = service::insights(&**state.store.lock(), user_id, today())?;
    Ok(Json(InsightList { insights }))
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

pub async fn list_alerts(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<AlertFeed>> {
    let user_id = query(params)?.user_id()?;
    Ok(Json(service::alert_feed(&**state.store.lock(), user_id)?))
}

pub async fn check_alerts(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<AlertList>> {
    let user_id = query(params)?.user_id()?;
    let alerts = service::check_alerts(&mut **state.store.lock(), user_id, now())?;
    Ok(Json(AlertList { alerts }))
}

pub async fn mark_alert_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BudgetAlert>> {
    Ok(Json(service::mark_alert_read(&mut **state.store.lock(), id)?))
}

pub async fn mark_all_alerts_read(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<CountResponse>> {
    let user_id = query(params)?.user_id()?;
    let count = service::mark_all_alerts_read(&mut **state.store.lock(), user_id)?;
    Ok(Json(CountResponse { count }))
}

pub async fn clear_alerts(
    State(state): State<AppState>,
    params: std::result::Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<CountResponse>> {
    let user_id = query(params)?.user_id()?;
    let count = service::clear_alerts(&mut **state.store.lock(), user_id)?;
    Ok(Json(CountResponse { count }))
}
