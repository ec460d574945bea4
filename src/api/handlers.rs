//! HTTP request handlers for the attendance API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::Role;
use crate::punch::PunchAction;
use crate::store::AttendanceStore;

use super::request::{CallerIdentity, EmployeeDaysQuery, MatrixQuery, PunchRequest};
use super::response::{ApiError, ApiErrorResponse, PunchResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: AttendanceStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/punch", post(punch_handler::<S>))
        .route("/records", get(records_handler::<S>))
        .route("/records/:employee_id", get(employee_records_handler::<S>))
        .route("/matrix", get(matrix_handler::<S>))
        .route("/today", get(today_handler::<S>))
        .with_state(state)
}

/// Handler for POST /punch endpoint.
///
/// Accepts a punch request, runs it through the state machine, and
/// returns the acknowledgment with the resulting record. A lost
/// optimistic write is retried once before surfacing as a 409.
async fn punch_handler<S: AttendanceStore>(
    State(state): State<AppState<S>>,
    caller: CallerIdentity,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        caller = %caller.employee_id,
        "Processing punch request"
    );

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    // Check if it's a missing field error
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    // Resolve the action, accepting the legacy spellings
    let action = match request.action.parse::<PunchAction>() {
        Ok(action) => action,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                action = %request.action,
                "Unknown punch action"
            );
            let api_error: ApiErrorResponse = err.into();
            return (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response();
        }
    };

    let now = Utc::now();
    let start_time = Instant::now();
    let mut result = state.service().punch(&request.employee_id, action, now).await;
    if matches!(result, Err(EngineError::ConcurrencyConflict { .. })) {
        warn!(
            correlation_id = %correlation_id,
            employee_id = %request.employee_id,
            "Record version moved underneath the punch, retrying once"
        );
        result = state.service().punch(&request.employee_id, action, now).await;
    }

    match result {
        Ok(receipt) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                action = %action,
                outcome = ?receipt.outcome,
                duration_us = duration.as_micros(),
                "Punch processed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(PunchResponse::from(receipt)),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Punch rejected"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Handler for GET /records endpoint.
///
/// Returns daily summary rows: all records for admins, the caller's own
/// records for everyone else.
async fn records_handler<S: AttendanceStore>(
    State(state): State<AppState<S>>,
    caller: CallerIdentity,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let filter = match caller.role {
        Role::Admin => None,
        _ => Some(caller.employee_id.as_str()),
    };

    match state.service().daily_summaries(filter).await {
        Ok(summaries) => {
            info!(
                correlation_id = %correlation_id,
                caller = %caller.employee_id,
                count = summaries.len(),
                "Fetched attendance records"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(summaries),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Failed to fetch attendance records"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /records/{employee_id} endpoint.
///
/// Returns one employee's raw attendance records, admin or self only.
/// With both `year` and `month` query parameters the result is narrowed
/// to that calendar month.
async fn employee_records_handler<S: AttendanceStore>(
    State(state): State<AppState<S>>,
    caller: CallerIdentity,
    Path(employee_id): Path<String>,
    Query(query): Query<EmployeeDaysQuery>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    if !caller.can_view(&employee_id) {
        warn!(
            correlation_id = %correlation_id,
            caller = %caller.employee_id,
            employee_id = %employee_id,
            "Denied access to another employee's records"
        );
        return ApiErrorResponse {
            status: StatusCode::FORBIDDEN,
            error: ApiError::access_denied(),
        }
        .into_response();
    }

    match state.service().employee_days(&employee_id, query.period()).await {
        Ok(records) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                count = records.len(),
                "Fetched employee attendance records"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(records),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Failed to fetch employee attendance records"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /matrix endpoint.
///
/// Returns the per-employee day-by-day status matrix for one calendar
/// month, covering every roster member whether or not they have records.
async fn matrix_handler<S: AttendanceStore>(
    State(state): State<AppState<S>>,
    caller: CallerIdentity,
    query: Result<Query<MatrixQuery>, QueryRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection,
                "Malformed matrix query"
            );
            return ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error("Valid month (1-12) and year are required."),
            }
            .into_response();
        }
    };
    let (Some(year), Some(month)) = (query.year, query.month) else {
        return ApiErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::validation_error("Valid month (1-12) and year are required."),
        }
        .into_response();
    };

    match state
        .service()
        .monthly_matrix(year, month, query.employee_id.as_deref())
        .await
    {
        Ok(matrix) => {
            info!(
                correlation_id = %correlation_id,
                caller = %caller.employee_id,
                year,
                month,
                employees = matrix.len(),
                "Built monthly attendance matrix"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(matrix),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Failed to build monthly attendance matrix"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /today endpoint.
///
/// Returns the status line of everyone with a record dated today,
/// admin only.
async fn today_handler<S: AttendanceStore>(
    State(state): State<AppState<S>>,
    caller: CallerIdentity,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    if caller.role != Role::Admin {
        warn!(
            correlation_id = %correlation_id,
            caller = %caller.employee_id,
            "Denied access to the daily roster view"
        );
        return ApiErrorResponse {
            status: StatusCode::FORBIDDEN,
            error: ApiError::access_denied(),
        }
        .into_response();
    }

    let today = Utc::now().date_naive();
    match state.service().today_roster(today).await {
        Ok(lines) => {
            info!(
                correlation_id = %correlation_id,
                date = %today,
                count = lines.len(),
                "Fetched today's roster"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(lines),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Failed to fetch today's roster"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::{EMPLOYEE_ID_HEADER, EMPLOYEE_ROLE_HEADER};
    use crate::api::response::PunchStatus;
    use crate::config::EnginePolicy;
    use crate::models::{
        AttendanceDay, DailySummary, DayStatus, RosterEntry, TodayStatus,
    };
    use crate::service::AttendanceService;
    use crate::store::{MemoryStore, StoreError, StoreResult};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn test_roster() -> Vec<RosterEntry> {
        vec![
            RosterEntry::new("emp_001", "Asha Patel", Role::Employee),
            RosterEntry::new("emp_002", "Jordan Lee", Role::Supervisor),
            RosterEntry::new("adm_001", "Sam Ortiz", Role::Admin),
        ]
    }

    fn create_test_state() -> AppState<MemoryStore> {
        let store = Arc::new(MemoryStore::with_roster(test_roster()));
        AppState::new(AttendanceService::new(store, EnginePolicy::default()))
    }

    fn make_instant(date_str: &str, time_str: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }

    fn punch_request(employee_id: &str, action: &str) -> Request<Body> {
        let body = format!(
            r#"{{"employee_id": "{}", "action": "{}"}}"#,
            employee_id, action
        );
        Request::builder()
            .method("POST")
            .uri("/punch")
            .header("Content-Type", "application/json")
            .header(EMPLOYEE_ID_HEADER, employee_id)
            .header(EMPLOYEE_ROLE_HEADER, "employee")
            .body(Body::from(body))
            .unwrap()
    }

    fn authed_get(uri: &str, caller: &str, role: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(EMPLOYEE_ID_HEADER, caller)
            .header(EMPLOYEE_ROLE_HEADER, role)
            .body(Body::empty())
            .unwrap()
    }

    async fn read_body(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_api_001_valid_punch_returns_200() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(punch_request("emp_001", "work_in"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        // Verify Content-Type header
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = read_body(response).await;
        let result: PunchResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(result.status, PunchStatus::Ok);
        assert_eq!(result.message, "Punch action successful");
        assert_eq!(result.record.employee_id, "emp_001");
        assert_eq!(result.record.status, DayStatus::Present);
        assert_eq!(result.record.version, 1);
        assert!(result.record.work_sessions.has_open());
    }

    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/punch")
                    .header("Content-Type", "application/json")
                    .header(EMPLOYEE_ID_HEADER, "emp_001")
                    .header(EMPLOYEE_ROLE_HEADER, "employee")
                    .body(Body::from("{invalid json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body(response).await;
        let error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_api_003_missing_employee_id_returns_400() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/punch")
                    .header("Content-Type", "application/json")
                    .header(EMPLOYEE_ID_HEADER, "emp_001")
                    .header(EMPLOYEE_ROLE_HEADER, "employee")
                    .body(Body::from(r#"{"action": "work_in"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body(response).await;
        let error: ApiError = serde_json::from_slice(&body).unwrap();

        assert!(
            error.message.contains("missing field"),
            "Expected error message to mention missing field, got: {}",
            error.message
        );
    }

    #[tokio::test]
    async fn test_api_004_unknown_action_returns_400() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(punch_request("emp_001", "teleport"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body(response).await;
        let error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(error.code, "INVALID_ACTION");
        assert_eq!(error.message, "Invalid action type.");
    }

    #[tokio::test]
    async fn test_repeated_work_in_returns_acknowledgment() {
        let state = create_test_state();
        let router = create_router(state);

        let first = router
            .clone()
            .oneshot(punch_request("emp_001", "work_in"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = router
            .oneshot(punch_request("emp_001", "work_in"))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);

        let body = read_body(second).await;
        let result: PunchResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(result.status, PunchStatus::AlreadyInState);
        assert_eq!(result.message, "Already punched in.");
        // The no-op was never persisted, version is still the first write
        assert_eq!(result.record.version, 1);
        assert_eq!(result.record.work_sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_work_out_before_in_returns_400() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(punch_request("emp_001", "work_out"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body(response).await;
        let error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(error.code, "INVALID_TRANSITION");
        assert_eq!(error.message, "Cannot punch out without punching in.");
    }

    #[tokio::test]
    async fn test_legacy_action_spelling_accepted() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(punch_request("emp_001", "workPunchIn"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = read_body(response).await;
        let result: PunchResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.status, PunchStatus::Ok);
    }

    #[tokio::test]
    async fn test_missing_identity_headers_return_401() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/punch")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"employee_id": "emp_001", "action": "work_in"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = read_body(response).await;
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_the_caller() {
        let state = create_test_state();
        let t = make_instant("2024-03-05", "09:00:00");
        state
            .service()
            .punch("emp_001", PunchAction::WorkIn, t)
            .await
            .unwrap();
        state
            .service()
            .punch("emp_002", PunchAction::WorkIn, t)
            .await
            .unwrap();
        let router = create_router(state);

        let own = router
            .clone()
            .oneshot(authed_get("/records", "emp_001", "employee"))
            .await
            .unwrap();
        assert_eq!(own.status(), StatusCode::OK);
        let rows: Vec<DailySummary> = serde_json::from_slice(&read_body(own).await).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_id, "emp_001");
        assert_eq!(rows[0].status, DayStatus::Present);

        let all = router
            .oneshot(authed_get("/records", "adm_001", "admin"))
            .await
            .unwrap();
        assert_eq!(all.status(), StatusCode::OK);
        let rows: Vec<DailySummary> = serde_json::from_slice(&read_body(all).await).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_employee_records_deny_other_non_admin_callers() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(authed_get("/records/emp_001", "emp_002", "supervisor"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = read_body(response).await;
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "ACCESS_DENIED");
        assert_eq!(error.message, "Access denied.");
    }

    #[tokio::test]
    async fn test_employee_records_allow_self_and_admin() {
        let state = create_test_state();
        state
            .service()
            .punch(
                "emp_001",
                PunchAction::WorkIn,
                make_instant("2024-03-05", "09:00:00"),
            )
            .await
            .unwrap();
        state
            .service()
            .punch(
                "emp_001",
                PunchAction::WorkIn,
                make_instant("2024-04-01", "09:00:00"),
            )
            .await
            .unwrap();
        let router = create_router(state);

        let own = router
            .clone()
            .oneshot(authed_get("/records/emp_001", "emp_001", "employee"))
            .await
            .unwrap();
        assert_eq!(own.status(), StatusCode::OK);
        let records: Vec<AttendanceDay> = serde_json::from_slice(&read_body(own).await).unwrap();
        assert_eq!(records.len(), 2);

        let march = router
            .oneshot(authed_get(
                "/records/emp_001?year=2024&month=3",
                "adm_001",
                "admin",
            ))
            .await
            .unwrap();
        assert_eq!(march.status(), StatusCode::OK);
        let records: Vec<AttendanceDay> = serde_json::from_slice(&read_body(march).await).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[tokio::test]
    async fn test_matrix_requires_year_and_month() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(authed_get("/matrix", "emp_001", "employee"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body(response).await;
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(error.message, "Valid month (1-12) and year are required.");
    }

    #[tokio::test]
    async fn test_matrix_rejects_month_out_of_range() {
        let state = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(authed_get(
                "/matrix?year=2024&month=13",
                "emp_001",
                "employee",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body(response).await;
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_matrix_covers_every_roster_member() {
        let state = create_test_state();
        state
            .service()
            .punch(
                "emp_001",
                PunchAction::WorkIn,
                make_instant("2024-03-05", "09:00:00"),
            )
            .await
            .unwrap();
        let router = create_router(state);

        let response = router
            .oneshot(authed_get("/matrix?year=2024&month=3", "emp_002", "supervisor"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = read_body(response).await;
        let matrix: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let rows = matrix.as_array().unwrap();

        // Both roster members appear; the admin account does not
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["employee_id"], "emp_001");
        assert_eq!(rows[0]["days"]["2024-03-05"], "present");
        assert_eq!(rows[1]["employee_id"], "emp_002");
        assert_eq!(rows[1]["days"]["2024-03-05"], "absent");
        assert_eq!(rows[0]["days"].as_object().unwrap().len(), 31);
    }

    #[tokio::test]
    async fn test_today_is_admin_only() {
        let state = create_test_state();
        state
            .service()
            .punch("emp_001", PunchAction::WorkIn, Utc::now())
            .await
            .unwrap();
        let router = create_router(state);

        let denied = router
            .clone()
            .oneshot(authed_get("/today", "emp_001", "employee"))
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let allowed = router
            .oneshot(authed_get("/today", "adm_001", "admin"))
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);

        let lines: Vec<TodayStatus> = serde_json::from_slice(&read_body(allowed).await).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].employee_id, "emp_001");
        assert_eq!(lines[0].name, "Asha Patel");
        assert_eq!(lines[0].status, DayStatus::Present);
    }

    /// Store whose first save loses the optimistic version check, as a
    /// concurrent writer would cause.
    struct FlakySaveStore {
        inner: MemoryStore,
        tripped: AtomicBool,
    }

    impl AttendanceStore for FlakySaveStore {
        async fn find_day(
            &self,
            employee_id: &str,
            date: NaiveDate,
        ) -> StoreResult<Option<AttendanceDay>> {
            self.inner.find_day(employee_id, date).await
        }
        async fn save_day(&self, day: &AttendanceDay) -> StoreResult<AttendanceDay> {
            if !self.tripped.swap(true, Ordering::SeqCst) {
                return Err(StoreError::VersionConflict {
                    employee_id: day.employee_id.clone(),
                    date: day.date,
                });
            }
            self.inner.save_day(day).await
        }
        async fn find_range(
            &self,
            start: NaiveDate,
            end: NaiveDate,
            employee_id: Option<&str>,
        ) -> StoreResult<Vec<AttendanceDay>> {
            self.inner.find_range(start, end, employee_id).await
        }
        async fn find_all(&self, employee_id: Option<&str>) -> StoreResult<Vec<AttendanceDay>> {
            self.inner.find_all(employee_id).await
        }
        async fn list_employees(
            &self,
            roles: Option<&[Role]>,
        ) -> StoreResult<Vec<RosterEntry>> {
            self.inner.list_employees(roles).await
        }
    }

    #[tokio::test]
    async fn test_lost_version_race_is_retried_once() {
        let store = Arc::new(FlakySaveStore {
            inner: MemoryStore::with_roster(test_roster()),
            tripped: AtomicBool::new(false),
        });
        let state = AppState::new(AttendanceService::new(store, EnginePolicy::default()));
        let router = create_router(state);

        let response = router
            .oneshot(punch_request("emp_001", "work_in"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = read_body(response).await;
        let result: PunchResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.status, PunchStatus::Ok);
    }

    /// Store that loses every optimistic write.
    struct ConflictStore {
        inner: MemoryStore,
    }

    impl AttendanceStore for ConflictStore {
        async fn find_day(
            &self,
            employee_id: &str,
            date: NaiveDate,
        ) -> StoreResult<Option<AttendanceDay>> {
            self.inner.find_day(employee_id, date).await
        }
        async fn save_day(&self, day: &AttendanceDay) -> StoreResult<AttendanceDay> {
            Err(StoreError::VersionConflict {
                employee_id: day.employee_id.clone(),
                date: day.date,
            })
        }
        async fn find_range(
            &self,
            start: NaiveDate,
            end: NaiveDate,
            employee_id: Option<&str>,
        ) -> StoreResult<Vec<AttendanceDay>> {
            self.inner.find_range(start, end, employee_id).await
        }
        async fn find_all(&self, employee_id: Option<&str>) -> StoreResult<Vec<AttendanceDay>> {
            self.inner.find_all(employee_id).await
        }
        async fn list_employees(
            &self,
            roles: Option<&[Role]>,
        ) -> StoreResult<Vec<RosterEntry>> {
            self.inner.list_employees(roles).await
        }
    }

    #[tokio::test]
    async fn test_persistent_conflict_returns_409() {
        let store = Arc::new(ConflictStore {
            inner: MemoryStore::with_roster(test_roster()),
        });
        let state = AppState::new(AttendanceService::new(store, EnginePolicy::default()));
        let router = create_router(state);

        let response = router
            .oneshot(punch_request("emp_001", "work_in"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = read_body(response).await;
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "CONCURRENCY_CONFLICT");
    }
}
