//! Request types for the attendance API.
//!
//! This module defines the JSON request and query structures for the
//! punch and reporting endpoints, plus the caller identity extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use serde::{Deserialize, Serialize};

use crate::models::Role;

use super::response::{ApiError, ApiErrorResponse};

/// Header carrying the authenticated caller's employee id.
pub const EMPLOYEE_ID_HEADER: &str = "x-employee-id";
/// Header carrying the authenticated caller's role.
pub const EMPLOYEE_ROLE_HEADER: &str = "x-employee-role";

/// Request body for the `POST /punch` endpoint.
///
/// The action is kept as a string here and parsed by the handler, so an
/// unknown spelling surfaces as the domain's invalid-action error rather
/// than a generic deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    /// The employee the punch applies to.
    pub employee_id: String,
    /// The punch action, canonical (`work_in`) or legacy (`workPunchIn`).
    pub action: String,
}

/// Query parameters for `GET /records/{employee_id}`.
///
/// The month filter only applies when both fields are present; a lone
/// `year` or `month` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeDaysQuery {
    /// Calendar year of the requested month.
    pub year: Option<i32>,
    /// Calendar month, 1 through 12.
    pub month: Option<u32>,
}

impl EmployeeDaysQuery {
    /// Returns the (year, month) pair when both parts were supplied.
    pub fn period(&self) -> Option<(i32, u32)> {
        self.year.zip(self.month)
    }
}

/// Query parameters for `GET /matrix`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatrixQuery {
    /// Calendar year of the requested month.
    pub year: Option<i32>,
    /// Calendar month, 1 through 12.
    pub month: Option<u32>,
    /// Optional filter narrowing the matrix to one employee.
    pub employee_id: Option<String>,
}

/// The authenticated caller, taken from the identity headers an upstream
/// gateway injects after verifying credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The caller's employee id.
    pub employee_id: String,
    /// The caller's role.
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let employee_id = parts
            .headers
            .get(EMPLOYEE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());
        let role_header = parts
            .headers
            .get(EMPLOYEE_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());

        let (Some(employee_id), Some(role_header)) = (employee_id, role_header) else {
            return Err(ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::unauthenticated(),
            });
        };

        let role: Role = role_header.parse().map_err(|raw: String| ApiErrorResponse {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::with_details(
                "UNAUTHENTICATED",
                "Caller role is not recognized",
                format!("unknown role '{}'", raw),
            ),
        })?;

        Ok(CallerIdentity {
            employee_id: employee_id.to_string(),
            role,
        })
    }
}

impl CallerIdentity {
    /// Returns true when the caller may read records owned by
    /// `employee_id`: admins see everyone, others only themselves.
    pub fn can_view(&self, employee_id: &str) -> bool {
        self.role == Role::Admin || self.employee_id == employee_id
    }
}
