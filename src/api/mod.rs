//! HTTP API module for the attendance engine.
//!
//! This module provides the REST API endpoints for recording punches
//! and reading attendance reports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CallerIdentity, EmployeeDaysQuery, MatrixQuery, PunchRequest, EMPLOYEE_ID_HEADER,
    EMPLOYEE_ROLE_HEADER,
};
pub use response::{ApiError, ApiErrorResponse, PunchResponse, PunchStatus};
pub use state::AppState;
