//! Application state for the attendance API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::service::AttendanceService;
use crate::store::AttendanceStore;

/// Shared application state.
///
/// Contains the attendance service, which owns the store handle and the
/// per-day lock registry shared across all request handlers.
pub struct AppState<S> {
    /// The attendance service handling punches and reports.
    service: Arc<AttendanceService<S>>,
}

// Derived Clone would bound S: Clone; the service is shared behind an Arc.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: AttendanceStore> AppState<S> {
    /// Creates a new application state wrapping the given service.
    pub fn new(service: AttendanceService<S>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns a reference to the attendance service.
    pub fn service(&self) -> &AttendanceService<S> {
        &self.service
    }
}
