//! Attendance Engine
//!
//! This crate tracks employee daily attendance via punch events (work and
//! break start/stop), enforces the punch state machine, and derives per-day
//! and per-month aggregate reports (durations, presence status matrices).

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod punch;
pub mod report;
pub mod service;
pub mod store;
