//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for calculating a single
//! payslip and for executing a payroll run over a roster.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PayrollRunRequest, PayslipRequest};
pub use response::ApiError;
pub use state::AppState;
