//! Payroll run orchestration.
//!
//! This module drives the lifecycle of a [`crate::models::PayrollRun`]:
//! creating a draft from a roster, fanning calculations out across a
//! worker pool, collecting results under a single writer, and completing
//! or cancelling the run.

mod orchestrator;

pub use orchestrator::{CancelToken, RunOptions, RunOrchestrator};
