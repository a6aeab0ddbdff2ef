//! Payroll run lifecycle and parallel calculation.
//!
//! The orchestrator owns the run state machine. Calculation work is fanned
//! out across the rayon thread pool; results come back over a channel and
//! are collected on the calling thread, so only one writer ever touches the
//! run while it is processing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::calculation::calculate_payslip;
use crate::config::StatutoryConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{ItemError, PayPeriod, PayrollRun, PayslipLineItem, RosterEntry, RunStatus};
use crate::money::Money;

/// How often the collector re-checks the cancel flag and deadline while
/// waiting for worker results.
const COLLECT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A shared flag used to abandon an in-flight run.
///
/// Cloning the token yields a handle to the same flag. Workers check the
/// token before calculating and again before submitting a result, so a
/// cancelled run stops accumulating results promptly even while workers
/// are still draining.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to every holder of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Tuning options for run processing.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// How long [`RunOrchestrator::start`] waits for all workers to report
    /// before giving up on the run.
    pub fan_in_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fan_in_timeout: Duration::from_secs(30),
        }
    }
}

/// Drives payroll runs through their lifecycle.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::run::{CancelToken, RunOrchestrator};
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/reference")?;
/// let orchestrator = RunOrchestrator::new(loader.config().clone());
///
/// let period = payroll_engine::models::PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// };
/// let mut run = orchestrator.create(
///     period,
///     NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
///     vec![],
/// );
///
/// orchestrator.start(&mut run, &CancelToken::new())?;
/// orchestrator.finish(&mut run)?;
/// println!("paid {} employees, total {}", run.employee_count, run.total_amount);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub struct RunOrchestrator {
    statutory: Arc<StatutoryConfig>,
    options: RunOptions,
}

impl RunOrchestrator {
    /// Creates an orchestrator with default [`RunOptions`].
    pub fn new(statutory: StatutoryConfig) -> Self {
        Self::with_options(statutory, RunOptions::default())
    }

    /// Creates an orchestrator with explicit options.
    pub fn with_options(statutory: StatutoryConfig, options: RunOptions) -> Self {
        Self {
            statutory: Arc::new(statutory),
            options,
        }
    }

    /// Creates a draft run over the given roster.
    ///
    /// Each roster entry carries the structure to evaluate for its
    /// employee, captured at creation so later assignment changes do not
    /// affect the run.
    pub fn create(
        &self,
        period: PayPeriod,
        payment_date: NaiveDate,
        roster: Vec<RosterEntry>,
    ) -> PayrollRun {
        let run = PayrollRun::new(period, payment_date, roster);
        info!(
            run_id = %run.id,
            employees = run.roster.len(),
            "created draft payroll run"
        );
        run
    }

    /// Processes a draft run, fanning calculations out across the thread
    /// pool and collecting results as they arrive.
    ///
    /// A failed calculation is recorded as an [`ItemError`] against its
    /// roster entry; the run keeps going and the remaining employees are
    /// unaffected. The run only fails as a whole when the fan-in barrier
    /// times out or the cancel token fires.
    ///
    /// # Arguments
    ///
    /// * `run` - The run to process. Must be in [`RunStatus::Draft`].
    /// * `cancel` - Token observed by the workers and the collector.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` when every roster entry has been accounted for, or
    /// when the run was cancelled (the run is left in
    /// [`RunStatus::Cancelled`] with its partial results discarded).
    /// Returns `RunTimedOut` if workers do not all report within the
    /// configured fan-in timeout; the run is cancelled in that case too.
    pub fn start(&self, run: &mut PayrollRun, cancel: &CancelToken) -> EngineResult<()> {
        if run.status != RunStatus::Draft {
            return Err(EngineError::InvalidTransition {
                from: run.status,
                action: "start".to_string(),
            });
        }
        run.status = RunStatus::Processing;

        let expected = run.roster.len();
        info!(run_id = %run.id, employees = expected, "processing payroll run");

        let (sender, receiver) = mpsc::channel::<(String, EngineResult<PayslipLineItem>)>();
        for entry in &run.roster {
            let employee = entry.employee.clone();
            let structure = entry.structure.clone();
            let period = run.period;
            let statutory = Arc::clone(&self.statutory);
            let sender = sender.clone();
            let cancel = cancel.clone();
            rayon::spawn(move || {
                if cancel.is_cancelled() {
                    return;
                }
                let result = calculate_payslip(&employee, &structure, period, &statutory);
                if cancel.is_cancelled() {
                    return;
                }
                // The receiver is gone if the collector timed out; nothing
                // useful to do with the result then.
                let _ = sender.send((employee.id, result));
            });
        }
        drop(sender);

        let deadline = Instant::now() + self.options.fan_in_timeout;
        let mut received = 0usize;
        while received < expected {
            if cancel.is_cancelled() {
                return self.abandon(run, "cancelled during processing");
            }
            let now = Instant::now();
            if now >= deadline {
                warn!(
                    run_id = %run.id,
                    completed = received,
                    expected,
                    "payroll run timed out waiting for workers"
                );
                let run_id = run.id;
                self.abandon(run, "timed out during processing")?;
                return Err(EngineError::RunTimedOut {
                    run_id,
                    completed: received,
                    expected,
                });
            }
            let wait = (deadline - now).min(COLLECT_POLL_INTERVAL);
            match receiver.recv_timeout(wait) {
                Ok((_, Ok(item))) => {
                    received += 1;
                    run.items.push(item);
                }
                Ok((employee_id, Err(error))) => {
                    received += 1;
                    warn!(
                        run_id = %run.id,
                        employee_id = %employee_id,
                        error = %error,
                        "payslip calculation failed"
                    );
                    run.item_errors.push(ItemError {
                        employee_id,
                        code: error_code(&error).to_string(),
                        message: error.to_string(),
                    });
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        if cancel.is_cancelled() {
            return self.abandon(run, "cancelled during processing");
        }

        info!(
            run_id = %run.id,
            items = run.items.len(),
            errors = run.item_errors.len(),
            "payroll run processed"
        );
        Ok(())
    }

    /// Completes a processed run.
    ///
    /// Recomputes the run totals from the collected items: `total_amount`
    /// is the sum of net pay across items and `employee_count` is the
    /// number of items actually produced.
    ///
    /// # Returns
    ///
    /// Returns `InvalidTransition` if the run is not in
    /// [`RunStatus::Processing`], or `IncompleteRun` if any roster entry
    /// has neither an item nor a recorded error.
    pub fn finish(&self, run: &mut PayrollRun) -> EngineResult<()> {
        if run.status != RunStatus::Processing {
            return Err(EngineError::InvalidTransition {
                from: run.status,
                action: "finish".to_string(),
            });
        }
        let missing = run.unaccounted();
        if missing > 0 {
            return Err(EngineError::IncompleteRun {
                run_id: run.id,
                missing,
            });
        }

        run.total_amount = run
            .items
            .iter()
            .map(|item| item.totals.net_pay)
            .sum::<Money>()
            .round_2();
        run.employee_count = run.items.len();
        run.status = RunStatus::Completed;
        info!(
            run_id = %run.id,
            employees = run.employee_count,
            total = %run.total_amount,
            "payroll run completed"
        );
        Ok(())
    }

    /// Cancels a run that has not yet completed.
    ///
    /// Any results collected so far are discarded; a cancelled run never
    /// exposes partial items.
    ///
    /// # Returns
    ///
    /// Returns `InvalidTransition` if the run is already in a terminal
    /// state.
    pub fn cancel(&self, run: &mut PayrollRun) -> EngineResult<()> {
        if run.status.is_terminal() {
            return Err(EngineError::InvalidTransition {
                from: run.status,
                action: "cancel".to_string(),
            });
        }
        self.abandon(run, "cancelled")
    }

    /// Rebuilds a completed run from its original roster.
    ///
    /// The new run is created, processed, and completed from the same
    /// period, payment date, and captured structures, so its monetary
    /// results are identical to the original's. Item and run identifiers
    /// are fresh.
    ///
    /// # Returns
    ///
    /// Returns the regenerated run, or `InvalidTransition` if the source
    /// run is not [`RunStatus::Completed`].
    pub fn regenerate(&self, run: &PayrollRun) -> EngineResult<PayrollRun> {
        if run.status != RunStatus::Completed {
            return Err(EngineError::InvalidTransition {
                from: run.status,
                action: "regenerate".to_string(),
            });
        }
        info!(run_id = %run.id, "regenerating payroll run");
        let mut regenerated = self.create(run.period, run.payment_date, run.roster.clone());
        self.start(&mut regenerated, &CancelToken::new())?;
        self.finish(&mut regenerated)?;
        Ok(regenerated)
    }

    fn abandon(&self, run: &mut PayrollRun, reason: &str) -> EngineResult<()> {
        run.items.clear();
        run.item_errors.clear();
        run.status = RunStatus::Cancelled;
        info!(run_id = %run.id, reason, "payroll run cancelled");
        Ok(())
    }
}

/// Maps an engine error to the stable code recorded on an [`ItemError`].
fn error_code(error: &EngineError) -> &'static str {
    match error {
        EngineError::ConfigNotFound { .. } => "config_not_found",
        EngineError::ConfigParseError { .. } => "config_parse_error",
        EngineError::InvalidAmount { .. } => "invalid_amount",
        EngineError::InvalidComponent { .. } => "invalid_component",
        EngineError::InvalidStructure { .. } => "invalid_structure",
        EngineError::InvalidInput { .. } => "invalid_input",
        EngineError::InvalidTransition { .. } => "invalid_transition",
        EngineError::IncompleteRun { .. } => "incomplete_run",
        EngineError::StructureNotFound { .. } => "structure_not_found",
        EngineError::EmployeeNotAssigned { .. } => "employee_not_assigned",
        EngineError::StructureInUse { .. } => "structure_in_use",
        EngineError::RunTimedOut { .. } => "run_timed_out",
    }
}
