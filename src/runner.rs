//! Single-flight asynchronous run coordination.
//!
//! A run is CPU-bound, so it is moved onto tokio's blocking pool. At most one
//! run is in flight; a second request while busy is turned away rather than
//! queued. The last successful result survives failed runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::calc::{CalcResults, run_calculation};
use crate::config::ScenarioConfig;
use crate::error::CalcError;

/// Why a requested run produced no result.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("a calculation is already running")]
    Busy,
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error("calculation task failed: {0}")]
    Task(String),
}

/// Clears the busy flag when a run ends, including on cancellation.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the busy flag and the last successful result.
#[derive(Debug, Default)]
pub struct RunCoordinator {
    busy: AtomicBool,
    latest: RwLock<Option<Arc<CalcResults>>>,
}

impl RunCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a coordinator already holding `results`.
    pub fn with_results(results: CalcResults) -> Self {
        Self {
            busy: AtomicBool::new(false),
            latest: RwLock::new(Some(Arc::new(results))),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Last successful result, if any.
    pub async fn latest(&self) -> Option<Arc<CalcResults>> {
        self.latest.read().await.clone()
    }

    /// Runs one calculation on the blocking pool.
    ///
    /// The scenario is moved into the task and stays unchanged for the run.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Busy`] if another run is in flight,
    /// [`RunError::Calc`] if the calculation fails, and [`RunError::Task`] if
    /// the blocking task panics or is cancelled. None of these touch the
    /// stored result.
    pub async fn run(&self, scenario: ScenarioConfig) -> Result<Arc<CalcResults>, RunError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("run rejected, coordinator busy");
            return Err(RunError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let outcome = tokio::task::spawn_blocking(move || run_calculation(&scenario))
            .await
            .map_err(|e| RunError::Task(e.to_string()))?;

        match outcome {
            Ok(results) => {
                let results = Arc::new(results);
                *self.latest.write().await = Some(Arc::clone(&results));
                Ok(results)
            }
            Err(e) => {
                warn!(error = %e, "calculation failed, keeping previous result");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_run_is_stored() {
        let coordinator = RunCoordinator::new();
        assert!(coordinator.latest().await.is_none());
        let results = coordinator
            .run(ScenarioConfig::flat_load())
            .await
            .expect("run should succeed");
        let stored = coordinator.latest().await.expect("result should be stored");
        assert!(Arc::ptr_eq(&results, &stored));
        assert!(!coordinator.is_busy());
    }

    #[tokio::test]
    async fn failed_run_keeps_previous_result() {
        let coordinator = RunCoordinator::new();
        let first = coordinator
            .run(ScenarioConfig::baseline())
            .await
            .expect("run should succeed");

        let mut bad = ScenarioConfig::baseline();
        bad.load.hourly_kw = Some(vec![0.0; 24]);
        let err = coordinator.run(bad).await.expect_err("zero load should fail");
        assert!(matches!(err, RunError::Calc(CalcError::InvalidInput(_))));

        let stored = coordinator.latest().await.expect("result should remain");
        assert!(Arc::ptr_eq(&first, &stored));
        assert!(!coordinator.is_busy());
    }

    #[tokio::test]
    async fn busy_coordinator_rejects_new_runs() {
        let coordinator = RunCoordinator::new();
        coordinator.busy.store(true, Ordering::Release);
        let err = coordinator
            .run(ScenarioConfig::baseline())
            .await
            .expect_err("busy coordinator should reject");
        assert!(matches!(err, RunError::Busy));
        // The rejected call must not clear another run's flag.
        assert!(coordinator.is_busy());
    }

    #[tokio::test]
    async fn concurrent_requests_run_at_most_once_at_a_time() {
        let coordinator = Arc::new(RunCoordinator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&coordinator);
                tokio::spawn(async move { c.run(ScenarioConfig::baseline()).await })
            })
            .collect();
        let mut ok = 0;
        for handle in handles {
            match handle.await.expect("task should join") {
                Ok(_) => ok += 1,
                Err(RunError::Busy) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert!(ok >= 1);
        assert!(coordinator.latest().await.is_some());
    }
}
