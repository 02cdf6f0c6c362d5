//! Export orchestration
//!
//! Owns the single-flight slot: at most one export runs at a time. The
//! orchestrator launches the selected runner on a background task, relays its
//! events, and guarantees removal of temporary artifacts on every exit path
//! before the terminal event is surfaced.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::engine::cancel::CancelHandle;
use crate::engine::progress::ExportEvent;
use crate::engine::runner::{BatchJobRunner, Runner, SingleJobRunner, Step};
use crate::error::{ExportError, ExportResult};
use crate::planner::{ExportJob, ExportPlan};

/// Observable orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Running,
}

/// How the most recent export ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Succeeded,
    Failed,
    Cancelled,
}

/// Single-flight driver for export runs
#[derive(Debug, Clone, Default)]
pub struct ExportOrchestrator {
    running: Arc<AtomicBool>,
    last_outcome: Arc<Mutex<Option<ExportOutcome>>>,
    active_cancel: Arc<Mutex<Option<CancelHandle>>>,
}

impl ExportOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state; `Running` exactly while an export holds the slot
    pub fn state(&self) -> ExportState {
        if self.running.load(Ordering::SeqCst) {
            ExportState::Running
        } else {
            ExportState::Idle
        }
    }

    /// Terminal outcome of the most recently finished export
    pub fn last_outcome(&self) -> Option<ExportOutcome> {
        *self.last_outcome.lock().expect("outcome lock")
    }

    /// Request cancellation of the active export; no-op when idle
    pub fn cancel(&self) {
        if let Some(handle) = self.active_cancel.lock().expect("cancel lock").as_ref() {
            handle.request();
        }
    }

    /// Start a planned multi-step export on the batch runner.
    ///
    /// `keep_temp` skips artifact removal (diagnostics); the single-flight
    /// slot and terminal-event contract are unaffected.
    pub fn start_export(
        &self,
        plan: &ExportPlan,
        config: &AppConfig,
        keep_temp: bool,
    ) -> ExportResult<UnboundedReceiver<ExportEvent>> {
        let steps: Vec<Step> = plan
            .jobs
            .iter()
            .map(|job| Step::new(job.render(&config.tools, &config.encode), job.weight))
            .collect();
        let (cleanup_files, work_dir) = if keep_temp {
            (Vec::new(), None)
        } else {
            (plan.cleanup_paths(), Some(plan.work_dir.clone()))
        };
        self.start_steps(steps, cleanup_files, work_dir, plan.destination.clone())
    }

    /// Start pre-rendered steps on the batch runner.
    ///
    /// `cleanup_files` and `work_dir` are removed (best effort) when the run
    /// ends, whatever the outcome; `destination` is removed on failure or
    /// cancellation.
    pub fn start_steps(
        &self,
        steps: Vec<Step>,
        cleanup_files: Vec<PathBuf>,
        work_dir: Option<PathBuf>,
        destination: PathBuf,
    ) -> ExportResult<UnboundedReceiver<ExportEvent>> {
        self.launch(
            Runner::Batch(BatchJobRunner::new(steps)),
            Cleanup {
                files: cleanup_files,
                work_dir,
            },
            destination,
        )
    }

    /// Start a single extraction job on the fine-grained runner
    pub fn start_single_job(
        &self,
        job: &ExportJob,
        config: &AppConfig,
    ) -> ExportResult<UnboundedReceiver<ExportEvent>> {
        let expected = job.window.map(|w| w.duration()).unwrap_or(0);
        let command = job.render(&config.tools, &config.encode);
        self.launch(
            Runner::Single(SingleJobRunner::new(command, expected)),
            Cleanup::keep(),
            job.output.clone(),
        )
    }

    fn launch(
        &self,
        runner: Runner,
        cleanup: Cleanup,
        destination: PathBuf,
    ) -> ExportResult<UnboundedReceiver<ExportEvent>> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ExportError::AlreadyRunning);
        }

        let cancel = runner.cancel_handle();
        *self.active_cancel.lock().expect("cancel lock") = Some(cancel.clone());

        // Only a file this export created may be removed as a partial output;
        // a pre-existing destination is the user's data until a job overwrites
        // it successfully
        let destination_preexisting = destination.exists();

        let (outer_tx, outer_rx) = mpsc::unbounded_channel();
        let (inner_tx, mut inner_rx) = mpsc::unbounded_channel();

        let running = Arc::clone(&self.running);
        let last_outcome = Arc::clone(&self.last_outcome);
        let active_cancel = Arc::clone(&self.active_cancel);

        tokio::spawn(async move {
            let runner_task = tokio::spawn(runner.run(inner_tx));

            while let Some(event) = inner_rx.recv().await {
                match event {
                    ExportEvent::Finished { success, message } => {
                        cleanup.run();
                        if !success && !destination_preexisting {
                            remove_partial_destination(&destination);
                        }

                        let outcome = if success {
                            ExportOutcome::Succeeded
                        } else if cancel.is_cancelled() {
                            ExportOutcome::Cancelled
                        } else {
                            ExportOutcome::Failed
                        };
                        info!("Export finished: {:?} ({})", outcome, message);

                        *last_outcome.lock().expect("outcome lock") = Some(outcome);
                        *active_cancel.lock().expect("cancel lock") = None;
                        running.store(false, Ordering::SeqCst);

                        // Terminal event goes out only after the slot is free
                        // and cleanup has run
                        let _ = outer_tx.send(ExportEvent::Finished { success, message });
                        break;
                    }
                    other => {
                        let _ = outer_tx.send(other);
                    }
                }
            }

            let _ = runner_task.await;
        });

        Ok(outer_rx)
    }
}

/// Temporary artifacts to remove when an export ends
#[derive(Debug)]
struct Cleanup {
    files: Vec<PathBuf>,
    work_dir: Option<PathBuf>,
}

impl Cleanup {
    /// Cleanup that removes nothing
    fn keep() -> Self {
        Self {
            files: Vec::new(),
            work_dir: None,
        }
    }

    /// Best-effort removal; failures are logged and never escalated so a
    /// cleanup problem cannot mask the export result
    fn run(&self) {
        for path in &self.files {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove {}: {}", path.display(), e),
            }
        }
        if let Some(dir) = &self.work_dir {
            match std::fs::remove_dir(dir) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove {}: {}", dir.display(), e),
            }
        }
    }
}

/// A failed or cancelled export must not leave a partial file at the
/// destination
fn remove_partial_destination(destination: &Path) {
    match std::fs::remove_file(destination) {
        Ok(()) => info!("Removed partial output {}", destination.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Could not remove partial output {}: {}",
            destination.display(),
            e
        ),
    }
}
