//! External job execution
//!
//! Two runner flavors share one contract: start, cancel, and an event stream
//! ending in exactly one `Finished`. `SingleJobRunner` tracks fine-grained
//! progress by scanning the tool's `time=` stamps; `BatchJobRunner` drains an
//! ordered step list and only advances progress in whole-step increments.

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::engine::cancel::CancelHandle;
use crate::engine::progress::{ExportEvent, TimePattern, WeightedProgress};
use crate::error::ExportError;

/// One rendered command line (program first) with its progress weight
#[derive(Debug, Clone)]
pub struct Step {
    pub command: Vec<String>,
    pub weight: f64,
}

impl Step {
    pub fn new(command: Vec<String>, weight: f64) -> Self {
        Self { command, weight }
    }
}

/// Spawn a step's process with stderr piped; ffmpeg reports on stderr
fn spawn_process(command: &[String]) -> Result<Child, ExportError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ExportError::ToolNotFound {
            tool: "<empty command>".to_string(),
        })?;
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ExportError::ToolNotFound {
                    tool: program.clone(),
                }
            } else {
                ExportError::IoError(e)
            }
        })
}

fn stderr_lines(child: &mut Child) -> Option<Lines<BufReader<ChildStderr>>> {
    child.stderr.take().map(|s| BufReader::new(s).lines())
}

/// Exit code for display; signal-terminated processes report -1
fn exit_code(status: &std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Runs one external command, parsing `time=` stamps into progress events
#[derive(Debug)]
pub struct SingleJobRunner {
    command: Vec<String>,
    expected_duration: u64,
    pattern: TimePattern,
    cancel: CancelHandle,
}

impl SingleJobRunner {
    /// Create a runner for `command`; `expected_duration` is the output
    /// length in seconds that maps to 100%
    pub fn new(command: Vec<String>, expected_duration: u64) -> Self {
        Self {
            command,
            expected_duration,
            pattern: TimePattern::new(),
            cancel: CancelHandle::new(),
        }
    }

    /// Handle for requesting cancellation from another context
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run to completion; emits `Message` per output line, `Progress` per
    /// recognized timestamp, and exactly one `Finished`
    pub async fn run(self, events: UnboundedSender<ExportEvent>) {
        if self.cancel.is_cancelled() {
            finish(&events, false, ExportError::Cancelled.to_string());
            return;
        }

        let _ = events.send(ExportEvent::Message(format!(
            "Running: {}",
            self.command.join(" ")
        )));

        let mut child = match spawn_process(&self.command) {
            Ok(child) => child,
            Err(e) => {
                finish(&events, false, e.to_string());
                return;
            }
        };

        let mut lines = stderr_lines(&mut child);
        if let Some(lines) = lines.as_mut() {
            loop {
                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        let _ = child.kill().await;
                        finish(&events, false, ExportError::Cancelled.to_string());
                        return;
                    }
                    line = lines.next_line() => {
                        match line {
                            Ok(Some(line)) => {
                                let line = line.trim().to_string();
                                let ratio =
                                    self.pattern.parse_ratio(&line, self.expected_duration);
                                let _ = events.send(ExportEvent::Message(line));
                                if let Some(ratio) = ratio {
                                    let _ = events.send(ExportEvent::Progress(ratio));
                                }
                            }
                            _ => break,
                        }
                    }
                }
            }
        }

        let status = child.wait().await;
        if self.cancel.is_cancelled() {
            // Cancellation wins even when the process managed to exit cleanly
            finish(&events, false, ExportError::Cancelled.to_string());
            return;
        }
        match status {
            Ok(status) if status.success() => {
                let _ = events.send(ExportEvent::Progress(1.0));
                finish(&events, true, "Export complete".to_string());
            }
            Ok(status) => {
                let code = exit_code(&status);
                finish(
                    &events,
                    false,
                    ExportError::JobFailed { step: 1, code }.to_string(),
                );
            }
            Err(e) => finish(&events, false, format!("Failed to wait for tool: {}", e)),
        }
    }
}

/// Runs an ordered list of weighted steps, aborting on the first failure
#[derive(Debug)]
pub struct BatchJobRunner {
    steps: Vec<Step>,
    cancel: CancelHandle,
}

impl BatchJobRunner {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            cancel: CancelHandle::new(),
        }
    }

    /// Handle for requesting cancellation from another context
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run every step in order.
    ///
    /// Output is drained only for liveness; progress advances by
    /// `weight / total_weight` per completed step. A nonzero exit abandons
    /// the remaining steps and reports the failing step and code.
    pub async fn run(self, events: UnboundedSender<ExportEvent>) {
        let mut progress = WeightedProgress::new(self.steps.iter().map(|s| s.weight).sum());

        for (index, step) in self.steps.iter().enumerate() {
            let step_number = index + 1;
            if self.cancel.is_cancelled() {
                finish(&events, false, ExportError::Cancelled.to_string());
                return;
            }

            info!("Step {}: {}", step_number, step.command.join(" "));
            let _ = events.send(ExportEvent::Message(format!(
                "Running: {}",
                step.command.join(" ")
            )));

            let mut child = match spawn_process(&step.command) {
                Ok(child) => child,
                Err(e) => {
                    finish(&events, false, e.to_string());
                    return;
                }
            };

            let mut lines = stderr_lines(&mut child);
            if let Some(lines) = lines.as_mut() {
                loop {
                    tokio::select! {
                        _ = self.cancel.cancelled() => {
                            let _ = child.kill().await;
                            finish(&events, false, ExportError::Cancelled.to_string());
                            return;
                        }
                        line = lines.next_line() => {
                            if !matches!(line, Ok(Some(_))) {
                                break;
                            }
                        }
                    }
                }
            }

            let status = child.wait().await;
            if self.cancel.is_cancelled() {
                finish(&events, false, ExportError::Cancelled.to_string());
                return;
            }
            match status {
                Ok(status) if status.success() => {
                    let _ = events.send(ExportEvent::Progress(progress.advance(step.weight)));
                }
                Ok(status) => {
                    let code = exit_code(&status);
                    finish(
                        &events,
                        false,
                        ExportError::JobFailed {
                            step: step_number,
                            code,
                        }
                        .to_string(),
                    );
                    return;
                }
                Err(e) => {
                    finish(&events, false, format!("Failed to wait for tool: {}", e));
                    return;
                }
            }
        }

        finish(&events, true, "Export complete".to_string());
    }
}

/// Runner selection for one export, chosen when the plan is launched
#[derive(Debug)]
pub enum Runner {
    /// One command with fine-grained time-based progress
    Single(SingleJobRunner),
    /// Many weighted commands with whole-step progress
    Batch(BatchJobRunner),
}

impl Runner {
    pub fn cancel_handle(&self) -> CancelHandle {
        match self {
            Runner::Single(runner) => runner.cancel_handle(),
            Runner::Batch(runner) => runner.cancel_handle(),
        }
    }

    pub async fn run(self, events: UnboundedSender<ExportEvent>) {
        match self {
            Runner::Single(runner) => runner.run(events).await,
            Runner::Batch(runner) => runner.run(events).await,
        }
    }
}

fn finish(events: &UnboundedSender<ExportEvent>, success: bool, message: String) {
    let _ = events.send(ExportEvent::Finished { success, message });
}
