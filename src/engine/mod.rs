//! Export execution engine
//!
//! Runs the planned ffmpeg jobs on a background task, reporting progress and
//! messages over an event channel and honoring cancellation at every safe
//! point.

pub mod cancel;
pub mod orchestrator;
pub mod progress;
pub mod runner;

pub use cancel::CancelHandle;
pub use orchestrator::{ExportOrchestrator, ExportOutcome, ExportState};
pub use progress::{ExportEvent, WeightedProgress};
pub use runner::{BatchJobRunner, Runner, SingleJobRunner, Step};
