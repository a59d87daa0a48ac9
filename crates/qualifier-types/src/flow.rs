//! Stage machine and run report for a flow execution.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::artifact::ArtifactChoice;

/// Stages of a run.
///
/// `Start -> Registered -> Selected -> Stored -> Submitted -> Done`, with
/// `Failed` reachable only from `Start` (registration) and `Selected`
/// (selection, artifact load, store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    Start,
    Registered,
    Selected,
    Stored,
    Submitted,
    Done,
    Failed,
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowStage::Start => "start",
            FlowStage::Registered => "registered",
            FlowStage::Selected => "selected",
            FlowStage::Stored => "stored",
            FlowStage::Submitted => "submitted",
            FlowStage::Done => "done",
            FlowStage::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Result of the best-effort submission step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// The endpoint answered 2xx; `response` is the raw body.
    Accepted { response: String },
    /// The call failed. Logged, not fatal.
    Failed { warning: String },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub choice: ArtifactChoice,
    pub artifact_source: PathBuf,
    pub output_path: PathBuf,
    pub target: String,
    /// Whether an `Authorization` header was attached.
    pub authorized: bool,
    pub submission: SubmissionOutcome,
}
