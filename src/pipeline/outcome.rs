//! Terminal states reported per target.

use crate::config::TargetId;
use crate::platform::Platform;
use std::{fmt, path::PathBuf};

/// How far a pipeline got.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum PipelineState {
    Init,
    Prepared,
    Packaged,
    Uploaded,
    Skipped,
    Failed,
}

/// Step a failure is attributed to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Prepare,
    Package,
    Login,
    Build,
    Publish,
    Upload,
    /// Failures outside any stage (missing handler, crashed worker)
    Pipeline,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Prepare => "prepare",
            Stage::Package => "package",
            Stage::Login => "login",
            Stage::Build => "build",
            Stage::Publish => "publish",
            Stage::Upload => "upload",
            Stage::Pipeline => "pipeline",
        })
    }
}

/// Why a gate stopped a target without an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    Disabled,
    UnsupportedPlatform(Platform),
    DryRun,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Disabled => "disabled",
            SkipReason::UnsupportedPlatform(_) => "unsupported platform",
            SkipReason::DryRun => "dry run",
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetFailure {
    pub stage: Stage,
    pub reason: String,
}

impl TargetFailure {
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.reason)
    }
}

/// A file a target produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub size: u64,
    /// Hex SHA-256
    pub checksum: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TargetOutcome {
    Packaged(Option<Artifact>),
    Uploaded(Option<Artifact>),
    Skipped(SkipReason),
    Failed(TargetFailure),
}

impl TargetOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, TargetOutcome::Failed(_))
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            TargetOutcome::Packaged(a) | TargetOutcome::Uploaded(a) => a.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for TargetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetOutcome::Packaged(_) => f.write_str("packaged"),
            TargetOutcome::Uploaded(_) => f.write_str("uploaded"),
            TargetOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            TargetOutcome::Failed(failure) => write!(f, "{failure}"),
        }
    }
}

/// Result of one target's pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetReport {
    pub target: TargetId,
    pub outcome: TargetOutcome,
    /// Last state reached before the outcome
    pub reached: PipelineState,
}

impl TargetReport {
    pub fn new(target: TargetId, reached: PipelineState, outcome: TargetOutcome) -> Self {
        Self {
            target,
            outcome,
            reached,
        }
    }

    /// Terminal state matching the outcome.
    pub fn state(&self) -> PipelineState {
        match self.outcome {
            TargetOutcome::Packaged(_) => PipelineState::Packaged,
            TargetOutcome::Uploaded(_) => PipelineState::Uploaded,
            TargetOutcome::Skipped(_) => PipelineState::Skipped,
            TargetOutcome::Failed(_) => PipelineState::Failed,
        }
    }
}
