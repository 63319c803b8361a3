//! Per-target packaging and upload.
//!
//! Every target goes through the same skeleton ([`Pipeline::run`]):
//!
//! 1. **prepare**: recreate `<output>/<name>/<kind>/{prepare,package}`,
//!    assemble the property bag and render the tool's templates
//! 2. **package**: tool specific, see [`ToolHandler::package`]
//! 3. **upload**: tool specific and gated, see [`ToolHandler::upload`]
//!
//! Tool kinds plug in through the [`HandlerRegistry`]. The
//! [`DistributionDriver`] runs the pipeline for every target and keeps one
//! target's failure from affecting the others.

mod context;
mod driver;
mod handler;
mod hooks;
mod maven;
mod outcome;
pub mod props;
mod runner;
mod snap;

pub use context::{RunContext, StagingDirs};
pub use driver::{DistributionDriver, RunReport};
pub use handler::{HandlerRegistry, PackageStep, StageEnv, ToolHandler, UploadStep};
pub use hooks::run_hooks;
pub use maven::MavenHandler;
pub use outcome::{
    Artifact, PipelineState, SkipReason, Stage, TargetFailure, TargetOutcome, TargetReport,
};
pub use runner::{Pipeline, PipelineServices};
pub use snap::{SnapHandler, create_package};
