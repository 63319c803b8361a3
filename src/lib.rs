//! # Kodegen Distribute
//!
//! Release automation for multi-target distributions.
//!
//! A project declares its packagers (snap), deployers (Nexus 2,
//! Artifactory, GitHub, GitLab, Maven Central) and distributions in
//! `release.toml`. The configuration is resolved from layers into one
//! immutable [`EffectiveConfig`], and every distribution target is then
//! run through a prepare, package and upload pipeline. A failing target
//! never stops the others.
//!
//! ## Usage
//!
//! ```bash
//! kodegen_bundler_distribute                        # release every target
//! kodegen_bundler_distribute --dry-run              # package, publish nothing
//! kodegen_bundler_distribute release --package-only # stop after packaging
//! kodegen_bundler_distribute config --full          # masked effective configuration
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod platform;
pub mod process;
pub mod publisher;
pub mod templates;
pub mod utils;

pub use cli::Args;
pub use config::{EffectiveConfig, EffectiveConfigBuilder, Target, TargetId};
pub use error::{ConfigError, ProcessError, ProcessingError, ReleaseError, Result};
pub use pipeline::{DistributionDriver, PipelineServices, RunContext, RunReport, TargetOutcome};
pub use platform::Platform;
pub use process::{CommandGateway, CommandOutput, CommandSpec, SystemGateway};
pub use publisher::{CommandPublisher, ReleasePublisher};
