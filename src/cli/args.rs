//! Command line argument parsing.

use crate::config::DEFAULT_CONFIG_FILE;
use crate::error::CliError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Package and publish the distributions of a project
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_distribute",
    version,
    about = "Package and publish the distributions of a project",
    long_about = "Resolve the release configuration of a project and run every
distribution target through prepare, package and upload.

Usage:
  kodegen_bundler_distribute                     # release every target
  kodegen_bundler_distribute --dry-run release   # stage and package only
  kodegen_bundler_distribute config --full       # show the effective configuration"
)]
pub struct Args {
    /// Project directory holding the release configuration
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Release configuration file, relative to the project directory
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the project version
    #[arg(long, global = true, value_name = "VERSION")]
    pub project_version: Option<String>,

    /// Stage and package without running any external publishing step
    #[arg(long, global = true, env = "RELEASE_DRY_RUN")]
    pub dry_run: bool,

    /// Root of the staging directories
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run every distribution target (default)
    Release {
        /// Only run targets of this distribution or deployer
        #[arg(long, value_name = "NAME")]
        distribution: Option<String>,

        /// Run targets one after the other
        #[arg(long)]
        sequential: bool,

        /// Stop after packaging
        #[arg(long)]
        package_only: bool,
    },

    /// Print the effective configuration as JSON
    Config {
        /// Include entries that are disabled or unset
        #[arg(long)]
        full: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Release {
            distribution: None,
            sequential: false,
            package_only: false,
        }
    }
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Release { .. } => "release",
            Command::Config { .. } => "config",
        }
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Subcommand to run, `release` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }

    /// Configuration file resolved against the project directory.
    pub fn config_path(&self) -> PathBuf {
        if self.config.is_absolute() {
            self.config.clone()
        } else {
            self.project_dir.join(&self.config)
        }
    }

    pub fn validate(&self) -> Result<(), CliError> {
        if let Some(version) = &self.project_version
            && version.trim().is_empty()
        {
            return Err(CliError::InvalidArguments {
                reason: "--project-version must not be empty".to_string(),
            });
        }
        if let Some(Command::Release {
            distribution: Some(name),
            ..
        }) = &self.command
            && name.trim().is_empty()
        {
            return Err(CliError::InvalidArguments {
                reason: "--distribution must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
