//! Run-wide settings and per-target staging directories.

use crate::config::TargetId;
use crate::platform::Platform;
use std::path::{Path, PathBuf};

/// Output directory used when none is given, relative to the project.
pub const DEFAULT_OUTPUT_DIR: &str = "out/release";

/// Immutable settings of one run, shared by every pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct RunContext {
    dry_run: bool,
    upload: bool,
    platform: Platform,
    project_dir: PathBuf,
    output_dir: PathBuf,
}

/// Working directories of one target.
#[derive(Clone, Debug, PartialEq)]
pub struct StagingDirs {
    pub prepare: PathBuf,
    pub package: PathBuf,
}

impl RunContext {
    /// Context for the current platform with uploads enabled.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Self {
            dry_run: false,
            upload: true,
            platform: Platform::current(),
            output_dir: project_dir.join(DEFAULT_OUTPUT_DIR),
            project_dir,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether pipelines continue past packaging.
    pub fn with_upload(mut self, upload: bool) -> Self {
        self.upload = upload;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Relative paths are taken from the project directory.
    pub fn with_output_dir(mut self, output_dir: impl AsRef<Path>) -> Self {
        self.output_dir = self.resolve(output_dir.as_ref());
        self
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn upload(&self) -> bool {
        self.upload
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn staging_dirs(&self, target: &TargetId) -> StagingDirs {
        let root = self
            .output_dir
            .join(&target.name)
            .join(target.kind.as_str());
        StagingDirs {
            prepare: root.join("prepare"),
            package: root.join("package"),
        }
    }

    /// Resolve a configured path against the project directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}
