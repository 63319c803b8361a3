//! Error types for configuration resolution and distribution processing.
//!
//! Configuration errors abort the whole run. Processing errors are scoped
//! to a single distribution target and are turned into a `Failed` outcome
//! by the pipeline driver, never escaping it.

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
};
use thiserror::Error;

/// Result type alias for top-level operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Configuration loading or resolution errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Target processing errors that escaped a pipeline (hooks, summary)
    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),

    /// External process errors
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Configuration errors. Any of these aborts the run before a target is touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file missing
    #[error("Configuration file not found at {path}")]
    FileNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        /// Path of the file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid TOML or does not match the schema
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        /// Path of the file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A field carries a literal the model does not know
    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Offending value
        value: String,
        /// Reason for the error
        reason: String,
    },

    /// A required field was not provided by any layer
    #[error("Missing required setting: {field}")]
    MissingField {
        /// Field name
        field: String,
    },

    /// Project version is not a semantic version
    #[error("Invalid project version '{version}': {source}")]
    InvalidVersion {
        /// Version string
        version: String,
        /// Parsing error
        #[source]
        source: semver::Error,
    },

    /// Two entities of the same kind share a name within one layer
    #[error("Duplicate {kind} entry named '{name}'")]
    DuplicateName {
        /// Entity kind
        kind: String,
        /// Entity name
        name: String,
    },
}

/// Errors raised while processing one distribution target.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProcessingError {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context, created by [`ErrorExt::fs_context`].
    #[error("{context} {path}: {error}")]
    Fs {
        /// Operation being performed (e.g. "creating staging directory")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Staged files could not be copied into the package layout.
    #[error("Could not copy files from {from} to {to}: {reason}")]
    CopyFailed {
        /// Source directory
        from: PathBuf,
        /// Destination directory
        to: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Template rendering failed
    #[error("failed to render template {name}: {reason}")]
    Template {
        /// Template name (usually a relative path)
        name: String,
        /// Renderer message
        reason: String,
    },

    /// A resolved endpoint is not a valid URL
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        /// Rendered URL
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// Execution-environment failure of an external command
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Generic I/O error.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// Error walking a directory tree.
    #[error("{0}")]
    Walkdir(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripPrefix(#[from] path::StripPrefixError),

    /// Generic error with custom message.
    #[error("{0}")]
    Generic(String),
}

/// Failures to execute an external program at all.
///
/// A program that runs and exits non-zero is not an error; see
/// [`crate::process::CommandOutput::success`].
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Binary not found on `PATH`
    #[error("command '{program}' not found: {source}")]
    NotFound {
        /// Program name
        program: String,
        /// Lookup failure
        #[source]
        source: which::Error,
    },

    /// The process could not be spawned (permissions, bad working directory, ...)
    #[error("failed to run command {program}: {error}")]
    Spawn {
        /// Program name
        program: String,
        /// The underlying error
        error: io::Error,
    },

    /// The command line is empty
    #[error("empty command line")]
    EmptyCommand,
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Config(ConfigError::FileNotFound { path }) => vec![
                format!("Create a release configuration at {}", path.display()),
                "Point to another file with --config <path>".to_string(),
            ],
            ReleaseError::Config(ConfigError::InvalidVersion { .. }) => vec![
                "Use a semantic version such as 1.2.3 or 1.2.3-SNAPSHOT".to_string(),
                "Override the version with --project-version".to_string(),
            ],
            ReleaseError::Config(ConfigError::DuplicateName { kind, .. }) => vec![format!(
                "Give every {kind} entry a unique name"
            )],
            ReleaseError::Process(ProcessError::NotFound { program, .. }) => vec![format!(
                "Install '{program}' and make sure it is on PATH"
            )],
            ReleaseError::Cli(CliError::InvalidArguments { .. }) => vec![
                "Run with --help to see the accepted arguments".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Trait for adding context to processing errors.
///
/// Similar to `anyhow::Context` but produces [`ProcessingError::Context`].
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> std::result::Result<T, ProcessingError>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> std::result::Result<T, ProcessingError>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for std::result::Result<T, ProcessingError> {
    fn context<C>(self, context: C) -> std::result::Result<T, ProcessingError>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| ProcessingError::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> std::result::Result<T, ProcessingError>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| ProcessingError::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> std::result::Result<T, ProcessingError>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| ProcessingError::Generic(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> std::result::Result<T, ProcessingError>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| ProcessingError::Generic(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying manifest".
    fn fs_context(
        self,
        context: &'static str,
        path: impl Into<PathBuf>,
    ) -> std::result::Result<T, ProcessingError>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(
        self,
        context: &'static str,
        path: impl Into<PathBuf>,
    ) -> std::result::Result<T, ProcessingError> {
        self.map_err(|error| ProcessingError::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Early return with a [`ProcessingError::Generic`].
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::error::ProcessingError::Generic(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::error::ProcessingError::Generic($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::ProcessingError::Generic(format!($fmt, $($arg)*)))
    };
}
