//! External process gateway.
//!
//! Stages never spawn programs themselves; they describe the invocation as
//! a [`CommandSpec`] (program plus discrete arguments, never a shell string)
//! and hand it to a [`CommandGateway`]. A non-zero exit is an ordinary
//! [`CommandOutput`] with `success() == false`. Only failing to start the
//! program at all is a [`ProcessError`].

use crate::error::ProcessError;
use std::{
    fmt,
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
};

/// Boxed future returned by object-safe async traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A program invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            envs: Vec::new(),
        }
    }

    /// Build from an argument vector whose first token is the program.
    pub fn from_argv(argv: &[String]) -> Result<Self, ProcessError> {
        let (program, args) = argv.split_first().ok_or(ProcessError::EmptyCommand)?;
        Ok(Self::new(program.clone()).args(args.iter().cloned()))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Path argument, lossily converted to UTF-8.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Program and arguments joined for log output.
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// Environment values may carry credentials.
impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env_keys: Vec<&str> = self.envs.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("CommandSpec")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("working_dir", &self.working_dir)
            .field("envs", &env_keys)
            .finish()
    }
}

/// Result of a program that ran to completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with no captured text.
    pub fn ok() -> Self {
        Self {
            status: Some(0),
            ..Default::default()
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Last non-empty stderr line, for failure summaries.
    pub fn error_line(&self) -> Option<&str> {
        self.stderr.lines().rev().find(|l| !l.trim().is_empty())
    }
}

/// Runs external programs.
pub trait CommandGateway: Send + Sync {
    fn run<'a>(
        &'a self,
        command: &'a CommandSpec,
    ) -> BoxFuture<'a, Result<CommandOutput, ProcessError>>;
}

/// Gateway that spawns real processes with `tokio::process`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemGateway;

impl SystemGateway {
    async fn execute(command: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let program = which::which(&command.program).map_err(|source| ProcessError::NotFound {
            program: command.program.clone(),
            source,
        })?;
        log::debug!("running {}", command.display_line());

        let mut cmd = tokio::process::Command::new(&program);
        cmd.args(&command.args)
            .envs(command.envs.iter().map(|(k, v)| (k, v)))
            .kill_on_drop(true);
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|error| ProcessError::Spawn {
            program: command.program.clone(),
            error,
        })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl CommandGateway for SystemGateway {
    fn run<'a>(
        &'a self,
        command: &'a CommandSpec,
    ) -> BoxFuture<'a, Result<CommandOutput, ProcessError>> {
        Box::pin(Self::execute(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_env_values() {
        let spec = CommandSpec::new("publish")
            .arg("--target")
            .env("RELEASE_PUBLISH_PASSWORD", "hunter2");
        let debug = format!("{spec:?}");
        assert!(debug.contains("RELEASE_PUBLISH_PASSWORD"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_from_argv() {
        let argv = vec!["echo".to_string(), "a b".to_string()];
        let spec = CommandSpec::from_argv(&argv).unwrap();
        assert_eq!(spec.program, "echo");
        assert_eq!(spec.args, vec!["a b"]);
        assert!(matches!(
            CommandSpec::from_argv(&[]),
            Err(ProcessError::EmptyCommand)
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_error() {
        let spec = CommandSpec::new("definitely-not-a-real-binary-3f9a");
        let err = SystemGateway.run(&spec).await.unwrap_err();
        assert!(matches!(err, ProcessError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let output = SystemGateway.run(&CommandSpec::new("false")).await.unwrap();
        assert!(!output.success());

        let output = SystemGateway
            .run(&CommandSpec::new("echo").arg("hello world"))
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello world");
    }
}
