//! Shared fixtures for integration tests.
#![allow(dead_code)]

use kodegen_bundler_distribute::config::{
    EffectiveConfig, EffectiveConfigBuilder, defaults_layer, parse_layer,
};
use kodegen_bundler_distribute::error::{ProcessError, ProcessingError};
use kodegen_bundler_distribute::pipeline::{PipelineServices, RunContext};
use kodegen_bundler_distribute::platform::Platform;
use kodegen_bundler_distribute::process::{BoxFuture, CommandGateway, CommandOutput, CommandSpec};
use kodegen_bundler_distribute::publisher::{PublishRequest, ReleasePublisher};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Gateway that records every command instead of running it.
///
/// Commands whose argument list contains one of the `fail_on` needles exit
/// with status 1. A successful `--output <file>` invocation creates the file.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<CommandSpec>>,
    fail_on: Vec<String>,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(needles: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_on: needles.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// `program arg...` of every call, in order.
    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::display_line).collect()
    }
}

impl CommandGateway for RecordingGateway {
    fn run<'a>(
        &'a self,
        command: &'a CommandSpec,
    ) -> BoxFuture<'a, Result<CommandOutput, ProcessError>> {
        self.calls.lock().unwrap().push(command.clone());
        let line = command.display_line();
        let fails = self.fail_on.iter().any(|needle| line.contains(needle.as_str()));
        Box::pin(async move {
            if fails {
                return Ok(CommandOutput::failed(1, format!("{} exploded", command.program)));
            }
            if let Some(i) = command.args.iter().position(|a| a == "--output")
                && let Some(file) = command.args.get(i + 1)
            {
                std::fs::write(file, b"snap archive").unwrap();
            }
            Ok(CommandOutput::ok())
        })
    }
}

/// Publisher that records requests and answers with a fixed result.
pub struct RecordingPublisher {
    requests: Mutex<Vec<PublishRequest>>,
    answer: bool,
}

impl RecordingPublisher {
    pub fn new(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            answer,
        })
    }

    pub fn requests(&self) -> Vec<PublishRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ReleasePublisher for RecordingPublisher {
    fn publish<'a>(
        &'a self,
        request: &'a PublishRequest,
    ) -> BoxFuture<'a, Result<bool, ProcessingError>> {
        self.requests.lock().unwrap().push(request.clone());
        let answer = self.answer;
        Box::pin(async move { Ok(answer) })
    }
}

/// Resolve `toml` as the project file plus built-in defaults.
pub fn config(toml: &str) -> EffectiveConfig {
    let file = parse_layer(toml, Path::new("release.toml")).unwrap();
    let identities = file.identities();
    EffectiveConfigBuilder::new()
        .layer(file)
        .layer(defaults_layer(&identities))
        .build()
        .unwrap()
}

/// Linux context rooted at `dir`.
pub fn context(dir: &Path) -> RunContext {
    RunContext::new(dir).with_platform(Platform::Linux)
}

pub fn services(gateway: Arc<RecordingGateway>, publisher: Arc<RecordingPublisher>) -> PipelineServices {
    PipelineServices::new(gateway, publisher)
}
