//! Release-publishing boundary.
//!
//! Remote snap builds and Maven deployments hand their staged output to a
//! [`ReleasePublisher`]. The wire protocol of the destination is not this
//! crate's concern; [`CommandPublisher`] forwards the request to an
//! external program configured under `[release] publish-command`.

use crate::config::TargetId;
use crate::error::ProcessingError;
use crate::model::{Authorization, mask_secret};
use crate::process::{BoxFuture, CommandGateway, CommandSpec};
use crate::templates::Props;
use std::{fmt, path::PathBuf, sync::Arc};

/// Resolved deployment endpoint of a deployer.
#[derive(Clone, PartialEq)]
pub struct Endpoint {
    pub url: String,
    pub authorization: Authorization,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout: u32,
    pub read_timeout: u32,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("url", &self.url)
            .field("authorization", &self.authorization)
            .field("username", &mask_secret(self.username.as_deref()))
            .field("password", &mask_secret(self.password.as_deref()))
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

/// Everything a publisher receives for one target.
#[derive(Clone, Debug)]
pub struct PublishRequest {
    pub target: TargetId,
    pub props: Props,
    pub prepare_dir: PathBuf,
    pub package_dir: PathBuf,
    /// Set for deployers, absent for remote snap builds
    pub endpoint: Option<Endpoint>,
    /// Staged files to publish
    pub files: Vec<PathBuf>,
}

/// Publishes a target's staged output somewhere else.
///
/// `Ok(false)` is a soft failure: the publisher ran but did not publish.
pub trait ReleasePublisher: Send + Sync {
    fn publish<'a>(&'a self, request: &'a PublishRequest)
    -> BoxFuture<'a, Result<bool, ProcessingError>>;
}

/// Runs the configured publish command through the process gateway.
///
/// The request is passed as discrete arguments; credentials and the
/// property bag go through the environment.
pub struct CommandPublisher {
    gateway: Arc<dyn CommandGateway>,
    command: Vec<String>,
}

impl CommandPublisher {
    pub fn new(gateway: Arc<dyn CommandGateway>, command: Vec<String>) -> Self {
        Self { gateway, command }
    }

    fn command_for(&self, request: &PublishRequest) -> Result<CommandSpec, ProcessingError> {
        let mut spec = CommandSpec::from_argv(&self.command)?
            .arg("--target")
            .arg(request.target.to_string())
            .arg("--prepare-dir")
            .path_arg(&request.prepare_dir)
            .arg("--package-dir")
            .path_arg(&request.package_dir)
            .current_dir(&request.package_dir);

        if let Some(endpoint) = &request.endpoint {
            spec = spec
                .args(["--url", endpoint.url.as_str()])
                .args(["--authorization", endpoint.authorization.as_str()])
                .arg("--connect-timeout")
                .arg(endpoint.connect_timeout.to_string())
                .arg("--read-timeout")
                .arg(endpoint.read_timeout.to_string());
            if let Some(username) = &endpoint.username {
                spec = spec.env("RELEASE_PUBLISH_USERNAME", username);
            }
            if let Some(password) = &endpoint.password {
                spec = spec.env("RELEASE_PUBLISH_PASSWORD", password);
            }
        }
        for file in &request.files {
            spec = spec.arg("--file").path_arg(file);
        }

        let props = serde_json::to_string(&request.props)
            .map_err(|e| ProcessingError::Generic(format!("serializing properties: {e}")))?;
        Ok(spec.env("RELEASE_PUBLISH_PROPERTIES", props))
    }
}

impl ReleasePublisher for CommandPublisher {
    fn publish<'a>(
        &'a self,
        request: &'a PublishRequest,
    ) -> BoxFuture<'a, Result<bool, ProcessingError>> {
        Box::pin(async move {
            if self.command.is_empty() {
                log::warn!(
                    "no publish command configured, cannot publish {}",
                    request.target
                );
                return Ok(false);
            }
            let spec = self.command_for(request)?;
            let output = self.gateway.run(&spec).await?;
            if !output.success() {
                log::warn!(
                    "publish command for {} exited with {:?}: {}",
                    request.target,
                    output.status,
                    output.error_line().unwrap_or("no output")
                );
            }
            Ok(output.success())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessError;
    use crate::model::EntityKind;
    use crate::process::CommandOutput;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture {
        seen: Mutex<Vec<CommandSpec>>,
    }

    impl CommandGateway for Capture {
        fn run<'a>(
            &'a self,
            command: &'a CommandSpec,
        ) -> BoxFuture<'a, Result<CommandOutput, ProcessError>> {
            self.seen.lock().unwrap().push(command.clone());
            Box::pin(async { Ok(CommandOutput::ok()) })
        }
    }

    fn request() -> PublishRequest {
        PublishRequest {
            target: TargetId::new("main", EntityKind::Nexus2),
            props: Props::new(),
            prepare_dir: PathBuf::from("/out/main/nexus2/prepare"),
            package_dir: PathBuf::from("/out/main/nexus2/package"),
            endpoint: Some(Endpoint {
                url: "https://repo.example.com/releases".into(),
                authorization: Authorization::Basic,
                username: Some("bot".into()),
                password: Some("pw".into()),
                connect_timeout: 20,
                read_timeout: 60,
            }),
            files: vec![PathBuf::from("/out/main/nexus2/package/staging/0")],
        }
    }

    #[tokio::test]
    async fn test_request_becomes_discrete_arguments() {
        let gateway = Arc::new(Capture::default());
        let publisher = CommandPublisher::new(gateway.clone(), vec!["deploy-tool".into()]);

        assert!(publisher.publish(&request()).await.unwrap());

        let seen = gateway.seen.lock().unwrap();
        let spec = &seen[0];
        assert_eq!(spec.program, "deploy-tool");
        assert_eq!(spec.args[0..2], ["--target", "nexus2:main"]);
        assert!(spec.args.contains(&"https://repo.example.com/releases".to_string()));
        assert!(!spec.args.iter().any(|a| a.contains("pw")));
        assert!(
            spec.envs
                .contains(&("RELEASE_PUBLISH_PASSWORD".to_string(), "pw".to_string()))
        );
    }

    #[tokio::test]
    async fn test_without_command_reports_failure() {
        let gateway = Arc::new(Capture::default());
        let publisher = CommandPublisher::new(gateway.clone(), Vec::new());
        assert!(!publisher.publish(&request()).await.unwrap());
        assert!(gateway.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_endpoint_debug_masks_password() {
        let debug = format!("{:?}", request().endpoint.unwrap());
        assert!(!debug.contains("\"pw\""));
    }
}
