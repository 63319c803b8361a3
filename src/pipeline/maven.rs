//! Maven deployer targets.
//!
//! Packaging stages every configured staging repository under
//! `<package>/staging/<index>`; upload resolves the endpoint and hands the
//! staged trees to the release publisher.

use crate::config::{EffectiveConfig, TargetId};
use crate::error::{Context, ProcessingError};
use crate::model::{ConfigEntity, EntityKind, MavenDeployer};
use crate::pipeline::{
    PackageStep, RunContext, SkipReason, Stage, StageEnv, TargetFailure, ToolHandler, UploadStep,
    props::Props,
};
use crate::process::BoxFuture;
use crate::publisher::{Endpoint, PublishRequest};
use crate::templates::TemplateSource;
use crate::utils::fs;
use std::path::{Path, PathBuf};

/// Handler for every Maven deployer kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct MavenHandler;

fn deployer<'c>(
    config: &'c EffectiveConfig,
    target: &TargetId,
) -> Result<&'c MavenDeployer, ProcessingError> {
    config
        .get(target.kind, &target.name)
        .and_then(|node| node.as_maven())
        .with_context(|| format!("no {} deployer named {}", target.kind, target.name))
}

fn staged_dirs(env: &StageEnv<'_>, deployer: &MavenDeployer) -> Vec<PathBuf> {
    let root = env.dirs.package.join("staging");
    (0..deployer.staging_repositories.len())
        .map(|i| root.join(i.to_string()))
        .collect()
}

impl ToolHandler for MavenHandler {
    fn kinds(&self) -> &[EntityKind] {
        &EntityKind::MAVEN_DEPLOYERS
    }

    fn templates(&self, _: &EffectiveConfig, _: &RunContext, _: &TargetId) -> TemplateSource {
        TemplateSource::None
    }

    fn fill_properties(
        &self,
        config: &EffectiveConfig,
        target: &TargetId,
        props: &mut Props,
    ) -> Result<(), ProcessingError> {
        let deployer = deployer(config, target)?;
        for (key, value) in deployer.extra_properties() {
            props.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn package<'a>(
        &'a self,
        env: &'a StageEnv<'a>,
    ) -> BoxFuture<'a, Result<PackageStep, ProcessingError>> {
        Box::pin(async move {
            let deployer = deployer(env.config, env.target)?;
            if deployer.staging_repositories.is_empty() {
                crate::bail!("deployer {} has no staging repositories", env.target.name);
            }

            let destinations = staged_dirs(env, deployer);
            for (repository, dest) in deployer.staging_repositories.iter().zip(&destinations) {
                let source = env.ctx.resolve(Path::new(repository));
                if !source.is_dir() {
                    return Err(ProcessingError::CopyFailed {
                        from: source,
                        to: dest.clone(),
                        reason: "staging repository does not exist".to_string(),
                    });
                }
                fs::copy_dir(&source, dest).await?;
            }
            log::debug!(
                "{}: staged {} repositor(ies)",
                env.target,
                destinations.len()
            );
            Ok(PackageStep::Built(None))
        })
    }

    fn upload<'a>(
        &'a self,
        env: &'a StageEnv<'a>,
        _package: &'a PackageStep,
    ) -> BoxFuture<'a, Result<UploadStep, ProcessingError>> {
        Box::pin(async move {
            let deployer = deployer(env.config, env.target)?;
            if env.ctx.dry_run() {
                log::info!("{}: dry run, not deploying", env.target);
                return Ok(UploadStep::Skipped(SkipReason::DryRun));
            }
            if env.config.project().is_snapshot() && !deployer.snapshot_supported() {
                return Ok(UploadStep::Failed(TargetFailure::new(
                    Stage::Upload,
                    format!("{} does not accept snapshot versions", env.target),
                )));
            }

            let url = deployer.resolved_url(env.services.renderer.as_ref(), env.props)?;
            let request = PublishRequest {
                target: env.target.clone(),
                props: env.props.clone(),
                prepare_dir: env.dirs.prepare.clone(),
                package_dir: env.dirs.package.clone(),
                endpoint: Some(Endpoint {
                    url,
                    authorization: deployer.resolve_authorization(),
                    username: deployer.username().map(str::to_string),
                    password: deployer.password().map(str::to_string),
                    connect_timeout: deployer.connect_timeout,
                    read_timeout: deployer.read_timeout,
                }),
                files: staged_dirs(env, deployer),
            };

            if env.services.publisher.publish(&request).await? {
                Ok(UploadStep::Uploaded(None))
            } else {
                Ok(UploadStep::Failed(TargetFailure::new(
                    Stage::Publish,
                    "release publisher reported failure",
                )))
            }
        })
    }
}
