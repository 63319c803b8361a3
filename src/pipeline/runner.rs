//! The fixed prepare → package → upload skeleton.

use crate::config::{EffectiveConfig, TargetId};
use crate::error::{ErrorExt, ProcessingError};
use crate::pipeline::{
    Artifact, HandlerRegistry, PackageStep, PipelineState, RunContext, Stage, StageEnv,
    StagingDirs, TargetFailure, TargetOutcome, TargetReport, ToolHandler, UploadStep,
    props::{Props, base_properties},
};
use crate::process::CommandGateway;
use crate::publisher::ReleasePublisher;
use crate::templates::{HandlebarsRenderer, TemplateRenderer, render_templates};
use crate::utils::{checksum::calculate_sha256, fs};
use std::{path::Path, sync::Arc};

/// Collaborators shared by every pipeline of a run.
#[derive(Clone)]
pub struct PipelineServices {
    pub registry: Arc<HandlerRegistry>,
    pub gateway: Arc<dyn CommandGateway>,
    pub publisher: Arc<dyn ReleasePublisher>,
    pub renderer: Arc<dyn TemplateRenderer>,
}

impl PipelineServices {
    /// Default handlers and the handlebars renderer.
    pub fn new(gateway: Arc<dyn CommandGateway>, publisher: Arc<dyn ReleasePublisher>) -> Self {
        Self {
            registry: Arc::new(HandlerRegistry::with_defaults()),
            gateway,
            publisher,
            renderer: Arc::new(HandlebarsRenderer::new()),
        }
    }

    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }
}

/// One target's pipeline.
pub struct Pipeline<'a> {
    config: &'a EffectiveConfig,
    ctx: &'a RunContext,
    services: &'a PipelineServices,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a EffectiveConfig,
        ctx: &'a RunContext,
        services: &'a PipelineServices,
    ) -> Self {
        Self {
            config,
            ctx,
            services,
        }
    }

    /// Run every stage for `target`. Never fails: errors become a
    /// [`TargetOutcome::Failed`] naming the stage.
    pub async fn run(&self, target: &TargetId) -> TargetReport {
        let failed = |reached: PipelineState, stage: Stage, reason: String| {
            log::error!("{target}: {stage} failed: {reason}");
            TargetReport::new(
                target.clone(),
                reached,
                TargetOutcome::Failed(TargetFailure::new(stage, reason)),
            )
        };

        let Some(handler) = self.services.registry.get(target.kind) else {
            return failed(
                PipelineState::Init,
                Stage::Pipeline,
                format!("no handler registered for {}", target.kind),
            );
        };

        let dirs = self.ctx.staging_dirs(target);
        let props = match self.prepare(handler.as_ref(), target, &dirs).await {
            Ok(props) => props,
            Err(e) => return failed(PipelineState::Init, Stage::Prepare, e.to_string()),
        };
        log::debug!("{target}: prepared in {}", dirs.prepare.display());

        let env = StageEnv {
            config: self.config,
            ctx: self.ctx,
            target,
            dirs: &dirs,
            props: &props,
            services: self.services,
        };

        let package = match handler.package(&env).await {
            Ok(step) => step,
            Err(e) => return failed(PipelineState::Prepared, Stage::Package, e.to_string()),
        };
        let packaged = match &package {
            PackageStep::Built(Some(path)) => artifact(path).await,
            _ => Ok(None),
        };
        let packaged = match packaged {
            Ok(artifact) => artifact,
            Err(e) => return failed(PipelineState::Prepared, Stage::Package, e.to_string()),
        };
        log::debug!("{target}: packaged ({package:?})");

        if !self.ctx.upload() {
            log::info!("{target}: packaged, upload disabled");
            return TargetReport::new(
                target.clone(),
                PipelineState::Packaged,
                TargetOutcome::Packaged(packaged),
            );
        }

        let outcome = match handler.upload(&env, &package).await {
            Ok(UploadStep::Uploaded(built)) => {
                let uploaded = match built {
                    Some(path) => artifact(&path).await,
                    None => Ok(packaged),
                };
                match uploaded {
                    Ok(artifact) => TargetOutcome::Uploaded(artifact),
                    Err(e) => {
                        return failed(PipelineState::Packaged, Stage::Upload, e.to_string());
                    }
                }
            }
            Ok(UploadStep::Skipped(reason)) => {
                log::info!("{target}: upload skipped ({reason})");
                TargetOutcome::Skipped(reason)
            }
            Ok(UploadStep::Failed(failure)) => {
                return failed(PipelineState::Packaged, failure.stage, failure.reason);
            }
            Err(e) => return failed(PipelineState::Packaged, Stage::Upload, e.to_string()),
        };
        TargetReport::new(target.clone(), PipelineState::Packaged, outcome)
    }

    async fn prepare(
        &self,
        handler: &dyn ToolHandler,
        target: &TargetId,
        dirs: &StagingDirs,
    ) -> Result<Props, ProcessingError> {
        fs::create_dir_all(&dirs.prepare, true).await?;
        fs::create_dir_all(&dirs.package, true).await?;

        let mut props = base_properties(self.config, target, dirs);
        handler.fill_properties(self.config, target, &mut props)?;

        let source = handler.templates(self.config, self.ctx, target);
        render_templates(
            &source,
            &dirs.prepare,
            self.services.renderer.as_ref(),
            &props,
        )
        .await?;
        Ok(props)
    }
}

/// Describe a produced file; `None` when nothing exists at `path`.
async fn artifact(path: &Path) -> Result<Option<Artifact>, ProcessingError> {
    if !path.is_file() {
        log::debug!("no artifact at {}", path.display());
        return Ok(None);
    }
    let size = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?
        .len();
    let checksum = calculate_sha256(path).await?;
    Ok(Some(Artifact {
        path: path.to_path_buf(),
        size,
        checksum,
    }))
}
