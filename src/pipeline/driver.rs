//! Runs the pipeline for every distribution target.

use crate::config::{EffectiveConfig, Target, TargetId};
use crate::model::HookPhase;
use crate::pipeline::{
    Pipeline, PipelineServices, PipelineState, RunContext, SkipReason, Stage, TargetFailure,
    TargetOutcome, TargetReport, run_hooks,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Outcome of a whole run, one report per target in declaration order.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.targets.iter().any(|r| r.outcome.is_failed())
    }

    /// Number of targets that ended in `state`.
    pub fn count(&self, state: PipelineState) -> usize {
        self.targets.iter().filter(|r| r.state() == state).count()
    }
}

/// Fans a release out over its targets.
///
/// Targets run concurrently on tokio tasks unless [`sequential`] is set.
/// A target that fails, or whose task panics, is reported as `Failed`;
/// the others carry on.
///
/// [`sequential`]: DistributionDriver::sequential
pub struct DistributionDriver {
    services: PipelineServices,
    ctx: Arc<RunContext>,
    parallel: bool,
    filter: Option<String>,
}

impl DistributionDriver {
    pub fn new(services: PipelineServices, ctx: RunContext) -> Self {
        Self {
            services,
            ctx: Arc::new(ctx),
            parallel: true,
            filter: None,
        }
    }

    /// Run one target after the other.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Only run the targets of distribution `name`, or the deployer `name`
    /// when no distribution has that name.
    pub fn only(mut self, name: impl Into<String>) -> Self {
        self.filter = Some(name.into());
        self
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub async fn run(&self, config: &EffectiveConfig) -> RunReport {
        let started_at = Utc::now();
        let targets: Vec<Target> = config
            .targets()
            .into_iter()
            .filter(|t| self.selects(config, &t.id))
            .collect();
        log::info!(
            "releasing {} {} to {} target(s)",
            config.project().name(),
            config.project().version(),
            targets.len()
        );

        let gateway = self.services.gateway.as_ref();
        run_hooks(config, HookPhase::Before, &self.ctx, gateway).await;

        let reports = if self.parallel {
            self.run_parallel(config, targets).await
        } else {
            self.run_sequential(config, targets).await
        };

        let phase = if reports.iter().any(|r| r.outcome.is_failed()) {
            HookPhase::Failure
        } else {
            HookPhase::Success
        };
        run_hooks(config, phase, &self.ctx, gateway).await;

        RunReport {
            started_at,
            finished_at: Utc::now(),
            targets: reports,
        }
    }

    fn selects(&self, config: &EffectiveConfig, target: &TargetId) -> bool {
        let Some(name) = &self.filter else {
            return true;
        };
        let names_distribution = config.distribution(name).is_some();
        &target.name == name && target.is_distribution() == names_distribution
    }

        async fn run_sequential(
        &self,
        config: &EffectiveConfig,
        targets: Vec<Target>,
    ) -> Vec<TargetReport> {
        let pipeline = Pipeline::new(config, &self.ctx, &self.services);
        let mut reports = Vec::with_capacity(targets.len());
        for target in targets {
            let report = match skipped(&target) {
                Some(report) => report,
                None => pipeline.run(&target.id).await,
            };
            reports.push(report);
        }
        reports
    }

    async fn run_parallel(
        &self,
        config: &EffectiveConfig,
        targets: Vec<Target>,
    ) -> Vec<TargetReport> {
        let mut pending = Vec::with_capacity(targets.len());
        for target in targets {
            if let Some(report) = skipped(&target) {
                pending.push((target, Err(report)));
                continue;
            }
            let config = config.clone();
            let ctx = Arc::clone(&self.ctx);
            let services = self.services.clone();
            let id = target.id.clone();
            let handle = tokio::spawn(async move {
                Pipeline::new(&config, &ctx, &services).run(&id).await
            });
            pending.push((target, Ok(handle)));
        }

        let mut reports = Vec::with_capacity(pending.len());
        for (target, task) in pending {
            let report = match task {
                Err(report) => report,
                Ok(handle) => match handle.await {
                    Ok(report) => report,
                    Err(e) => {
                        log::error!("{}: pipeline task failed: {e}", target.id);
                        TargetReport::new(
                            target.id,
                            PipelineState::Init,
                            TargetOutcome::Failed(TargetFailure::new(
                                Stage::Pipeline,
                                format!("pipeline task failed: {e}"),
                            )),
                        )
                    }
                },
            };
            reports.push(report);
        }
        reports
    }
}

fn skipped(target: &Target) -> Option<TargetReport> {
    if target.enabled {
        return None;
    }
    log::debug!("{}: disabled", target.id);
    Some(TargetReport::new(
        target.id.clone(),
        PipelineState::Init,
        TargetOutcome::Skipped(SkipReason::Disabled),
    ))
}
