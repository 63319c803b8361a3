//! Release command execution.

use crate::cli::{Args, OutputManager};
use crate::config::EffectiveConfig;
use crate::error::Result;
use crate::pipeline::{
    DistributionDriver, PipelineServices, PipelineState, RunContext, RunReport,
};
use crate::process::{CommandGateway, SystemGateway};
use anyhow::Context as _;
use crate::publisher::CommandPublisher;
use std::sync::Arc;

/// Run every target and print a summary. Exits 1 when any target failed.
pub(super) async fn execute_release(
    args: &Args,
    config: &EffectiveConfig,
    output: &OutputManager,
    distribution: Option<String>,
    sequential: bool,
    package_only: bool,
) -> Result<i32> {
    let project = config.project();
    output.section(&format!("{} {}", project.name(), project.version()))?;
    if args.dry_run {
        output.warn("dry run: nothing will be published")?;
    }

    let project_dir = std::path::absolute(&args.project_dir).with_context(|| {
        format!(
            "resolving project directory {}",
            args.project_dir.display()
        )
    })?;
    let mut ctx = RunContext::new(project_dir)
        .with_dry_run(args.dry_run)
        .with_upload(!package_only);
    if let Some(dir) = &args.output_dir {
        ctx = ctx.with_output_dir(dir);
    }
    output.verbose(&format!("staging under {}", ctx.output_dir().display()))?;

    let gateway: Arc<dyn CommandGateway> = Arc::new(SystemGateway);
    let publisher = CommandPublisher::new(
        Arc::clone(&gateway),
        config.release().publish_command.clone(),
    );
    let services = PipelineServices::new(gateway, Arc::new(publisher));

    let mut driver = DistributionDriver::new(services, ctx);
    if sequential {
        driver = driver.sequential();
    }
    if let Some(name) = distribution {
        driver = driver.only(name);
    }

    let report = driver.run(config).await;
    print_summary(output, &report)?;
    Ok(if report.has_failures() { 1 } else { 0 })
}

fn print_summary(output: &OutputManager, report: &RunReport) -> Result<()> {
    output.section("Summary")?;
    if report.targets.is_empty() {
        output.warn("no distribution targets configured")?;
        return Ok(());
    }
    for target in &report.targets {
        output.target(target)?;
    }

    let elapsed = report.finished_at - report.started_at;
    let line = format!(
        "{} uploaded, {} packaged, {} skipped, {} failed in {:.1}s",
        report.count(PipelineState::Uploaded),
        report.count(PipelineState::Packaged),
        report.count(PipelineState::Skipped),
        report.count(PipelineState::Failed),
        elapsed.num_milliseconds() as f64 / 1000.0
    );
    if report.has_failures() {
        output.error(&line);
    } else {
        output.success(&line)?;
    }
    Ok(())
}
