//! Command hooks run around a release.

use crate::config::EffectiveConfig;
use crate::model::HookPhase;
use crate::pipeline::RunContext;
use crate::process::{CommandGateway, CommandSpec};

/// Run the hooks of `phase` that apply to the run's platform.
///
/// Hook failures are logged and counted, never propagated: they do not
/// change any target's outcome. Dry runs execute nothing. Returns the
/// number of hooks that failed.
pub async fn run_hooks(
    config: &EffectiveConfig,
    phase: HookPhase,
    ctx: &RunContext,
    gateway: &dyn CommandGateway,
) -> usize {
    let Some(hooks) = config.hooks() else {
        return 0;
    };
    let commands = hooks.commands_for(phase, ctx.platform(), config.project());
    if commands.is_empty() {
        return 0;
    }
    if ctx.dry_run() {
        log::info!(
            "dry run, skipping {} {} hook(s)",
            commands.len(),
            phase.as_str()
        );
        return 0;
    }

    let mut failures = 0;
    for hook in commands {
        let spec = match CommandSpec::from_argv(&hook.cmd) {
            Ok(spec) => spec.current_dir(ctx.project_dir()),
            Err(e) => {
                log::warn!("{} hook skipped: {e}", phase.as_str());
                failures += 1;
                continue;
            }
        };
        log::info!("running {} hook: {}", phase.as_str(), spec.display_line());
        match gateway.run(&spec).await {
            Ok(output) if output.success() => {}
            Ok(output) => {
                failures += 1;
                log::warn!(
                    "{} hook '{}' exited with {:?}",
                    phase.as_str(),
                    spec.display_line(),
                    output.status
                );
            }
            Err(e) => {
                failures += 1;
                log::warn!("{} hook '{}' failed: {e}", phase.as_str(), spec.display_line());
            }
        }
    }
    failures
}
