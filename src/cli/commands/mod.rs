//! Command execution.

mod config;
mod release;

use crate::cli::{Args, Command, OutputManager};
use crate::config::{
    ConfigLayer, EffectiveConfig, EffectiveConfigBuilder, LayerOrigin, defaults_layer,
    environment_layer, load_layer,
};
use crate::error::{ReleaseError, Result};
use crate::model::Project;

use config::execute_config;
use release::execute_release;

/// Run the parsed command and return the process exit code.
pub async fn execute_command(args: Args) -> Result<i32> {
    let output = OutputManager::new(args.verbose);
    if let Err(e) = args.validate() {
        let e = ReleaseError::from(e);
        output.error(&e.to_string());
        for suggestion in e.recovery_suggestions() {
            let _ = output.indent(&format!("• {suggestion}"));
        }
        return Ok(2);
    }

    let command = args.command();
    let config = match load_effective_config(&args) {
        Ok(config) => config,
        Err(e) => {
            output.error(&format!("Command '{}' failed: {e}", command.name()));
            for suggestion in e.recovery_suggestions() {
                let _ = output.indent(&format!("• {suggestion}"));
            }
            return Ok(1);
        }
    };

    match command {
        Command::Release {
            distribution,
            sequential,
            package_only,
        } => {
            execute_release(
                &args,
                &config,
                &output,
                distribution,
                sequential,
                package_only,
            )
            .await
        }
        Command::Config { full } => execute_config(&config, full),
    }
}

/// Layer the command line, the environment, the project file and the
/// built-in defaults, most specific first, and freeze the result.
pub fn load_effective_config(args: &Args) -> Result<EffectiveConfig> {
    let path = args.config_path();
    log::debug!("loading release configuration from {}", path.display());
    let file = load_layer(&path)?;
    let identities = file.identities();

    let mut cli = ConfigLayer::new(LayerOrigin::Cli);
    if let Some(version) = &args.project_version {
        cli = cli.with_project(Project {
            version: Some(version.clone()),
            ..Default::default()
        });
    }

    let config = EffectiveConfigBuilder::new()
        .layer(cli)
        .layer(environment_layer(std::env::vars(), &identities))
        .layer(file)
        .layer(defaults_layer(&identities))
        .build()?;
    Ok(config)
}
