//! Folding layers into one effective configuration.

use crate::config::{ConfigLayer, EffectiveConfig, effective::Snapshot};
use crate::error::ConfigError;
use crate::model::{ConfigEntity, ConfigNode, Distribution, EntityKind, Project, ReleaseService};
use std::collections::HashSet;

/// Mutable accumulator for configuration layers.
///
/// Layers are applied in the order they are added, which must be most
/// specific first: the first layer that sets a value wins. [`build`]
/// consumes the builder, so nothing can be merged into a configuration
/// after it was frozen.
///
/// [`build`]: EffectiveConfigBuilder::build
#[derive(Debug, Default)]
pub struct EffectiveConfigBuilder {
    layers: Vec<ConfigLayer>,
}

impl EffectiveConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower precedence than every layer added before.
    pub fn layer(mut self, layer: ConfigLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Merge every layer and freeze the result.
    ///
    /// # Errors
    ///
    /// - Two same-kind entities or two distributions share a name within one layer
    /// - The merged project is missing a name or a valid version
    pub fn build(self) -> Result<EffectiveConfig, ConfigError> {
        let mut project = Project::default();
        let mut release = ReleaseService::default();
        let mut nodes: Vec<ConfigNode> = Vec::new();
        let mut distributions: Vec<Distribution> = Vec::new();

        for layer in &self.layers {
            check_unique(layer)?;
            log::debug!("merging {} layer", layer.origin);

            project.merge(&layer.project);
            release.merge(&layer.release);

            for node in &layer.nodes {
                match nodes
                    .iter_mut()
                    .find(|acc| acc.kind() == node.kind() && acc.name() == node.name())
                {
                    Some(acc) => acc.merge(node),
                    None => nodes.push(node.clone()),
                }
            }

            for distribution in &layer.distributions {
                match distributions
                    .iter_mut()
                    .find(|acc| acc.name == distribution.name)
                {
                    Some(acc) => acc.merge(distribution),
                    None => distributions.push(distribution.clone()),
                }
            }
        }

        project.validate()?;

        let global_snap = nodes.iter().find_map(ConfigNode::as_snap).cloned();
        for distribution in &mut distributions {
            distribution.snap = match (distribution.snap.take(), &global_snap) {
                (Some(mut local), Some(global)) => {
                    local.merge(global);
                    Some(local)
                }
                (Some(mut local), None) => {
                    local.core_mut().set_name("snap");
                    Some(local)
                }
                (None, global) => global.clone(),
            };
        }

        Ok(EffectiveConfig::freeze(Snapshot {
            project,
            release,
            nodes,
            distributions,
        }))
    }
}

fn check_unique(layer: &ConfigLayer) -> Result<(), ConfigError> {
    let mut seen: HashSet<(EntityKind, &str)> = HashSet::new();
    for node in &layer.nodes {
        if !seen.insert((node.kind(), node.name())) {
            return Err(ConfigError::DuplicateName {
                kind: node.kind().to_string(),
                name: node.name().to_string(),
            });
        }
    }

    let mut names: HashSet<&str> = HashSet::new();
    for distribution in &layer.distributions {
        if !names.insert(distribution.name.as_str()) {
            return Err(ConfigError::DuplicateName {
                kind: "distribution".to_string(),
                name: distribution.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayerOrigin, defaults_layer};
    use crate::model::{Active, MavenDeployer, SnapPackager};

    fn project_layer() -> ConfigLayer {
        ConfigLayer::new(LayerOrigin::ProjectFile).with_project(Project {
            name: Some("app".into()),
            version: Some("1.0.0".into()),
            ..Default::default()
        })
    }

    #[test]
    fn test_first_layer_wins() {
        let mut cli = MavenDeployer::new(EntityKind::Nexus2, "main");
        cli.connect_timeout = 5;
        let mut file = MavenDeployer::new(EntityKind::Nexus2, "main");
        file.connect_timeout = 30;
        file.core_mut().activation.set(Active::Always);
        let identities = vec![(EntityKind::Nexus2, "main".to_string())];

        let config = EffectiveConfigBuilder::new()
            .layer(ConfigLayer::new(LayerOrigin::Cli).with_node(ConfigNode::Maven(cli)))
            .layer(project_layer().with_node(ConfigNode::Maven(file)))
            .layer(defaults_layer(&identities))
            .build()
            .unwrap();

        let deployer = config.maven("main").unwrap();
        assert_eq!(deployer.connect_timeout, 5);
        assert_eq!(deployer.read_timeout, 60);
        assert_eq!(deployer.activation().active(), Active::Always);
    }

    #[test]
    fn test_duplicate_names_in_one_layer() {
        let layer = project_layer()
            .with_node(ConfigNode::Maven(MavenDeployer::new(EntityKind::Github, "gh")))
            .with_node(ConfigNode::Maven(MavenDeployer::new(EntityKind::Github, "gh")));
        let err = EffectiveConfigBuilder::new().layer(layer).build().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateName { .. }));
    }

    #[test]
    fn test_same_name_different_kind_is_allowed() {
        let layer = project_layer()
            .with_node(ConfigNode::Maven(MavenDeployer::new(EntityKind::Github, "repo")))
            .with_node(ConfigNode::Maven(MavenDeployer::new(EntityKind::Gitlab, "repo")));
        let config = EffectiveConfigBuilder::new().layer(layer).build().unwrap();
        assert_eq!(config.maven_deployers().count(), 2);
    }

    #[test]
    fn test_distribution_override_wins_over_global_snap() {
        let mut global = SnapPackager::new("snap");
        global.grade = Some("stable".into());
        global.base = Some("core22".into());
        let mut local = SnapPackager::new("");
        local.grade = Some("devel".into());
        let mut dist = Distribution::new("cli");
        dist.snap = Some(local);

        let config = EffectiveConfigBuilder::new()
            .layer(
                project_layer()
                    .with_node(ConfigNode::Snap(global))
                    .with_distribution(dist),
            )
            .build()
            .unwrap();

        let snap = config.snap_for("cli").unwrap();
        assert_eq!(snap.grade(), "devel");
        assert_eq!(snap.base(), "core22");
        assert_eq!(snap.name(), "snap");
    }

    #[test]
    fn test_invalid_version_aborts() {
        let layer = ConfigLayer::new(LayerOrigin::ProjectFile).with_project(Project {
            name: Some("app".into()),
            version: Some("latest".into()),
            ..Default::default()
        });
        let err = EffectiveConfigBuilder::new().layer(layer).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVersion { .. }));
    }
}
