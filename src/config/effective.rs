//! Frozen, shareable configuration.

use crate::config::{Target, TargetId};
use crate::model::{
    ConfigEntity, ConfigNode, Distribution, EntityKind, Hooks, MavenDeployer, Project,
    ReleaseService, SnapPackager,
};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct Snapshot {
    pub(crate) project: Project,
    pub(crate) release: ReleaseService,
    pub(crate) nodes: Vec<ConfigNode>,
    pub(crate) distributions: Vec<Distribution>,
}

/// The fully resolved configuration of a run.
///
/// Cloning is cheap and every accessor returns shared references; there is
/// no way to obtain mutable access once the builder produced it.
#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    inner: Arc<Snapshot>,
}

impl EffectiveConfig {
    pub(crate) fn freeze(snapshot: Snapshot) -> Self {
        Self {
            inner: Arc::new(snapshot),
        }
    }

    pub fn project(&self) -> &Project {
        &self.inner.project
    }

    pub fn release(&self) -> &ReleaseService {
        &self.inner.release
    }

    pub fn nodes(&self) -> &[ConfigNode] {
        &self.inner.nodes
    }

    /// Look up a node by identity.
    pub fn get(&self, kind: EntityKind, name: &str) -> Option<&ConfigNode> {
        self.inner
            .nodes
            .iter()
            .find(|node| node.kind() == kind && node.name() == name)
    }

    /// All nodes of one kind, in declaration order.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &ConfigNode> {
        self.inner.nodes.iter().filter(move |node| node.kind() == kind)
    }

    pub fn maven_deployers(&self) -> impl Iterator<Item = &MavenDeployer> {
        self.inner.nodes.iter().filter_map(ConfigNode::as_maven)
    }

    /// Deployer by name, whatever its kind.
    pub fn maven(&self, name: &str) -> Option<&MavenDeployer> {
        self.maven_deployers().find(|m| m.name() == name)
    }

    /// The project-wide snap packager.
    pub fn snap(&self) -> Option<&SnapPackager> {
        self.inner.nodes.iter().find_map(ConfigNode::as_snap)
    }

    /// Snap packager of a distribution, with its overrides applied.
    pub fn snap_for(&self, distribution: &str) -> Option<&SnapPackager> {
        self.distribution(distribution)
            .and_then(|d| d.snap.as_ref())
    }

    pub fn hooks(&self) -> Option<&Hooks> {
        self.inner.nodes.iter().find_map(ConfigNode::as_hooks)
    }

    pub fn distributions(&self) -> &[Distribution] {
        &self.inner.distributions
    }

    pub fn distribution(&self, name: &str) -> Option<&Distribution> {
        self.inner.distributions.iter().find(|d| d.name == name)
    }

    /// Every distribution target in declaration order: one snap target per
    /// distribution with a snap packager, then one per deployer.
    pub fn targets(&self) -> Vec<Target> {
        let project = self.project();
        let snaps = self.inner.distributions.iter().filter_map(|d| {
            d.snap.as_ref().map(|snap| Target {
                id: TargetId::new(d.name.clone(), EntityKind::Snap),
                enabled: snap.is_enabled(project),
            })
        });
        let deployers = self.maven_deployers().map(|m| Target {
            id: TargetId::new(m.name(), m.kind()),
            enabled: m.is_enabled(project),
        });
        snaps.chain(deployers).collect()
    }

    /// Printable form with secrets masked.
    ///
    /// With `full == false` disabled entities are left out.
    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let project = self.project();
        let mut map = Map::new();
        map.insert("project".into(), Value::Object(project.as_map()));
        map.insert("release".into(), Value::Object(self.release().as_map()));

        if let Some(hooks) = self.hooks() {
            map.extend(hooks.as_map(full, project));
        }

        let mut packagers = Map::new();
        if let Some(snap) = self.snap() {
            packagers.extend(snap.as_map(full, project));
        }
        map.insert("packagers".into(), Value::Object(packagers));

        let mut deployers = Map::new();
        for deployer in self.maven_deployers() {
            deployers.extend(deployer.as_map(full, project));
        }
        map.insert("deployers".into(), Value::Object(deployers));

        let mut distributions = Map::new();
        for distribution in self.distributions() {
            let mut entry = distribution.as_map();
            if let Some(snap) = &distribution.snap {
                entry.extend(snap.as_map(full, project));
            }
            distributions.insert(distribution.name.clone(), Value::Object(entry));
        }
        map.insert("distributions".into(), Value::Object(distributions));
        map
    }
}
