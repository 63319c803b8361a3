//! Configuration layers fed to the builder.

use crate::model::{ConfigEntity, ConfigNode, Distribution, EntityKind, Project, ReleaseService};
use std::fmt;

/// Where a layer's values came from, most specific first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum LayerOrigin {
    Cli,
    Environment,
    ProjectFile,
    Defaults,
}

impl fmt::Display for LayerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LayerOrigin::Cli => "command line",
            LayerOrigin::Environment => "environment",
            LayerOrigin::ProjectFile => "project file",
            LayerOrigin::Defaults => "defaults",
        })
    }
}

/// One partially specified configuration tree.
#[derive(Clone, Debug)]
pub struct ConfigLayer {
    pub origin: LayerOrigin,
    pub project: Project,
    pub release: ReleaseService,
    pub nodes: Vec<ConfigNode>,
    pub distributions: Vec<Distribution>,
}

impl ConfigLayer {
    pub fn new(origin: LayerOrigin) -> Self {
        Self {
            origin,
            project: Project::default(),
            release: ReleaseService::default(),
            nodes: Vec::new(),
            distributions: Vec::new(),
        }
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.project = project;
        self
    }

    pub fn with_node(mut self, node: ConfigNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distributions.push(distribution);
        self
    }

    /// `(kind, name)` of every node, in declaration order.
    pub fn identities(&self) -> Vec<(EntityKind, String)> {
        self.nodes
            .iter()
            .map(|node| (node.kind(), node.name().to_string()))
            .collect()
    }
}
