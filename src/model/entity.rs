//! Identity, activation and extra properties shared by every configuration node.

use crate::error::ConfigError;
use crate::model::{
    Activation, Active, Hooks, MavenDeployer, Project, SnapPackager, merge::merge_map,
};
use serde_json::{Map, Value, json};
use std::{fmt, str::FromStr};

/// Closed set of configuration node kinds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Nexus2,
    Artifactory,
    Github,
    Gitlab,
    MavenCentral,
    Snap,
    Hooks,
    CommandHooks,
}

impl EntityKind {
    /// Every Maven-style deployer kind.
    pub const MAVEN_DEPLOYERS: [EntityKind; 5] = [
        EntityKind::Nexus2,
        EntityKind::Artifactory,
        EntityKind::Github,
        EntityKind::Gitlab,
        EntityKind::MavenCentral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Nexus2 => "nexus2",
            EntityKind::Artifactory => "artifactory",
            EntityKind::Github => "github",
            EntityKind::Gitlab => "gitlab",
            EntityKind::MavenCentral => "maven-central",
            EntityKind::Snap => "snap",
            EntityKind::Hooks => "hooks",
            EntityKind::CommandHooks => "command",
        }
    }

    pub fn is_maven_deployer(&self) -> bool {
        Self::MAVEN_DEPLOYERS.contains(self)
    }

    /// Upper-case form used in environment variable names.
    pub fn env_key(&self) -> String {
        self.as_str().to_ascii_uppercase().replace('-', "_")
    }
}

impl FromStr for EntityKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        [
            EntityKind::Nexus2,
            EntityKind::Artifactory,
            EntityKind::Github,
            EntityKind::Gitlab,
            EntityKind::MavenCentral,
            EntityKind::Snap,
            EntityKind::Hooks,
            EntityKind::CommandHooks,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == normalized)
        .ok_or_else(|| ConfigError::InvalidValue {
            field: "type".to_string(),
            value: s.to_string(),
            reason: "unknown configuration kind".to_string(),
        })
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields common to every configuration node.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityCore {
    kind: EntityKind,
    name: String,
    pub activation: Activation,
    pub extra_properties: Map<String, Value>,
}

impl EntityCore {
    pub fn new(kind: EntityKind, name: impl Into<String>, default_active: Active) -> Self {
        Self {
            kind,
            name: name.into(),
            activation: Activation::defaulted(default_active),
            extra_properties: Map::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name if none was assigned yet; names never change once set.
    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.name.is_empty() {
            self.name = name.into();
        }
    }

    /// Merge `source` into `self`, `self` winning for anything it holds.
    ///
    /// # Panics
    ///
    /// Panics if the kinds differ. Mixing kinds is a wiring bug in the caller.
    pub fn merge(&mut self, source: &EntityCore) {
        assert_eq!(
            self.kind, source.kind,
            "cannot merge a {} entity into a {} entity",
            source.kind, self.kind
        );
        if self.name.is_empty() {
            self.name.clone_from(&source.name);
        }
        self.activation.merge(&source.activation);
        merge_map(&mut self.extra_properties, &source.extra_properties);
    }

    pub fn is_set(&self) -> bool {
        self.activation.is_explicit() || !self.extra_properties.is_empty()
    }

    /// Opening entries of every printable map.
    pub(crate) fn base_map(&self, project: &Project) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("enabled".into(), json!(self.activation.is_enabled(project)));
        map.insert("active".into(), json!(self.activation.active().as_str()));
        map
    }
}

/// Capability set of every configuration node.
pub trait ConfigEntity {
    fn core(&self) -> &EntityCore;

    fn core_mut(&mut self) -> &mut EntityCore;

    /// Merge `source` into `self`. Idempotent; `self` wins for set fields,
    /// collections are unioned with `self`'s entries first.
    fn merge(&mut self, source: &Self)
    where
        Self: Sized;

    /// Whether any layer configured something on this node.
    fn is_set(&self) -> bool;

    /// Printable representation keyed by the node's name.
    ///
    /// Secrets are masked. With `full == false` a disabled node prints as
    /// an empty map.
    fn as_map(&self, full: bool, project: &Project) -> Map<String, Value>;

    fn kind(&self) -> EntityKind {
        self.core().kind()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn activation(&self) -> &Activation {
        &self.core().activation
    }

    fn extra_properties(&self) -> &Map<String, Value> {
        &self.core().extra_properties
    }

    fn is_enabled(&self, project: &Project) -> bool {
        self.core().activation.is_enabled(project)
    }
}

/// One node of the configuration tree.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigNode {
    Maven(MavenDeployer),
    Snap(SnapPackager),
    Hooks(Hooks),
}

impl ConfigNode {
    pub fn as_maven(&self) -> Option<&MavenDeployer> {
        match self {
            ConfigNode::Maven(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_snap(&self) -> Option<&SnapPackager> {
        match self {
            ConfigNode::Snap(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_hooks(&self) -> Option<&Hooks> {
        match self {
            ConfigNode::Hooks(h) => Some(h),
            _ => None,
        }
    }
}

impl ConfigEntity for ConfigNode {
    fn core(&self) -> &EntityCore {
        match self {
            ConfigNode::Maven(m) => m.core(),
            ConfigNode::Snap(s) => s.core(),
            ConfigNode::Hooks(h) => h.core(),
        }
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        match self {
            ConfigNode::Maven(m) => m.core_mut(),
            ConfigNode::Snap(s) => s.core_mut(),
            ConfigNode::Hooks(h) => h.core_mut(),
        }
    }

    /// # Panics
    ///
    /// Panics if `source` is a different variant.
    fn merge(&mut self, source: &Self) {
        match (self, source) {
            (ConfigNode::Maven(a), ConfigNode::Maven(b)) => a.merge(b),
            (ConfigNode::Snap(a), ConfigNode::Snap(b)) => a.merge(b),
            (ConfigNode::Hooks(a), ConfigNode::Hooks(b)) => a.merge(b),
            (target, source) => panic!(
                "cannot merge a {} entity into a {} entity",
                source.kind(),
                target.kind()
            ),
        }
    }

    fn is_set(&self) -> bool {
        match self {
            ConfigNode::Maven(m) => m.is_set(),
            ConfigNode::Snap(s) => s.is_set(),
            ConfigNode::Hooks(h) => h.is_set(),
        }
    }

    fn as_map(&self, full: bool, project: &Project) -> Map<String, Value> {
        match self {
            ConfigNode::Maven(m) => m.as_map(full, project),
            ConfigNode::Snap(s) => s.as_map(full, project),
            ConfigNode::Hooks(h) => h.as_map(full, project),
        }
    }
}
