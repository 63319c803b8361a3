//! Distribution target identities.

use crate::model::EntityKind;
use std::fmt;

/// Identity of one distribution target.
///
/// Snap targets are named after their distribution, deployer targets after
/// the deployer.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetId {
    pub name: String,
    pub kind: EntityKind,
}

impl TargetId {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether the name refers to a distribution rather than a deployer.
    pub fn is_distribution(&self) -> bool {
        self.kind == EntityKind::Snap
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// A target together with its resolved activation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub enabled: bool,
}
