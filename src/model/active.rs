//! Activation: when an entity takes part in a release.

use crate::error::ConfigError;
use crate::model::Project;
use std::{fmt, str::FromStr};

/// Release kinds an entity is active for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Active {
    /// Every run
    Always,
    /// Never
    Never,
    /// Final releases only (neither snapshot nor pre-release)
    Release,
    /// Pre-releases only (`1.0.0-rc.1`)
    Prerelease,
    /// Anything that is not a snapshot
    ReleasePrerelease,
    /// Snapshots only (`1.0.0-SNAPSHOT`)
    Snapshot,
}

impl Active {
    /// Upper-case literal used in printed configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Active::Always => "ALWAYS",
            Active::Never => "NEVER",
            Active::Release => "RELEASE",
            Active::Prerelease => "PRERELEASE",
            Active::ReleasePrerelease => "RELEASE_PRERELEASE",
            Active::Snapshot => "SNAPSHOT",
        }
    }

    /// Resolve against the project being released.
    pub fn check(&self, project: &Project) -> bool {
        match self {
            Active::Always => true,
            Active::Never => false,
            Active::Release => !project.is_snapshot() && !project.is_prerelease(),
            Active::Prerelease => project.is_prerelease(),
            Active::ReleasePrerelease => !project.is_snapshot(),
            Active::Snapshot => project.is_snapshot(),
        }
    }
}

impl FromStr for Active {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "ALWAYS" => Ok(Active::Always),
            "NEVER" => Ok(Active::Never),
            "RELEASE" => Ok(Active::Release),
            "PRERELEASE" => Ok(Active::Prerelease),
            "RELEASE_PRERELEASE" => Ok(Active::ReleasePrerelease),
            "SNAPSHOT" => Ok(Active::Snapshot),
            _ => Err(ConfigError::InvalidValue {
                field: "active".to_string(),
                value: s.to_string(),
                reason: "expected one of always, never, release, prerelease, \
                         release-prerelease, snapshot"
                    .to_string(),
            }),
        }
    }
}

impl fmt::Display for Active {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activation of one entity together with whether it was configured explicitly.
///
/// An explicit activation is never replaced by a merge; a defaulted one
/// adopts whatever the merge source carries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Activation {
    active: Active,
    explicit: bool,
}

impl Activation {
    /// Activation that came from an entity's built-in default.
    pub const fn defaulted(active: Active) -> Self {
        Self {
            active,
            explicit: false,
        }
    }

    /// Activation that was configured by a layer.
    pub const fn explicit(active: Active) -> Self {
        Self {
            active,
            explicit: true,
        }
    }

    /// Current value
    pub fn active(&self) -> Active {
        self.active
    }

    /// Whether a layer configured this activation
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Configure the activation; it becomes explicit.
    pub fn set(&mut self, active: Active) {
        self.active = active;
        self.explicit = true;
    }

    /// Adopt `source` unless this activation is explicit.
    pub fn merge(&mut self, source: &Activation) {
        if !self.explicit {
            *self = *source;
        }
    }

    /// Whether the entity is enabled for `project`.
    pub fn is_enabled(&self, project: &Project) -> bool {
        self.active.check(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(version: &str) -> Project {
        Project {
            name: Some("app".into()),
            version: Some(version.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!("always".parse::<Active>().unwrap(), Active::Always);
        assert_eq!(
            "release-prerelease".parse::<Active>().unwrap(),
            Active::ReleasePrerelease
        );
        assert_eq!(" Snapshot ".parse::<Active>().unwrap(), Active::Snapshot);
        assert!("sometimes".parse::<Active>().is_err());
    }

    #[test]
    fn test_check_against_versions() {
        let release = project("1.2.0");
        let snapshot = project("1.3.0-SNAPSHOT");
        let rc = project("1.3.0-rc.1");

        assert!(Active::Release.check(&release));
        assert!(!Active::Release.check(&snapshot));
        assert!(!Active::Release.check(&rc));
        assert!(Active::Snapshot.check(&snapshot));
        assert!(Active::Prerelease.check(&rc));
        assert!(Active::ReleasePrerelease.check(&rc));
        assert!(!Active::ReleasePrerelease.check(&snapshot));
        assert!(!Active::Never.check(&release));
    }

    #[test]
    fn test_explicit_activation_survives_merge() {
        let mut target = Activation::explicit(Active::Never);
        target.merge(&Activation::explicit(Active::Always));
        assert_eq!(target.active(), Active::Never);
        target.merge(&Activation::defaulted(Active::Snapshot));
        assert_eq!(target.active(), Active::Never);
        assert!(target.is_explicit());
    }

    #[test]
    fn test_defaulted_activation_adopts_source() {
        let mut target = Activation::defaulted(Active::Never);
        let source = Activation::explicit(Active::Release);
        target.merge(&source);
        assert_eq!(target, source);

        // merging again changes nothing
        target.merge(&source);
        assert_eq!(target, source);
    }
}
