//! Project and release-service records.

use crate::error::ConfigError;
use crate::model::{
    Flag,
    merge::{is_blank, merge_ordered_set, merge_text},
};
use serde_json::{Map, Value, json};

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// The project being released.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Project {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub authors: Vec<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,
    /// Forces snapshot semantics regardless of the version string
    pub snapshot: Flag,
}

impl Project {
    /// Project name, empty when unset.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Version string, empty when unset.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or_default()
    }

    /// Snapshot versions end in `-SNAPSHOT` or carry an explicit flag.
    pub fn is_snapshot(&self) -> bool {
        self.snapshot.get() || self.version().ends_with(SNAPSHOT_SUFFIX)
    }

    /// A version with a semver pre-release tag that is not a snapshot.
    pub fn is_prerelease(&self) -> bool {
        if self.is_snapshot() {
            return false;
        }
        semver::Version::parse(self.version())
            .map(|v| !v.pre.is_empty())
            .unwrap_or(false)
    }

    /// Parse the version as semver.
    pub fn semver(&self) -> Result<semver::Version, ConfigError> {
        semver::Version::parse(self.version()).map_err(|source| ConfigError::InvalidVersion {
            version: self.version().to_string(),
            source,
        })
    }

    /// Check the fields every release needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_blank(self.name.as_deref()) {
            return Err(ConfigError::MissingField {
                field: "project.name".to_string(),
            });
        }
        if is_blank(self.version.as_deref()) {
            return Err(ConfigError::MissingField {
                field: "project.version".to_string(),
            });
        }
        self.semver().map(|_| ())
    }

    pub fn merge(&mut self, source: &Project) {
        merge_text(&mut self.name, &source.name);
        merge_text(&mut self.version, &source.version);
        merge_text(&mut self.description, &source.description);
        merge_text(&mut self.long_description, &source.long_description);
        merge_ordered_set(&mut self.authors, &source.authors);
        merge_text(&mut self.license, &source.license);
        merge_text(&mut self.homepage, &source.homepage);
        self.snapshot.merge(source.snapshot);
    }

    pub fn as_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), json!(self.name()));
        map.insert("version".into(), json!(self.version()));
        map.insert("snapshot".into(), json!(self.is_snapshot()));
        map.insert("description".into(), json!(self.description));
        map.insert("longDescription".into(), json!(self.long_description));
        map.insert("authors".into(), json!(self.authors));
        map.insert("license".into(), json!(self.license));
        map.insert("homepage".into(), json!(self.homepage));
        map
    }
}

/// Where releases are hosted and how remote builds are published.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReleaseService {
    /// Hosting service, `github.com` when unset
    pub host: Option<String>,
    pub owner: Option<String>,
    /// Repository name, the project name when unset
    pub name: Option<String>,
    /// External command invoked by the release publisher
    pub publish_command: Vec<String>,
}

impl ReleaseService {
    pub const DEFAULT_HOST: &'static str = "github.com";

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(Self::DEFAULT_HOST)
    }

    /// Browser URL of `owner/name` on the hosting service.
    pub fn repo_url(&self, owner: &str, name: &str) -> String {
        format!("https://{}/{}/{}", self.host(), owner, name)
    }

    /// Clone URL of `owner/name` on the hosting service.
    pub fn clone_url(&self, owner: &str, name: &str) -> String {
        format!("{}.git", self.repo_url(owner, name))
    }

    pub fn merge(&mut self, source: &ReleaseService) {
        merge_text(&mut self.host, &source.host);
        merge_text(&mut self.owner, &source.owner);
        merge_text(&mut self.name, &source.name);
        if self.publish_command.is_empty() {
            self.publish_command.clone_from(&source.publish_command);
        }
    }

    pub fn as_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("host".into(), json!(self.host()));
        map.insert("owner".into(), json!(self.owner));
        map.insert("name".into(), json!(self.name));
        map.insert("publishCommand".into(), json!(self.publish_command));
        map
    }
}
