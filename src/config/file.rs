//! `release.toml` project file.
//!
//! ```toml
//! [project]
//! name = "app"
//! version = "1.2.0"
//!
//! [packagers.snap]
//! grade = "devel"
//! local-plugs = ["network"]
//!
//! [[deployers.maven]]
//! type = "nexus2"
//! name = "main"
//! active = "release"
//! url = "https://oss.example.com/{{owner}}"
//! staging-repositories = ["target/staging-deploy"]
//!
//! [[distributions]]
//! name = "app-cli"
//! executable = "app"
//! ```

use crate::config::{ConfigLayer, LayerOrigin};
use crate::error::ConfigError;
use crate::model::{
    Activation, Active, CommandHook, ConfigEntity, ConfigNode, Distribution, EntityKind, Flag,
    Hooks, MavenDeployer, Project, ReleaseService, SnapInterface, SnapPackager, SnapRepository,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ProjectFile {
    #[serde(default)]
    project: ProjectSection,
    #[serde(default)]
    release: ReleaseSection,
    hooks: Option<HooksSection>,
    #[serde(default)]
    packagers: PackagersSection,
    #[serde(default)]
    deployers: DeployersSection,
    #[serde(default)]
    distributions: Vec<DistributionSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ProjectSection {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    long_description: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    license: Option<String>,
    homepage: Option<String>,
    snapshot: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ReleaseSection {
    host: Option<String>,
    owner: Option<String>,
    name: Option<String>,
    #[serde(default)]
    publish_command: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct HooksSection {
    active: Option<String>,
    command: Option<CommandHooksSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CommandHooksSection {
    active: Option<String>,
    #[serde(default)]
    before: Vec<CommandHookSection>,
    #[serde(default)]
    success: Vec<CommandHookSection>,
    #[serde(default)]
    failure: Vec<CommandHookSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CommandHookSection {
    cmd: Vec<String>,
    #[serde(default)]
    platforms: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PackagersSection {
    snap: Option<SnapSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SnapSection {
    active: Option<String>,
    base: Option<String>,
    grade: Option<String>,
    confinement: Option<String>,
    #[serde(default)]
    plugs: Vec<InterfaceSection>,
    #[serde(default)]
    slots: Vec<InterfaceSection>,
    #[serde(default)]
    local_plugs: Vec<String>,
    #[serde(default)]
    local_slots: Vec<String>,
    exported_login: Option<String>,
    remote_build: Option<bool>,
    template_directory: Option<PathBuf>,
    repository: Option<RepositorySection>,
    #[serde(default)]
    extra_properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct InterfaceSection {
    name: String,
    #[serde(default)]
    attributes: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RepositorySection {
    owner: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct DeployersSection {
    #[serde(default)]
    maven: Vec<MavenSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct MavenSection {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    active: Option<String>,
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    authorization: Option<String>,
    connect_timeout: Option<u32>,
    read_timeout: Option<u32>,
    sign: Option<bool>,
    verify_pom: Option<bool>,
    apply_maven_central_rules: Option<bool>,
    #[serde(default)]
    staging_repositories: Vec<String>,
    #[serde(default)]
    extra_properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct DistributionSection {
    name: String,
    executable: Option<String>,
    #[serde(default)]
    artifacts: Vec<String>,
    snap: Option<SnapSection>,
    #[serde(default)]
    extra_properties: Map<String, Value>,
}

/// Read and convert a project file.
pub fn load_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layer(&text, path)
}

/// Parse project file contents; `path` is only used in error messages.
pub fn parse_layer(text: &str, path: &Path) -> Result<ConfigLayer, ConfigError> {
    let file: ProjectFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    file.into_layer()
}

fn activation(value: Option<&str>, target: &mut Activation) -> Result<(), ConfigError> {
    if let Some(literal) = value {
        target.set(literal.parse::<Active>()?);
    }
    Ok(())
}

impl ProjectFile {
    fn into_layer(self) -> Result<ConfigLayer, ConfigError> {
        let mut layer = ConfigLayer::new(LayerOrigin::ProjectFile);
        layer.project = Project {
            name: self.project.name,
            version: self.project.version,
            description: self.project.description,
            long_description: self.project.long_description,
            authors: self.project.authors,
            license: self.project.license,
            homepage: self.project.homepage,
            snapshot: Flag::from(self.project.snapshot),
        };
        layer.release = ReleaseService {
            host: self.release.host,
            owner: self.release.owner,
            name: self.release.name,
            publish_command: self.release.publish_command,
        };

        if let Some(hooks) = self.hooks {
            layer.nodes.push(ConfigNode::Hooks(hooks.into_hooks()?));
        }
        if let Some(snap) = self.packagers.snap {
            layer
                .nodes
                .push(ConfigNode::Snap(snap.into_packager("snap")?));
        }
        for maven in self.deployers.maven {
            layer.nodes.push(ConfigNode::Maven(maven.into_deployer()?));
        }
        for distribution in self.distributions {
            layer.distributions.push(distribution.into_distribution()?);
        }
        Ok(layer)
    }
}

impl HooksSection {
    fn into_hooks(self) -> Result<Hooks, ConfigError> {
        let mut hooks = Hooks::new();
        activation(self.active.as_deref(), &mut hooks.core_mut().activation)?;
        if let Some(command) = self.command {
            activation(
                command.active.as_deref(),
                &mut hooks.command.core_mut().activation,
            )?;
            let convert = |list: Vec<CommandHookSection>| -> Vec<CommandHook> {
                list.into_iter()
                    .map(|h| CommandHook {
                        cmd: h.cmd,
                        platforms: h.platforms,
                    })
                    .collect()
            };
            hooks.command.before = convert(command.before);
            hooks.command.success = convert(command.success);
            hooks.command.failure = convert(command.failure);
        }
        Ok(hooks)
    }
}

impl SnapSection {
    fn into_packager(self, name: &str) -> Result<SnapPackager, ConfigError> {
        let mut snap = SnapPackager::new(name);
        activation(self.active.as_deref(), &mut snap.core_mut().activation)?;
        snap.core_mut().extra_properties = self.extra_properties;
        snap.base = self.base;
        snap.grade = self.grade;
        snap.confinement = self.confinement;
        snap.plugs = self.plugs.into_iter().map(InterfaceSection::into_interface).collect();
        snap.slots = self.slots.into_iter().map(InterfaceSection::into_interface).collect();
        snap.local_plugs = self.local_plugs;
        snap.local_slots = self.local_slots;
        snap.exported_login = self.exported_login;
        snap.remote_build = Flag::from(self.remote_build);
        snap.template_directory = self.template_directory;
        if let Some(repo) = self.repository {
            snap.repository = SnapRepository {
                owner: repo.owner,
                name: repo.name,
            };
        }
        Ok(snap)
    }
}

impl InterfaceSection {
    fn into_interface(self) -> SnapInterface {
        SnapInterface {
            name: self.name,
            attributes: self.attributes,
        }
    }
}

impl MavenSection {
    fn into_deployer(self) -> Result<MavenDeployer, ConfigError> {
        let kind: EntityKind = self.kind.parse()?;
        if !kind.is_maven_deployer() {
            return Err(ConfigError::InvalidValue {
                field: "deployers.maven.type".to_string(),
                value: self.kind,
                reason: "not a maven deployer kind".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "deployers.maven.name".to_string(),
            });
        }

        let mut deployer = MavenDeployer::new(kind, self.name);
        activation(self.active.as_deref(), &mut deployer.core_mut().activation)?;
        deployer.core_mut().extra_properties = self.extra_properties;
        deployer.url = self.url;
        deployer.credentials.username = self.username;
        deployer.credentials.password = self.password;
        deployer.authorization = self.authorization.as_deref().map(str::parse).transpose()?;
        deployer.connect_timeout = self.connect_timeout.unwrap_or_default();
        deployer.read_timeout = self.read_timeout.unwrap_or_default();
        deployer.sign = Flag::from(self.sign);
        deployer.verify_pom = Flag::from(self.verify_pom);
        deployer.apply_maven_central_rules = Flag::from(self.apply_maven_central_rules);
        deployer.staging_repositories = self.staging_repositories;
        Ok(deployer)
    }
}

impl DistributionSection {
    fn into_distribution(self) -> Result<Distribution, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "distributions.name".to_string(),
            });
        }
        Ok(Distribution {
            name: self.name,
            executable: self.executable,
            artifacts: self.artifacts,
            snap: self.snap.map(|s| s.into_packager("")).transpose()?,
            extra_properties: self.extra_properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Authorization;

    const SAMPLE: &str = r#"
[project]
name = "app"
version = "1.2.0"
long-description = "First line\nSecond line"

[release]
owner = "acme"
publish-command = ["publish-tool", "--verbose"]

[hooks.command]
before = [{ cmd = ["echo", "starting"] }]

[packagers.snap]
grade = "devel"
local-plugs = ["network", "home"]

[packagers.snap.extra-properties]
zeta = 1
alpha = 2

[[deployers.maven]]
type = "nexus2"
name = "main"
active = "release"
url = "https://oss.example.com/{{owner}}"
authorization = "bearer"
connect-timeout = 30
staging-repositories = ["target/staging-deploy"]

[[distributions]]
name = "app-cli"
executable = "app"

[distributions.snap]
confinement = "classic"
"#;

    #[test]
    fn test_parse_sample() {
        let layer = parse_layer(SAMPLE, Path::new("release.toml")).unwrap();
        assert_eq!(layer.origin, LayerOrigin::ProjectFile);
        assert_eq!(layer.project.name(), "app");
        assert_eq!(layer.release.publish_command.len(), 2);
        assert_eq!(layer.nodes.len(), 3);

        let maven = layer.nodes.iter().find_map(ConfigNode::as_maven).unwrap();
        assert_eq!(maven.kind(), EntityKind::Nexus2);
        assert_eq!(maven.connect_timeout, 30);
        assert_eq!(maven.read_timeout, 0);
        assert_eq!(maven.authorization, Some(Authorization::Bearer));
        assert!(maven.activation().is_explicit());

        let snap = layer.nodes.iter().find_map(ConfigNode::as_snap).unwrap();
        assert_eq!(snap.grade(), "devel");
        assert!(!snap.activation().is_explicit());
        let keys: Vec<&str> = snap.extra_properties().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);

        let dist = &layer.distributions[0];
        assert_eq!(dist.executable(), "app");
        assert_eq!(dist.snap.as_ref().unwrap().confinement(), "classic");
    }

    #[test]
    fn test_unknown_activation_literal() {
        let text = "[packagers.snap]\nactive = \"sometimes\"\n";
        let err = parse_layer(text, Path::new("release.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let text = "[project]\nnme = \"typo\"\n";
        let err = parse_layer(text, Path::new("release.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_non_maven_kind_is_rejected() {
        let text = "[[deployers.maven]]\ntype = \"snap\"\nname = \"x\"\n";
        let err = parse_layer(text, Path::new("release.toml")).unwrap_err();
        assert!(err.to_string().contains("not a maven deployer"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_layer(Path::new("/nonexistent/release.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
