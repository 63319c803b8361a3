//! Property bag assembled for templates and publishers.

use crate::config::{EffectiveConfig, TargetId};
use crate::pipeline::StagingDirs;
use serde_json::{Value, json};

pub use crate::templates::Props;

/// Keys shared by every tool.
pub mod keys {
    pub const PROJECT_NAME: &str = "projectName";
    pub const PROJECT_VERSION: &str = "projectVersion";
    pub const PROJECT_DESCRIPTION: &str = "projectDescription";
    pub const PROJECT_LONG_DESCRIPTION: &str = "projectLongDescription";
    pub const PROJECT_LICENSE: &str = "projectLicense";
    pub const PROJECT_HOMEPAGE: &str = "projectHomepage";
    pub const PROJECT_AUTHORS: &str = "projectAuthors";
    pub const DISTRIBUTION_NAME: &str = "distributionName";
    pub const DISTRIBUTION_EXECUTABLE: &str = "distributionExecutable";
    pub const PREPARE_DIRECTORY: &str = "prepareDirectory";
    pub const PACKAGE_DIRECTORY: &str = "packageDirectory";

    pub const SNAP_REPO_URL: &str = "snapRepoUrl";
    pub const SNAP_REPO_CLONE_URL: &str = "snapRepoCloneUrl";
    pub const SNAP_BASE: &str = "snapBase";
    pub const SNAP_GRADE: &str = "snapGrade";
    pub const SNAP_CONFINEMENT: &str = "snapConfinement";
    pub const SNAP_HAS_PLUGS: &str = "snapHasPlugs";
    pub const SNAP_PLUGS: &str = "snapPlugs";
    pub const SNAP_HAS_SLOTS: &str = "snapHasSlots";
    pub const SNAP_SLOTS: &str = "snapSlots";
    pub const SNAP_HAS_LOCAL_PLUGS: &str = "snapHasLocalPlugs";
    pub const SNAP_LOCAL_PLUGS: &str = "snapLocalPlugs";
    pub const SNAP_HAS_LOCAL_SLOTS: &str = "snapHasLocalSlots";
    pub const SNAP_LOCAL_SLOTS: &str = "snapLocalSlots";
}

/// Properties every pipeline starts from.
///
/// Distribution keys and extra properties are only present when the target
/// belongs to a distribution.
pub fn base_properties(config: &EffectiveConfig, target: &TargetId, dirs: &StagingDirs) -> Props {
    let project = config.project();
    let description = project.description.clone().unwrap_or_default();
    let long_description = project
        .long_description
        .clone()
        .unwrap_or_else(|| description.clone());

    let mut props = Props::new();
    props.insert(keys::PROJECT_NAME.into(), json!(project.name()));
    props.insert(keys::PROJECT_VERSION.into(), json!(project.version()));
    props.insert(keys::PROJECT_DESCRIPTION.into(), json!(description));
    props.insert(
        keys::PROJECT_LONG_DESCRIPTION.into(),
        json!(indent_block(&long_description)),
    );
    props.insert(keys::PROJECT_LICENSE.into(), json!(project.license));
    props.insert(keys::PROJECT_HOMEPAGE.into(), json!(project.homepage));
    props.insert(keys::PROJECT_AUTHORS.into(), json!(project.authors));
    props.insert(
        keys::PREPARE_DIRECTORY.into(),
        Value::from(dirs.prepare.display().to_string()),
    );
    props.insert(
        keys::PACKAGE_DIRECTORY.into(),
        Value::from(dirs.package.display().to_string()),
    );

    if target.is_distribution()
        && let Some(distribution) = config.distribution(&target.name)
    {
        props.insert(keys::DISTRIBUTION_NAME.into(), json!(distribution.name));
        props.insert(
            keys::DISTRIBUTION_EXECUTABLE.into(),
            json!(distribution.executable()),
        );
        for (key, value) in &distribution.extra_properties {
            props.insert(key.clone(), value.clone());
        }
    }
    props
}

/// Format text as a YAML literal block scalar: `|` then every line
/// indented by two spaces.
pub fn indent_block(text: &str) -> String {
    let body: Vec<String> = text.lines().map(|line| format!("  {line}")).collect();
    format!("|\n{}", body.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffectiveConfigBuilder, parse_layer};
    use crate::model::EntityKind;
    use std::path::{Path, PathBuf};

    const SHARED_NAME: &str = r#"
[project]
name = "app"
version = "1.0.0"

[[deployers.maven]]
type = "nexus2"
name = "app"
url = "https://repo.example.com/{{repo}}"

[[distributions]]
name = "app"
executable = "app-bin"

[distributions.extra-properties]
repo = "from-distribution"
"#;

    fn dirs() -> StagingDirs {
        StagingDirs {
            prepare: PathBuf::from("/out/prepare"),
            package: PathBuf::from("/out/package"),
        }
    }

    #[test]
    fn test_indent_block() {
        assert_eq!(indent_block("one\ntwo"), "|\n  one\n  two");
        assert_eq!(indent_block(""), "|\n");
    }

    #[test]
    fn test_distribution_keys_only_for_distribution_targets() {
        let layer = parse_layer(SHARED_NAME, Path::new("release.toml")).unwrap();
        let config = EffectiveConfigBuilder::new().layer(layer).build().unwrap();

        let snap = base_properties(&config, &TargetId::new("app", EntityKind::Snap), &dirs());
        assert_eq!(snap[keys::DISTRIBUTION_EXECUTABLE], "app-bin");
        assert_eq!(snap["repo"], "from-distribution");

        let deployer =
            base_properties(&config, &TargetId::new("app", EntityKind::Nexus2), &dirs());
        assert!(!deployer.contains_key(keys::DISTRIBUTION_NAME));
        assert!(!deployer.contains_key("repo"));
        assert_eq!(deployer[keys::PROJECT_NAME], "app");
    }
}
