//! Layered configuration resolution through the public API.

use kodegen_bundler_distribute::config::{
    ConfigLayer, EffectiveConfigBuilder, LayerOrigin, defaults_layer, environment_layer,
    parse_layer,
};
use kodegen_bundler_distribute::EffectiveConfig;
use kodegen_bundler_distribute::error::ConfigError;
use kodegen_bundler_distribute::model::{ConfigEntity, EntityKind, HIDE, MavenDeployer, Project};
use serde_json::json;
use std::path::Path;

const PROJECT: &str = r#"
[project]
name = "app"
version = "1.0.0"

[packagers.snap]
grade = "devel"

[[deployers.maven]]
type = "nexus2"
name = "main"
active = "release"
url = "https://oss.example.com/service/local"
connect-timeout = 30
staging-repositories = ["target/staging-deploy"]

[[distributions]]
name = "app"

[distributions.snap]
confinement = "classic"
"#;

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn resolve(cli: ConfigLayer, env: &[(&str, &str)]) -> Result<EffectiveConfig, ConfigError> {
    let file = parse_layer(PROJECT, Path::new("release.toml"))?;
    let identities = file.identities();
    EffectiveConfigBuilder::new()
        .layer(cli)
        .layer(environment_layer(vars(env), &identities))
        .layer(file)
        .layer(defaults_layer(&identities))
        .build()
}

#[test]
fn test_layers_resolve_most_specific_first() {
    let cli = ConfigLayer::new(LayerOrigin::Cli).with_project(Project {
        version: Some("2.0.0".into()),
        ..Default::default()
    });
    let config = resolve(
        cli,
        &[
            ("RELEASE_PROJECT_VERSION", "1.5.0"),
            ("RELEASE_NEXUS2_MAIN_USERNAME", "bot"),
            ("RELEASE_NEXUS2_MAIN_PASSWORD", "hunter2"),
        ],
    )
    .unwrap();

    assert_eq!(config.project().version(), "2.0.0");

    let main = config.maven("main").unwrap();
    assert_eq!(main.username(), Some("bot"));
    assert_eq!(main.password(), Some("hunter2"));
    assert_eq!(main.connect_timeout, 30);
    assert_eq!(main.read_timeout, 60);
    assert!(main.activation().is_explicit());
    assert!(main.is_enabled(config.project()));
}

#[test]
fn test_environment_fills_gaps_only() {
    let config = resolve(
        ConfigLayer::new(LayerOrigin::Cli),
        &[("RELEASE_PROJECT_VERSION", "1.5.0-SNAPSHOT")],
    )
    .unwrap();

    assert_eq!(config.project().version(), "1.5.0-SNAPSHOT");
    assert!(config.project().is_snapshot());
    // active = "release" does not hold for snapshots
    assert!(!config.maven("main").unwrap().is_enabled(config.project()));
}

#[test]
fn test_environment_never_declares_targets() {
    let config = resolve(
        ConfigLayer::new(LayerOrigin::Cli),
        &[("RELEASE_ARTIFACTORY_CORP_PASSWORD", "x")],
    )
    .unwrap();

    assert!(config.get(EntityKind::Artifactory, "corp").is_none());
    assert_eq!(config.targets().len(), 2);
}

#[test]
fn test_distribution_override_beats_global_snap() {
    let config = resolve(ConfigLayer::new(LayerOrigin::Cli), &[]).unwrap();

    let snap = config.snap_for("app").unwrap();
    assert_eq!(snap.confinement(), "classic");
    assert_eq!(snap.grade(), "devel");
    assert_eq!(snap.base(), "core20");
    assert_eq!(snap.name(), "snap");
    assert_eq!(config.snap().unwrap().confinement(), "strict");
}

#[test]
fn test_invalid_cli_version_aborts() {
    let cli = ConfigLayer::new(LayerOrigin::Cli).with_project(Project {
        version: Some("not-a-version".into()),
        ..Default::default()
    });
    let err = resolve(cli, &[]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidVersion { .. }));
}

#[test]
fn test_printed_configuration_masks_credentials() {
    let config = resolve(
        ConfigLayer::new(LayerOrigin::Cli),
        &[("RELEASE_NEXUS2_MAIN_PASSWORD", "hunter2")],
    )
    .unwrap();

    let printed = serde_json::to_string(&config.as_map(true)).unwrap();
    assert!(!printed.contains("hunter2"));
    assert_eq!(config.as_map(true)["deployers"]["main"]["password"], HIDE);
}

#[test]
fn test_deployer_extra_properties_union() {
    let mut target = MavenDeployer::new(EntityKind::Artifactory, "corp");
    target
        .core_mut()
        .extra_properties
        .insert("x".into(), json!(1));
    let mut source = MavenDeployer::new(EntityKind::Artifactory, "corp");
    source.core_mut().extra_properties.insert("x".into(), json!(2));
    source.core_mut().extra_properties.insert("y".into(), json!(3));

    target.merge(&source);
    let once = target.clone();
    target.merge(&source);

    assert_eq!(
        serde_json::Value::Object(target.extra_properties().clone()),
        json!({ "x": 1, "y": 3 })
    );
    let keys: Vec<&str> = target.extra_properties().keys().map(String::as_str).collect();
    assert_eq!(keys, ["x", "y"]);
    assert_eq!(target, once);
}
