//! Environment layer.
//!
//! Recognised variables:
//!
//! - `RELEASE_PROJECT_VERSION`
//! - `RELEASE_<KIND>_<NAME>_USERNAME` / `RELEASE_<KIND>_<NAME>_PASSWORD` for
//!   every deployer declared elsewhere, e.g. `RELEASE_NEXUS2_MAIN_PASSWORD`
//! - `RELEASE_SNAP_LOGIN`, the exported store login of the snap packager
//!
//! Variables only fill in entities another layer declares; the environment
//! never creates a target on its own.

use crate::config::{ConfigLayer, LayerOrigin};
use crate::model::{ConfigNode, EntityKind, MavenDeployer, Project, SnapPackager};
use std::collections::HashMap;

const PREFIX: &str = "RELEASE_";

fn env_name(kind: EntityKind, name: &str, suffix: &str) -> String {
    format!(
        "{PREFIX}{}_{}_{suffix}",
        kind.env_key(),
        name.to_ascii_uppercase().replace('-', "_")
    )
}

/// Build the environment layer from `vars` for the given entity identities.
pub fn environment_layer<I>(vars: I, identities: &[(EntityKind, String)]) -> ConfigLayer
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: HashMap<String, String> = vars
        .into_iter()
        .filter(|(k, v)| k.starts_with(PREFIX) && !v.trim().is_empty())
        .collect();
    let mut layer = ConfigLayer::new(LayerOrigin::Environment);

    if let Some(version) = vars.get("RELEASE_PROJECT_VERSION") {
        layer.project = Project {
            version: Some(version.clone()),
            ..Default::default()
        };
    }

    for (kind, name) in identities {
        if kind.is_maven_deployer() {
            let username = vars.get(&env_name(*kind, name, "USERNAME"));
            let password = vars.get(&env_name(*kind, name, "PASSWORD"));
            if username.is_none() && password.is_none() {
                continue;
            }
            let mut deployer = MavenDeployer::new(*kind, name.clone());
            deployer.credentials.username = username.cloned();
            deployer.credentials.password = password.cloned();
            layer.nodes.push(ConfigNode::Maven(deployer));
        } else if *kind == EntityKind::Snap {
            if let Some(login) = vars.get("RELEASE_SNAP_LOGIN") {
                let mut snap = SnapPackager::new(name.clone());
                snap.exported_login = Some(login.clone());
                layer.nodes.push(ConfigNode::Snap(snap));
            }
        }
    }

    log::debug!(
        "environment layer: {} node(s), version override: {}",
        layer.nodes.len(),
        layer.project.version.is_some()
    );
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfigEntity;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_credentials_for_declared_deployers() {
        let identities = vec![
            (EntityKind::MavenCentral, "central-repo".to_string()),
            (EntityKind::Nexus2, "other".to_string()),
        ];
        let layer = environment_layer(
            vars(&[
                ("RELEASE_MAVEN_CENTRAL_CENTRAL_REPO_USERNAME", "bot"),
                ("RELEASE_MAVEN_CENTRAL_CENTRAL_REPO_PASSWORD", "pw"),
                ("RELEASE_NEXUS2_UNDECLARED_PASSWORD", "nope"),
            ]),
            &identities,
        );

        assert_eq!(layer.nodes.len(), 1);
        let deployer = layer.nodes[0].as_maven().unwrap();
        assert_eq!(deployer.name(), "central-repo");
        assert_eq!(deployer.username(), Some("bot"));
        assert_eq!(deployer.password(), Some("pw"));
        assert!(!deployer.activation().is_explicit());
    }

    #[test]
    fn test_version_and_snap_login() {
        let identities = vec![(EntityKind::Snap, "snap".to_string())];
        let layer = environment_layer(
            vars(&[
                ("RELEASE_PROJECT_VERSION", "2.0.0"),
                ("RELEASE_SNAP_LOGIN", "/secrets/snap.login"),
                ("HOME", "/root"),
            ]),
            &identities,
        );
        assert_eq!(layer.project.version(), "2.0.0");
        let snap = layer.nodes[0].as_snap().unwrap();
        assert_eq!(snap.exported_login.as_deref(), Some("/secrets/snap.login"));
    }

    #[test]
    fn test_snap_login_without_snap_is_ignored() {
        let layer = environment_layer(vars(&[("RELEASE_SNAP_LOGIN", "x")]), &[]);
        assert!(layer.nodes.is_empty());
    }
}
