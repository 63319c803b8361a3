//! Built-in defaults, merged last.

use crate::config::{ConfigLayer, LayerOrigin};
use crate::model::{
    ConfigNode, DEFAULT_BASE, DEFAULT_CONFINEMENT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_GRADE,
    DEFAULT_READ_TIMEOUT, EntityKind, MavenDeployer, SnapPackager,
};

/// Defaults for every declared entity.
///
/// Like the environment layer it never introduces an entity of its own, so
/// an undeclared packager does not become an enabled target.
pub fn defaults_layer(identities: &[(EntityKind, String)]) -> ConfigLayer {
    let mut layer = ConfigLayer::new(LayerOrigin::Defaults);
    for (kind, name) in identities {
        if kind.is_maven_deployer() {
            let mut deployer = MavenDeployer::new(*kind, name.clone());
            deployer.connect_timeout = DEFAULT_CONNECT_TIMEOUT;
            deployer.read_timeout = DEFAULT_READ_TIMEOUT;
            layer.nodes.push(ConfigNode::Maven(deployer));
        } else if *kind == EntityKind::Snap {
            let mut snap = SnapPackager::new(name.clone());
            snap.base = Some(DEFAULT_BASE.to_string());
            snap.grade = Some(DEFAULT_GRADE.to_string());
            snap.confinement = Some(DEFAULT_CONFINEMENT.to_string());
            layer.nodes.push(ConfigNode::Snap(snap));
        }
    }
    layer
}
