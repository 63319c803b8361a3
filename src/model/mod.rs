//! Configuration model.
//!
//! Every configurable thing (deployers, packagers, hooks) is a
//! [`ConfigEntity`]: it has an identity (`kind` + `name`), an
//! [`Activation`], an insertion-ordered map of extra properties and a
//! `merge` operation in which the receiver wins for anything it has set.
//!
//! The concrete variants form the closed [`ConfigNode`] set and share their
//! common fields through [`EntityCore`] rather than through inheritance.

mod active;
mod distribution;
mod entity;
mod flag;
mod hooks;
mod maven;
pub(crate) mod merge;
mod project;
mod snap;

pub use active::{Activation, Active};
pub use distribution::Distribution;
pub use entity::{ConfigEntity, ConfigNode, EntityCore, EntityKind};
pub use flag::Flag;
pub use hooks::{CommandHook, CommandHooks, HookPhase, Hooks};
pub use maven::{
    Authorization, Credentials, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, MavenDeployer,
};
pub use project::{Project, ReleaseService};
pub use snap::{
    DEFAULT_BASE, DEFAULT_CONFINEMENT, DEFAULT_GRADE, DEFAULT_TEMPLATE_DIRECTORY, SnapInterface,
    SnapPackager, SnapRepository,
};

use serde_json::Value;

/// Printed in place of a configured secret.
pub const HIDE: &str = "************";

/// Printed in place of a secret that was never configured.
pub const UNSET: &str = "**unset**";

/// Printable stand-in for a secret: never the secret itself.
pub(crate) fn mask_secret(value: Option<&str>) -> Value {
    match value {
        Some(v) if !v.trim().is_empty() => Value::from(HIDE),
        _ => Value::from(UNSET),
    }
}
