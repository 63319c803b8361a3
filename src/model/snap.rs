//! Snap packager node.

use crate::model::{
    Active, ConfigEntity, EntityCore, EntityKind, Flag, Project,
    merge::{is_blank, merge_keyed, merge_option, merge_ordered_set, merge_text},
};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE: &str = "core20";
pub const DEFAULT_GRADE: &str = "stable";
pub const DEFAULT_CONFINEMENT: &str = "strict";

/// Template directory used when none is configured, relative to the project.
pub const DEFAULT_TEMPLATE_DIRECTORY: &str = "src/snap";

/// A plug or slot declaration with its attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapInterface {
    pub name: String,
    pub attributes: Map<String, Value>,
}

impl SnapInterface {
    fn to_value(&self) -> Value {
        json!({ "name": self.name, "attributes": self.attributes })
    }
}

/// Repository used to compose the repo URLs handed to templates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapRepository {
    pub owner: Option<String>,
    pub name: Option<String>,
}

/// Packages a distribution as a snap.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapPackager {
    core: EntityCore,
    pub base: Option<String>,
    pub grade: Option<String>,
    pub confinement: Option<String>,
    pub plugs: Vec<SnapInterface>,
    pub slots: Vec<SnapInterface>,
    pub local_plugs: Vec<String>,
    pub local_slots: Vec<String>,
    /// Credentials file handed to `snapcraft login --with`
    pub exported_login: Option<String>,
    pub remote_build: Flag,
    pub template_directory: Option<PathBuf>,
    pub repository: SnapRepository,
}

impl SnapPackager {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: EntityCore::new(EntityKind::Snap, name, Active::Always),
            base: None,
            grade: None,
            confinement: None,
            plugs: Vec::new(),
            slots: Vec::new(),
            local_plugs: Vec::new(),
            local_slots: Vec::new(),
            exported_login: None,
            remote_build: Flag::Unset,
            template_directory: None,
            repository: SnapRepository::default(),
        }
    }

    pub fn base(&self) -> &str {
        self.base.as_deref().unwrap_or(DEFAULT_BASE)
    }

    pub fn grade(&self) -> &str {
        self.grade.as_deref().unwrap_or(DEFAULT_GRADE)
    }

    pub fn confinement(&self) -> &str {
        self.confinement.as_deref().unwrap_or(DEFAULT_CONFINEMENT)
    }

    pub fn is_remote_build(&self) -> bool {
        self.remote_build.get()
    }

    /// Store channel a built snap is released to.
    pub fn channel(&self) -> &'static str {
        if self.grade() == "stable" { "stable" } else { "edge" }
    }

    pub fn template_directory(&self) -> &Path {
        self.template_directory
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_TEMPLATE_DIRECTORY))
    }

    pub fn has_exported_login(&self) -> bool {
        !is_blank(self.exported_login.as_deref())
    }
}

impl ConfigEntity for SnapPackager {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn merge(&mut self, source: &Self) {
        self.core.merge(&source.core);
        merge_text(&mut self.base, &source.base);
        merge_text(&mut self.grade, &source.grade);
        merge_text(&mut self.confinement, &source.confinement);
        merge_keyed(&mut self.plugs, &source.plugs, |p| p.name.clone());
        merge_keyed(&mut self.slots, &source.slots, |s| s.name.clone());
        merge_ordered_set(&mut self.local_plugs, &source.local_plugs);
        merge_ordered_set(&mut self.local_slots, &source.local_slots);
        merge_text(&mut self.exported_login, &source.exported_login);
        self.remote_build.merge(source.remote_build);
        merge_option(&mut self.template_directory, &source.template_directory);
        merge_text(&mut self.repository.owner, &source.repository.owner);
        merge_text(&mut self.repository.name, &source.repository.name);
    }

    fn is_set(&self) -> bool {
        self.core.is_set()
            || self.base.is_some()
            || self.grade.is_some()
            || self.confinement.is_some()
            || !self.plugs.is_empty()
            || !self.slots.is_empty()
            || !self.local_plugs.is_empty()
            || !self.local_slots.is_empty()
            || self.exported_login.is_some()
            || self.remote_build.is_set()
            || self.template_directory.is_some()
            || self.repository != SnapRepository::default()
    }

    fn as_map(&self, full: bool, project: &Project) -> Map<String, Value> {
        if !full && !self.is_enabled(project) {
            return Map::new();
        }

        let mut props = self.core.base_map(project);
        props.insert("base".into(), json!(self.base()));
        props.insert("grade".into(), json!(self.grade()));
        props.insert("confinement".into(), json!(self.confinement()));
        props.insert("exportedLogin".into(), json!(self.exported_login));
        props.insert("remoteBuild".into(), json!(self.is_remote_build()));
        props.insert(
            "templateDirectory".into(),
            json!(self.template_directory().display().to_string()),
        );
        props.insert(
            "plugs".into(),
            Value::Array(self.plugs.iter().map(SnapInterface::to_value).collect()),
        );
        props.insert(
            "slots".into(),
            Value::Array(self.slots.iter().map(SnapInterface::to_value).collect()),
        );
        props.insert("localPlugs".into(), json!(self.local_plugs));
        props.insert("localSlots".into(), json!(self.local_slots));
        props.insert(
            "repository".into(),
            json!({ "owner": self.repository.owner, "name": self.repository.name }),
        );
        props.insert(
            "extraProperties".into(),
            Value::Object(self.core.extra_properties.clone()),
        );

        let mut map = Map::new();
        map.insert(self.name().to_string(), Value::Object(props));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plug(name: &str, key: &str) -> SnapInterface {
        let mut attributes = Map::new();
        attributes.insert("interface".into(), json!(key));
        SnapInterface {
            name: name.into(),
            attributes,
        }
    }

    #[test]
    fn test_defaults_before_configuration() {
        let snap = SnapPackager::new("snap");
        assert_eq!(snap.base(), "core20");
        assert_eq!(snap.grade(), "stable");
        assert_eq!(snap.confinement(), "strict");
        assert_eq!(snap.template_directory(), Path::new("src/snap"));
        assert!(!snap.is_set());
        assert_eq!(snap.activation().active(), Active::Always);
    }

    #[test]
    fn test_plugs_merge_by_name() {
        let mut target = SnapPackager::new("snap");
        target.plugs = vec![plug("dot-config", "personal-files")];
        let mut source = SnapPackager::new("snap");
        source.plugs = vec![
            plug("dot-config", "system-files"),
            plug("network", "network"),
        ];

        target.merge(&source);
        assert_eq!(target.plugs.len(), 2);
        assert_eq!(target.plugs[0].attributes["interface"], "personal-files");
        assert_eq!(target.plugs[1].name, "network");
    }

    #[test]
    fn test_channel_follows_grade() {
        let mut snap = SnapPackager::new("snap");
        assert_eq!(snap.channel(), "stable");
        snap.grade = Some("devel".into());
        assert_eq!(snap.channel(), "edge");
    }

    #[test]
    fn test_remote_build_flag_keeps_target() {
        let mut target = SnapPackager::new("snap");
        target.remote_build = Flag::False;
        let mut source = SnapPackager::new("snap");
        source.remote_build = Flag::True;
        target.merge(&source);
        assert!(!target.is_remote_build());
        assert!(target.is_set());
    }
}
