//! Distribution record.

use crate::model::{
    ConfigEntity, SnapPackager,
    merge::{merge_map, merge_ordered_set, merge_text},
};
use serde_json::{Map, Value, json};

/// A named artifact the release distributes, with per-tool overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Distribution {
    pub name: String,
    pub executable: Option<String>,
    /// Artifact paths relative to the project directory
    pub artifacts: Vec<String>,
    /// Overrides merged over the global snap packager
    pub snap: Option<SnapPackager>,
    pub extra_properties: Map<String, Value>,
}

impl Distribution {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Executable name, the distribution name when unset.
    pub fn executable(&self) -> &str {
        self.executable.as_deref().unwrap_or(&self.name)
    }

    pub fn merge(&mut self, source: &Distribution) {
        if self.name.is_empty() {
            self.name.clone_from(&source.name);
        }
        merge_text(&mut self.executable, &source.executable);
        merge_ordered_set(&mut self.artifacts, &source.artifacts);
        match (&mut self.snap, &source.snap) {
            (Some(target), Some(source)) => target.merge(source),
            (None, Some(source)) => self.snap = Some(source.clone()),
            _ => {}
        }
        merge_map(&mut self.extra_properties, &source.extra_properties);
    }

    pub fn as_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("executable".into(), json!(self.executable()));
        map.insert("artifacts".into(), json!(self.artifacts));
        map.insert(
            "extraProperties".into(),
            Value::Object(self.extra_properties.clone()),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_fills_snap_override() {
        let mut target = Distribution::new("cli");
        let mut source = Distribution::new("cli");
        let mut snap = SnapPackager::new("snap");
        snap.grade = Some("devel".into());
        source.snap = Some(snap);
        source.executable = Some("cli-bin".into());

        target.merge(&source);
        assert_eq!(target.executable(), "cli-bin");
        assert_eq!(
            target.snap.as_ref().and_then(|s| s.grade.as_deref()),
            Some("devel")
        );
    }
}
