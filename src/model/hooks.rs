//! Hooks node: commands run around a release.

use crate::model::{
    Active, ConfigEntity, EntityCore, EntityKind, Project, merge::merge_ordered_set,
};
use crate::platform::Platform;
use serde_json::{Map, Value, json};

/// One external command run at a hook phase.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandHook {
    /// Program followed by its arguments
    pub cmd: Vec<String>,
    /// Platforms the hook runs on; empty means all
    pub platforms: Vec<String>,
}

impl CommandHook {
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| platform.matches(p))
    }

    fn to_value(&self) -> Value {
        json!({ "cmd": self.cmd, "platforms": self.platforms })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HookPhase {
    /// Once before any target runs
    Before,
    /// After all targets, when none failed
    Success,
    /// After all targets, when at least one failed
    Failure,
}

impl HookPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPhase::Before => "before",
            HookPhase::Success => "success",
            HookPhase::Failure => "failure",
        }
    }
}

/// Command hooks grouped by phase.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandHooks {
    core: EntityCore,
    pub before: Vec<CommandHook>,
    pub success: Vec<CommandHook>,
    pub failure: Vec<CommandHook>,
}

impl CommandHooks {
    pub fn new() -> Self {
        Self {
            core: EntityCore::new(EntityKind::CommandHooks, "command", Active::Always),
            before: Vec::new(),
            success: Vec::new(),
            failure: Vec::new(),
        }
    }

    pub fn phase(&self, phase: HookPhase) -> &[CommandHook] {
        match phase {
            HookPhase::Before => &self.before,
            HookPhase::Success => &self.success,
            HookPhase::Failure => &self.failure,
        }
    }
}

impl Default for CommandHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigEntity for CommandHooks {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn merge(&mut self, source: &Self) {
        self.core.merge(&source.core);
        merge_ordered_set(&mut self.before, &source.before);
        merge_ordered_set(&mut self.success, &source.success);
        merge_ordered_set(&mut self.failure, &source.failure);
    }

    fn is_set(&self) -> bool {
        self.core.is_set()
            || !self.before.is_empty()
            || !self.success.is_empty()
            || !self.failure.is_empty()
    }

    fn as_map(&self, full: bool, project: &Project) -> Map<String, Value> {
        if !full && !self.is_enabled(project) {
            return Map::new();
        }
        let list = |hooks: &[CommandHook]| {
            Value::Array(hooks.iter().map(CommandHook::to_value).collect())
        };

        let mut props = self.core.base_map(project);
        props.insert("before".into(), list(&self.before));
        props.insert("success".into(), list(&self.success));
        props.insert("failure".into(), list(&self.failure));

        let mut map = Map::new();
        map.insert(self.name().to_string(), Value::Object(props));
        map
    }
}

/// Root of the hooks subtree.
#[derive(Clone, Debug, PartialEq)]
pub struct Hooks {
    core: EntityCore,
    pub command: CommandHooks,
}

impl Hooks {
    pub fn new() -> Self {
        Self {
            core: EntityCore::new(EntityKind::Hooks, "hooks", Active::Always),
            command: CommandHooks::new(),
        }
    }

    /// Hooks of `phase` that run on `platform`, or none when disabled.
    pub fn commands_for(
        &self,
        phase: HookPhase,
        platform: Platform,
        project: &Project,
    ) -> Vec<&CommandHook> {
        if !self.is_enabled(project) || !self.command.is_enabled(project) {
            return Vec::new();
        }
        self.command
            .phase(phase)
            .iter()
            .filter(|hook| hook.applies_to(platform))
            .collect()
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigEntity for Hooks {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn merge(&mut self, source: &Self) {
        self.core.merge(&source.core);
        self.command.merge(&source.command);
    }

    fn is_set(&self) -> bool {
        self.core.is_set() || self.command.is_set()
    }

    fn as_map(&self, full: bool, project: &Project) -> Map<String, Value> {
        if !full && !self.is_enabled(project) {
            return Map::new();
        }
        let mut props = self.core.base_map(project);
        props.extend(self.command.as_map(full, project));

        let mut map = Map::new();
        map.insert(self.name().to_string(), Value::Object(props));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook(cmd: &str, platforms: &[&str]) -> CommandHook {
        CommandHook {
            cmd: cmd.split(' ').map(String::from).collect(),
            platforms: platforms.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_set_propagates_from_child() {
        let mut hooks = Hooks::new();
        assert!(!hooks.is_set());
        hooks.command.success.push(hook("echo done", &[]));
        assert!(hooks.is_set());

        let mut hooks = Hooks::new();
        hooks.core_mut().activation.set(Active::Never);
        assert!(hooks.is_set());
    }

    #[test]
    fn test_phase_filtering_by_platform() {
        let project = Project::default();
        let mut hooks = Hooks::new();
        hooks.command.before = vec![hook("echo all", &[]), hook("echo mac", &["macos"])];

        let linux = hooks.commands_for(HookPhase::Before, Platform::Linux, &project);
        assert_eq!(linux.len(), 1);
        let mac = hooks.commands_for(HookPhase::Before, Platform::MacOs, &project);
        assert_eq!(mac.len(), 2);
    }

    #[test]
    fn test_disabled_hooks_yield_nothing() {
        let project = Project::default();
        let mut hooks = Hooks::new();
        hooks.command.failure.push(hook("notify", &[]));
        hooks.core_mut().activation.set(Active::Never);
        assert!(
            hooks
                .commands_for(HookPhase::Failure, Platform::Linux, &project)
                .is_empty()
        );
    }

    #[test]
    fn test_merge_appends_unseen_hooks() {
        let mut target = Hooks::new();
        target.command.before.push(hook("a", &[]));
        let mut source = Hooks::new();
        source.command.before = vec![hook("a", &[]), hook("b", &[])];

        target.merge(&source);
        target.merge(&source);
        assert_eq!(target.command.before, vec![hook("a", &[]), hook("b", &[])]);
    }
}
