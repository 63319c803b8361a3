//! Tool-specific stage handlers.

use crate::config::{EffectiveConfig, TargetId};
use crate::error::ProcessingError;
use crate::model::EntityKind;
use crate::pipeline::{
    MavenHandler, PipelineServices, RunContext, SkipReason, SnapHandler, StagingDirs,
    TargetFailure, props::Props,
};
use crate::process::BoxFuture;
use crate::templates::TemplateSource;
use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Everything a stage may look at. Shared, never mutated by a stage.
pub struct StageEnv<'a> {
    pub config: &'a EffectiveConfig,
    pub ctx: &'a RunContext,
    pub target: &'a TargetId,
    pub dirs: &'a StagingDirs,
    pub props: &'a Props,
    pub services: &'a PipelineServices,
}

/// What the package stage left behind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PackageStep {
    /// Local layout staged; the path is the produced artifact, if any
    Built(Option<PathBuf>),
    /// Packaging left to the remote service
    Deferred,
}

/// Result of the upload stage. Soft failures are not errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UploadStep {
    /// Published; the path is the artifact built during upload, if any
    Uploaded(Option<PathBuf>),
    Skipped(SkipReason),
    Failed(TargetFailure),
}

/// Package and upload behavior of one or more tool kinds.
///
/// Errors returned from either step fail only the current target.
pub trait ToolHandler: Send + Sync {
    /// Kinds this handler serves.
    fn kinds(&self) -> &[EntityKind];

    /// Templates rendered into the prepare directory.
    fn templates(
        &self,
        config: &EffectiveConfig,
        ctx: &RunContext,
        target: &TargetId,
    ) -> TemplateSource;

    /// Add tool keys to the property bag.
    fn fill_properties(
        &self,
        config: &EffectiveConfig,
        target: &TargetId,
        props: &mut Props,
    ) -> Result<(), ProcessingError>;

    fn package<'a>(&'a self, env: &'a StageEnv<'a>)
    -> BoxFuture<'a, Result<PackageStep, ProcessingError>>;

    fn upload<'a>(
        &'a self,
        env: &'a StageEnv<'a>,
        package: &'a PackageStep,
    ) -> BoxFuture<'a, Result<UploadStep, ProcessingError>>;
}

/// Handlers keyed by tool kind.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EntityKind, Arc<dyn ToolHandler>>,
}

impl HandlerRegistry {
    /// Registry without any handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the snap and maven handlers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SnapHandler));
        registry.register(Arc::new(MavenHandler));
        registry
    }

    /// Register `handler` for each of its kinds, replacing earlier ones.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        for kind in handler.kinds() {
            self.handlers.insert(*kind, Arc::clone(&handler));
        }
    }

    pub fn get(&self, kind: EntityKind) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(&kind).cloned()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&EntityKind> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("HandlerRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_target_kind() {
        let registry = HandlerRegistry::with_defaults();
        assert!(registry.get(EntityKind::Snap).is_some());
        for kind in EntityKind::MAVEN_DEPLOYERS {
            assert!(registry.get(kind).is_some(), "{kind} has no handler");
        }
        assert!(registry.get(EntityKind::Hooks).is_none());
    }
}
