//! Snap packaging and store upload.
//!
//! Packaging lays out `<package>/prime/meta/snap.yaml` from the rendered
//! `<prepare>/snap/` directory. Remote builds are handed to the release
//! publisher unless the run is dry. Local builds go through the platform and
//! dry-run gates before touching `snapcraft`:
//!
//! 1. `snapcraft login --with <exported login>`, failing the target when no
//!    login is configured
//! 2. `snapcraft snap <prime> --output <package>/<distribution>-<version>.snap`
//! 3. `snapcraft upload <snap> --release <channel>`

use crate::config::{EffectiveConfig, TargetId};
use crate::error::{Context, ProcessingError};
use crate::model::{
    ConfigEntity, DEFAULT_TEMPLATE_DIRECTORY, EntityKind, SnapInterface, SnapPackager,
};
use crate::pipeline::{
    PackageStep, RunContext, SkipReason, Stage, StageEnv, TargetFailure, ToolHandler, UploadStep,
    props::{Props, keys},
};
use crate::platform::Platform;
use crate::process::{BoxFuture, CommandSpec};
use crate::publisher::PublishRequest;
use crate::templates::{SNAP_TEMPLATES, TemplateSource};
use crate::utils::fs;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

const SNAPCRAFT: &str = "snapcraft";
const SOURCE_MANIFEST: &str = "snapcraft.yaml";
const TARGET_MANIFEST: &str = "snap.yaml";

/// Handler for [`EntityKind::Snap`] targets.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapHandler;

fn packager<'c>(
    config: &'c EffectiveConfig,
    target: &TargetId,
) -> Result<&'c SnapPackager, ProcessingError> {
    config
        .snap_for(&target.name)
        .with_context(|| format!("distribution {} has no snap packager", target.name))
}

fn interfaces(list: &[SnapInterface]) -> Value {
    Value::Array(
        list.iter()
            .map(|i| json!({ "name": i.name, "attributes": i.attributes }))
            .collect(),
    )
}

/// Build the `prime/meta` layout snapcraft expects.
///
/// Copies `<prepare_dir>/snap/` into `<package_dir>/prime/meta/` and renames
/// `snapcraft.yaml` to `snap.yaml`. Returns the prime directory.
///
/// # Errors
///
/// [`ProcessingError::CopyFailed`] naming both directories when the staged
/// snap directory is missing or cannot be copied, or when it holds no
/// `snapcraft.yaml`.
pub async fn create_package(
    prepare_dir: &Path,
    package_dir: &Path,
) -> Result<PathBuf, ProcessingError> {
    let snap_dir = prepare_dir.join("snap");
    let prime_dir = package_dir.join("prime");
    let meta_dir = prime_dir.join("meta");
    let copy_failed = |reason: String| ProcessingError::CopyFailed {
        from: snap_dir.clone(),
        to: meta_dir.clone(),
        reason,
    };

    fs::create_dir_all(&meta_dir, false).await?;
    fs::copy_dir(&snap_dir, &meta_dir)
        .await
        .map_err(|e| copy_failed(e.to_string()))?;

    let source = meta_dir.join(SOURCE_MANIFEST);
    if !source.is_file() {
        return Err(copy_failed(format!("{SOURCE_MANIFEST} was not staged")));
    }
    fs::move_file(&source, &meta_dir.join(TARGET_MANIFEST)).await?;

    log::debug!("snap layout ready in {}", prime_dir.display());
    Ok(prime_dir)
}

impl SnapHandler {
    async fn upload_local(
        &self,
        env: &StageEnv<'_>,
        snap: &SnapPackager,
    ) -> Result<UploadStep, ProcessingError> {
        if env.ctx.platform() == Platform::Windows {
            log::debug!("{}: snapcraft does not run on Windows", env.target);
            return Ok(UploadStep::Skipped(SkipReason::UnsupportedPlatform(
                env.ctx.platform(),
            )));
        }
        if env.ctx.dry_run() {
            log::info!("{}: dry run, not invoking snapcraft", env.target);
            return Ok(UploadStep::Skipped(SkipReason::DryRun));
        }

        let gateway = env.services.gateway.as_ref();
        let package_dir = &env.dirs.package;

        let login = match snap.exported_login.as_deref() {
            Some(login) if snap.has_exported_login() => login,
            _ => {
                log::error!("{}: no exported snapcraft login configured", env.target);
                return Ok(UploadStep::Failed(TargetFailure::new(
                    Stage::Login,
                    "login failed",
                )));
            }
        };
        let spec = CommandSpec::new(SNAPCRAFT)
            .args(["login", "--with", login])
            .current_dir(package_dir);
        if !gateway.run(&spec).await?.success() {
            return Ok(UploadStep::Failed(TargetFailure::new(
                Stage::Login,
                "login failed",
            )));
        }

        let prime_dir = package_dir.join("prime");
        let snap_file = package_dir.join(format!(
            "{}-{}.snap",
            env.target.name,
            env.config.project().version()
        ));
        let build = CommandSpec::new(SNAPCRAFT)
            .arg("snap")
            .path_arg(&prime_dir)
            .arg("--output")
            .path_arg(&snap_file)
            .current_dir(package_dir);
        let output = gateway.run(&build).await?;
        if !output.success() {
            return Ok(UploadStep::Failed(TargetFailure::new(
                Stage::Build,
                format!(
                    "snapcraft snap failed: {}",
                    output.error_line().unwrap_or("no output")
                ),
            )));
        }

        let publish = CommandSpec::new(SNAPCRAFT)
            .arg("upload")
            .path_arg(&snap_file)
            .args(["--release", snap.channel()])
            .current_dir(package_dir);
        let output = gateway.run(&publish).await?;
        if !output.success() {
            return Ok(UploadStep::Failed(TargetFailure::new(
                Stage::Publish,
                format!(
                    "snapcraft upload failed: {}",
                    output.error_line().unwrap_or("no output")
                ),
            )));
        }

        log::info!("{}: uploaded {}", env.target, snap_file.display());
        Ok(UploadStep::Uploaded(Some(snap_file)))
    }

    async fn upload_remote(&self, env: &StageEnv<'_>) -> Result<UploadStep, ProcessingError> {
        if env.ctx.dry_run() {
            log::info!("{}: dry run, not publishing remote build", env.target);
            return Ok(UploadStep::Skipped(SkipReason::DryRun));
        }
        let request = PublishRequest {
            target: env.target.clone(),
            props: env.props.clone(),
            prepare_dir: env.dirs.prepare.clone(),
            package_dir: env.dirs.package.clone(),
            endpoint: None,
            files: Vec::new(),
        };
        if env.services.publisher.publish(&request).await? {
            Ok(UploadStep::Uploaded(None))
        } else {
            Ok(UploadStep::Failed(TargetFailure::new(
                Stage::Publish,
                "release publisher reported failure",
            )))
        }
    }
}

impl ToolHandler for SnapHandler {
    fn kinds(&self) -> &[EntityKind] {
        &[EntityKind::Snap]
    }

    fn templates(
        &self,
        config: &EffectiveConfig,
        ctx: &RunContext,
        target: &TargetId,
    ) -> TemplateSource {
        let configured = config
            .snap_for(&target.name)
            .and_then(|snap| snap.template_directory.as_deref());
        match configured {
            Some(dir) => TemplateSource::Directory(ctx.resolve(dir)),
            None => {
                let dir = ctx.resolve(Path::new(DEFAULT_TEMPLATE_DIRECTORY));
                if dir.is_dir() {
                    TemplateSource::Directory(dir)
                } else {
                    TemplateSource::Embedded(SNAP_TEMPLATES)
                }
            }
        }
    }

    fn fill_properties(
        &self,
        config: &EffectiveConfig,
        target: &TargetId,
        props: &mut Props,
    ) -> Result<(), ProcessingError> {
        let snap = packager(config, target)?;
        let release = config.release();
        let owner = snap
            .repository
            .owner
            .as_deref()
            .or(release.owner.as_deref())
            .unwrap_or_default();
        let name = snap
            .repository
            .name
            .as_deref()
            .or(release.name.as_deref())
            .unwrap_or(config.project().name());

        props.insert(keys::SNAP_REPO_URL.into(), json!(release.repo_url(owner, name)));
        props.insert(
            keys::SNAP_REPO_CLONE_URL.into(),
            json!(release.clone_url(owner, name)),
        );
        props.insert(keys::SNAP_BASE.into(), json!(snap.base()));
        props.insert(keys::SNAP_GRADE.into(), json!(snap.grade()));
        props.insert(keys::SNAP_CONFINEMENT.into(), json!(snap.confinement()));
        props.insert(keys::SNAP_HAS_PLUGS.into(), json!(!snap.plugs.is_empty()));
        props.insert(keys::SNAP_PLUGS.into(), interfaces(&snap.plugs));
        props.insert(keys::SNAP_HAS_SLOTS.into(), json!(!snap.slots.is_empty()));
        props.insert(keys::SNAP_SLOTS.into(), interfaces(&snap.slots));
        props.insert(
            keys::SNAP_HAS_LOCAL_PLUGS.into(),
            json!(!snap.local_plugs.is_empty()),
        );
        props.insert(keys::SNAP_LOCAL_PLUGS.into(), json!(snap.local_plugs));
        props.insert(
            keys::SNAP_HAS_LOCAL_SLOTS.into(),
            json!(!snap.local_slots.is_empty()),
        );
        props.insert(keys::SNAP_LOCAL_SLOTS.into(), json!(snap.local_slots));
        for (key, value) in snap.extra_properties() {
            props.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn package<'a>(
        &'a self,
        env: &'a StageEnv<'a>,
    ) -> BoxFuture<'a, Result<PackageStep, ProcessingError>> {
        Box::pin(async move {
            let snap = packager(env.config, env.target)?;
            if snap.is_remote_build() {
                log::debug!("{}: remote build, skipping local packaging", env.target);
                return Ok(PackageStep::Deferred);
            }
            create_package(&env.dirs.prepare, &env.dirs.package).await?;
            Ok(PackageStep::Built(None))
        })
    }

    fn upload<'a>(
        &'a self,
        env: &'a StageEnv<'a>,
        _package: &'a PackageStep,
    ) -> BoxFuture<'a, Result<UploadStep, ProcessingError>> {
        Box::pin(async move {
            let snap = packager(env.config, env.target)?;
            if snap.is_remote_build() {
                self.upload_remote(env).await
            } else {
                self.upload_local(env, snap).await
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_layout_and_rename() {
        let tmp = tempfile::tempdir().unwrap();
        let prepare = tmp.path().join("prepare");
        let package = tmp.path().join("package");
        std::fs::create_dir_all(prepare.join("snap/gui")).unwrap();
        std::fs::write(prepare.join("snap/snapcraft.yaml"), "name: app").unwrap();
        std::fs::write(prepare.join("snap/gui/app.desktop"), "[Desktop Entry]").unwrap();

        let prime = create_package(&prepare, &package).await.unwrap();

        assert_eq!(prime, package.join("prime"));
        let meta = prime.join("meta");
        assert_eq!(
            std::fs::read_to_string(meta.join("snap.yaml")).unwrap(),
            "name: app"
        );
        assert!(!meta.join("snapcraft.yaml").exists());
        assert!(meta.join("gui/app.desktop").is_file());
    }

    #[tokio::test]
    async fn test_missing_snap_dir_names_both_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let prepare = tmp.path().join("prepare");
        let package = tmp.path().join("package");
        std::fs::create_dir_all(&prepare).unwrap();

        let err = create_package(&prepare, &package).await.unwrap_err();
        match &err {
            ProcessingError::CopyFailed { from, to, .. } => {
                assert_eq!(from, &prepare.join("snap"));
                assert_eq!(to, &package.join("prime/meta"));
            }
            other => panic!("unexpected error: {other}"),
        }
        let message = err.to_string();
        assert!(message.contains(&prepare.join("snap").display().to_string()));
        assert!(message.contains(&package.join("prime/meta").display().to_string()));
    }

    #[tokio::test]
    async fn test_missing_manifest_is_a_copy_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let prepare = tmp.path().join("prepare");
        std::fs::create_dir_all(prepare.join("snap")).unwrap();
        std::fs::write(prepare.join("snap/other.txt"), "x").unwrap();

        let err = create_package(&prepare, &tmp.path().join("package"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("snapcraft.yaml"));
    }
}
