//! Template rendering for staged files and URL templates.
//!
//! The pipeline only needs "render this string against a property bag",
//! expressed by [`TemplateRenderer`]. [`HandlebarsRenderer`] is the default
//! implementation: HTML escaping is off and missing keys render empty.

use crate::error::{ErrorExt, ProcessingError};
use crate::utils::fs::copy_file;
use handlebars::Handlebars;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Property bag handed to templates, in insertion order.
pub type Props = Map<String, Value>;

/// Suffix marking a file as a template; trimmed from the rendered name.
pub const TEMPLATE_SUFFIX: &str = ".tpl";

/// Built-in snap templates, used when a project has no template directory.
pub const SNAP_TEMPLATES: &[(&str, &str)] = &[(
    "snap/snapcraft.yaml.tpl",
    include_str!("snap/snapcraft.yaml.tpl"),
)];

/// Renders a named template string against a property bag.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, template: &str, props: &Props)
    -> Result<String, ProcessingError>;
}

/// Handlebars-backed renderer.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(false);
        Self { registry }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(
        &self,
        name: &str,
        template: &str,
        props: &Props,
    ) -> Result<String, ProcessingError> {
        self.registry
            .render_template(template, props)
            .map_err(|e| ProcessingError::Template {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Where a tool's templates come from.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateSource {
    /// The tool stages no files
    None,
    /// Every file under a directory
    Directory(PathBuf),
    /// Templates compiled into the binary, as `(relative path, content)`
    Embedded(&'static [(&'static str, &'static str)]),
}

/// Render a template source into `dest`.
///
/// Files ending in `.tpl` are rendered and written without the suffix,
/// anything else is copied verbatim. Returns the number of files written.
pub async fn render_templates(
    source: &TemplateSource,
    dest: &Path,
    renderer: &dyn TemplateRenderer,
    props: &Props,
) -> Result<usize, ProcessingError> {
    let mut written = 0;
    match source {
        TemplateSource::None => {}
        TemplateSource::Embedded(entries) => {
            for (rel, content) in entries.iter() {
                write_rendered(Path::new(rel), content, dest, renderer, props).await?;
                written += 1;
            }
        }
        TemplateSource::Directory(root) => {
            if !root.is_dir() {
                crate::bail!("template directory {} does not exist", root.display());
            }
            for entry in walkdir::WalkDir::new(root) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let rel = entry.path().strip_prefix(root)?;
                if is_template(rel) {
                    let content = tokio::fs::read_to_string(entry.path())
                        .await
                        .fs_context("reading template", entry.path())?;
                    write_rendered(rel, &content, dest, renderer, props).await?;
                } else {
                    copy_file(entry.path(), &dest.join(rel)).await?;
                }
                written += 1;
            }
        }
    }
    log::debug!("staged {} file(s) into {}", written, dest.display());
    Ok(written)
}

fn is_template(path: &Path) -> bool {
    path.to_string_lossy().ends_with(TEMPLATE_SUFFIX)
}

async fn write_rendered(
    rel: &Path,
    content: &str,
    dest: &Path,
    renderer: &dyn TemplateRenderer,
    props: &Props,
) -> Result<(), ProcessingError> {
    let name = rel.to_string_lossy();
    let target = match name.strip_suffix(TEMPLATE_SUFFIX) {
        Some(trimmed) => {
            let rendered = renderer.render(&name, content, props)?;
            (dest.join(trimmed), rendered)
        }
        None => (dest.join(rel), content.to_string()),
    };
    if let Some(parent) = target.0.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    tokio::fs::write(&target.0, target.1)
        .await
        .fs_context("writing rendered template", &target.0)
}
