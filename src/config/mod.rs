//! Layered configuration.
//!
//! Each source (command line, environment, `release.toml`, built-in
//! defaults) produces a [`ConfigLayer`]. The [`EffectiveConfigBuilder`]
//! folds them most-specific first into one tree and freezes it into an
//! [`EffectiveConfig`], which only hands out shared references.

mod builder;
mod defaults;
mod effective;
mod env;
mod file;
mod layer;
mod target;

pub use builder::EffectiveConfigBuilder;
pub use defaults::defaults_layer;
pub use effective::EffectiveConfig;
pub use env::environment_layer;
pub use file::{load_layer, parse_layer};
pub use layer::{ConfigLayer, LayerOrigin};
pub use target::{Target, TargetId};

/// File name looked up in the project directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "release.toml";
