//! Path-addressed options defaulting for Resolve Kit
//!
//! Fills in missing or partially specified configuration from declarative
//! per-path rules:
//!
//! - [`path`]: dotted-path get/set over nested JSON objects
//! - [`DefaultsEngine`]: ordered rules applied with if-absent, call, make or
//!   append semantics
//! - [`DefaultsManifest`]: literal rules loaded from TOML
//! - [`presets`]: the built-in resolve and resolveLoader defaults

pub mod defaults;
pub mod error;
pub mod manifest;
pub mod path;
pub mod presets;
pub mod strategy;

pub use defaults::DefaultsEngine;
pub use error::{Error, Result};
pub use manifest::{DefaultsManifest, ManifestEntry};
pub use path::{OptionPath, get_property, set_property};
pub use strategy::{CallFn, DefaultRule, DefaultValue, MakeFn, Strategy};
