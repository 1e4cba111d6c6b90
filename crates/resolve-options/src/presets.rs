//! Built-in resolve defaults
//!
//! The build configuration carries two resolve sections: `resolve` for
//! modules and `resolveLoader` for loaders. [`resolve_defaults`] fills both
//! in; the results become the options of the [`NORMAL`] and [`LOADER`]
//! resolver namespaces.

use serde_json::{Map, Value, json};

use crate::Result;
use crate::defaults::DefaultsEngine;
use crate::strategy::DefaultRule;

/// Namespace of resolvers built from the `resolve` section
pub const NORMAL: &str = "normal";

/// Namespace of resolvers built from the `resolveLoader` section
pub const LOADER: &str = "loader";

const WEB_TARGETS: &[&str] = &["web", "webworker", "electron-renderer"];

/// Engine pre-loaded with the resolve and resolveLoader defaults.
pub fn resolve_defaults() -> Result<DefaultsEngine> {
    let mut engine = DefaultsEngine::new();

    engine.set("target", json!("web"))?;

    engine.set_rule("resolve", DefaultRule::call(|current, _| copy_object(current)))?;
    engine.set("resolve.unsafeCache", json!(true))?;
    engine.set("resolve.modules", json!(["node_modules"]))?;
    engine.set("resolve.extensions", json!([".wasm", ".mjs", ".js", ".json"]))?;
    engine.set("resolve.mainFiles", json!(["index"]))?;
    engine.set_rule(
        "resolve.aliasFields",
        DefaultRule::make(|options| {
            if is_web_target(options) {
                json!(["browser"])
            } else {
                json!([])
            }
        }),
    )?;
    engine.set_rule(
        "resolve.mainFields",
        DefaultRule::make(|options| {
            if is_web_target(options) {
                json!(["browser", "module", "main"])
            } else {
                json!(["module", "main"])
            }
        }),
    )?;
    engine.set_rule(
        "resolve.cacheWithContext",
        DefaultRule::make(|options| json!(has_plugins(&options["resolve"]))),
    )?;

    engine.set_rule("resolveLoader", DefaultRule::call(|current, _| copy_object(current)))?;
    engine.set("resolveLoader.unsafeCache", json!(true))?;
    engine.set("resolveLoader.mainFields", json!(["loader", "main"]))?;
    engine.set("resolveLoader.extensions", json!([".js", ".json"]))?;
    engine.set("resolveLoader.mainFiles", json!(["index"]))?;
    engine.set_rule(
        "resolveLoader.cacheWithContext",
        DefaultRule::make(|options| json!(has_plugins(&options["resolveLoader"]))),
    )?;

    Ok(engine)
}

/// Copy of an object section; anything else becomes `{}`.
fn copy_object(current: Option<&Value>) -> Value {
    match current {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        _ => Value::Object(Map::new()),
    }
}

fn is_web_target(options: &Value) -> bool {
    options["target"]
        .as_str()
        .is_some_and(|target| WEB_TARGETS.contains(&target))
}

fn has_plugins(section: &Value) -> bool {
    section["plugins"]
        .as_array()
        .is_some_and(|plugins| !plugins.is_empty())
}
