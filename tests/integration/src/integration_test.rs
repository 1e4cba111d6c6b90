//! End-to-end flow from raw build configuration to cached resolvers
//!
//! Defaults are applied to the user's configuration, then each resolve
//! section is handed to the factory under its namespace.

use std::rc::Rc;

use pretty_assertions::assert_eq;
use resolve_factory::{ResolveOptions, ResolverFactory};
use resolve_options::presets::{self, LOADER, NORMAL};
use resolve_options::{DefaultsManifest, OptionPath, get_property};
use resolve_test_utils::{CountingCreator, HookRecorder};
use serde_json::{Value, json};

/// Apply the built-in defaults and split out both resolve sections.
fn sections(config: &Value) -> (ResolveOptions, ResolveOptions) {
    let processed = presets::resolve_defaults().unwrap().process(config).unwrap();
    (
        processed["resolve"].clone().into(),
        processed["resolveLoader"].clone().into(),
    )
}

#[test]
fn test_defaults_flow_into_resolvers() {
    let creator = CountingCreator::new();
    let factory = ResolverFactory::new(creator.clone());
    let (resolve, resolve_loader) = sections(&json!({"target": "node"}));

    let normal = factory.get(NORMAL, &resolve).unwrap();
    let loader = factory.get(LOADER, &resolve_loader).unwrap();

    assert_eq!(creator.calls(), 2);
    assert_eq!(normal.options()["mainFields"], json!(["module", "main"]));
    assert_eq!(normal.options()["aliasFields"], json!([]));
    assert_eq!(loader.options()["mainFields"], json!(["loader", "main"]));
    assert_eq!(loader.handle().options, *resolve_loader.value());
}

#[test]
fn test_reprocessing_same_config_reuses_resolvers() {
    let creator = CountingCreator::new();
    let factory = ResolverFactory::new(creator.clone());
    let config = json!({"resolve": {"extensions": [".ts", ".js"]}});

    let (first, _) = sections(&config);
    let (second, _) = sections(&config);
    assert!(!first.ptr_eq(&second));

    let a = factory.get(NORMAL, &first).unwrap();
    let b = factory.get(NORMAL, &second).unwrap();

    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(creator.calls(), 1);
    assert_eq!(a.options()["extensions"], json!([".ts", ".js"]));
}

#[test]
fn test_manifest_layered_over_presets() {
    let manifest = DefaultsManifest::parse(
        r#"
[[defaults]]
path = "resolve.symlinks"
value = true

[[defaults]]
path = "resolve.plugins"
strategy = "append"
value = ["tsconfig-paths"]
"#,
    )
    .unwrap();

    let mut engine = presets::resolve_defaults().unwrap();
    manifest.apply_to(&mut engine).unwrap();
    let processed = engine
        .process(&json!({"resolve": {"plugins": ["workspace"]}}))
        .unwrap();

    let plugins = OptionPath::parse("resolve.plugins").unwrap();
    assert_eq!(
        get_property(&processed, &plugins),
        Some(&json!(["workspace", "tsconfig-paths"]))
    );
    assert_eq!(processed["resolve"]["modules"], json!(["node_modules"]));
    assert_eq!(processed["resolve"]["symlinks"], json!(true));
}

#[test]
fn test_plugin_derives_loader_variant() {
    let creator = CountingCreator::new();
    let factory = ResolverFactory::new(creator.clone());
    let recorder = HookRecorder::new();

    let log = recorder.clone();
    factory.tap_notify(LOADER, "LoaderWatch", move |resolver, _| {
        log.record(format!("loader:{}", resolver.handle().id));
    });

    let (_, resolve_loader) = sections(&json!({}));
    let loader = factory.get(LOADER, &resolve_loader).unwrap();

    let overrides = ResolveOptions::new(json!({"extensions": [".ts"]}));
    let typed = loader.with_options(&overrides).unwrap();
    let again = loader.with_options(&overrides).unwrap();

    assert!(Rc::ptr_eq(&typed, &again));
    assert_eq!(typed.options()["extensions"], json!([".ts"]));
    assert_eq!(typed.options()["mainFields"], json!(["loader", "main"]));
    assert_eq!(recorder.events(), vec!["loader:1", "loader:2"]);
}

#[test]
fn test_processing_leaves_config_untouched() {
    let config = json!({"resolve": {"alias": {"react": "preact"}}});
    let before = config.clone();

    let (resolve, _) = sections(&config);

    assert_eq!(config, before);
    assert_eq!(resolve["alias"], json!({"react": "preact"}));
    assert_eq!(resolve["unsafeCache"], json!(true));
}
