//! Declarative defaults loaded from TOML
//!
//! A manifest lists literal defaults as `[[defaults]]` tables. Only the
//! literal strategies can be written down this way; `call` and `make` need
//! code and are rejected when the manifest is applied.
//!
//! ```toml
//! [[defaults]]
//! path = "resolve.extensions"
//! value = [".js", ".json"]
//!
//! [[defaults]]
//! path = "resolve.plugins"
//! strategy = "append"
//! value = ["tsconfig-paths"]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::defaults::DefaultsEngine;
use crate::strategy::{DefaultRule, DefaultValue, Strategy};

/// A single `[[defaults]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Dotted option path
    pub path: String,

    /// Strategy tag; omitted means `if-absent`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Literal default
    pub value: Value,
}

impl ManifestEntry {
    fn to_rule(&self) -> Result<DefaultRule> {
        let tag = self
            .strategy
            .as_deref()
            .unwrap_or(Strategy::IfAbsent.tag());
        DefaultRule::from_tagged(&self.path, tag, DefaultValue::Literal(self.value.clone()))
    }
}

/// Defaults parsed from a TOML document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsManifest {
    #[serde(default)]
    pub defaults: Vec<ManifestEntry>,
}

impl DefaultsManifest {
    /// Parse a manifest from TOML content
    ///
    /// Parsing only checks the document shape. Paths and strategies are
    /// validated by [`apply_to`](Self::apply_to).
    ///
    /// # Example
    ///
    /// ```
    /// use resolve_options::DefaultsManifest;
    ///
    /// let manifest = DefaultsManifest::parse(r#"
    /// [[defaults]]
    /// path = "resolve.mainFiles"
    /// value = ["index"]
    /// "#).unwrap();
    ///
    /// assert_eq!(manifest.defaults.len(), 1);
    /// assert_eq!(manifest.defaults[0].path, "resolve.mainFiles");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: DefaultsManifest = toml::from_str(content)?;
        Ok(manifest)
    }

    /// Register every entry on `engine`, in document order.
    ///
    /// Stops at the first invalid entry; entries before it stay registered.
    pub fn apply_to(&self, engine: &mut DefaultsEngine) -> Result<()> {
        for entry in &self.defaults {
            engine.set_rule(&entry.path, entry.to_rule()?)?;
        }
        Ok(())
    }

    /// Build a fresh engine holding this manifest's rules.
    pub fn into_engine(self) -> Result<DefaultsEngine> {
        let mut engine = DefaultsEngine::new();
        self.apply_to(&mut engine)?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_empty() {
        let manifest = DefaultsManifest::parse("").unwrap();
        assert!(manifest.defaults.is_empty());
    }

    #[test]
    fn test_parse_entries() {
        let manifest = DefaultsManifest::parse(
            r#"
[[defaults]]
path = "target"
value = "web"

[[defaults]]
path = "resolve.plugins"
strategy = "append"
value = ["a", "b"]
"#,
        )
        .unwrap();

        assert_eq!(
            manifest.defaults,
            vec![
                ManifestEntry {
                    path: "target".to_string(),
                    strategy: None,
                    value: json!("web"),
                },
                ManifestEntry {
                    path: "resolve.plugins".to_string(),
                    strategy: Some("append".to_string()),
                    value: json!(["a", "b"]),
                },
            ]
        );
    }

    #[test]
    fn test_into_engine_applies_defaults() {
        let engine = DefaultsManifest::parse(
            r#"
[[defaults]]
path = "resolve.unsafeCache"
value = true

[[defaults]]
path = "resolve.plugins"
strategy = "append"
value = ["b"]
"#,
        )
        .unwrap()
        .into_engine()
        .unwrap();

        let processed = engine.process(&json!({"resolve": {"plugins": ["a"]}})).unwrap();
        assert_eq!(
            processed,
            json!({"resolve": {"plugins": ["a", "b"], "unsafeCache": true}})
        );
    }

    #[test]
    fn test_call_strategy_not_expressible() {
        let manifest = DefaultsManifest::parse(
            r#"
[[defaults]]
path = "entry"
strategy = "call"
value = "./src"
"#,
        )
        .unwrap();

        let err = manifest.into_engine().unwrap_err();
        assert!(matches!(err, Error::StrategyValueMismatch { .. }));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let manifest = DefaultsManifest::parse(
            r#"
[[defaults]]
path = "entry"
strategy = "prepend"
value = []
"#,
        )
        .unwrap();

        let err = manifest.into_engine().unwrap_err();
        assert!(matches!(err, Error::UnknownStrategy(ref tag) if tag == "prepend"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = DefaultsManifest::parse("[[defaults]\npath = ").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
