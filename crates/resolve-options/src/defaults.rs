//! Rule-based options defaulting
//!
//! A [`DefaultsEngine`] holds one rule per option path and fills in
//! user-supplied options by applying every rule in registration order.
//! Order matters when rules touch overlapping paths: a rule on `resolve`
//! registered before rules on `resolve.*` sees the user's value first, and
//! the nested rules then see its result.
//!
//! # Example
//!
//! ```
//! use resolve_options::{DefaultRule, DefaultsEngine};
//! use serde_json::json;
//!
//! let mut engine = DefaultsEngine::new();
//! engine.set("resolve.extensions", json!([".js", ".json"])).unwrap();
//! engine
//!     .set_rule(
//!         "entry",
//!         DefaultRule::call(|_, options| {
//!             let context = options["context"].as_str().unwrap_or(".");
//!             json!(format!("{}/index.js", context))
//!         }),
//!     )
//!     .unwrap();
//!
//! let processed = engine.process(&json!({"context": "/app"})).unwrap();
//! assert_eq!(processed["entry"], "/app/index.js");
//! assert_eq!(processed["resolve"]["extensions"], json!([".js", ".json"]));
//! ```

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::path::{OptionPath, get_property, set_property, value_kind};
use crate::strategy::{DefaultRule, DefaultValue};

/// Ordered set of defaulting rules, at most one per path.
#[derive(Debug, Clone, Default)]
pub struct DefaultsEngine {
    rules: Vec<(OptionPath, DefaultRule)>,
}

impl DefaultsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a literal default, applied when the path is absent.
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        self.set_rule(path, DefaultRule::IfAbsent(value))
    }

    /// Register a rule with an explicit strategy.
    ///
    /// Replaces any existing rule for `path`. A replaced rule keeps the
    /// position of the one it replaces.
    pub fn set_rule(&mut self, path: &str, rule: DefaultRule) -> Result<()> {
        let path = OptionPath::parse(path)?;

        match self.rules.iter_mut().find(|(existing, _)| *existing == path) {
            Some((_, slot)) => {
                trace!(path = %path, strategy = %rule.strategy(), "Replaced default rule");
                *slot = rule;
            }
            None => {
                trace!(path = %path, strategy = %rule.strategy(), "Registered default rule");
                self.rules.push((path, rule));
            }
        }

        Ok(())
    }

    /// Register a rule by strategy tag (`"call"`, `"make"`, `"append"` or
    /// `"if-absent"`).
    ///
    /// Unknown tags and tag/value mismatches are rejected here, so a bad
    /// declaration never reaches [`process`](Self::process).
    pub fn set_tagged(&mut self, path: &str, tag: &str, value: DefaultValue) -> Result<()> {
        let rule = DefaultRule::from_tagged(path, tag, value)?;
        self.set_rule(path, rule)
    }

    /// Remove the rule for `path`, returning it if one was registered.
    pub fn unset(&mut self, path: &str) -> Option<DefaultRule> {
        let index = self
            .rules
            .iter()
            .position(|(existing, _)| existing.as_str() == path)?;
        Some(self.rules.remove(index).1)
    }

    /// Get the active rule for `path`.
    pub fn get_rule(&self, path: &str) -> Option<&DefaultRule> {
        self.rules
            .iter()
            .find(|(existing, _)| existing.as_str() == path)
            .map(|(_, rule)| rule)
    }

    /// Registered paths in application order.
    pub fn paths(&self) -> Vec<&str> {
        self.rules.iter().map(|(path, _)| path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule to a copy of `options`.
    ///
    /// `options` must be an object; `null` is treated as an empty object.
    /// The caller's value is never modified.
    pub fn process(&self, options: &Value) -> Result<Value> {
        let mut processed = match options {
            Value::Object(map) => Value::Object(map.clone()),
            Value::Null => Value::Object(Map::new()),
            other => {
                return Err(Error::NotAnObject {
                    kind: value_kind(other).to_string(),
                });
            }
        };

        for (path, rule) in &self.rules {
            apply_rule(&mut processed, path, rule);
        }

        debug!(rules = self.rules.len(), "Applied option defaults");
        Ok(processed)
    }
}

fn apply_rule(options: &mut Value, path: &OptionPath, rule: &DefaultRule) {
    match rule {
        DefaultRule::IfAbsent(default) => {
            if get_property(options, path).is_none() {
                set_property(options, path, default.clone());
            }
        }
        DefaultRule::Overwrite(call) => {
            let next = call(get_property(options, path), options);
            set_property(options, path, next);
        }
        DefaultRule::MakeIfAbsent(make) => {
            if get_property(options, path).is_none() {
                let made = make(options);
                set_property(options, path, made);
            }
        }
        DefaultRule::AppendArray(items) => {
            let mut merged = match get_property(options, path) {
                Some(Value::Array(existing)) => existing.clone(),
                Some(other) => {
                    trace!(path = %path, kind = value_kind(other), "Discarded non-array value before append");
                    Vec::new()
                }
                None => Vec::new(),
            };
            merged.extend(items.iter().cloned());
            set_property(options, path, Value::Array(merged));
        }
    }
}
