//! Dotted option paths and property access
//!
//! Options are addressed by dot-separated names such as
//! `resolve.extensions`. Only object keys are addressable: there is no
//! array indexing, and traversal never passes through an array.
//!
//! # Traversal rules
//!
//! - [`get_property`] returns `None` as soon as an intermediate value is not
//!   an object (`null`, arrays and scalars included).
//! - [`set_property`] creates empty objects for absent (or `null`)
//!   intermediate fields, but aborts without touching anything when an
//!   intermediate field holds an array or a scalar.
//!
//! # Examples
//!
//! ```
//! use resolve_options::path::{OptionPath, get_property, set_property};
//! use serde_json::json;
//!
//! let path = OptionPath::parse("resolve.mainFiles").unwrap();
//! let mut options = json!({});
//!
//! assert!(set_property(&mut options, &path, json!(["index"])));
//! assert_eq!(get_property(&options, &path), Some(&json!(["index"])));
//! assert_eq!(options, json!({"resolve": {"mainFiles": ["index"]}}));
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{Error, Result};

/// A validated, dot-separated option path.
///
/// Construction rejects empty paths and empty segments (`"a..b"`, `".a"`),
/// so malformed names surface when a default is registered rather than when
/// it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionPath {
    raw: String,
    segments: Vec<String>,
}

impl OptionPath {
    /// Parse a dotted path.
    ///
    /// ```
    /// use resolve_options::path::OptionPath;
    ///
    /// let path = OptionPath::parse("module.rules").unwrap();
    /// assert_eq!(path.segments(), ["module", "rules"]);
    ///
    /// assert!(OptionPath::parse("module..rules").is_err());
    /// assert!(OptionPath::parse("").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::invalid_path(path, "path is empty"));
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if let Some(index) = segments.iter().position(|s| s.is_empty()) {
            return Err(Error::invalid_path(
                path,
                format!("segment {} is empty", index),
            ));
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// The path as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Intermediate segments and the final key.
    fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            // parse() guarantees at least one segment
            None => (&[], ""),
        }
    }
}

impl fmt::Display for OptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for OptionPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for OptionPath {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

/// Get the value at `path`.
///
/// Returns `None` when the value is absent, or when the walk hits an
/// intermediate value that is not an object. A present `null` at the final
/// key is returned as `Some(&Value::Null)`.
pub fn get_property<'a>(root: &'a Value, path: &OptionPath) -> Option<&'a Value> {
    let (parents, last) = path.split_last();

    let mut current = root.as_object()?;
    for segment in parents {
        current = current.get(segment)?.as_object()?;
    }

    current.get(last)
}

/// Set `value` at `path`, creating intermediate objects as needed.
///
/// Returns `true` if the value was assigned. Returns `false`, leaving `root`
/// untouched, when `root` is not an object or an intermediate field holds an
/// array or a scalar.
pub fn set_property(root: &mut Value, path: &OptionPath, value: Value) -> bool {
    let (parents, last) = path.split_last();

    let Some(mut current) = root.as_object_mut() else {
        trace!(path = %path, kind = value_kind(root), "Skipped set on non-object root");
        return false;
    };

    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert(Value::Null);

        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }

        current = match slot {
            Value::Object(map) => map,
            other => {
                trace!(
                    path = %path,
                    segment = %segment,
                    kind = value_kind(other),
                    "Skipped set through non-object value"
                );
                return false;
            }
        };
    }

    current.insert(last.to_string(), value);
    true
}

/// Short name of a JSON value's type, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
