//! Defaulting strategies and the rules built from them

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::path::value_kind;

/// Factory for [`DefaultRule::Overwrite`]: receives the current value (if
/// any) and the whole options object, returns the value to store.
pub type CallFn = Arc<dyn Fn(Option<&Value>, &Value) -> Value + Send + Sync>;

/// Factory for [`DefaultRule::MakeIfAbsent`]: receives the whole options
/// object, returns the value to store.
pub type MakeFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// How a default is merged into user-supplied options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Store a literal when the path is absent (the implicit strategy)
    IfAbsent,
    /// Always store the factory's result, even over explicit user input
    Overwrite,
    /// Store the factory's result when the path is absent
    MakeIfAbsent,
    /// Append literal items to the array at the path
    AppendArray,
}

impl Strategy {
    /// The registration tag for this strategy.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::IfAbsent => "if-absent",
            Self::Overwrite => "call",
            Self::MakeIfAbsent => "make",
            Self::AppendArray => "append",
        }
    }

    /// List all valid tags
    pub fn all_tags() -> &'static [&'static str] {
        &["if-absent", "call", "make", "append"]
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "if-absent" => Ok(Self::IfAbsent),
            "call" => Ok(Self::Overwrite),
            "make" => Ok(Self::MakeIfAbsent),
            "append" => Ok(Self::AppendArray),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

/// The default side of a tagged registration: either a literal or one of
/// the two factory shapes.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Call(CallFn),
    Make(MakeFn),
}

impl DefaultValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Literal(value) => value_kind(value),
            Self::Call(_) => "a call factory",
            Self::Make(_) => "a make factory",
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Call(_) => f.write_str("Call(<fn>)"),
            Self::Make(_) => f.write_str("Make(<fn>)"),
        }
    }
}

/// A registered default: the strategy together with the payload it needs.
#[derive(Clone)]
pub enum DefaultRule {
    IfAbsent(Value),
    Overwrite(CallFn),
    MakeIfAbsent(MakeFn),
    AppendArray(Vec<Value>),
}

impl DefaultRule {
    /// Build an [`Overwrite`](Self::Overwrite) rule from a closure.
    pub fn call<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &Value) -> Value + Send + Sync + 'static,
    {
        Self::Overwrite(Arc::new(f))
    }

    /// Build a [`MakeIfAbsent`](Self::MakeIfAbsent) rule from a closure.
    pub fn make<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::MakeIfAbsent(Arc::new(f))
    }

    pub fn append(items: impl IntoIterator<Item = Value>) -> Self {
        Self::AppendArray(items.into_iter().collect())
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::IfAbsent(_) => Strategy::IfAbsent,
            Self::Overwrite(_) => Strategy::Overwrite,
            Self::MakeIfAbsent(_) => Strategy::MakeIfAbsent,
            Self::AppendArray(_) => Strategy::AppendArray,
        }
    }

    /// Pair a strategy tag with a default, rejecting combinations that
    /// cannot be applied (e.g. `"call"` with a literal, `"append"` with a
    /// non-array).
    pub fn from_tagged(path: &str, tag: &str, value: DefaultValue) -> Result<Self> {
        let strategy: Strategy = tag.parse()?;

        match (strategy, value) {
            (Strategy::IfAbsent, DefaultValue::Literal(value)) => Ok(Self::IfAbsent(value)),
            (Strategy::Overwrite, DefaultValue::Call(f)) => Ok(Self::Overwrite(f)),
            (Strategy::MakeIfAbsent, DefaultValue::Make(f)) => Ok(Self::MakeIfAbsent(f)),
            (Strategy::AppendArray, DefaultValue::Literal(Value::Array(items))) => {
                Ok(Self::AppendArray(items))
            }
            (strategy, value) => Err(Error::StrategyValueMismatch {
                path: path.to_string(),
                strategy: strategy.to_string(),
                value_kind: value.kind().to_string(),
            }),
        }
    }
}

impl fmt::Debug for DefaultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IfAbsent(value) => f.debug_tuple("IfAbsent").field(value).finish(),
            Self::Overwrite(_) => f.write_str("Overwrite(<fn>)"),
            Self::MakeIfAbsent(_) => f.write_str("MakeIfAbsent(<fn>)"),
            Self::AppendArray(items) => f.debug_tuple("AppendArray").field(items).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("if-absent", Strategy::IfAbsent)]
    #[case("call", Strategy::Overwrite)]
    #[case("make", Strategy::MakeIfAbsent)]
    #[case("append", Strategy::AppendArray)]
    fn test_strategy_parse(#[case] tag: &str, #[case] expected: Strategy) {
        assert_eq!(tag.parse::<Strategy>().unwrap(), expected);
        assert_eq!(expected.to_string(), tag);
    }

    #[test]
    fn test_strategy_unknown_tag() {
        let err = "merge".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, Error::UnknownStrategy(ref tag) if tag == "merge"));
        assert!(err.to_string().contains("merge"));
    }

    #[test]
    fn test_all_tags_parse() {
        for tag in Strategy::all_tags() {
            assert_eq!(tag.parse::<Strategy>().unwrap().tag(), *tag);
        }
    }

    #[test]
    fn test_from_tagged_append_requires_array() {
        let rule = DefaultRule::from_tagged("plugins", "append", json!(["a"]).into()).unwrap();
        assert_eq!(rule.strategy(), Strategy::AppendArray);

        let err = DefaultRule::from_tagged("plugins", "append", json!("a").into()).unwrap_err();
        assert!(matches!(
            err,
            Error::StrategyValueMismatch { ref strategy, ref value_kind, .. }
                if strategy == "append" && value_kind == "string"
        ));
    }

    #[test]
    fn test_from_tagged_call_rejects_literal() {
        let err = DefaultRule::from_tagged("entry", "call", json!("./src").into()).unwrap_err();
        assert!(err.to_string().contains("entry"));
    }

    #[test]
    fn test_from_tagged_make_accepts_factory() {
        let make: MakeFn = Arc::new(|_: &Value| json!(true));
        let rule = DefaultRule::from_tagged("cache", "make", DefaultValue::Make(make)).unwrap();
        assert_eq!(rule.strategy(), Strategy::MakeIfAbsent);
    }

    #[test]
    fn test_from_tagged_unknown_tag_fails_before_value_check() {
        let err = DefaultRule::from_tagged("x", "prepend", json!([]).into()).unwrap_err();
        assert!(matches!(err, Error::UnknownStrategy(_)));
    }

    #[test]
    fn test_rule_debug_hides_closures() {
        let rule = DefaultRule::call(|_, _| Value::Null);
        assert_eq!(format!("{:?}", rule), "Overwrite(<fn>)");
    }
}
