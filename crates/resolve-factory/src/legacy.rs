//! Name-based plugin registration
//!
//! Older integrations register hooks with a single event name instead of a
//! namespace and a hook kind:
//!
//! - `"resolve-options <namespace>"` registers a transform handler
//! - `"resolver <namespace>"` registers a notify handler
//!
//! This module translates those names; it adds no behaviour of its own.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::hooks::{HookPipeline, NotifyFn, TransformFn};
use crate::resolver::Resolver;

/// Handler name used when a legacy plugin does not supply one
pub const UNNAMED_PLUGIN: &str = "unnamed compat plugin";

static RESOLVE_OPTIONS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^resolve-options (.+)$").unwrap());

static RESOLVER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^resolver (.+)$").unwrap());

/// Which hook a legacy event name addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyEvent {
    /// `resolve-options <namespace>`
    ResolveOptions(String),
    /// `resolver <namespace>`
    Resolver(String),
}

impl LegacyEvent {
    /// Parse a legacy event name.
    ///
    /// Returns `None` for names that match neither pattern.
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(caps) = RESOLVE_OPTIONS_PATTERN.captures(name) {
            return Some(Self::ResolveOptions(caps[1].to_string()));
        }
        RESOLVER_PATTERN
            .captures(name)
            .map(|caps| Self::Resolver(caps[1].to_string()))
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::ResolveOptions(ns) | Self::Resolver(ns) => ns,
        }
    }
}

/// A handler registered through a legacy event name
pub enum LegacyPlugin<H> {
    Transform(Rc<TransformFn>),
    Notify(Rc<NotifyFn<H>>),
}

impl<H> LegacyPlugin<H> {
    pub fn transform<F>(handler: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        Self::Transform(Rc::new(handler))
    }

    pub fn notify<F>(handler: F) -> Self
    where
        F: Fn(&Resolver<H>, &Value) + 'static,
    {
        Self::Notify(Rc::new(handler))
    }
}

impl<H> HookPipeline<H> {
    /// Register `plugin` under a legacy event name.
    ///
    /// Returns `Ok(false)` when `name` is not a resolver event, so callers
    /// can fall through to other handlers. A handler whose shape does not
    /// fit the event is rejected.
    pub fn plugin(
        &mut self,
        name: &str,
        handler_name: Option<&str>,
        plugin: LegacyPlugin<H>,
    ) -> Result<bool> {
        let Some(event) = LegacyEvent::parse(name) else {
            return Ok(false);
        };
        let handler_name = handler_name.unwrap_or(UNNAMED_PLUGIN);

        match (event, plugin) {
            (LegacyEvent::ResolveOptions(namespace), LegacyPlugin::Transform(handler)) => {
                debug!(namespace = %namespace, handler = handler_name, "Registered legacy transform plugin");
                self.tap_transform_rc(&namespace, handler_name, handler);
            }
            (LegacyEvent::Resolver(namespace), LegacyPlugin::Notify(handler)) => {
                debug!(namespace = %namespace, handler = handler_name, "Registered legacy notify plugin");
                self.tap_notify_rc(&namespace, handler_name, handler);
            }
            (LegacyEvent::ResolveOptions(_), LegacyPlugin::Notify(_)) => {
                return Err(Error::PluginShapeMismatch {
                    name: name.to_string(),
                    expected: "transform".to_string(),
                });
            }
            (LegacyEvent::Resolver(_), LegacyPlugin::Transform(_)) => {
                return Err(Error::PluginShapeMismatch {
                    name: name.to_string(),
                    expected: "notify".to_string(),
                });
            }
        }

        Ok(true)
    }
}
