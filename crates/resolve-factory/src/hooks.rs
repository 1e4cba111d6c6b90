//! Per-namespace transform and notify hooks
//!
//! Two hook shapes run around resolver construction:
//!
//! - **transform** handlers form a waterfall: each receives the previous
//!   handler's output, starting from the caller's options, and the last
//!   output becomes the effective options.
//! - **notify** handlers see the finished resolver and the effective
//!   options. They observe; they cannot change the resolver.
//!
//! Handlers run synchronously in registration order. Each namespace has its
//! own independent lists.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::resolver::Resolver;

/// Transform handler: options in, options out
pub type TransformFn = dyn Fn(Value) -> Value;

/// Notify handler: finished resolver and its effective options
pub type NotifyFn<H> = dyn Fn(&Resolver<H>, &Value);

struct Tap<F: ?Sized> {
    name: String,
    handler: Rc<F>,
}

impl<F: ?Sized> Clone for Tap<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            handler: Rc::clone(&self.handler),
        }
    }
}

/// The handlers registered for one namespace.
///
/// Cloning is cheap (handlers are reference-counted), so the factory takes
/// a snapshot before running them. A handler may therefore register further
/// handlers; they take effect on the next construction.
pub struct NamespaceHooks<H> {
    transforms: Vec<Tap<TransformFn>>,
    notifies: Vec<Tap<NotifyFn<H>>>,
}

impl<H> Default for NamespaceHooks<H> {
    fn default() -> Self {
        Self {
            transforms: Vec::new(),
            notifies: Vec::new(),
        }
    }
}

impl<H> Clone for NamespaceHooks<H> {
    fn clone(&self) -> Self {
        Self {
            transforms: self.transforms.clone(),
            notifies: self.notifies.clone(),
        }
    }
}

impl<H> NamespaceHooks<H> {
    /// Run the transform waterfall.
    pub fn transform(&self, namespace: &str, options: Value) -> Value {
        if !self.transforms.is_empty() {
            debug!(
                namespace = %namespace,
                handlers = self.transforms.len(),
                "Running transform hooks"
            );
        }
        self.transforms
            .iter()
            .fold(options, |current, tap| (tap.handler)(current))
    }

    /// Broadcast a finished resolver to every notify handler.
    pub fn notify(&self, namespace: &str, resolver: &Resolver<H>, options: &Value) {
        if !self.notifies.is_empty() {
            debug!(
                namespace = %namespace,
                handlers = self.notifies.len(),
                "Running notify hooks"
            );
        }
        for tap in &self.notifies {
            (tap.handler)(resolver, options);
        }
    }

    pub fn transform_names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn notify_names(&self) -> Vec<&str> {
        self.notifies.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty() && self.notifies.is_empty()
    }
}

/// Transform and notify hooks for every namespace.
pub struct HookPipeline<H> {
    namespaces: HashMap<String, NamespaceHooks<H>>,
}

impl<H> Default for HookPipeline<H> {
    fn default() -> Self {
        Self {
            namespaces: HashMap::new(),
        }
    }
}

impl<H> HookPipeline<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform handler for `namespace`.
    pub fn tap_transform<F>(&mut self, namespace: &str, name: &str, handler: F)
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.tap_transform_rc(namespace, name, Rc::new(handler));
    }

    /// Register a notify handler for `namespace`.
    pub fn tap_notify<F>(&mut self, namespace: &str, name: &str, handler: F)
    where
        F: Fn(&Resolver<H>, &Value) + 'static,
    {
        self.tap_notify_rc(namespace, name, Rc::new(handler));
    }

    pub(crate) fn tap_transform_rc(&mut self, namespace: &str, name: &str, handler: Rc<TransformFn>) {
        self.entry(namespace).transforms.push(Tap {
            name: name.to_string(),
            handler,
        });
    }

    pub(crate) fn tap_notify_rc(&mut self, namespace: &str, name: &str, handler: Rc<NotifyFn<H>>) {
        self.entry(namespace).notifies.push(Tap {
            name: name.to_string(),
            handler,
        });
    }

    /// Snapshot of the handlers registered for `namespace`.
    pub fn for_namespace(&self, namespace: &str) -> NamespaceHooks<H> {
        self.namespaces
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    /// Namespaces with at least one handler (sorted).
    pub fn namespaces(&self) -> Vec<&str> {
        let mut names: Vec<_> = self
            .namespaces
            .iter()
            .filter(|(_, hooks)| !hooks.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort();
        names
    }

    fn entry(&mut self, namespace: &str) -> &mut NamespaceHooks<H> {
        self.namespaces.entry(namespace.to_string()).or_default()
    }
}
