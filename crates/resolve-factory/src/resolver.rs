//! Constructed resolvers and override composition

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::trace;

use crate::error::{Error, Result};
use crate::options::{IdentityMap, ResolveOptions, shallow_merge};

/// Where a resolver goes to build its derived variants.
pub(crate) trait ResolverSource<H> {
    fn resolve(&self, namespace: &str, options: &ResolveOptions) -> Result<Rc<Resolver<H>>>;
}

/// A resolver built by [`ResolverFactory`](crate::ResolverFactory).
///
/// Wraps the creation collaborator's handle together with the options it
/// was built from. Resolvers are shared (`Rc`) and never change after
/// construction; [`with_options`](Self::with_options) derives new ones.
pub struct Resolver<H> {
    namespace: String,
    handle: H,
    options: Value,
    original: Value,
    derived: RefCell<IdentityMap<Rc<Resolver<H>>>>,
    factory: Weak<dyn ResolverSource<H>>,
}

impl<H> Resolver<H> {
    pub(crate) fn new(
        namespace: &str,
        handle: H,
        options: Value,
        original: Value,
        factory: Weak<dyn ResolverSource<H>>,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            handle,
            options,
            original,
            derived: RefCell::new(IdentityMap::new()),
            factory,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The object returned by the creation collaborator.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Effective options: the caller's options after all transform hooks.
    pub fn options(&self) -> &Value {
        &self.options
    }

    /// The caller's options as passed in, before transform hooks.
    pub fn original_options(&self) -> &Value {
        &self.original
    }

    /// Derive a resolver whose options are this resolver's original options
    /// shallow-merged with `overrides`.
    ///
    /// Results are cached per `overrides` handle: calling again with the same
    /// handle returns the same resolver without touching the factory. Equal
    /// overrides passed through different handles each go through the
    /// factory, whose content cache still hands back a single resolver.
    pub fn with_options(&self, overrides: &ResolveOptions) -> Result<Rc<Resolver<H>>> {
        let cached = self.derived.borrow().get(overrides).cloned();
        if let Some(resolver) = cached {
            trace!(namespace = %self.namespace, "Derived resolver cache hit");
            return Ok(resolver);
        }

        let factory = self.factory.upgrade().ok_or_else(|| Error::FactoryDropped {
            namespace: self.namespace.clone(),
        })?;

        let merged = ResolveOptions::new(shallow_merge(&self.original, overrides.value()));
        let derived = factory.resolve(&self.namespace, &merged)?;

        self.derived
            .borrow_mut()
            .insert(overrides, Rc::clone(&derived));
        Ok(derived)
    }

    /// Number of override handles with a cached derived resolver.
    pub fn derived_count(&self) -> usize {
        self.derived.borrow().len()
    }
}

impl<H> fmt::Debug for Resolver<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("namespace", &self.namespace)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
