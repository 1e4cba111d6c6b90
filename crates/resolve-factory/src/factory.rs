//! Resolver factory
//!
//! [`ResolverFactory::get`] returns the resolver for a namespace and a set
//! of options, building it at most once per distinct (namespace, content)
//! pair. Construction runs in a fixed order:
//!
//! 1. keep a copy of the caller's options for override composition
//! 2. run the namespace's transform hooks to get the effective options
//! 3. ask the [`CreateResolver`] collaborator for a handle
//! 4. wrap it in a [`Resolver`] that can derive variants via
//!    [`Resolver::with_options`]
//! 5. run the namespace's notify hooks
//!
//! Cache hits skip all of the above, hooks included.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheStats, ResolverCache, content_key};
use crate::error::{Error, Result};
use crate::hooks::HookPipeline;
use crate::legacy::LegacyPlugin;
use crate::options::ResolveOptions;
use crate::resolver::{Resolver, ResolverSource};

/// Builds the underlying resolver object from effective options.
///
/// Returning `None` means no resolver exists for these options, which the
/// factory reports as [`Error::NoResolverCreated`]. Implemented for any
/// `Fn(&Value) -> Option<H>`.
pub trait CreateResolver {
    type Handle;

    fn create(&self, options: &Value) -> Option<Self::Handle>;
}

impl<F, H> CreateResolver for F
where
    F: Fn(&Value) -> Option<H>,
{
    type Handle = H;

    fn create(&self, options: &Value) -> Option<H> {
        self(options)
    }
}

/// Caching resolver factory with per-namespace hooks.
///
/// Cloning the factory yields another handle to the same caches and hooks.
pub struct ResolverFactory<C: CreateResolver> {
    inner: Rc<FactoryInner<C>>,
}

impl<C: CreateResolver> Clone for ResolverFactory<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct FactoryInner<C: CreateResolver> {
    creator: C,
    hooks: RefCell<HookPipeline<C::Handle>>,
    cache: RefCell<ResolverCache<C::Handle>>,
    this: Weak<FactoryInner<C>>,
}

impl<C> ResolverFactory<C>
where
    C: CreateResolver + 'static,
    C::Handle: 'static,
{
    pub fn new(creator: C) -> Self {
        Self::with_hooks(creator, HookPipeline::new())
    }

    /// Create a factory around a pre-populated hook pipeline.
    pub fn with_hooks(creator: C, hooks: HookPipeline<C::Handle>) -> Self {
        let inner = Rc::new_cyclic(|this| FactoryInner {
            creator,
            hooks: RefCell::new(hooks),
            cache: RefCell::new(ResolverCache::new()),
            this: this.clone(),
        });
        Self { inner }
    }

    /// Get the resolver for `options` in `namespace`, building it on a miss.
    pub fn get(
        &self,
        namespace: &str,
        options: &ResolveOptions,
    ) -> Result<Rc<Resolver<C::Handle>>> {
        self.inner.resolve(namespace, options)
    }

    /// Register a transform hook. Applies to constructions after this call.
    pub fn tap_transform<F>(&self, namespace: &str, name: &str, handler: F)
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.hooks_mut().tap_transform(namespace, name, handler);
    }

    /// Register a notify hook. Applies to constructions after this call.
    pub fn tap_notify<F>(&self, namespace: &str, name: &str, handler: F)
    where
        F: Fn(&Resolver<C::Handle>, &Value) + 'static,
    {
        self.hooks_mut().tap_notify(namespace, name, handler);
    }

    /// Register a hook by legacy event name; see [`HookPipeline::plugin`].
    pub fn plugin(
        &self,
        name: &str,
        handler_name: Option<&str>,
        plugin: LegacyPlugin<C::Handle>,
    ) -> Result<bool> {
        self.hooks_mut().plugin(name, handler_name, plugin)
    }

    pub fn hooks(&self) -> Ref<'_, HookPipeline<C::Handle>> {
        self.inner.hooks.borrow()
    }

    /// Mutable access to the hook pipeline.
    ///
    /// Do not hold the guard across [`get`](Self::get): construction reads
    /// the pipeline.
    pub fn hooks_mut(&self) -> RefMut<'_, HookPipeline<C::Handle>> {
        self.inner.hooks.borrow_mut()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.borrow().stats()
    }

    /// Number of distinct resolvers built so far.
    pub fn cached_resolvers(&self) -> usize {
        self.inner.cache.borrow().len()
    }
}

impl<C> FactoryInner<C>
where
    C: CreateResolver + 'static,
    C::Handle: 'static,
{
    fn create(
        &self,
        namespace: &str,
        options: &ResolveOptions,
    ) -> Result<Rc<Resolver<C::Handle>>> {
        let original = options.value().clone();

        let transforms = self.hooks.borrow().for_namespace(namespace);
        let effective = transforms.transform(namespace, options.value().clone());

        let handle = self
            .creator
            .create(&effective)
            .ok_or_else(|| Error::NoResolverCreated {
                namespace: namespace.to_string(),
            })?;

        let source: Weak<dyn ResolverSource<C::Handle>> = self.this.clone();
        let resolver = Rc::new(Resolver::new(namespace, handle, effective, original, source));

        let notifies = self.hooks.borrow().for_namespace(namespace);
        notifies.notify(namespace, &resolver, resolver.options());

        debug!(namespace = %namespace, "Created resolver");
        Ok(resolver)
    }
}

impl<C> ResolverSource<C::Handle> for FactoryInner<C>
where
    C: CreateResolver + 'static,
    C::Handle: 'static,
{
    fn resolve(
        &self,
        namespace: &str,
        options: &ResolveOptions,
    ) -> Result<Rc<Resolver<C::Handle>>> {
        let cached = self.cache.borrow_mut().lookup_identity(namespace, options);
        if let Some(resolver) = cached {
            debug!(namespace = %namespace, "Resolver cache hit (identity)");
            return Ok(resolver);
        }

        let key = content_key(namespace, options)?;
        let cached = self
            .cache
            .borrow_mut()
            .lookup_content(namespace, options, &key);
        if let Some(resolver) = cached {
            debug!(namespace = %namespace, "Resolver cache hit (content)");
            return Ok(resolver);
        }

        debug!(namespace = %namespace, "Resolver cache miss");
        let resolver = self.create(namespace, options)?;
        Ok(self
            .cache
            .borrow_mut()
            .insert(namespace, options, key, resolver))
    }
}
