//! Cached resolver construction for Resolve Kit
//!
//! Resolvers are expensive to build and immutable once built, so the
//! factory memoizes them:
//!
//! - [`ResolverFactory`] runs per-namespace [`hooks`] around an external
//!   [`CreateResolver`] collaborator and caches the result
//! - [`cache`] keys resolvers by options identity, then by serialized
//!   content
//! - [`Resolver::with_options`] derives variants from overrides, cached
//!   per override handle
//! - [`legacy`] maps `"resolve-options <ns>"` / `"resolver <ns>"` plugin
//!   names onto the hook pipeline
//!
//! # Example
//!
//! ```
//! use resolve_factory::{ResolveOptions, ResolverFactory};
//! use serde_json::{Value, json};
//!
//! let factory = ResolverFactory::new(|options: &Value| Some(options.clone()));
//! let options = ResolveOptions::new(json!({"extensions": [".js"]}));
//!
//! let resolver = factory.get("normal", &options).unwrap();
//! let again = factory.get("normal", &options).unwrap();
//! assert!(std::rc::Rc::ptr_eq(&resolver, &again));
//!
//! let browser = resolver
//!     .with_options(&json!({"mainFields": ["browser"]}).into())
//!     .unwrap();
//! assert_eq!(browser.options()["mainFields"], json!(["browser"]));
//! assert_eq!(browser.options()["extensions"], json!([".js"]));
//! ```

pub mod cache;
pub mod error;
pub mod factory;
pub mod hooks;
pub mod legacy;
pub mod logging;
pub mod options;
pub mod resolver;

pub use cache::{CacheStats, ResolverCache};
pub use error::{Error, Result};
pub use factory::{CreateResolver, ResolverFactory};
pub use hooks::{HookPipeline, NamespaceHooks};
pub use legacy::{LegacyEvent, LegacyPlugin};
pub use options::{ResolveOptions, shallow_merge};
pub use resolver::Resolver;
