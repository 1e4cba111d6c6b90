//! [`CountingCreator`] creation collaborator.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use resolve_factory::CreateResolver;
use serde_json::Value;

/// The handle produced by [`CountingCreator`].
#[derive(Debug, Clone, PartialEq)]
pub struct FakeResolver {
    /// 1-based creation sequence number
    pub id: usize,
    /// Effective options the resolver was created from
    pub options: Value,
}

type Rejection = Rc<dyn Fn(&Value) -> bool>;

/// Creation collaborator that counts its calls.
///
/// Clones share counters, so a test can keep a clone after moving the
/// original into a factory.
///
/// # Example
///
/// ```
/// use resolve_factory::{ResolveOptions, ResolverFactory};
/// use resolve_test_utils::CountingCreator;
/// use serde_json::json;
///
/// let creator = CountingCreator::new();
/// let factory = ResolverFactory::new(creator.clone());
///
/// factory.get("normal", &ResolveOptions::new(json!({}))).unwrap();
/// assert_eq!(creator.calls(), 1);
/// ```
#[derive(Clone, Default)]
pub struct CountingCreator {
    calls: Rc<Cell<usize>>,
    seen: Rc<RefCell<Vec<Value>>>,
    reject: Option<Rejection>,
}

impl CountingCreator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A creator that returns no resolver when `predicate` matches.
    pub fn rejecting<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Self {
            reject: Some(Rc::new(predicate)),
            ..Self::default()
        }
    }

    /// Number of `create` calls, rejected ones included.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Options passed to each `create` call, in order.
    pub fn seen(&self) -> Vec<Value> {
        self.seen.borrow().clone()
    }
}

impl CreateResolver for CountingCreator {
    type Handle = FakeResolver;

    fn create(&self, options: &Value) -> Option<FakeResolver> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().push(options.clone());

        if self.reject.as_ref().is_some_and(|reject| reject(options)) {
            return None;
        }

        Some(FakeResolver {
            id: self.calls.get(),
            options: options.clone(),
        })
    }
}
