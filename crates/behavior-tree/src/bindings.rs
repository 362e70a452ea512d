//! Host-supplied binding tables.
//!
//! Actions are zero-argument functions returning a future that may suspend
//! across frames. Conditions are zero-argument predicates. Both are keyed by
//! the host's own tag enums and resolved once, when the tree is loaded.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use strum::IntoEnumIterator;

use crate::error::{BuildError, Result};
use crate::tag::Tag;

/// Bound asynchronous action.
pub type ActionFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Bound condition predicate.
pub type ConditionFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// Wraps an async closure into an [`ActionFn`].
pub fn action_fn<F, Fut>(f: F) -> ActionFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Wraps a predicate into a [`ConditionFn`].
pub fn condition_fn<F>(f: F) -> ConditionFn
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Action and condition tables for one tree.
///
/// # Example
///
/// ```rust,ignore
/// let bindings = Bindings::new()
///     .action(Act::Wait, || async { tokio::time::sleep(ONE_SECOND).await })
///     .condition(Cond::FiftyFifty, || rand::random());
/// ```
pub struct Bindings<A, C> {
    actions: HashMap<A, ActionFn>,
    conditions: HashMap<C, ConditionFn>,
}

impl<A: Tag, C: Tag> Bindings<A, C> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            conditions: HashMap::new(),
        }
    }

    /// Binds `tag` to an async action, replacing any previous binding.
    pub fn action<F, Fut>(mut self, tag: A, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.actions.insert(tag, action_fn(f));
        self
    }

    /// Binds `tag` to a predicate, replacing any previous binding.
    pub fn condition<F>(mut self, tag: C, f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.conditions.insert(tag, condition_fn(f));
        self
    }

    pub fn action_for(&self, tag: &A) -> Option<&ActionFn> {
        self.actions.get(tag)
    }

    pub fn condition_for(&self, tag: &C) -> Option<&ConditionFn> {
        self.conditions.get(tag)
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// Action variants of `A` with no binding, in declaration order.
    pub fn missing_actions(&self) -> Vec<A>
    where
        A: IntoEnumIterator,
    {
        A::iter().filter(|tag| !self.actions.contains_key(tag)).collect()
    }

    /// Condition variants of `C` with no binding, in declaration order.
    pub fn missing_conditions(&self) -> Vec<C>
    where
        C: IntoEnumIterator,
    {
        C::iter()
            .filter(|tag| !self.conditions.contains_key(tag))
            .collect()
    }

    /// Fails unless every variant of both vocabularies is bound.
    pub fn ensure_complete(&self) -> Result<()>
    where
        A: IntoEnumIterator,
        C: IntoEnumIterator,
    {
        let actions = self.missing_actions();
        let conditions = self.missing_conditions();
        if actions.is_empty() && conditions.is_empty() {
            return Ok(());
        }

        Err(BuildError::IncompleteBindings {
            actions: actions.iter().map(ToString::to_string).collect(),
            conditions: conditions.iter().map(ToString::to_string).collect(),
        })
    }
}

impl<A: Tag, C: Tag> Default for Bindings<A, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Tag, C: Tag> fmt::Debug for Bindings<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("conditions", &self.conditions.keys().collect::<Vec<_>>())
            .finish()
    }
}
