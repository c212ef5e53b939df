use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::CheckFailure;

/// Outcome of invoking a single check against a context.
pub type CheckResult = Result<bool, CheckFailure>;

type SyncCheckFn<C> = dyn Fn(&C) -> CheckResult + Send + Sync;
type AsyncCheckFn<C> = dyn for<'a> Fn(&'a C) -> BoxFuture<'a, CheckResult> + Send + Sync;

/// Which evaluation path a check participates in.
enum CheckKind<C> {
    Sync(Arc<SyncCheckFn<C>>),
    Async(Arc<AsyncCheckFn<C>>),
}

impl<C> Clone for CheckKind<C> {
    fn clone(&self) -> Self {
        match self {
            CheckKind::Sync(f) => CheckKind::Sync(Arc::clone(f)),
            CheckKind::Async(f) => CheckKind::Async(Arc::clone(f)),
        }
    }
}

/// A named predicate attached to a rule.
pub struct Check<C> {
    name: String,
    kind: CheckKind<C>,
}

impl<C> Clone for Check<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<C: 'static> Check<C> {
    /// Infallible synchronous predicate.
    pub fn sync<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: CheckKind::Sync(Arc::new(move |ctx: &C| {
                Ok::<bool, CheckFailure>(check(ctx))
            })),
        }
    }

    /// Synchronous predicate that may fail to produce a verdict.
    pub fn try_sync<F, E>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&C) -> Result<bool, E> + Send + Sync + 'static,
        E: Into<Box<dyn StdError + Send + Sync + 'static>> + 'static,
    {
        Self {
            name: name.into(),
            kind: CheckKind::Sync(Arc::new(move |ctx: &C| {
                check(ctx).map_err(CheckFailure::new)
            })),
        }
    }

    /// Infallible asynchronous predicate, e.g. a lookup against a backend.
    pub fn asynchronous<F>(name: impl Into<String>, check: F) -> Self
    where
        F: for<'a> Fn(&'a C) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: CheckKind::Async(async_check(move |ctx| {
                let pending = check(ctx);
                async move { Ok::<bool, CheckFailure>(pending.await) }.boxed()
            })),
        }
    }

    /// Asynchronous predicate whose future may resolve to an error.
    pub fn try_asynchronous<F, E>(name: impl Into<String>, check: F) -> Self
    where
        F: for<'a> Fn(&'a C) -> BoxFuture<'a, Result<bool, E>> + Send + Sync + 'static,
        E: Into<Box<dyn StdError + Send + Sync + 'static>> + 'static,
    {
        Self {
            name: name.into(),
            kind: CheckKind::Async(async_check(move |ctx| {
                let pending = check(ctx);
                async move { pending.await.map_err(CheckFailure::new) }.boxed()
            })),
        }
    }
}

impl<C> Check<C> {
    /// Name reported in logs and in [`RuleVerdict::failed_check`](crate::RuleVerdict).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the check only runs on the asynchronous path.
    pub fn is_async(&self) -> bool {
        matches!(self.kind, CheckKind::Async(_))
    }

    /// Runs the check if it belongs to the synchronous path.
    pub fn call_sync(&self, ctx: &C) -> Option<CheckResult> {
        match &self.kind {
            CheckKind::Sync(check) => Some(check(ctx)),
            CheckKind::Async(_) => None,
        }
    }

    /// Starts the check if it belongs to the asynchronous path.
    pub fn call_async<'a>(&'a self, ctx: &'a C) -> Option<BoxFuture<'a, CheckResult>> {
        match &self.kind {
            CheckKind::Sync(_) => None,
            CheckKind::Async(check) => Some(check(ctx)),
        }
    }
}

impl<C> fmt::Debug for Check<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_async() { "async" } else { "sync" };
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

// Pins the higher-ranked signature so the returned future may borrow the context.
fn async_check<C, F>(check: F) -> Arc<AsyncCheckFn<C>>
where
    F: for<'a> Fn(&'a C) -> BoxFuture<'a, CheckResult> + Send + Sync + 'static,
{
    Arc::new(check)
}
