//! Lazy component cache
//!
//! A [`LazyComponent`] wraps one loader: the first render starts the load,
//! later renders observe the same shared result. The [`LazyCache`] memoizes
//! one wrapper per loader *identity*, so a route that was loaded once is
//! never re-requested or re-suspended.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use tracing::{debug, error};

use crate::error::LoadError;
use crate::module::{LoadFuture, Loader, LoaderId};

/// Observable state of a lazy component
#[derive(Debug, Clone, PartialEq)]
pub enum LazyStatus<T> {
    /// Load started but not settled; render the fallback
    Pending,
    Ready(T),
    Failed(LoadError),
}

enum LoadState<T> {
    Idle,
    Loading(Shared<LoadFuture<T>>),
    Ready(T),
    Failed(LoadError),
}

struct LazyInner<T> {
    loader: Loader<T>,
    state: RefCell<LoadState<T>>,
}

/// Deferred component: suspends until its loader resolves
pub struct LazyComponent<T> {
    inner: Rc<LazyInner<T>>,
}

impl<T: Clone + 'static> LazyComponent<T> {
    pub fn new(loader: Loader<T>) -> Self {
        Self {
            inner: Rc::new(LazyInner {
                loader,
                state: RefCell::new(LoadState::Idle),
            }),
        }
    }

    /// Current state; the first call starts the load
    ///
    /// Already-settled loads are picked up without yielding, so a loader
    /// that resolves immediately is `Ready` on the very first call.
    pub fn status(&self) -> LazyStatus<T> {
        let shared = match &*self.inner.state.borrow() {
            LoadState::Ready(module) => return LazyStatus::Ready(module.clone()),
            LoadState::Failed(err) => return LazyStatus::Failed(err.clone()),
            LoadState::Loading(shared) => Some(shared.clone()),
            LoadState::Idle => None,
        };

        // Start outside the borrow: the loader is user code
        let shared = shared.unwrap_or_else(|| self.start());

        match shared.now_or_never() {
            Some(result) => self.settle(result),
            None => LazyStatus::Pending,
        }
    }

    /// The resolved module, if available
    pub fn ready(&self) -> Option<T> {
        match self.status() {
            LazyStatus::Ready(module) => Some(module),
            _ => None,
        }
    }

    /// Future that completes once the load settles
    ///
    /// Hosts spawn it and re-render on completion. A load that settles after
    /// the user navigated away only updates this wrapper.
    pub fn wait(&self) -> LocalBoxFuture<'static, ()> {
        let shared = match &*self.inner.state.borrow() {
            LoadState::Ready(_) | LoadState::Failed(_) => return futures::future::ready(()).boxed_local(),
            LoadState::Loading(shared) => Some(shared.clone()),
            LoadState::Idle => None,
        };
        let shared = shared.unwrap_or_else(|| self.start());

        let this = self.clone();
        async move {
            let result = shared.await;
            this.settle(result);
        }
        .boxed_local()
    }

    fn start(&self) -> Shared<LoadFuture<T>> {
        let shared = self.inner.loader.load().shared();
        *self.inner.state.borrow_mut() = LoadState::Loading(shared.clone());
        shared
    }

    fn settle(&self, result: Result<T, LoadError>) -> LazyStatus<T> {
        let mut state = self.inner.state.borrow_mut();
        match result {
            Ok(module) => {
                *state = LoadState::Ready(module.clone());
                LazyStatus::Ready(module)
            }
            Err(err) => {
                if !matches!(*state, LoadState::Failed(_)) {
                    error!(loader = ?self.inner.loader.id(), error = %err, "module load failed");
                }
                *state = LoadState::Failed(err.clone());
                LazyStatus::Failed(err)
            }
        }
    }
}

impl<T> LazyComponent<T> {
    pub fn loader(&self) -> &Loader<T> {
        &self.inner.loader
    }

    /// Whether both handles are the same wrapper instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for LazyComponent<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for LazyComponent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.inner.state.borrow() {
            LoadState::Idle => "idle",
            LoadState::Loading(_) => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(_) => "failed",
        };
        f.debug_struct("LazyComponent")
            .field("loader", &self.inner.loader.id())
            .field("state", &state)
            .finish()
    }
}

/// Identity-keyed memo of lazy wrappers
///
/// Holds at most one entry per discovered module; [`LazyCache::retain`]
/// drops the wrappers of loaders that left the directory. Each entry keeps
/// its loader alive, so a loader's address cannot be reused by another
/// loader while the cache holds it.
pub struct LazyCache<T> {
    entries: RefCell<HashMap<LoaderId, LazyComponent<T>>>,
}

impl<T: Clone + 'static> LazyCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// The wrapper for `loader`, created on first request
    pub fn get_lazy(&self, loader: &Loader<T>) -> LazyComponent<T> {
        self.entries
            .borrow_mut()
            .entry(loader.id())
            .or_insert_with(|| {
                debug!(loader = ?loader.id(), "creating lazy wrapper");
                LazyComponent::new(loader.clone())
            })
            .clone()
    }
}

impl<T> LazyCache<T> {
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Keeps only the wrappers whose loader satisfies `keep`
    pub fn retain(&self, mut keep: impl FnMut(LoaderId) -> bool) {
        self.entries.borrow_mut().retain(|id, _| keep(*id));
    }
}

impl<T: Clone + 'static> Default for LazyCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::cell::Cell;

    #[test]
    fn test_same_loader_same_wrapper() {
        let cache = LazyCache::new();
        let loader = Loader::ready(7u32);

        let first = cache.get_lazy(&loader);
        let second = cache.get_lazy(&loader.clone());

        assert!(first.ptr_eq(&second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_loaders_distinct_wrappers() {
        let cache = LazyCache::new();
        let a = Loader::ready(7u32);
        let b = Loader::ready(7u32);

        assert!(!cache.get_lazy(&a).ptr_eq(&cache.get_lazy(&b)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_retain_drops_unlisted_loaders() {
        let cache = LazyCache::new();
        let kept = Loader::ready(1u32);
        let dropped = Loader::ready(2u32);
        let wrapper = cache.get_lazy(&kept);
        cache.get_lazy(&dropped);

        let keep_id = kept.id();
        cache.retain(|id| id == keep_id);

        assert_eq!(cache.len(), 1);
        assert!(cache.get_lazy(&kept).ptr_eq(&wrapper));
    }

    #[test]
    fn test_ready_loader_resolves_on_first_status() {
        let lazy = LazyComponent::new(Loader::ready("page"));
        assert_eq!(lazy.status(), LazyStatus::Ready("page"));
    }

    #[test]
    fn test_loader_invoked_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let loader = Loader::new(move || {
            counter.set(counter.get() + 1);
            async { Ok::<_, LoadError>(1u8) }
        });

        let cache = LazyCache::new();
        for _ in 0..3 {
            assert_eq!(cache.get_lazy(&loader).status(), LazyStatus::Ready(1));
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_pending_until_resolved() {
        let (tx, rx) = oneshot::channel::<u32>();
        let rx = RefCell::new(Some(rx));
        let loader = Loader::new(move || {
            let rx = rx.borrow_mut().take();
            async move {
                match rx {
                    Some(rx) => rx.await.map_err(|_| LoadError::new("cancelled")),
                    None => Err(LoadError::new("loaded twice")),
                }
            }
        });

        let lazy = LazyComponent::new(loader);
        assert_eq!(lazy.status(), LazyStatus::Pending);
        assert_eq!(lazy.status(), LazyStatus::Pending);

        let wait = lazy.wait();
        tx.send(99).unwrap();
        block_on(wait);

        assert_eq!(lazy.status(), LazyStatus::Ready(99));
        assert_eq!(lazy.ready(), Some(99));
    }

    #[test]
    fn test_failed_load_is_sticky() {
        let lazy: LazyComponent<u32> =
            LazyComponent::new(Loader::new(|| async { Err(LoadError::new("network down")) }));

        assert_eq!(
            lazy.status(),
            LazyStatus::Failed(LoadError::new("network down"))
        );
        assert!(matches!(lazy.status(), LazyStatus::Failed(_)));
        block_on(lazy.wait());
        assert_eq!(lazy.ready(), None);
    }
}
