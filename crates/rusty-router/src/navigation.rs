//! Navigation controller
//!
//! Owns the current internal path. Exactly two transitions change it:
//! [`Navigator::navigate`] (push a history entry, then update) and
//! [`Navigator::sync_with_history`] (the backend moved back/forward; read
//! its location, push nothing). Both complete synchronously before any
//! subscriber runs, so no other navigation can interleave.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::context::NavigateFn;
use crate::error::RouterError;
use crate::history::History;
use crate::path::{with_leading_slash, BasePath};

type Listener = Rc<dyn Fn(&str)>;
type ListenerList = RefCell<Vec<(u64, Listener)>>;

struct NavigatorInner<H> {
    history: H,
    base: BasePath,
    pathname: RefCell<String>,
    listeners: Rc<ListenerList>,
    next_listener: Cell<u64>,
}

/// Navigation state machine over a history backend
pub struct Navigator<H> {
    inner: Rc<NavigatorInner<H>>,
}

impl<H: History + 'static> Navigator<H> {
    /// Starts at the backend's current location, prefix stripped
    pub fn new(history: H, base: BasePath) -> Self {
        let pathname = base.strip_prefix(&history.current_path()).into_owned();
        debug!(pathname = %pathname, base = base.as_str(), "navigator initialized");

        Self {
            inner: Rc::new(NavigatorInner {
                history,
                base,
                pathname: RefCell::new(pathname),
                listeners: Rc::new(RefCell::new(Vec::new())),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Pushes `to` (an internal path) onto the history and makes it current
    ///
    /// On a failed push the current path is left untouched.
    pub fn navigate(&self, to: &str) -> Result<(), RouterError> {
        let target = with_leading_slash(to).into_owned();
        let url = self.inner.base.add_prefix(&target);

        self.inner.history.push(&url)?;
        debug!(to = %target, url = %url, "navigated");

        self.set_pathname(target);
        Ok(())
    }

    /// Re-reads the backend location after an external back/forward move
    pub fn sync_with_history(&self) {
        let external = self.inner.history.current_path();
        let pathname = self.inner.base.strip_prefix(&external).into_owned();
        debug!(pathname = %pathname, "history changed externally");

        self.set_pathname(pathname);
    }

    /// Fire-and-forget navigate for the render context
    ///
    /// Holds the navigator weakly, so contexts captured by components never
    /// keep a dropped router alive.
    pub fn navigate_fn(&self) -> NavigateFn {
        let weak: Weak<NavigatorInner<H>> = Rc::downgrade(&self.inner);
        NavigateFn::new(move |to| {
            let Some(inner) = weak.upgrade() else {
                warn!(to, "navigate called after the router was dropped");
                return;
            };
            if let Err(err) = (Navigator { inner }).navigate(to) {
                warn!(to, error = %err, "navigation failed");
            }
        })
    }
}

impl<H> Navigator<H> {
    pub fn pathname(&self) -> String {
        self.inner.pathname.borrow().clone()
    }

    pub fn base(&self) -> &BasePath {
        &self.inner.base
    }

    pub fn history(&self) -> &H {
        &self.inner.history
    }

    /// Registers a callback run after every path change
    ///
    /// The callback receives the new internal path. Dropping the returned
    /// [`Subscription`] unregisters it.
    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> Subscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        Subscription {
            id,
            listeners: Rc::downgrade(&self.inner.listeners),
        }
    }

    fn set_pathname(&self, pathname: String) {
        {
            let mut current = self.inner.pathname.borrow_mut();
            if *current == pathname {
                return;
            }
            *current = pathname.clone();
        }

        // Snapshot so listeners may subscribe, unsubscribe or navigate
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&pathname);
        }
    }
}

impl<H> Clone for Navigator<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H> fmt::Debug for Navigator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("pathname", &*self.inner.pathname.borrow())
            .field("base", &self.inner.base)
            .finish()
    }
}

/// Listener registration; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
