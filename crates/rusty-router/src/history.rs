//! History backends
//!
//! The router only ever reads the current location and pushes new entries;
//! back/forward traversal is driven by the backend (the browser, or
//! [`MemoryHistory`] in tests) and reported to the navigator afterwards.

use std::cell::RefCell;

use crate::error::RouterError;

/// Session history as seen by the router
///
/// Paths are *external*: they include the mount prefix.
pub trait History {
    /// Current location path
    fn current_path(&self) -> String;

    /// Pushes a new entry without reloading
    fn push(&self, url: &str) -> Result<(), RouterError>;
}

/// In-memory history stack
///
/// # Examples
///
/// ```
/// use rusty_router::{History, MemoryHistory};
///
/// let history = MemoryHistory::new("/");
/// history.push("/about").unwrap();
/// assert_eq!(history.current_path(), "/about");
///
/// assert!(history.back());
/// assert_eq!(history.current_path(), "/");
/// assert_eq!(history.len(), 2);
/// ```
#[derive(Debug)]
pub struct MemoryHistory {
    state: RefCell<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: RefCell::new(MemoryState {
                entries: vec![initial.into()],
                index: 0,
            }),
        }
    }

    /// Moves one entry back; `false` at the oldest entry
    pub fn back(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.index == 0 {
            return false;
        }
        state.index -= 1;
        true
    }

    /// Moves one entry forward; `false` at the newest entry
    pub fn forward(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.index + 1 >= state.entries.len() {
            return false;
        }
        state.index += 1;
        true
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    pub fn entries(&self) -> Vec<String> {
        self.state.borrow().entries.clone()
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        let state = self.state.borrow();
        state.entries[state.index].clone()
    }

    /// Pushing drops any forward entries, like the browser does
    fn push(&self, url: &str) -> Result<(), RouterError> {
        let mut state = self.state.borrow_mut();
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(url.to_string());
        state.index = keep;
        Ok(())
    }
}

impl<H: History + ?Sized> History for std::rc::Rc<H> {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn push(&self, url: &str) -> Result<(), RouterError> {
        (**self).push(url)
    }
}
