//! Navigation context handed to every page and layout
//!
//! The context is an explicit value threaded down the render tree rather
//! than shared global state, so several routers (e.g. in tests) never
//! observe each other.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Parameter name → captured value
pub type RouteParams = HashMap<String, String>;

/// Fire-and-forget navigation callback
#[derive(Clone)]
pub struct NavigateFn(Rc<dyn Fn(&str)>);

impl NavigateFn {
    pub fn new(navigate: impl Fn(&str) + 'static) -> Self {
        Self(Rc::new(navigate))
    }

    /// Callback that ignores every request
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn call(&self, to: &str) {
        (self.0)(to)
    }
}

impl fmt::Debug for NavigateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NavigateFn")
    }
}

/// What descendants of the router can read: current path, params and a
/// way to navigate
#[derive(Debug, Clone)]
pub struct RouterContext {
    pathname: String,
    params: RouteParams,
    navigate: NavigateFn,
}

impl RouterContext {
    pub fn new(pathname: impl Into<String>, params: RouteParams, navigate: NavigateFn) -> Self {
        Self {
            pathname: pathname.into(),
            params,
            navigate,
        }
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Single parameter value
    ///
    /// # Examples
    ///
    /// ```
    /// use rusty_router::{NavigateFn, RouteParams, RouterContext};
    ///
    /// let mut params = RouteParams::new();
    /// params.insert("id".to_string(), "42".to_string());
    ///
    /// let ctx = RouterContext::new("/posts/42", params, NavigateFn::noop());
    /// assert_eq!(ctx.param("id"), Some("42"));
    /// assert_eq!(ctx.param("slug"), None);
    /// ```
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn navigate(&self, to: &str) {
        self.navigate.call(to)
    }

    pub fn navigate_fn(&self) -> &NavigateFn {
        &self.navigate
    }
}

impl Default for RouterContext {
    fn default() -> Self {
        Self::new("/", RouteParams::new(), NavigateFn::noop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_default_context() {
        let ctx = RouterContext::default();
        assert_eq!(ctx.pathname(), "/");
        assert!(ctx.params().is_empty());
        ctx.navigate("/ignored");
    }

    #[test]
    fn test_navigate_forwards_to_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let ctx = RouterContext::new(
            "/",
            RouteParams::new(),
            NavigateFn::new(move |to| sink.borrow_mut().push(to.to_string())),
        );

        ctx.navigate("/about");
        ctx.clone().navigate("/posts/1");

        assert_eq!(*seen.borrow(), vec!["/about", "/posts/1"]);
    }
}
