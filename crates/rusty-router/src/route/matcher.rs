//! Route matching over a compiled table
//!
//! Matching is synchronous and side-effect free: scan in precedence order,
//! return the first route whose anchored pattern accepts the whole path.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::{RouteDefinition, RouteTable};
use crate::context::RouteParams;

/// Result of matching a route against a path
pub struct RouteMatch<V> {
    /// The matched route
    pub route: Rc<RouteDefinition<V>>,
    /// Extracted parameters from the path
    pub params: RouteParams,
}

impl<V> Clone for RouteMatch<V> {
    fn clone(&self) -> Self {
        Self {
            route: Rc::clone(&self.route),
            params: self.params.clone(),
        }
    }
}

impl<V> fmt::Debug for RouteMatch<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("route", &self.route.address())
            .field("params", &self.params)
            .finish()
    }
}

impl<V> RouteDefinition<V> {
    /// Matches this route against an internal path
    ///
    /// Parameter values are bound positionally, in `param_names` order.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let captures = self.pattern.captures(path)?;

        Some(
            self.param_names
                .iter()
                .enumerate()
                .filter_map(|(idx, name)| {
                    captures
                        .get(idx + 1)
                        .map(|value| (name.clone(), value.as_str().to_string()))
                })
                .collect(),
        )
    }
}

impl<V> RouteTable<V> {
    /// Matches a path against all routes and returns the first match
    ///
    /// `None` is the ordinary "no route" outcome; callers render the
    /// not-found view for it.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<V>> {
        let found = self.routes().iter().find_map(|route| {
            route.matches(path).map(|params| RouteMatch {
                route: Rc::clone(route),
                params,
            })
        });

        match &found {
            Some(m) => trace!(path, route = m.route.address(), "route matched"),
            None => trace!(path, "no route matched"),
        }

        found
    }
}
