//! Route module for file-based routing
//!
//! Compiles the discovered page addresses into an ordered table of route
//! definitions and matches internal paths against it.
//!
//! - [`pattern`]: segment classification (`posts`, `[id]`, `[...slug]`)
//! - [`parser`]: segment list → anchored matching pattern
//! - [`matcher`]: first-match lookup over the ordered table

pub mod matcher;
pub mod parser;
pub mod pattern;

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use std::rc::Rc;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::config::RouterConfig;
use crate::module::{split_address, Layout, ModuleDirectory, ModuleRef, Page};
use crate::path::SegmentPrefixes;

pub use matcher::RouteMatch;
pub use parser::{build_pattern, parse_segments, ParsedPattern};
pub use pattern::{classify_segment, Segment};

/// Immutable matching rule compiled from one page address
pub struct RouteDefinition<V> {
    page: ModuleRef<Page<V>>,
    pattern: Regex,
    param_names: Vec<String>,
    layouts: Vec<ModuleRef<Layout<V>>>,
    literal_count: usize,
    has_catch_all: bool,
}

impl<V> RouteDefinition<V> {
    /// Address of the page file this route was compiled from
    pub fn address(&self) -> &str {
        &self.page.address
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn page(&self) -> &ModuleRef<Page<V>> {
        &self.page
    }

    /// Ancestor layouts, root first
    pub fn layouts(&self) -> &[ModuleRef<Layout<V>>] {
        &self.layouts
    }

    pub fn literal_count(&self) -> usize {
        self.literal_count
    }

    pub fn has_catch_all(&self) -> bool {
        self.has_catch_all
    }
}

impl<V> std::fmt::Debug for RouteDefinition<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("address", &self.page.address)
            .field("pattern", &self.pattern.as_str())
            .field("param_names", &self.param_names)
            .field(
                "layouts",
                &self.layouts.iter().map(|l| l.address.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Ordered list of compiled routes
///
/// Order encodes precedence: catch-all routes last, then fewer parameters
/// first, then (with strict specificity) more literal segments first.
/// Remaining ties keep the page table's encounter order.
pub struct RouteTable<V> {
    routes: Vec<Rc<RouteDefinition<V>>>,
}

impl<V: 'static> RouteTable<V> {
    /// Compiles every page of the directory
    ///
    /// An empty directory yields an empty table; every lookup then misses.
    pub fn compile(directory: &ModuleDirectory<V>, config: &RouterConfig) -> Self {
        let root = directory.route_prefix();

        // Layout directory (relative to root) → layout module
        let layouts: HashMap<&str, ModuleRef<Layout<V>>> = directory
            .layouts()
            .iter()
            .filter_map(|(address, loader)| match split_address(root, address) {
                Some((dir, stem)) if stem == config.layout_file => {
                    Some((dir, ModuleRef::new(address, loader.clone())))
                }
                _ => {
                    warn!(address, "ignoring layout module with unexpected address");
                    None
                }
            })
            .collect();

        let mut routes: Vec<Rc<RouteDefinition<V>>> = directory
            .pages()
            .iter()
            .filter_map(|(address, loader)| {
                let dir = match split_address(root, address) {
                    Some((dir, stem)) if stem == config.page_file => dir,
                    _ => {
                        warn!(address, "ignoring page module with unexpected address");
                        return None;
                    }
                };

                let parsed = match build_pattern(&parse_segments(dir)) {
                    Ok(parsed) => parsed,
                    Err(err) => {
                        warn!(address, error = %err, "route pattern failed to compile");
                        return None;
                    }
                };

                let chain = resolve_layouts(dir, &layouts);
                trace!(
                    address,
                    pattern = parsed.regex.as_str(),
                    layouts = chain.len(),
                    "compiled route"
                );

                Some(Rc::new(RouteDefinition {
                    page: ModuleRef::new(address, loader.clone()),
                    pattern: parsed.regex,
                    param_names: parsed.params,
                    layouts: chain,
                    literal_count: parsed.literal_count,
                    has_catch_all: parsed.has_catch_all,
                }))
            })
            .collect();

        // `sort_by` is stable: equal keys keep encounter order
        let strict = config.strict_specificity;
        routes.sort_by(|a, b| precedence(a, b, strict));

        debug!(routes = routes.len(), layouts = layouts.len(), "route table compiled");

        Self { routes }
    }
}

impl<V> RouteTable<V> {
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn routes(&self) -> &[Rc<RouteDefinition<V>>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<V> Clone for RouteTable<V> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
        }
    }
}

fn precedence<V>(a: &RouteDefinition<V>, b: &RouteDefinition<V>, strict: bool) -> Ordering {
    let coarse = (a.has_catch_all, a.param_names.len())
        .cmp(&(b.has_catch_all, b.param_names.len()));

    if strict {
        coarse.then_with(|| Reverse(a.literal_count).cmp(&Reverse(b.literal_count)))
    } else {
        coarse
    }
}

/// Layouts along a page directory, root first; missing levels are skipped
fn resolve_layouts<V>(
    dir: &str,
    layouts: &HashMap<&str, ModuleRef<Layout<V>>>,
) -> Vec<ModuleRef<Layout<V>>> {
    SegmentPrefixes::new(dir)
        .filter_map(|prefix| layouts.get(prefix).cloned())
        .collect()
}
