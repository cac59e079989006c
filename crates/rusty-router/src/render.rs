//! Render composer
//!
//! Turns a route match into a nested element tree (page innermost, root
//! layout outermost, one suspense boundary per level) and evaluates that
//! tree into a host view.

use std::collections::HashSet;
use std::fmt;

use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::context::RouterContext;
use crate::error::RouterError;
use crate::lazy::{LazyCache, LazyComponent, LazyStatus};
use crate::module::{Layout, LoaderId, ModuleRef, Page};
use crate::route::{RouteMatch, RouteTable};

/// Default heading of the built-in not-found view
pub const NOT_FOUND_TITLE: &str = "404";

/// Default message of the built-in not-found view
pub const NOT_FOUND_MESSAGE: &str = "Page not found";

/// Host view type produced by pages and layouts
pub trait View: Sized {
    /// Renders nothing; the fallback of a suspended boundary
    fn empty() -> Self;

    /// The fixed not-found view
    fn not_found() -> Self;
}

impl View for String {
    fn empty() -> Self {
        String::new()
    }

    fn not_found() -> Self {
        format!("{}\n{}", NOT_FOUND_TITLE, NOT_FOUND_MESSAGE)
    }
}

/// Composed render tree
pub enum Element<V> {
    /// Independent suspension boundary; shows [`View::empty`] while pending
    Suspense(Box<Element<V>>),
    Layout {
        address: String,
        component: LazyComponent<Layout<V>>,
        children: Box<Element<V>>,
    },
    Page {
        address: String,
        component: LazyComponent<Page<V>>,
    },
    /// Built-in not-found view
    NotFound,
}

impl<V> Element<V> {
    /// Number of layouts wrapping the innermost page
    pub fn layout_depth(&self) -> usize {
        match self {
            Element::Suspense(child) => child.layout_depth(),
            Element::Layout { children, .. } => 1 + children.layout_depth(),
            Element::Page { .. } | Element::NotFound => 0,
        }
    }

    /// Addresses from the outermost component inwards
    pub fn addresses(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut node = self;
        loop {
            match node {
                Element::Suspense(child) => node = child,
                Element::Layout {
                    address, children, ..
                } => {
                    out.push(address.as_str());
                    node = children;
                }
                Element::Page { address, .. } => {
                    out.push(address.as_str());
                    return out;
                }
                Element::NotFound => return out,
            }
        }
    }
}

impl<V> fmt::Debug for Element<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Suspense(child) => f.debug_tuple("Suspense").field(child).finish(),
            Element::Layout {
                address, children, ..
            } => f
                .debug_struct("Layout")
                .field("address", address)
                .field("children", children)
                .finish(),
            Element::Page { address, .. } => {
                f.debug_struct("Page").field("address", address).finish()
            }
            Element::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Lazy wrappers shared by every render of one router
pub struct ComponentCache<V> {
    pub pages: LazyCache<Page<V>>,
    pub layouts: LazyCache<Layout<V>>,
}

impl<V: 'static> ComponentCache<V> {
    pub fn new() -> Self {
        Self {
            pages: LazyCache::new(),
            layouts: LazyCache::new(),
        }
    }

    /// Drops wrappers whose loader is no longer reachable from `table` or
    /// the not-found module
    pub fn prune(&self, table: &RouteTable<V>, not_found: Option<&ModuleRef<Page<V>>>) {
        let mut pages: HashSet<LoaderId> = HashSet::new();
        let mut layouts: HashSet<LoaderId> = HashSet::new();

        for route in table.routes() {
            pages.insert(route.page().loader.id());
            layouts.extend(route.layouts().iter().map(|layout| layout.loader.id()));
        }
        if let Some(module) = not_found {
            pages.insert(module.loader.id());
        }

        let before = self.pages.len() + self.layouts.len();
        self.pages.retain(|id| pages.contains(&id));
        self.layouts.retain(|id| layouts.contains(&id));
        debug!(
            dropped = before - self.pages.len() - self.layouts.len(),
            "pruned lazy wrappers"
        );
    }
}

impl<V: 'static> Default for ComponentCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the element tree for a match
///
/// The page sits innermost in its own boundary; the layout chain is walked
/// in reverse so the root layout ends up outermost.
pub fn compose<V: 'static>(route_match: &RouteMatch<V>, cache: &ComponentCache<V>) -> Element<V> {
    let page = route_match.route.page();
    let mut element = Element::Suspense(Box::new(Element::Page {
        address: page.address.clone(),
        component: cache.pages.get_lazy(&page.loader),
    }));

    for layout in route_match.route.layouts().iter().rev() {
        element = Element::Suspense(Box::new(Element::Layout {
            address: layout.address.clone(),
            component: cache.layouts.get_lazy(&layout.loader),
            children: Box::new(element),
        }));
    }

    element
}

/// Element tree for an unmatched path
///
/// A discovered not-found page renders lazily in its own boundary;
/// otherwise the built-in view is used.
pub fn compose_not_found<V: 'static>(
    not_found: Option<(&str, LazyComponent<Page<V>>)>,
) -> Element<V> {
    match not_found {
        Some((address, component)) => Element::Suspense(Box::new(Element::Page {
            address: address.to_string(),
            component,
        })),
        None => Element::NotFound,
    }
}

/// Outcome of one render pass
pub struct Rendered<V> {
    pub view: V,
    /// Context the tree was rendered with
    pub context: RouterContext,
    /// Loads still pending; spawn them and render again once they complete
    pub pending: Vec<LocalBoxFuture<'static, ()>>,
}

impl<V> Rendered<V> {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<V: fmt::Debug> fmt::Debug for Rendered<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rendered")
            .field("view", &self.view)
            .field("context", &self.context)
            .field("pending", &self.pending.len())
            .finish()
    }
}

/// Evaluates an element tree
///
/// A module that failed to load aborts the pass with
/// [`RouterError::ModuleLoad`]; recovery is up to the host.
pub fn render_element<V: View + 'static>(
    element: &Element<V>,
    ctx: RouterContext,
) -> Result<Rendered<V>, RouterError> {
    let mut pending = Vec::new();
    let view = evaluate(element, &ctx, &mut pending)?.unwrap_or_else(V::empty);

    Ok(Rendered {
        view,
        context: ctx,
        pending,
    })
}

/// `Ok(None)` means the subtree is suspended
fn evaluate<V: View + 'static>(
    element: &Element<V>,
    ctx: &RouterContext,
    pending: &mut Vec<LocalBoxFuture<'static, ()>>,
) -> Result<Option<V>, RouterError> {
    match element {
        Element::Suspense(child) => {
            Ok(Some(evaluate(child, ctx, pending)?.unwrap_or_else(V::empty)))
        }
        Element::Layout {
            address,
            component,
            children,
        } => match component.status() {
            LazyStatus::Ready(layout) => {
                let inner = evaluate(children, ctx, pending)?.unwrap_or_else(V::empty);
                Ok(Some(layout.render(ctx, inner)))
            }
            // Children are not rendered until their layout is
            LazyStatus::Pending => {
                pending.push(component.wait());
                Ok(None)
            }
            LazyStatus::Failed(source) => Err(RouterError::ModuleLoad {
                address: address.clone(),
                source,
            }),
        },
        Element::Page { address, component } => match component.status() {
            LazyStatus::Ready(page) => Ok(Some(page.render(ctx))),
            LazyStatus::Pending => {
                pending.push(component.wait());
                Ok(None)
            }
            LazyStatus::Failed(source) => Err(RouterError::ModuleLoad {
                address: address.clone(),
                source,
            }),
        },
        Element::NotFound => Ok(Some(V::not_found())),
    }
}
