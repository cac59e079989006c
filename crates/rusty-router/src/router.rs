//! Router facade
//!
//! Ties the compiled route table, the navigator and the lazy component
//! caches together behind one render entry point.

use std::cell::RefCell;
use std::fmt;

use tracing::{debug, warn};

use crate::config::RouterConfig;
use crate::context::{RouteParams, RouterContext};
use crate::error::{Result, RouterError};
use crate::history::History;
use crate::link::Link;
use crate::module::{split_address, ModuleDirectory, ModuleRef, Page};
use crate::navigation::{Navigator, Subscription};
use crate::path::BasePath;
use crate::render::{
    compose, compose_not_found, render_element, ComponentCache, Element, Rendered, View,
};
use crate::route::{RouteMatch, RouteTable};

/// Client-side router over a module directory and a history backend
///
/// # Examples
///
/// ```
/// use rusty_router::{Loader, MemoryHistory, ModuleDirectory, Page, Router, RouterConfig};
///
/// let directory = ModuleDirectory::new("/app")
///     .with_page("/app/page", Loader::ready(Page::new(|_| "home".to_string())))
///     .with_page("/app/posts/[id]/page", Loader::ready(Page::new(|ctx| {
///         format!("post {}", ctx.param("id").unwrap_or_default())
///     })));
///
/// let router = Router::new(directory, RouterConfig::default(), MemoryHistory::new("/")).unwrap();
/// assert_eq!(router.render().unwrap().view, "home");
///
/// router.navigate("/posts/42").unwrap();
/// assert_eq!(router.render().unwrap().view, "post 42");
/// ```
pub struct Router<V, H> {
    config: RouterConfig,
    table: RefCell<RouteTable<V>>,
    not_found: RefCell<Option<ModuleRef<Page<V>>>>,
    navigator: Navigator<H>,
    components: ComponentCache<V>,
    /// Last match, keyed by the path it was computed for
    current: RefCell<Option<(String, Option<RouteMatch<V>>)>>,
}

impl<V: View + 'static, H: History + 'static> Router<V, H> {
    /// Compiles the directory and starts at the backend's current location
    ///
    /// Fails when the configuration is invalid or its route prefix does not
    /// match the directory's.
    pub fn new(directory: ModuleDirectory<V>, config: RouterConfig, history: H) -> Result<Self> {
        config.validate()?;
        check_route_prefix(&directory, &config)?;

        let table = RouteTable::compile(&directory, &config);
        let not_found = find_not_found(&directory, &config);
        let navigator = Navigator::new(history, BasePath::new(&config.base_path));

        debug!(
            routes = table.len(),
            custom_not_found = not_found.is_some(),
            pathname = %navigator.pathname(),
            "router created"
        );

        Ok(Self {
            config,
            table: RefCell::new(table),
            not_found: RefCell::new(not_found),
            navigator,
            components: ComponentCache::new(),
            current: RefCell::new(None),
        })
    }

    /// Recompiles the route table from a changed directory
    ///
    /// Lazy wrappers are keyed by loader identity, so modules whose loaders
    /// survive the change are not loaded again. Wrappers of loaders that are
    /// gone are dropped.
    pub fn reload(&self, directory: ModuleDirectory<V>) -> Result<()> {
        check_route_prefix(&directory, &self.config)?;

        let table = RouteTable::compile(&directory, &self.config);
        let not_found = find_not_found(&directory, &self.config);
        debug!(routes = table.len(), "route table reloaded");

        self.components.prune(&table, not_found.as_ref());
        *self.table.borrow_mut() = table;
        *self.not_found.borrow_mut() = not_found;
        self.current.borrow_mut().take();
        Ok(())
    }

    /// The route matching the current path, if any
    pub fn current_match(&self) -> Option<RouteMatch<V>> {
        let pathname = self.navigator.pathname();

        if let Some((path, cached)) = &*self.current.borrow() {
            if *path == pathname {
                return cached.clone();
            }
        }

        let found = self.table.borrow().match_path(&pathname);
        *self.current.borrow_mut() = Some((pathname, found.clone()));
        found
    }

    /// Navigation context for the current path
    pub fn context(&self) -> RouterContext {
        let params = self
            .current_match()
            .map(|m| m.params)
            .unwrap_or_else(RouteParams::new);

        RouterContext::new(self.navigator.pathname(), params, self.navigator.navigate_fn())
    }

    /// Element tree for the current path
    pub fn element(&self) -> Element<V> {
        match self.current_match() {
            Some(route_match) => compose(&route_match, &self.components),
            None => {
                let not_found = self.not_found.borrow();
                compose_not_found(not_found.as_ref().map(|module| {
                    (
                        module.address.as_str(),
                        self.components.pages.get_lazy(&module.loader),
                    )
                }))
            }
        }
    }

    /// Renders the current path
    ///
    /// Boundaries whose module is still loading render empty and contribute
    /// a future to [`Rendered::pending`].
    pub fn render(&self) -> Result<Rendered<V>> {
        let element = self.element();
        let rendered = render_element(&element, self.context());

        if let Err(RouterError::ModuleLoad { address, .. }) = &rendered {
            warn!(address = %address, "render aborted by failed module");
        }
        rendered
    }

    pub fn navigate(&self, to: &str) -> Result<()> {
        self.navigator.navigate(to)
    }

    /// Call after the backend moved back or forward
    pub fn sync_with_history(&self) {
        self.navigator.sync_with_history()
    }

    /// Re-render callback, run after every path change
    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> Subscription {
        self.navigator.subscribe(listener)
    }
}

impl<V, H> Router<V, H> {
    pub fn pathname(&self) -> String {
        self.navigator.pathname()
    }

    pub fn base(&self) -> &BasePath {
        self.navigator.base()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn navigator(&self) -> &Navigator<H> {
        &self.navigator
    }

    pub fn history(&self) -> &H {
        self.navigator.history()
    }

    /// Number of compiled routes
    pub fn route_count(&self) -> usize {
        self.table.borrow().len()
    }

    /// External `href` for a link, mount prefix applied
    pub fn href(&self, link: &Link) -> String {
        link.external_href(self.navigator.base())
    }
}

impl<V, H> fmt::Debug for Router<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("navigator", &self.navigator)
            .field("routes", &self.table.borrow().len())
            .finish()
    }
}

fn check_route_prefix<V: 'static>(directory: &ModuleDirectory<V>, config: &RouterConfig) -> Result<()> {
    let expected = config.route_prefix.trim_end_matches('/');
    if directory.route_prefix() != expected {
        return Err(RouterError::Config(format!(
            "module directory is rooted at {:?} but route_prefix is {:?}",
            directory.route_prefix(),
            config.route_prefix
        )));
    }
    Ok(())
}

/// The root-level not-found module, if the directory has one
fn find_not_found<V: 'static>(
    directory: &ModuleDirectory<V>,
    config: &RouterConfig,
) -> Option<ModuleRef<Page<V>>> {
    directory
        .not_founds()
        .iter()
        .find(|(address, _)| {
            split_address(directory.route_prefix(), address)
                == Some(("", config.not_found_file.as_str()))
        })
        .map(|(address, loader)| ModuleRef::new(address, loader.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::history::MemoryHistory;
    use crate::module::{Layout, Loader};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn page(text: &'static str) -> Loader<Page<String>> {
        Loader::ready(Page::new(move |_| text.to_string()))
    }

    fn router(directory: ModuleDirectory<String>, start: &str) -> Router<String, MemoryHistory> {
        Router::new(directory, RouterConfig::default(), MemoryHistory::new(start)).unwrap()
    }

    #[test]
    fn test_mismatched_route_prefix_rejected() {
        let directory: ModuleDirectory<String> = ModuleDirectory::new("/src/routes");
        let err = Router::new(directory, RouterConfig::default(), MemoryHistory::new("/")).unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }

    #[test]
    fn test_context_carries_params() {
        let directory = ModuleDirectory::new("/app").with_page("/app/posts/[id]/page", page("post"));
        let router = router(directory, "/posts/7");

        let ctx = router.context();
        assert_eq!(ctx.pathname(), "/posts/7");
        assert_eq!(ctx.param("id"), Some("7"));
    }

    #[test]
    fn test_unmatched_path_has_empty_params() {
        let router = router(ModuleDirectory::new("/app"), "/nowhere");
        assert!(router.current_match().is_none());
        assert!(router.context().params().is_empty());
        assert_eq!(router.render().unwrap().view, String::not_found());
    }

    #[test]
    fn test_match_memoized_per_path() {
        let directory = ModuleDirectory::new("/app")
            .with_page("/app/page", page("home"))
            .with_page("/app/about/page", page("about"));
        let router = router(directory, "/");

        let first = router.current_match().unwrap();
        let second = router.current_match().unwrap();
        assert!(Rc::ptr_eq(&first.route, &second.route));

        router.navigate("/about").unwrap();
        assert_eq!(router.current_match().unwrap().route.address(), "/app/about/page");
    }

    #[test]
    fn test_custom_not_found_only_at_root() {
        let directory = ModuleDirectory::new("/app")
            .with_not_found("/app/blog/not-found", page("blog 404"))
            .with_not_found("/app/not-found.tsx", page("root 404"));
        let router = router(directory, "/missing");

        assert_eq!(router.render().unwrap().view, "root 404");
    }

    #[test]
    fn test_reload_picks_up_new_pages() {
        let home = page("home");
        let router = router(ModuleDirectory::new("/app").with_page("/app/page", home.clone()), "/about");
        assert_eq!(router.render().unwrap().view, String::not_found());

        let directory = ModuleDirectory::new("/app")
            .with_page("/app/page", home)
            .with_page("/app/about/page", page("about"))
            .with_layout("/app/layout", Loader::ready(Layout::new(|_, c: String| format!("[{}]", c))));
        router.reload(directory).unwrap();

        assert_eq!(router.route_count(), 2);
        assert_eq!(router.render().unwrap().view, "[about]");
    }

    #[test]
    fn test_reload_drops_wrappers_of_removed_loaders() {
        let router = router(ModuleDirectory::new("/app").with_page("/app/page", page("v0")), "/");
        router.render().unwrap();

        for _ in 0..50 {
            let directory = ModuleDirectory::new("/app")
                .with_page("/app/page", page("fresh"))
                .with_layout("/app/layout", Loader::ready(Layout::new(|_, c: String| c)));
            router.reload(directory).unwrap();
            assert_eq!(router.render().unwrap().view, "fresh");
        }

        assert_eq!(router.components.pages.len(), 1);
        assert_eq!(router.components.layouts.len(), 1);
    }

    #[test]
    fn test_reload_keeps_surviving_wrappers() {
        let loads = Rc::new(Cell::new(0));
        let counter = Rc::clone(&loads);
        let home = Loader::new(move || {
            counter.set(counter.get() + 1);
            async { Ok::<_, LoadError>(Page::new(|_| "home".to_string())) }
        });
        let not_found = page("custom 404");

        let router = router(
            ModuleDirectory::new("/app")
                .with_page("/app/page", home.clone())
                .with_not_found("/app/not-found", not_found.clone()),
            "/",
        );
        router.render().unwrap();
        let before = router.components.pages.get_lazy(&home);

        router
            .reload(
                ModuleDirectory::new("/app")
                    .with_page("/app/page", home.clone())
                    .with_page("/app/about/page", page("about"))
                    .with_not_found("/app/not-found", not_found),
            )
            .unwrap();

        assert!(router.components.pages.get_lazy(&home).ptr_eq(&before));
        assert_eq!(router.render().unwrap().view, "home");
        assert_eq!(loads.get(), 1);

        router.navigate("/missing").unwrap();
        assert_eq!(router.render().unwrap().view, "custom 404");
    }

    #[test]
    fn test_href_uses_base_path() {
        let config = RouterConfig::default().with_base_path("/frontend/");
        let router: Router<String, _> =
            Router::new(ModuleDirectory::new("/app"), config, MemoryHistory::new("/frontend")).unwrap();

        assert_eq!(router.pathname(), "/");
        assert_eq!(router.href(&Link::new("/about")), "/frontend/about");
    }

}
