//! Module directory: the discovered page/layout files as address → loader tables
//!
//! Discovery itself (scanning the source tree, code-splitting) happens at
//! build time outside this crate. The router only consumes the resulting
//! static tables, so tests build them by hand.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::context::RouterContext;
use crate::error::LoadError;

/// Future produced by a loader
pub type LoadFuture<T> = LocalBoxFuture<'static, Result<T, LoadError>>;

/// Identity of a loader function, used as the lazy-cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoaderId(usize);

/// Deferred module loader
///
/// Cloning shares identity: two clones are the *same* loader, while two
/// loaders built from identical closures are distinct.
pub struct Loader<T> {
    load: Rc<dyn Fn() -> LoadFuture<T>>,
}

impl<T: 'static> Loader<T> {
    pub fn new<F, Fut>(load: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, LoadError>> + 'static,
    {
        Self {
            load: Rc::new(move || load().boxed_local()),
        }
    }

    /// Loader whose module is already available
    pub fn ready(module: T) -> Self
    where
        T: Clone,
    {
        Self::new(move || future::ready(Ok(module.clone())))
    }

    /// Starts loading the module
    pub fn load(&self) -> LoadFuture<T> {
        (self.load)()
    }
}

impl<T> Loader<T> {
    pub fn id(&self) -> LoaderId {
        LoaderId(Rc::as_ptr(&self.load) as *const () as usize)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<T> Clone for Loader<T> {
    fn clone(&self) -> Self {
        Self {
            load: Rc::clone(&self.load),
        }
    }
}

impl<T> fmt::Debug for Loader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Loader").field(&self.id()).finish()
    }
}

/// A loader together with the address it was discovered at
pub struct ModuleRef<T> {
    pub address: String,
    pub loader: Loader<T>,
}

impl<T> ModuleRef<T> {
    pub fn new(address: impl Into<String>, loader: Loader<T>) -> Self {
        Self {
            address: address.into(),
            loader,
        }
    }
}

impl<T> Clone for ModuleRef<T> {
    fn clone(&self) -> Self {
        Self {
            address: self.address.clone(),
            loader: self.loader.clone(),
        }
    }
}

impl<T> fmt::Debug for ModuleRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRef")
            .field("address", &self.address)
            .field("loader", &self.loader)
            .finish()
    }
}

/// Page component: renders a view from the navigation context
pub struct Page<V> {
    render: Rc<dyn Fn(&RouterContext) -> V>,
}

impl<V> Page<V> {
    pub fn new(render: impl Fn(&RouterContext) -> V + 'static) -> Self {
        Self {
            render: Rc::new(render),
        }
    }

    pub fn render(&self, ctx: &RouterContext) -> V {
        (self.render)(ctx)
    }
}

impl<V> Clone for Page<V> {
    fn clone(&self) -> Self {
        Self {
            render: Rc::clone(&self.render),
        }
    }
}

/// Layout component: wraps already-rendered children
pub struct Layout<V> {
    render: Rc<dyn Fn(&RouterContext, V) -> V>,
}

impl<V> Layout<V> {
    pub fn new(render: impl Fn(&RouterContext, V) -> V + 'static) -> Self {
        Self {
            render: Rc::new(render),
        }
    }

    pub fn render(&self, ctx: &RouterContext, children: V) -> V {
        (self.render)(ctx, children)
    }
}

impl<V> Clone for Layout<V> {
    fn clone(&self) -> Self {
        Self {
            render: Rc::clone(&self.render),
        }
    }
}

/// Error view component: renders a failure inside its segment
pub struct ErrorPage<V> {
    render: Rc<dyn Fn(&RouterContext, &LoadError) -> V>,
}

impl<V> ErrorPage<V> {
    pub fn new(render: impl Fn(&RouterContext, &LoadError) -> V + 'static) -> Self {
        Self {
            render: Rc::new(render),
        }
    }

    pub fn render(&self, ctx: &RouterContext, error: &LoadError) -> V {
        (self.render)(ctx, error)
    }
}

impl<V> Clone for ErrorPage<V> {
    fn clone(&self) -> Self {
        Self {
            render: Rc::clone(&self.render),
        }
    }
}

/// Address → loader table preserving encounter order
///
/// Re-inserting an address replaces its loader in place, so each address
/// keys exactly one loader.
pub struct ModuleTable<T> {
    entries: Vec<(String, Loader<T>)>,
}

impl<T> ModuleTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, address: impl Into<String>, loader: Loader<T>) {
        let address = address.into();
        match self.entries.iter_mut().find(|(a, _)| *a == address) {
            Some(entry) => entry.1 = loader,
            None => self.entries.push((address, loader)),
        }
    }

    pub fn get(&self, address: &str) -> Option<&Loader<T>> {
        self.entries
            .iter()
            .find_map(|(a, loader)| (a == address).then_some(loader))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Loader<T>)> {
        self.entries.iter().map(|(a, loader)| (a.as_str(), loader))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for ModuleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ModuleTable<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

/// The discovered modules of an application
///
/// Pages and layouts drive routing. Not-found views are used by the render
/// path when present; loading and error views are accepted for callers that
/// want them but the router does not render them itself.
///
/// # Examples
///
/// ```
/// use rusty_router::{Loader, ModuleDirectory, Page, Layout};
///
/// let directory: ModuleDirectory<String> = ModuleDirectory::new("/app")
///     .with_page("/app/page", Loader::ready(Page::new(|_| "home".to_string())))
///     .with_layout("/app/layout", Loader::ready(Layout::new(|_, c: String| c)));
///
/// assert_eq!(directory.pages().len(), 1);
/// ```
pub struct ModuleDirectory<V> {
    route_prefix: String,
    pages: ModuleTable<Page<V>>,
    layouts: ModuleTable<Layout<V>>,
    not_founds: ModuleTable<Page<V>>,
    loadings: ModuleTable<Page<V>>,
    errors: ModuleTable<ErrorPage<V>>,
}

impl<V: 'static> ModuleDirectory<V> {
    pub fn new(route_prefix: impl Into<String>) -> Self {
        Self {
            route_prefix: route_prefix.into().trim_end_matches('/').to_string(),
            pages: ModuleTable::new(),
            layouts: ModuleTable::new(),
            not_founds: ModuleTable::new(),
            loadings: ModuleTable::new(),
            errors: ModuleTable::new(),
        }
    }

    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    pub fn add_page(&mut self, address: impl Into<String>, loader: Loader<Page<V>>) {
        self.pages.insert(address, loader);
    }

    pub fn add_layout(&mut self, address: impl Into<String>, loader: Loader<Layout<V>>) {
        self.layouts.insert(address, loader);
    }

    pub fn add_not_found(&mut self, address: impl Into<String>, loader: Loader<Page<V>>) {
        self.not_founds.insert(address, loader);
    }

    pub fn add_loading(&mut self, address: impl Into<String>, loader: Loader<Page<V>>) {
        self.loadings.insert(address, loader);
    }

    pub fn add_error(&mut self, address: impl Into<String>, loader: Loader<ErrorPage<V>>) {
        self.errors.insert(address, loader);
    }

    pub fn with_page(mut self, address: impl Into<String>, loader: Loader<Page<V>>) -> Self {
        self.add_page(address, loader);
        self
    }

    pub fn with_layout(mut self, address: impl Into<String>, loader: Loader<Layout<V>>) -> Self {
        self.add_layout(address, loader);
        self
    }

    pub fn with_not_found(mut self, address: impl Into<String>, loader: Loader<Page<V>>) -> Self {
        self.add_not_found(address, loader);
        self
    }

    pub fn pages(&self) -> &ModuleTable<Page<V>> {
        &self.pages
    }

    pub fn layouts(&self) -> &ModuleTable<Layout<V>> {
        &self.layouts
    }

    pub fn not_founds(&self) -> &ModuleTable<Page<V>> {
        &self.not_founds
    }

    pub fn loadings(&self) -> &ModuleTable<Page<V>> {
        &self.loadings
    }

    pub fn errors(&self) -> &ModuleTable<ErrorPage<V>> {
        &self.errors
    }
}

impl<V> Clone for ModuleDirectory<V> {
    fn clone(&self) -> Self {
        Self {
            route_prefix: self.route_prefix.clone(),
            pages: self.pages.clone(),
            layouts: self.layouts.clone(),
            not_founds: self.not_founds.clone(),
            loadings: self.loadings.clone(),
            errors: self.errors.clone(),
        }
    }
}

/// Turns a discovery key into a module address
///
/// # Examples
///
/// ```
/// use rusty_router::module::normalize_address;
///
/// assert_eq!(normalize_address("/app", "./page.tsx"), "/app/page.tsx");
/// assert_eq!(normalize_address("/app", "./posts/[id]/page.tsx"), "/app/posts/[id]/page.tsx");
/// ```
pub fn normalize_address(route_prefix: &str, key: &str) -> String {
    let relative = key.trim_start_matches("./").trim_start_matches('/');
    format!("{}/{}", route_prefix.trim_end_matches('/'), relative)
}

/// Splits an address into its directory (relative to the root marker) and file stem
///
/// Returns `None` when the address lies outside the root marker.
///
/// # Examples
///
/// ```
/// use rusty_router::module::split_address;
///
/// assert_eq!(split_address("/app", "/app/page.tsx"), Some(("", "page")));
/// assert_eq!(split_address("/app", "/app/posts/[id]/page"), Some(("posts/[id]", "page")));
/// assert_eq!(split_address("/app", "/lib/page"), None);
/// ```
pub fn split_address<'a>(route_prefix: &str, address: &'a str) -> Option<(&'a str, &'a str)> {
    let relative = address
        .strip_prefix(route_prefix.trim_end_matches('/'))?
        .strip_prefix('/')?;

    let (dir, file) = relative.rsplit_once('/').unwrap_or(("", relative));
    let stem = file.split('.').next().unwrap_or(file);
    Some((dir, stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_loader_identity() {
        let a = Loader::ready(1u32);
        let b = a.clone();
        let c = Loader::ready(1u32);

        assert!(a.ptr_eq(&b));
        assert_eq!(a.id(), b.id());
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_loader_load() {
        let loader = Loader::new(|| async { Ok::<_, LoadError>("module") });
        assert_eq!(block_on(loader.load()), Ok("module"));
    }

    #[test]
    fn test_table_replaces_in_place() {
        let mut table = ModuleTable::new();
        let first = Loader::ready(1u32);
        let second = Loader::ready(2u32);

        table.insert("/app/a/page", first);
        table.insert("/app/b/page", Loader::ready(3u32));
        table.insert("/app/a/page", second.clone());

        assert_eq!(table.len(), 2);
        let addresses: Vec<&str> = table.iter().map(|(a, _)| a).collect();
        assert_eq!(addresses, vec!["/app/a/page", "/app/b/page"]);
        assert!(table.get("/app/a/page").unwrap().ptr_eq(&second));
    }

    #[test]
    fn test_split_address() {
        assert_eq!(split_address("/app", "/app/page"), Some(("", "page")));
        assert_eq!(split_address("/app/", "/app/about/page.tsx"), Some(("about", "page")));
        assert_eq!(
            split_address("/app", "/app/docs/[...slug]/layout.tsx"),
            Some(("docs/[...slug]", "layout"))
        );
        assert_eq!(split_address("/app", "/application/page"), None);
        assert_eq!(split_address("/app", "/app"), None);
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("/app/", "about/page.tsx"), "/app/about/page.tsx");
    }

    #[test]
    fn test_directory_keeps_loading_and_error_views() {
        let mut directory: ModuleDirectory<String> = ModuleDirectory::new("/app");
        let loading = Loader::ready(Page::new(|_| "loading...".to_string()));
        let error = Loader::ready(ErrorPage::new(|ctx: &RouterContext, err: &LoadError| {
            format!("{} failed: {}", ctx.pathname(), err.message())
        }));

        directory.add_loading("/app/posts/loading.tsx", loading.clone());
        directory.add_error("/app/posts/error.tsx", error.clone());

        assert_eq!(directory.loadings().len(), 1);
        assert!(directory.loadings().get("/app/posts/loading.tsx").unwrap().ptr_eq(&loading));
        assert!(directory.pages().is_empty());

        let view = block_on(directory.errors().get("/app/posts/error.tsx").unwrap().load()).unwrap();
        let ctx = RouterContext::default();
        assert_eq!(
            view.render(&ctx, &LoadError::new("timeout")),
            "/ failed: timeout"
        );
        assert!(directory.errors().get("/app/error.tsx").is_none());
    }

    #[test]
    fn test_directory_route_prefix_trimmed() {
        let directory: ModuleDirectory<String> = ModuleDirectory::new("/app/");
        assert_eq!(directory.route_prefix(), "/app");
        assert!(directory.pages().is_empty());
    }
}
