//! # rusty-router
//!
//! File-system routing for single-page applications.
//!
//! Page and layout modules are discovered from a directory convention
//! (`app/posts/[id]/page.tsx`, `app/layout.tsx`, ...), compiled into an ordered
//! table of URL patterns, and rendered as the matched page wrapped in its
//! ancestor layouts. Navigation pushes history entries without reloading and
//! every module is loaded lazily, once.
//!
//! ## Routing conventions
//!
//! | Directory segment | Matches                         | Parameter          |
//! |-------------------|---------------------------------|--------------------|
//! | `about`           | the literal `about`             | none               |
//! | `[id]`            | exactly one path segment        | `id`               |
//! | `[...slug]`       | one or more trailing segments   | `slug` (`a/b/c`)   |
//!
//! Routes with a catch-all sort last, then routes with fewer parameters
//! first. Ties keep discovery order.
//!
//! ## Example
//!
//! ```
//! use rusty_router::{Layout, Loader, MemoryHistory, ModuleDirectory, Page, Router, RouterConfig};
//!
//! let directory = ModuleDirectory::new("/app")
//!     .with_layout("/app/layout.tsx", Loader::ready(Layout::new(|_, children: String| {
//!         format!("<main>{}</main>", children)
//!     })))
//!     .with_page("/app/page.tsx", Loader::ready(Page::new(|_| "home".to_string())))
//!     .with_page("/app/docs/[...slug]/page.tsx", Loader::ready(Page::new(|ctx| {
//!         format!("docs: {}", ctx.param("slug").unwrap_or_default())
//!     })));
//!
//! let router = Router::new(directory, RouterConfig::default(), MemoryHistory::new("/")).unwrap();
//! router.navigate("/docs/guide/install").unwrap();
//!
//! let rendered = router.render().unwrap();
//! assert_eq!(rendered.view, "<main>docs: guide/install</main>");
//! assert!(rendered.is_complete());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod lazy;
pub mod link;
pub mod module;
pub mod navigation;
pub mod path;
pub mod render;
pub mod route;
pub mod router;

pub use config::RouterConfig;
pub use context::{NavigateFn, RouteParams, RouterContext};
pub use error::{LoadError, Result, RouterError};
pub use history::{History, MemoryHistory};
pub use lazy::{LazyCache, LazyComponent, LazyStatus};
pub use link::{ClickAction, Link, LinkClick};
pub use module::{ErrorPage, Layout, LoadFuture, Loader, LoaderId, ModuleDirectory, ModuleRef, Page};
pub use navigation::{Navigator, Subscription};
pub use path::BasePath;
pub use render::{Element, Rendered, View};
pub use route::{RouteDefinition, RouteMatch, RouteTable};
pub use router::Router;
