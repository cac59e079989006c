//! rusty-router in the browser
//!
//! Binds the router to `window.history`, re-renders on `popstate` and on
//! every navigation, and drives pending lazy loads on the browser's
//! microtask queue.

pub mod history;
pub mod link;

use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use rusty_router::{History, ModuleDirectory, Router, RouterConfig, RouterError, Subscription, View};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub use history::{BrowserHistory, PopStateListener};
pub use link::{link_click, Anchor};

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Receives every render result
pub type RenderSink<V> = Rc<dyn Fn(Result<V, RouterError>)>;

/// Spawns every pending load and runs `on_settled` after each one
pub fn spawn_pending(pending: Vec<LocalBoxFuture<'static, ()>>, on_settled: Rc<dyn Fn()>) {
    for load in pending {
        let on_settled = Rc::clone(&on_settled);
        spawn_local(async move {
            load.await;
            on_settled();
        });
    }
}

/// Renders once and schedules a re-render for every load still pending
fn render_into<V, H>(router: Weak<Router<V, H>>, sink: RenderSink<V>)
where
    V: View + 'static,
    H: History + 'static,
{
    let Some(live) = router.upgrade() else {
        return;
    };

    let pathname = live.pathname();
    let result = live.render();

    // A navigation during the render already delivered the newer view
    if live.pathname() != pathname {
        debug!(stale = %pathname, current = %live.pathname(), "dropping stale render");
        return;
    }

    match result {
        Ok(rendered) => {
            let pending = rendered.pending;
            sink(Ok(rendered.view));

            if !pending.is_empty() {
                debug!(pending = pending.len(), "waiting for lazy modules");
                spawn_pending(
                    pending,
                    Rc::new(move || render_into(router.clone(), Rc::clone(&sink))),
                );
            }
        }
        Err(err) => sink(Err(err)),
    }
}

/// Re-renders into `sink` after every path change
fn rerender_on_change<V, H>(router: &Rc<Router<V, H>>, sink: RenderSink<V>) -> Subscription
where
    V: View + 'static,
    H: History + 'static,
{
    let weak = Rc::downgrade(router);
    router.subscribe(move |_| render_into(weak.clone(), Rc::clone(&sink)))
}

/// A router mounted on the current window
///
/// Dropping it detaches the `popstate` listener and stops re-rendering.
pub struct BrowserRouter<V> {
    router: Rc<Router<V, BrowserHistory>>,
    _popstate: PopStateListener,
    _subscription: Subscription,
}

impl<V: View + 'static> BrowserRouter<V> {
    /// Mounts the router and performs the first render
    pub fn start(
        directory: ModuleDirectory<V>,
        config: RouterConfig,
        on_render: impl Fn(Result<V, RouterError>) + 'static,
    ) -> Result<Self, JsValue> {
        let history = BrowserHistory::new().map_err(to_js)?;
        let window = history.window().clone();
        let router = Rc::new(Router::new(directory, config, history).map_err(to_js)?);
        let sink: RenderSink<V> = Rc::new(on_render);

        let weak = Rc::downgrade(&router);
        let subscription = rerender_on_change(&router, Rc::clone(&sink));

        let popstate = {
            let weak = weak.clone();
            PopStateListener::new(&window, move || {
                if let Some(router) = weak.upgrade() {
                    router.sync_with_history();
                }
            })?
        };

        render_into(weak, sink);

        Ok(Self {
            router,
            _popstate: popstate,
            _subscription: subscription,
        })
    }

    pub fn router(&self) -> &Rc<Router<V, BrowserHistory>> {
        &self.router
    }
}

fn to_js(err: RouterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
