//! `window.history` backend and the `popstate` listener

use rusty_router::{History, RouterError};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, Window};

/// History backed by the browser's session history
#[derive(Debug, Clone)]
pub struct BrowserHistory {
    window: Window,
}

impl BrowserHistory {
    /// Binds to the global `window`
    pub fn new() -> Result<Self, RouterError> {
        let window = web_sys::window().ok_or_else(|| RouterError::History {
            url: String::new(),
            reason: "no global window".to_string(),
        })?;
        Ok(Self { window })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl History for BrowserHistory {
    fn current_path(&self) -> String {
        match self.window.location().pathname() {
            Ok(pathname) => pathname,
            Err(err) => {
                warn!(error = ?err, "could not read location.pathname");
                "/".to_string()
            }
        }
    }

    fn push(&self, url: &str) -> Result<(), RouterError> {
        let history = self.window.history().map_err(|err| push_error(url, err))?;
        history
            .push_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(|err| push_error(url, err))?;

        debug!(url, "pushState");
        Ok(())
    }
}

fn push_error(url: &str, err: JsValue) -> RouterError {
    RouterError::History {
        url: url.to_string(),
        reason: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

/// Runs a callback on every `popstate` event; removes itself on drop
pub struct PopStateListener {
    window: Window,
    closure: Closure<dyn FnMut(Event)>,
}

impl PopStateListener {
    pub fn new(window: &Window, on_pop: impl Fn() + 'static) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| on_pop());
        window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())?;

        Ok(Self {
            window: window.clone(),
            closure,
        })
    }
}

impl Drop for PopStateListener {
    fn drop(&mut self) {
        let removed = self
            .window
            .remove_event_listener_with_callback("popstate", self.closure.as_ref().unchecked_ref());
        if let Err(err) = removed {
            warn!(error = ?err, "failed to remove popstate listener");
        }
    }
}
