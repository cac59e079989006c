//! Anchor elements with client-side click interception

use rusty_router::{BasePath, ClickAction, Link, LinkClick, RouterContext};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement, MouseEvent};

/// Reads the interception-relevant fields of a click
pub fn link_click(event: &MouseEvent) -> LinkClick {
    LinkClick {
        button: event.button(),
        meta_key: event.meta_key(),
        ctrl_key: event.ctrl_key(),
        alt_key: event.alt_key(),
        shift_key: event.shift_key(),
        default_prevented: event.default_prevented(),
    }
}

/// A rendered `<a>` wired to the router
///
/// The element keeps a real `href`, so middle-click and modifier clicks
/// fall through to the browser. Dropping the anchor detaches the handler.
pub struct Anchor {
    element: HtmlAnchorElement,
    on_click: Closure<dyn FnMut(MouseEvent)>,
}

impl Anchor {
    pub fn new(
        document: &Document,
        link: Link,
        text: &str,
        base: &BasePath,
        ctx: RouterContext,
    ) -> Result<Self, JsValue> {
        let element: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        element.set_href(&link.external_href(base));
        for (name, value) in link.attributes() {
            element.set_attribute(name, value)?;
        }
        element.set_text_content(Some(text));

        let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if link.on_click(&link_click(&event), &ctx) == ClickAction::Navigate {
                event.prevent_default();
            }
        });
        element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        Ok(Self { element, on_click })
    }

    pub fn element(&self) -> &HtmlAnchorElement {
        &self.element
    }
}

impl Drop for Anchor {
    fn drop(&mut self) {
        let removed = self
            .element
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref());
        if let Err(err) = removed {
            warn!(error = ?err, "failed to remove click listener");
        }
    }
}
