//! Browser tests; run with `wasm-pack test --headless --firefox`

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use rusty_router::{BasePath, History, Link, LinkClick, NavigateFn, RouteParams, RouterContext};
use rusty_router_web::{link_click, Anchor, BrowserHistory};
use wasm_bindgen_test::*;
use web_sys::{MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn click(init: &MouseEventInit) -> MouseEvent {
    init.set_bubbles(true);
    init.set_cancelable(true);
    MouseEvent::new_with_mouse_event_init_dict("click", init).unwrap()
}

#[wasm_bindgen_test]
fn test_push_updates_location() {
    let history = BrowserHistory::new().unwrap();
    history.push("/rusty-router-test/about").unwrap();

    assert_eq!(history.current_path(), "/rusty-router-test/about");
}

#[wasm_bindgen_test]
fn test_link_click_reads_modifiers() {
    let init = MouseEventInit::new();
    init.set_ctrl_key(true);
    let event = click(&init);

    let parsed = link_click(&event);
    assert!(parsed.ctrl_key);
    assert!(!parsed.should_intercept());
    assert_eq!(link_click(&click(&MouseEventInit::new())), LinkClick::primary());
}

#[wasm_bindgen_test]
fn test_anchor_intercepts_plain_click() {
    let document = web_sys::window().unwrap().document().unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let ctx = RouterContext::new(
        "/",
        RouteParams::new(),
        NavigateFn::new(move |to| sink.borrow_mut().push(to.to_string())),
    );

    let link = Link::new("/about").attr("class", "nav");
    let anchor = Anchor::new(&document, link, "About", &BasePath::new("/frontend"), ctx).unwrap();
    let element = anchor.element();

    assert!(element.href().ends_with("/frontend/about"));
    assert_eq!(element.get_attribute("class").as_deref(), Some("nav"));
    assert_eq!(element.text_content().as_deref(), Some("About"));

    let event = click(&MouseEventInit::new());
    element.dispatch_event(&event).unwrap();

    assert!(event.default_prevented());
    assert_eq!(*seen.borrow(), vec!["/about"]);
}

#[wasm_bindgen_test]
fn test_dropped_anchor_stops_intercepting() {
    let document = web_sys::window().unwrap().document().unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let ctx = RouterContext::new(
        "/",
        RouteParams::new(),
        NavigateFn::new(move |to| sink.borrow_mut().push(to.to_string())),
    );

    let anchor = Anchor::new(&document, Link::new("/about"), "About", &BasePath::default(), ctx).unwrap();
    let element = anchor.element().clone();
    drop(anchor);

    let event = click(&MouseEventInit::new());
    element.dispatch_event(&event).unwrap();

    assert!(!event.default_prevented());
    assert!(seen.borrow().is_empty());
}
