//! In-app links
//!
//! A [`Link`] renders as a real anchor (so open-in-new-tab, copy-link and
//! friends keep working) whose plain left clicks are turned into client-side
//! navigation.

use crate::context::RouterContext;
use crate::path::BasePath;

/// Mouse button index of the primary button
pub const PRIMARY_BUTTON: i16 = 0;

/// The parts of a click event that decide whether it is intercepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkClick {
    pub button: i16,
    pub meta_key: bool,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub shift_key: bool,
    pub default_prevented: bool,
}

impl LinkClick {
    /// Plain primary-button click with no modifiers
    pub fn primary() -> Self {
        Self::default()
    }

    pub fn has_modifier(&self) -> bool {
        self.meta_key || self.ctrl_key || self.alt_key || self.shift_key
    }

    /// Only plain, not-yet-prevented primary clicks become client navigation
    ///
    /// # Examples
    ///
    /// ```
    /// use rusty_router::LinkClick;
    ///
    /// assert!(LinkClick::primary().should_intercept());
    /// assert!(!LinkClick { ctrl_key: true, ..LinkClick::primary() }.should_intercept());
    /// assert!(!LinkClick { button: 1, ..LinkClick::primary() }.should_intercept());
    /// ```
    pub fn should_intercept(&self) -> bool {
        self.button == PRIMARY_BUTTON && !self.has_modifier() && !self.default_prevented
    }
}

/// What the host must do with the click event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// The router navigated; call `preventDefault` on the event
    Navigate,
    /// Leave the event to the browser
    PassThrough,
}

/// Anchor pointing at an internal route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    href: String,
    attributes: Vec<(String, String)>,
}

impl Link {
    /// `href` is a route path without the mount prefix (e.g. `/about`)
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            attributes: Vec::new(),
        }
    }

    /// Adds a passthrough attribute (`class`, `target`, `aria-*`, ...)
    ///
    /// An `href` attribute is ignored; the link's own target wins.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if !name.eq_ignore_ascii_case("href") {
            self.attributes.push((name, value.into()));
        }
        self
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// The `href` written to the anchor element, mount prefix applied
    ///
    /// # Examples
    ///
    /// ```
    /// use rusty_router::{BasePath, Link};
    ///
    /// let link = Link::new("/about");
    /// assert_eq!(link.external_href(&BasePath::new("/frontend")), "/frontend/about");
    /// assert_eq!(link.external_href(&BasePath::default()), "/about");
    /// ```
    pub fn external_href(&self, base: &BasePath) -> String {
        base.add_prefix(&self.href)
    }

    /// Handles a click on the rendered anchor
    pub fn on_click(&self, click: &LinkClick, ctx: &RouterContext) -> ClickAction {
        if !click.should_intercept() {
            return ClickAction::PassThrough;
        }

        ctx.navigate(&self.href);
        ClickAction::Navigate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NavigateFn, RouteParams};
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_context() -> (RouterContext, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let ctx = RouterContext::new(
            "/",
            RouteParams::new(),
            NavigateFn::new(move |to| sink.borrow_mut().push(to.to_string())),
        );
        (ctx, seen)
    }

    #[test]
    fn test_plain_click_navigates() {
        let (ctx, seen) = recording_context();
        let link = Link::new("/posts/1");

        assert_eq!(link.on_click(&LinkClick::primary(), &ctx), ClickAction::Navigate);
        assert_eq!(*seen.borrow(), vec!["/posts/1"]);
    }

    #[rstest]
    #[case(LinkClick { button: 1, ..LinkClick::primary() })]
    #[case(LinkClick { button: 2, ..LinkClick::primary() })]
    #[case(LinkClick { meta_key: true, ..LinkClick::primary() })]
    #[case(LinkClick { ctrl_key: true, ..LinkClick::primary() })]
    #[case(LinkClick { alt_key: true, ..LinkClick::primary() })]
    #[case(LinkClick { shift_key: true, ..LinkClick::primary() })]
    #[case(LinkClick { default_prevented: true, ..LinkClick::primary() })]
    fn test_other_clicks_pass_through(#[case] click: LinkClick) {
        let (ctx, seen) = recording_context();
        let link = Link::new("/about");

        assert_eq!(link.on_click(&click, &ctx), ClickAction::PassThrough);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_attributes_pass_through() {
        let link = Link::new("/about")
            .attr("class", "nav")
            .attr("HREF", "/elsewhere")
            .attr("aria-current", "page");

        assert_eq!(
            link.attributes(),
            &[
                ("class".to_string(), "nav".to_string()),
                ("aria-current".to_string(), "page".to_string()),
            ]
        );
        assert_eq!(link.href(), "/about");
    }
}
