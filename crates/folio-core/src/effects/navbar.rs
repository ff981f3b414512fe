//! Navbar scroll reactor.
//!
//! Toggles the scrolled class on the navbar on every window scroll event,
//! at native scroll frequency.

use std::rc::Rc;

use tracing::debug;

use crate::config::NavbarConfig;
use crate::dom::{set_class, Dom, DomEvent, EventKind, ListenTarget};
use crate::error::EffectsResult;

/// Whether a vertical scroll offset counts as scrolled.
pub fn is_scrolled(scroll_y: f64, threshold_px: f64) -> bool {
    scroll_y > threshold_px
}

/// Wire the scroll listener. Returns `false` (and wires nothing) when the
/// page has no navbar.
pub fn setup_navbar_scroll<D: Dom>(dom: &Rc<D>, config: &NavbarConfig) -> EffectsResult<bool> {
    let Some(navbar) = dom.query_selector(&config.selector)? else {
        debug!(selector = %config.selector, "no navbar on page, scroll reactor disabled");
        return Ok(false);
    };

    let handle = Rc::clone(dom);
    let class = config.scrolled_class.clone();
    let threshold = config.threshold_px;

    dom.listen(
        ListenTarget::Window,
        EventKind::Scroll,
        Box::new(move |_: &DomEvent| {
            let scrolled = is_scrolled(handle.scroll_y(), threshold);
            set_class(&*handle, &navbar, &class, scrolled);
        }),
    )?;

    Ok(true)
}
