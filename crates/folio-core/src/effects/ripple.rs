//! Ripple click effect.
//!
//! Every click spawns its own circular overlay at the pointer, animated by a
//! shared keyframes block and removed after the animation duration. Rapid
//! clicks overlap; each overlay has an independent lifecycle.

use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::RippleConfig;
use crate::dom::{Dom, DomEvent, EventKind, ListenTarget, Rect};
use crate::error::{EffectsError, EffectsResult};

/// Keyframes the overlays animate with.
pub const RIPPLE_KEYFRAMES: &str =
    "@keyframes ripple { to { transform: scale(4); opacity: 0; } }";

/// Overlay square, positioned relative to the button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

/// Overlay covering the larger button side, centered on the click point.
pub fn ripple_geometry(rect: Rect, event: &DomEvent) -> RippleGeometry {
    let size = rect.width.max(rect.height);
    RippleGeometry {
        size,
        left: event.client_x - rect.left - size / 2.0,
        top: event.client_y - rect.top - size / 2.0,
    }
}

pub fn ripple_css(geometry: RippleGeometry, config: &RippleConfig) -> String {
    let seconds = config.duration_ms as f64 / 1000.0;
    format!(
        "position: absolute; border-radius: 50%; background: {color}; \
         transform: scale(0); animation: ripple {seconds}s linear; \
         width: {size}px; height: {size}px; top: {top}px; left: {left}px; \
         pointer-events: none;",
        color = config.color,
        seconds = seconds,
        size = geometry.size,
        top = geometry.top,
        left = geometry.left,
    )
}

/// Add the keyframes style block to the head unless a block with the
/// configured id already exists. Returns whether a block was added.
pub fn ensure_ripple_styles<D: Dom>(dom: &D, config: &RippleConfig) -> EffectsResult<bool> {
    if dom.element_by_id(&config.style_id).is_some() {
        return Ok(false);
    }
    let head = dom.head().ok_or(EffectsError::MissingElement("head"))?;

    let style = dom.create_element("style")?;
    dom.set_attribute(&style, "id", &config.style_id)?;
    dom.set_text(&style, RIPPLE_KEYFRAMES);
    dom.append_child(&head, &style)?;
    debug!(id = %config.style_id, "ripple keyframes injected");
    Ok(true)
}

fn spawn_ripple<D: Dom>(
    dom: &Rc<D>,
    button: &D::Node,
    event: &DomEvent,
    config: &RippleConfig,
) -> EffectsResult<()> {
    let geometry = ripple_geometry(dom.bounding_rect(button), event);
    let ripple = dom.create_element("span")?;
    dom.set_css_text(&ripple, &ripple_css(geometry, config));
    dom.append_child(button, &ripple)?;

    let handle = Rc::clone(dom);
    dom.set_timeout(
        Duration::from_millis(config.duration_ms),
        Box::new(move || handle.remove(&ripple)),
    )
}

/// Inject the keyframes, then wire every ripple button. Returns the
/// number of buttons wired; nothing is wired when injection fails.
pub fn setup_ripple_effects<D: Dom>(dom: &Rc<D>, config: &RippleConfig) -> EffectsResult<usize> {
    let buttons = dom.query_selector_all(&config.selector)?;
    ensure_ripple_styles(&**dom, config)?;

    for button in &buttons {
        let handle = Rc::clone(dom);
        let target = button.clone();
        let settings = config.clone();
        dom.listen(
            ListenTarget::Element(button.clone()),
            EventKind::Click,
            Box::new(move |event: &DomEvent| {
                if let Err(e) = spawn_ripple(&handle, &target, event, &settings) {
                    warn!(error = %e, "ripple failed");
                }
            }),
        )?;
    }

    Ok(buttons.len())
}
