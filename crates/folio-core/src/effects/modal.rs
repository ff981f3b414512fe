//! Certificate modal entrance animation.
//!
//! When a certificate modal starts opening, its display element is reset to
//! transparent and shrunk, then after a short delay transitioned to full
//! size. The delay lets the reset state render before the transition is set.

use std::rc::Rc;
use std::time::Duration;

use tracing::warn;

use crate::config::ModalConfig;
use crate::dom::{Dom, DomEvent, EventKind, ListenTarget};
use crate::error::EffectsResult;

fn play_entrance<D: Dom>(dom: &Rc<D>, modal: &D::Node, config: &ModalConfig) -> EffectsResult<()> {
    let Some(display) = dom
        .query_selector_within(modal, &config.content_selector)?
        .into_iter()
        .next()
    else {
        return Ok(());
    };

    dom.set_style(&display, "opacity", "0")?;
    dom.set_style(&display, "transform", "scale(0.9)")?;

    let handle = Rc::clone(dom);
    let transition = config.transition.clone();
    dom.set_timeout(
        Duration::from_millis(config.entrance_delay_ms),
        Box::new(move || {
            let settle = || -> EffectsResult<()> {
                handle.set_style(&display, "transition", &transition)?;
                handle.set_style(&display, "opacity", "1")?;
                handle.set_style(&display, "transform", "scale(1)")
            };
            if let Err(e) = settle() {
                warn!(error = %e, "certificate entrance did not complete");
            }
        }),
    )
}

/// Wire every certificate modal. Returns the number of modals wired.
pub fn setup_certificate_modals<D: Dom>(dom: &Rc<D>, config: &ModalConfig) -> EffectsResult<usize> {
    let modals = dom.query_selector_all(&config.selector)?;

    for modal in &modals {
        let handle = Rc::clone(dom);
        let target = modal.clone();
        let settings = config.clone();
        dom.listen(
            ListenTarget::Element(modal.clone()),
            EventKind::Custom(config.show_event.clone()),
            Box::new(move |_: &DomEvent| {
                if let Err(e) = play_entrance(&handle, &target, &settings) {
                    warn!(error = %e, "certificate entrance failed");
                }
            }),
        )?;
    }

    Ok(modals.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    const PAGE: &str = r#"
        <div class="certificate-modal" id="cert-1">
            <div class="certificate-display"></div>
        </div>
        <div class="certificate-modal" id="cert-2"></div>
    "#;

    fn show(dom: &MemoryDom, modal: crate::dom::NodeId) {
        dom.fire(modal, EventKind::Custom("show.bs.modal".to_string()));
    }

    #[test]
    fn entrance_resets_then_settles() {
        let dom = Rc::new(MemoryDom::parse(PAGE));
        assert_eq!(
            setup_certificate_modals(&dom, &ModalConfig::default()).unwrap(),
            2
        );
        let modal = dom.element_by_id("cert-1").unwrap();
        let display = dom.query_selector(".certificate-display").unwrap().unwrap();

        show(&dom, modal);
        assert_eq!(dom.style(&display, "opacity").as_deref(), Some("0"));
        assert_eq!(dom.style(&display, "transform").as_deref(), Some("scale(0.9)"));
        assert_eq!(dom.style(&display, "transition"), None);

        dom.advance(Duration::from_millis(99));
        assert_eq!(dom.style(&display, "opacity").as_deref(), Some("0"));

        dom.advance(Duration::from_millis(1));
        assert_eq!(dom.style(&display, "opacity").as_deref(), Some("1"));
        assert_eq!(dom.style(&display, "transform").as_deref(), Some("scale(1)"));
        assert_eq!(
            dom.style(&display, "transition").as_deref(),
            Some("all 0.5s ease")
        );
    }

    #[test]
    fn modal_without_display_schedules_nothing() {
        let dom = Rc::new(MemoryDom::parse(PAGE));
        setup_certificate_modals(&dom, &ModalConfig::default()).unwrap();
        let modal = dom.element_by_id("cert-2").unwrap();

        show(&dom, modal);
        assert_eq!(dom.pending_timers(), 0);
    }
}
