//! Hover tilt and lift effects.
//!
//! Tilt cards rotate toward the pointer in perspective; lift items rise
//! while hovered. Both are synchronous and last-event-wins.

use std::rc::Rc;

use tracing::warn;

use crate::config::HoverConfig;
use crate::dom::{Dom, DomEvent, EventKind, ListenTarget, Rect};
use crate::error::EffectsResult;

/// Rotation (degrees) applied to a tilt card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltAngles {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

/// Rotation for a pointer at viewport position `event` over `rect`.
///
/// The edge nearest the pointer tilts away from the viewer: a pointer in
/// the top-left quadrant gives a positive X and a negative Y rotation.
pub fn tilt_angles(rect: Rect, event: &DomEvent, divisor: f64) -> TiltAngles {
    let x = event.client_x - rect.left;
    let y = event.client_y - rect.top;
    let (center_x, center_y) = rect.local_center();

    TiltAngles {
        rotate_x: (center_y - y) / divisor,
        rotate_y: (x - center_x) / divisor,
    }
}

pub fn tilt_transform(angles: TiltAngles, config: &HoverConfig) -> String {
    format!(
        "perspective({}px) rotateX({}deg) rotateY({}deg) scale3d({s}, {s}, {s})",
        config.perspective_px,
        angles.rotate_x,
        angles.rotate_y,
        s = config.tilt_scale
    )
}

pub fn neutral_transform(config: &HoverConfig) -> String {
    format!(
        "perspective({}px) rotateX(0) rotateY(0) scale3d(1, 1, 1)",
        config.perspective_px
    )
}

fn apply<D: Dom>(dom: &D, node: &D::Node, property: &str, value: &str) {
    if let Err(e) = dom.set_style(node, property, value) {
        warn!(property, error = %e, "failed to apply hover style");
    }
}

/// Wire tilt cards. Returns the number of cards wired.
pub fn setup_tilt<D: Dom>(dom: &Rc<D>, config: &HoverConfig) -> EffectsResult<usize> {
    let cards = dom.query_selector_all(&config.tilt_selector)?;
    let neutral = neutral_transform(config);

    for card in &cards {
        let handle = Rc::clone(dom);
        let target = card.clone();
        let settings = config.clone();
        dom.listen(
            ListenTarget::Element(card.clone()),
            EventKind::MouseMove,
            Box::new(move |event: &DomEvent| {
                let rect = handle.bounding_rect(&target);
                let angles = tilt_angles(rect, event, settings.tilt_divisor);
                apply(&*handle, &target, "transform", &tilt_transform(angles, &settings));
            }),
        )?;

        let handle = Rc::clone(dom);
        let target = card.clone();
        let neutral = neutral.clone();
        dom.listen(
            ListenTarget::Element(card.clone()),
            EventKind::MouseLeave,
            Box::new(move |_: &DomEvent| apply(&*handle, &target, "transform", &neutral)),
        )?;
    }

    Ok(cards.len())
}

/// Wire lift items. Returns the number of items wired.
pub fn setup_lift<D: Dom>(dom: &Rc<D>, config: &HoverConfig) -> EffectsResult<usize> {
    let items = dom.query_selector_all(&config.lift_selector)?;
    let raised = format!("translateY(-{}px)", config.lift_offset_px);

    for item in &items {
        let handle = Rc::clone(dom);
        let target = item.clone();
        let raised = raised.clone();
        let shadow = config.lift_shadow.clone();
        dom.listen(
            ListenTarget::Element(item.clone()),
            EventKind::MouseEnter,
            Box::new(move |_: &DomEvent| {
                apply(&*handle, &target, "transform", &raised);
                apply(&*handle, &target, "box-shadow", &shadow);
            }),
        )?;

        let handle = Rc::clone(dom);
        let target = item.clone();
        let shadow = config.rest_shadow.clone();
        dom.listen(
            ListenTarget::Element(item.clone()),
            EventKind::MouseLeave,
            Box::new(move |_: &DomEvent| {
                apply(&*handle, &target, "transform", "translateY(0)");
                apply(&*handle, &target, "box-shadow", &shadow);
            }),
        )?;
    }

    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_has_no_rotation() {
        let rect = Rect::new(100.0, 200.0, 300.0, 150.0);
        let angles = tilt_angles(rect, &DomEvent::at(250.0, 275.0), 25.0);
        assert_eq!(angles, TiltAngles::default());
    }

    #[test]
    fn top_left_quadrant_signs() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let angles = tilt_angles(rect, &DomEvent::at(0.0, 0.0), 25.0);
        assert_eq!(angles.rotate_x, 2.0);
        assert_eq!(angles.rotate_y, -4.0);
    }

    #[test]
    fn transform_strings() {
        let config = HoverConfig::default();
        let angles = TiltAngles {
            rotate_x: 2.0,
            rotate_y: -4.0,
        };
        assert_eq!(
            tilt_transform(angles, &config),
            "perspective(1000px) rotateX(2deg) rotateY(-4deg) scale3d(1.05, 1.05, 1.05)"
        );
        assert_eq!(
            neutral_transform(&config),
            "perspective(1000px) rotateX(0) rotateY(0) scale3d(1, 1, 1)"
        );
    }
}
