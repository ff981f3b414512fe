//! Tooltip helper.
//!
//! Hovering a tooltip-flagged element shows a floating label above it;
//! leaving removes the label. The association between an element and its
//! label lives in a registry owned by [`Tooltips`], keyed by the element's
//! position in the matched set.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;

use crate::config::TooltipConfig;
use crate::dom::{Dom, DomEvent, EventKind, ListenTarget, Rect};
use crate::error::{EffectsError, EffectsResult};

type Registry<N> = Rc<RefCell<HashMap<usize, N>>>;

/// Fixed-position `(top, left)` of a label for an element at `rect`.
///
/// The left edge is the element's horizontal center; the label is shifted
/// back by half its own width through a `translateX(-50%)` transform.
pub fn tooltip_position(rect: Rect, offset_px: f64) -> (f64, f64) {
    (rect.top - offset_px, rect.left + rect.width / 2.0)
}

/// Wired tooltip sources and their live labels.
pub struct Tooltips<D: Dom> {
    sources: Vec<D::Node>,
    labels: Registry<D::Node>,
}

impl<D: Dom> Tooltips<D> {
    /// Number of wired tooltip sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of labels currently shown.
    pub fn active_count(&self) -> usize {
        self.labels.borrow().len()
    }

    /// The label currently shown for `source`, if any.
    pub fn label_for(&self, source: &D::Node) -> Option<D::Node> {
        let index = self.sources.iter().position(|s| s == source)?;
        self.labels.borrow().get(&index).cloned()
    }
}

fn show_label<D: Dom>(
    dom: &D,
    source: &D::Node,
    config: &TooltipConfig,
) -> EffectsResult<D::Node> {
    let body = dom.body().ok_or(EffectsError::MissingElement("body"))?;
    let text = dom.attribute(source, &config.attribute).unwrap_or_default();

    let (top, left) = tooltip_position(dom.bounding_rect(source), config.offset_px);
    let label = dom.create_element("div")?;
    dom.set_attribute(&label, "class", &config.class_name)?;
    dom.set_text(&label, &text);
    dom.set_style(&label, "position", "fixed")?;
    dom.set_style(&label, "top", &format!("{}px", top))?;
    dom.set_style(&label, "left", &format!("{}px", left))?;
    dom.set_style(&label, "transform", "translateX(-50%)")?;
    dom.set_style(&label, "z-index", &config.z_index.to_string())?;

    // Attached last, so a failure above never leaves a label on the page
    dom.append_child(&body, &label)?;
    Ok(label)
}

/// Wire every tooltip-flagged element on the page.
pub fn init_tooltips<D: Dom>(dom: &Rc<D>, config: &TooltipConfig) -> EffectsResult<Tooltips<D>> {
    let sources = dom.query_selector_all(&config.selector)?;
    let labels: Registry<D::Node> = Rc::new(RefCell::new(HashMap::new()));

    for (index, source) in sources.iter().enumerate() {
        let handle = Rc::clone(dom);
        let registry = Rc::clone(&labels);
        let target = source.clone();
        let settings = config.clone();
        dom.listen(
            ListenTarget::Element(source.clone()),
            EventKind::MouseEnter,
            Box::new(move |_: &DomEvent| {
                let stale = registry.borrow_mut().remove(&index);
                if let Some(stale) = stale {
                    handle.remove(&stale);
                }
                match show_label(&*handle, &target, &settings) {
                    Ok(label) => {
                        registry.borrow_mut().insert(index, label);
                    }
                    Err(e) => warn!(error = %e, "tooltip not shown"),
                }
            }),
        )?;

        let handle = Rc::clone(dom);
        let registry = Rc::clone(&labels);
        dom.listen(
            ListenTarget::Element(source.clone()),
            EventKind::MouseLeave,
            Box::new(move |_: &DomEvent| {
                let label = registry.borrow_mut().remove(&index);
                if let Some(label) = label {
                    handle.remove(&label);
                }
            }),
        )?;
    }

    Ok(Tooltips { sources, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn position_is_above_and_centered() {
        let rect = Rect::new(100.0, 300.0, 60.0, 20.0);
        assert_eq!(tooltip_position(rect, 40.0), (260.0, 130.0));
    }

    #[test]
    fn second_enter_replaces_label() {
        let dom = Rc::new(MemoryDom::parse(r#"<a data-tooltip="GitHub">gh</a>"#));
        let tooltips = init_tooltips(&dom, &TooltipConfig::default()).unwrap();
        let link = dom.query_selector("[data-tooltip]").unwrap().unwrap();

        dom.fire(link, EventKind::MouseEnter);
        let first = tooltips.label_for(&link).unwrap();
        dom.fire(link, EventKind::MouseEnter);
        let second = tooltips.label_for(&link).unwrap();

        assert_ne!(first, second);
        assert!(!dom.is_attached(first));
        assert_eq!(dom.query_selector_all(".custom-tooltip").unwrap().len(), 1);
    }

    #[test]
    fn attached_label_is_fully_styled() {
        let dom = MemoryDom::parse(r#"<a data-tooltip="Mail">m</a>"#);
        let link = dom.query_selector("a").unwrap().unwrap();
        dom.set_rect(link, Rect::new(100.0, 300.0, 60.0, 20.0));

        let label = show_label(&dom, &link, &TooltipConfig::default()).unwrap();
        assert_eq!(dom.parent(label), dom.body());
        assert_eq!(dom.text(label), "Mail");
        assert_eq!(
            dom.css_text(label),
            "position: fixed; top: 260px; left: 130px; transform: translateX(-50%); z-index: 9999;"
        );
    }

    #[test]
    fn enter_without_body_leaves_no_label() {
        let dom = Rc::new(MemoryDom::parse(r#"<a data-tooltip="GitHub">gh</a>"#));
        let tooltips = init_tooltips(&dom, &TooltipConfig::default()).unwrap();
        let link = dom.query_selector("[data-tooltip]").unwrap().unwrap();

        let body = dom.body().unwrap();
        dom.remove(&body);
        dom.fire(link, EventKind::MouseEnter);

        assert_eq!(tooltips.active_count(), 0);
        assert!(tooltips.label_for(&link).is_none());
    }
}
