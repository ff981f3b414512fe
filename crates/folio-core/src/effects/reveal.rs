//! Scroll reveal.
//!
//! Marks flagged elements with the animate class once they are nearly
//! fully on screen. The class is never removed and the elements stay
//! observed for the page lifetime.

use std::rc::Rc;

use crate::config::RevealConfig;
use crate::dom::{Dom, IntersectionEntry, Observation, ObserverOptions};
use crate::error::EffectsResult;

/// Observe every reveal element. Returns the number observed.
pub fn setup_scroll_reveal<D: Dom>(dom: &Rc<D>, config: &RevealConfig) -> EffectsResult<usize> {
    let elements = dom.query_selector_all(&config.selector)?;
    if elements.is_empty() {
        return Ok(0);
    }

    let options = ObserverOptions::new(config.threshold).with_root_margin(&config.root_margin);
    let handle = Rc::clone(dom);
    let class = config.animate_class.clone();
    let threshold = config.threshold;

    dom.observe_intersections(
        &elements,
        &options,
        Box::new(move |entry: &IntersectionEntry<D::Node>| {
            if entry.meets(threshold) {
                handle.add_class(&entry.target, &class);
            }
            Observation::Keep
        }),
    )?;

    Ok(elements.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn class_is_sticky() {
        let dom = Rc::new(MemoryDom::parse(r#"<section data-aos="fade-up"></section>"#));
        assert_eq!(
            setup_scroll_reveal(&dom, &RevealConfig::default()).unwrap(),
            1
        );
        let section = dom.query_selector("[data-aos]").unwrap().unwrap();

        let options = dom.observer_options(section);
        assert_eq!(options[0].root_margin, "0px 0px -50px 0px");
        assert_eq!(options[0].threshold, 0.1);

        dom.report_intersection(section, 0.2);
        assert!(dom.has_class(&section, "aos-animate"));

        dom.report_intersection(section, 0.0);
        assert!(dom.has_class(&section, "aos-animate"));
        assert!(dom.is_observed(section));
    }
}
