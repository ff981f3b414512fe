//! Skill-bar reveal.
//!
//! Each progress bar grows to its target width the first time at least half
//! of it becomes visible, then is no longer observed.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::SkillBarConfig;
use crate::dom::{Dom, IntersectionEntry, Observation, ObserverOptions};
use crate::error::EffectsResult;

/// Normalize a declared target width to a CSS percentage.
///
/// Accepts `"80"` and `"80%"` alike; blank input yields `None`.
pub fn percent_width(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if number.is_empty() {
        None
    } else {
        Some(format!("{}%", number))
    }
}

/// Target width of a bar: the width attribute, falling back to the inline
/// `width` style.
fn target_width<D: Dom>(dom: &D, bar: &D::Node, attribute: &str) -> Option<String> {
    dom.attribute(bar, attribute)
        .filter(|value| !value.trim().is_empty())
        .or_else(|| dom.style(bar, "width"))
        .and_then(|raw| percent_width(&raw))
}

/// Observe every skill bar. Returns the number of bars observed.
pub fn setup_skill_animations<D: Dom>(
    dom: &Rc<D>,
    config: &SkillBarConfig,
) -> EffectsResult<usize> {
    let bars = dom.query_selector_all(&config.selector)?;
    if bars.is_empty() {
        return Ok(0);
    }

    let handle = Rc::clone(dom);
    let attribute = config.width_attribute.clone();
    let threshold = config.threshold;

    dom.observe_intersections(
        &bars,
        &ObserverOptions::new(threshold),
        Box::new(move |entry: &IntersectionEntry<D::Node>| {
            if !entry.meets(threshold) {
                return Observation::Keep;
            }

            match target_width(&*handle, &entry.target, &attribute) {
                Some(width) => {
                    if let Err(e) = handle.set_style(&entry.target, "width", &width) {
                        warn!(error = %e, "failed to animate skill bar");
                    }
                }
                None => debug!("skill bar has no target width"),
            }
            Observation::Stop
        }),
    )?;

    Ok(bars.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn percent_width_normalizes() {
        assert_eq!(percent_width("80").as_deref(), Some("80%"));
        assert_eq!(percent_width(" 80% ").as_deref(), Some("80%"));
        assert_eq!(percent_width("62.5").as_deref(), Some("62.5%"));
        assert_eq!(percent_width(""), None);
        assert_eq!(percent_width("%"), None);
    }

    #[test]
    fn inline_width_is_the_fallback() {
        let dom = MemoryDom::parse(
            r#"<div class="skill-progress" data-width="" style="width: 45%"></div>"#,
        );
        let bar = dom.query_selector(".skill-progress").unwrap().unwrap();
        assert_eq!(
            target_width(&dom, &bar, "data-width").as_deref(),
            Some("45%")
        );
    }

    #[test]
    fn bar_below_threshold_keeps_waiting() {
        let dom = Rc::new(MemoryDom::parse(
            r#"<div class="skill-progress" data-width="90"></div>"#,
        ));
        assert_eq!(
            setup_skill_animations(&dom, &SkillBarConfig::default()).unwrap(),
            1
        );
        let bar = dom.query_selector(".skill-progress").unwrap().unwrap();

        dom.report_intersection(bar, 0.3);
        assert_eq!(dom.style(&bar, "width"), None);
        assert!(dom.is_observed(bar));

        dom.report_intersection(bar, 0.6);
        assert_eq!(dom.style(&bar, "width").as_deref(), Some("90%"));
        assert!(!dom.is_observed(bar));
    }
}
