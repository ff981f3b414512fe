//! Folio browser entry point.
//!
//! Compiled to wasm and loaded by the portfolio page. On start it installs
//! console logging, reads optional effect overrides from
//! `<script type="application/json" id="folio-effects-config">` and wires the
//! page effects once the document is parsed.

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod web_dom;

#[cfg(target_arch = "wasm32")]
pub use console::BrowserConsole;
#[cfg(target_arch = "wasm32")]
pub use web_dom::WebDom;

use folio_core::EffectsConfig;
use tracing::warn;

/// Id of the JSON script element holding effect overrides.
pub const CONFIG_SCRIPT_ID: &str = "folio-effects-config";

/// Attribute on the config script selecting the log filter.
pub const LOG_FILTER_ATTRIBUTE: &str = "data-log-filter";

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Effect configuration from the config script's text. Missing or blank
/// text means defaults; so does invalid JSON, with a warning.
pub fn config_from_script(text: Option<&str>) -> EffectsConfig {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return EffectsConfig::default();
    };
    match EffectsConfig::from_json(text) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "ignoring effect overrides");
            EffectsConfig::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod start {
    use std::rc::Rc;

    use folio_core::logging::LoggingBuilder;
    use folio_core::{boot, Dom, EffectsConfig};
    use gloo::events::EventListener;
    use tracing::{debug, info};
    use wasm_bindgen::prelude::*;

    use super::{config_from_script, BrowserConsole, WebDom};
    use super::{CONFIG_SCRIPT_ID, DEFAULT_LOG_FILTER, LOG_FILTER_ATTRIBUTE};

    fn run(dom: Rc<WebDom>, config: EffectsConfig) {
        let page = boot(dom, config);
        debug!(failed = ?page.report.failed, "boot finished");
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        let dom = WebDom::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let script = dom.element_by_id(CONFIG_SCRIPT_ID);

        let filter = script
            .as_ref()
            .and_then(|s| dom.attribute(s, LOG_FILTER_ATTRIBUTE))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        if let Err(e) = LoggingBuilder::new().with_filter(filter).init(BrowserConsole) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        let text = script.and_then(|s| s.text_content());
        let config = config_from_script(text.as_deref());

        let dom = Rc::new(dom);
        if dom.document().ready_state() == "loading" {
            info!("waiting for DOMContentLoaded");
            let document = dom.document().clone();
            EventListener::once(&document, "DOMContentLoaded", move |_: &web_sys::Event| {
                run(dom, config)
            })
            .forget();
        } else {
            run(dom, config);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_means_defaults() {
        assert_eq!(config_from_script(None), EffectsConfig::default());
        assert_eq!(config_from_script(Some("  \n ")), EffectsConfig::default());
    }

    #[test]
    fn script_overrides_apply() {
        let config = config_from_script(Some(r#"{ "tooltip": { "offset_px": 24 } }"#));
        assert_eq!(config.tooltip.offset_px, 24.0);
        assert_eq!(config.tooltip.selector, "[data-tooltip]");
    }

    #[test]
    fn invalid_overrides_fall_back() {
        assert_eq!(config_from_script(Some("{ nope")), EffectsConfig::default());
        assert_eq!(
            config_from_script(Some(r#"{ "skills": { "threshold": 2.0 } }"#)),
            EffectsConfig::default()
        );
    }
}
