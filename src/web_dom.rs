//! `Dom` over the live browser document.
//!
//! Listeners, timers and observer callbacks are attached for the page
//! lifetime: gloo listeners and timeouts are forgotten, observer closures
//! leaked with `Closure::forget`.

use std::cell::Cell;
use std::time::Duration;

use folio_core::dom::{
    Dom, DomEvent, Handler, IntersectionCallback, IntersectionEntry, ListenTarget, Observation,
    ObserverOptions, Rect, RevealLibrary, Task,
};
use folio_core::{EffectsError, EffectsResult, EventKind};
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use js_sys::{Array, Function, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CssStyleDeclaration, Document, Element, Event, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, NodeList, Window,
};

/// Global name of the third-party reveal library.
const REVEAL_LIBRARY_GLOBAL: &str = "AOS";

/// Convert a thrown JS value into an effects error.
pub(crate) fn js_error(value: JsValue) -> EffectsError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    EffectsError::Dom(message)
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn inline_style(node: &Element) -> Option<CssStyleDeclaration> {
    node.dyn_ref::<HtmlElement>().map(|html| html.style())
}

fn to_dom_event(event: &Event) -> DomEvent {
    event
        .dyn_ref::<MouseEvent>()
        .map(|mouse| DomEvent::at(f64::from(mouse.client_x()), f64::from(mouse.client_y())))
        .unwrap_or_default()
}

/// The browser document of the current window.
pub struct WebDom {
    window: Window,
    document: Document,
    reveal_initialized: Cell<bool>,
}

impl WebDom {
    pub fn new() -> EffectsResult<Self> {
        let window = web_sys::window().ok_or(EffectsError::MissingElement("window"))?;
        let document = window
            .document()
            .ok_or(EffectsError::MissingElement("document"))?;
        Ok(Self {
            window,
            document,
            reveal_initialized: Cell::new(false),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn reveal_global(&self) -> Option<JsValue> {
        Reflect::get(&self.window, &JsValue::from_str(REVEAL_LIBRARY_GLOBAL))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_selector(&self, selector: &str) -> EffectsResult<Option<Element>> {
        self.document.query_selector(selector).map_err(js_error)
    }

    fn query_selector_all(&self, selector: &str) -> EffectsResult<Vec<Element>> {
        self.document
            .query_selector_all(selector)
            .map(elements)
            .map_err(js_error)
    }

    fn query_selector_within(&self, root: &Element, selector: &str) -> EffectsResult<Vec<Element>> {
        root.query_selector_all(selector)
            .map(elements)
            .map_err(js_error)
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn add_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().add_1(class) {
            warn!(class, error = %js_error(e), "failed to add class");
        }
    }

    fn remove_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().remove_1(class) {
            warn!(class, error = %js_error(e), "failed to remove class");
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> EffectsResult<()> {
        node.set_attribute(name, value).map_err(js_error)
    }

    fn style(&self, node: &Element, property: &str) -> Option<String> {
        inline_style(node)
            .and_then(|style| style.get_property_value(property).ok())
            .filter(|value| !value.is_empty())
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> EffectsResult<()> {
        let style = inline_style(node)
            .ok_or_else(|| EffectsError::Dom(format!("<{}> has no inline style", node.tag_name())))?;
        style.set_property(property, value).map_err(js_error)
    }

    fn set_css_text(&self, node: &Element, css: &str) {
        if let Some(style) = inline_style(node) {
            style.set_css_text(css);
        }
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn create_element(&self, tag: &str) -> EffectsResult<Element> {
        self.document.create_element(tag).map_err(js_error)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> EffectsResult<()> {
        parent.append_child(child).map(|_| ()).map_err(js_error)
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(Element::from)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn listen(
        &self,
        target: ListenTarget<Element>,
        kind: EventKind,
        handler: Handler,
    ) -> EffectsResult<()> {
        let event_type = kind.dom_name().to_string();
        let callback = move |event: &Event| handler(&to_dom_event(event));
        let listener = match &target {
            ListenTarget::Window => EventListener::new(&self.window, event_type, callback),
            ListenTarget::Element(node) => EventListener::new(node, event_type, callback),
        };
        listener.forget();
        Ok(())
    }

    fn set_timeout(&self, delay: Duration, task: Task) -> EffectsResult<()> {
        let millis = u32::try_from(delay.as_millis())
            .map_err(|_| EffectsError::Dom(format!("timeout too long: {:?}", delay)))?;
        Timeout::new(millis, task).forget();
        Ok(())
    }

    fn observe_intersections(
        &self,
        targets: &[Element],
        options: &ObserverOptions,
        callback: IntersectionCallback<Element>,
    ) -> EffectsResult<()> {
        let mut callback = callback;
        let closure = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for value in entries.iter() {
                    let Ok(entry) = value.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let record = IntersectionEntry {
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                        intersection_ratio: entry.intersection_ratio(),
                    };
                    if callback(&record) == Observation::Stop {
                        observer.unobserve(&record.target);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)
                .map_err(js_error)?;
        for target in targets {
            observer.observe(target);
        }
        closure.forget();
        Ok(())
    }

    fn reveal_library(&self) -> RevealLibrary {
        let Some(library) = self.reveal_global() else {
            return RevealLibrary::Absent;
        };
        let flagged = Reflect::get(&library, &JsValue::from_str("initialized"))
            .map(|value| value.is_truthy())
            .unwrap_or(false);
        if flagged || self.reveal_initialized.get() {
            RevealLibrary::Initialized
        } else {
            RevealLibrary::Pending
        }
    }

    fn init_reveal_library(&self) -> EffectsResult<()> {
        let library = self
            .reveal_global()
            .ok_or_else(|| EffectsError::Dom("reveal library is not loaded".to_string()))?;
        let init = Reflect::get(&library, &JsValue::from_str("init"))
            .map_err(js_error)?
            .dyn_into::<Function>()
            .map_err(|_| EffectsError::Dom("reveal library has no init function".to_string()))?;
        init.call0(&library).map_err(js_error)?;
        self.reveal_initialized.set(true);
        debug!(library = REVEAL_LIBRARY_GLOBAL, "reveal library init called");
        Ok(())
    }
}
