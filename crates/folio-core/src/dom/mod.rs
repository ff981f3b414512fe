//! Host document abstraction.
//!
//! Page effects never touch a concrete DOM. They are written against the
//! [`Dom`] trait, which the wasm crate implements over `web-sys` and
//! [`MemoryDom`] implements as a headless arena for tests.
//!
//! ## Execution model
//!
//! Hosts are single-threaded and run every handler to completion before
//! the next event is delivered. Handles are shared through `Rc`, and
//! nothing here is `Send`. Handlers may freely call back into the host.

mod memory;
mod query;

pub use memory::{MemoryDom, NodeId};

use std::time::Duration;

use crate::error::EffectsResult;

/// Element bounds in viewport coordinates, as returned by
/// `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center point relative to the element's own top-left corner.
    pub fn local_center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Event payload passed to handlers.
///
/// Pointer coordinates are viewport-relative; they are zero for events
/// that carry no pointer (scroll, input, blur, custom events).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DomEvent {
    pub client_x: f64,
    pub client_y: f64,
}

impl DomEvent {
    pub fn at(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Events the effects listen for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Scroll,
    MouseMove,
    MouseEnter,
    MouseLeave,
    Click,
    Input,
    Blur,
    /// Any other event, by its DOM name (e.g. `show.bs.modal`)
    Custom(String),
}

impl EventKind {
    /// The DOM event type string.
    pub fn dom_name(&self) -> &str {
        match self {
            EventKind::Scroll => "scroll",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
            EventKind::Click => "click",
            EventKind::Input => "input",
            EventKind::Blur => "blur",
            EventKind::Custom(name) => name,
        }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenTarget<N> {
    Window,
    Element(N),
}

/// Event handler. Lives for the page lifetime once attached.
pub type Handler = Box<dyn Fn(&DomEvent)>;

/// Deferred one-shot task.
pub type Task = Box<dyn FnOnce()>;

/// Intersection observer parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    /// Visible fraction at which the callback fires
    pub threshold: f64,
    /// CSS margin applied to the root (viewport) box
    pub root_margin: String,
}

impl ObserverOptions {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            root_margin: "0px".to_string(),
        }
    }

    pub fn with_root_margin(mut self, margin: impl Into<String>) -> Self {
        self.root_margin = margin.into();
        self
    }
}

/// One intersection change reported for an observed element.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<N> {
    pub target: N,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

impl<N> IntersectionEntry<N> {
    /// Whether this entry shows the target intersecting with at least
    /// `threshold` of its area visible. Hosts may report an initial entry
    /// below the threshold, so effects check both.
    pub fn meets(&self, threshold: f64) -> bool {
        self.is_intersecting && self.intersection_ratio >= threshold
    }
}

/// What to do with an element after its entry was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Keep observing the target
    Keep,
    /// Unobserve the target; no further entries are delivered for it
    Stop,
}

/// Per-entry intersection callback. The host calls it once for every
/// entry of a batch, in the order the entries were reported.
pub type IntersectionCallback<N> = Box<dyn FnMut(&IntersectionEntry<N>) -> Observation>;

/// State of the optional third-party reveal-animation library (AOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealLibrary {
    /// Not loaded on this page
    Absent,
    /// Loaded, not yet initialized
    Pending,
    /// Loaded and initialized
    Initialized,
}

/// Document operations used by the page effects.
///
/// Queries return element handles; handles stay valid after the element is
/// detached (operations on a detached element are harmless). Lookups that
/// find nothing return `None` or an empty vector, never an error.
pub trait Dom: 'static {
    /// Element handle.
    type Node: Clone + PartialEq + std::fmt::Debug + 'static;

    // --- queries ---

    fn query_selector(&self, selector: &str) -> EffectsResult<Option<Self::Node>>;
    fn query_selector_all(&self, selector: &str) -> EffectsResult<Vec<Self::Node>>;
    /// Descendants of `root` matching `selector`.
    fn query_selector_within(
        &self,
        root: &Self::Node,
        selector: &str,
    ) -> EffectsResult<Vec<Self::Node>>;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    // --- classes and attributes ---

    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> EffectsResult<()>;

    // --- inline style ---

    /// Inline style property value; `None` when unset or empty.
    fn style(&self, node: &Self::Node, property: &str) -> Option<String>;
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> EffectsResult<()>;
    /// Replace the whole inline style declaration block.
    fn set_css_text(&self, node: &Self::Node, css: &str);

    // --- form values and geometry ---

    /// Current value of an input or textarea; empty for other elements.
    fn value(&self, node: &Self::Node) -> String;
    fn bounding_rect(&self, node: &Self::Node) -> Rect;
    /// Vertical scroll offset of the window.
    fn scroll_y(&self) -> f64;

    // --- tree mutation ---

    fn create_element(&self, tag: &str) -> EffectsResult<Self::Node>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> EffectsResult<()>;
    /// Detach the node from its parent. No-op when already detached.
    fn remove(&self, node: &Self::Node);
    fn set_text(&self, node: &Self::Node, text: &str);
    fn head(&self) -> Option<Self::Node>;
    fn body(&self) -> Option<Self::Node>;

    // --- scheduling ---

    fn listen(
        &self,
        target: ListenTarget<Self::Node>,
        kind: EventKind,
        handler: Handler,
    ) -> EffectsResult<()>;
    /// Run `task` once after `delay`. Not cancellable.
    fn set_timeout(&self, delay: Duration, task: Task) -> EffectsResult<()>;
    fn observe_intersections(
        &self,
        targets: &[Self::Node],
        options: &ObserverOptions,
        callback: IntersectionCallback<Self::Node>,
    ) -> EffectsResult<()>;

    // --- third-party reveal library ---

    fn reveal_library(&self) -> RevealLibrary;
    fn init_reveal_library(&self) -> EffectsResult<()>;
}

/// Add `class` when `on`, remove it otherwise.
pub fn set_class<D: Dom + ?Sized>(dom: &D, node: &D::Node, class: &str, on: bool) {
    if on {
        dom.add_class(node, class);
    } else {
        dom.remove_class(node, class);
    }
}
