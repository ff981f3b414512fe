//! Headless in-memory document.
//!
//! `MemoryDom` is an arena of element nodes plus the event, timer and
//! observer bookkeeping a browser would do. It implements [`Dom`] so the
//! page effects can run without a browser, and it exposes driving methods
//! (`dispatch`, `scroll_to`, `report_intersection`, `advance`) that play
//! the role of the user and the event loop.
//!
//! ## Usage
//!
//! ```ignore
//! let dom = Rc::new(MemoryDom::parse(r#"<nav class="navbar"></nav>"#));
//! let effects = PortfolioEffects::new(dom.clone(), EffectsConfig::default());
//! effects.init();
//!
//! dom.scroll_to(250.0);
//! let nav = dom.query_selector(".navbar")?.unwrap();
//! assert!(dom.has_class(&nav, "scrolled"));
//! ```
//!
//! Events do not propagate: a dispatch reaches the listeners attached to
//! exactly that target.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use scraper::{ElementRef, Html};

use super::query::Query;
use super::{
    Dom, DomEvent, EventKind, Handler, IntersectionCallback, IntersectionEntry, ListenTarget,
    Observation, ObserverOptions, Rect, RevealLibrary, Task,
};
use crate::error::{EffectsError, EffectsResult};

/// Handle to a node in a [`MemoryDom`]. Handles stay valid for the
/// document's lifetime, including after the node is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

pub(super) const DOCUMENT: NodeId = NodeId(0);

#[derive(Debug, Default)]
pub(super) struct NodeData {
    pub(super) tag: String,
    pub(super) attrs: BTreeMap<String, String>,
    /// Inline style declarations in insertion order
    styles: Vec<(String, String)>,
    value: String,
    pub(super) text: String,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    rect: Rect,
}

struct ListenerSlot {
    target: ListenTarget<NodeId>,
    kind: EventKind,
    handler: Rc<dyn Fn(&DomEvent)>,
}

struct ObserverSlot {
    options: ObserverOptions,
    targets: Vec<NodeId>,
    callback: Rc<RefCell<IntersectionCallback<NodeId>>>,
}

struct PendingTimer {
    due: Duration,
    seq: u64,
    task: Task,
}

pub(super) struct PageState {
    nodes: Vec<NodeData>,
    listeners: Vec<ListenerSlot>,
    observers: Vec<ObserverSlot>,
    timers: Vec<PendingTimer>,
    now: Duration,
    next_timer_seq: u64,
    scroll_y: f64,
    reveal_library: RevealLibrary,
    reveal_library_inits: usize,
}

impl PageState {
    fn empty() -> Self {
        let document = NodeData {
            tag: "#document".to_string(),
            ..NodeData::default()
        };
        Self {
            nodes: vec![document],
            listeners: Vec::new(),
            observers: Vec::new(),
            timers: Vec::new(),
            now: Duration::ZERO,
            next_timer_seq: 0,
            scroll_y: 0.0,
            reveal_library: RevealLibrary::Absent,
            reveal_library_inits: 0,
        }
    }

    pub(super) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn push_node(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.node(node).parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// First `tag` child of the document element. Like `document.head`,
    /// this is `None` once the section is removed.
    fn section(&self, tag: &str) -> Option<NodeId> {
        let root = *self.node(DOCUMENT).children.first()?;
        self.node(root)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).tag == tag)
    }

    /// Descendants of `root` in document order, excluding `root`.
    pub(super) fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(root).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }
}

/// Headless document implementing [`Dom`].
pub struct MemoryDom {
    state: RefCell<PageState>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty document with `html`, `head` and `body`.
    pub fn new() -> Self {
        let mut state = PageState::empty();
        let html = state.push_node("html");
        let head = state.push_node("head");
        let body = state.push_node("body");
        state.attach(DOCUMENT, html);
        state.attach(html, head);
        state.attach(html, body);
        Self {
            state: RefCell::new(state),
        }
    }

    /// Build a document from HTML markup.
    ///
    /// Input values come from the `value` attribute, textarea values from
    /// their text content.
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let mut state = PageState::empty();
        copy_element(&mut state, DOCUMENT, html.root_element());
        Self {
            state: RefCell::new(state),
        }
    }

    // --- driving the page ---

    /// Deliver an event to the listeners attached to `target`.
    pub fn dispatch(&self, target: ListenTarget<NodeId>, kind: EventKind, event: DomEvent) {
        let handlers: Vec<Rc<dyn Fn(&DomEvent)>> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|slot| slot.target == target && slot.kind == kind)
            .map(|slot| slot.handler.clone())
            .collect();

        for handler in handlers {
            (*handler)(&event);
        }
    }

    /// Deliver an event without pointer data to an element.
    pub fn fire(&self, node: NodeId, kind: EventKind) {
        self.dispatch(ListenTarget::Element(node), kind, DomEvent::default());
    }

    /// Deliver a pointer event at viewport coordinates to an element.
    pub fn fire_at(&self, node: NodeId, kind: EventKind, client_x: f64, client_y: f64) {
        self.dispatch(
            ListenTarget::Element(node),
            kind,
            DomEvent::at(client_x, client_y),
        );
    }

    /// Scroll the window and fire `scroll` on it.
    pub fn scroll_to(&self, y: f64) {
        self.state.borrow_mut().scroll_y = y;
        self.dispatch(ListenTarget::Window, EventKind::Scroll, DomEvent::default());
    }

    /// Set a field's value and fire `input` on it, like typing would.
    pub fn type_into(&self, node: NodeId, value: &str) {
        self.set_value(node, value);
        self.fire(node, EventKind::Input);
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        self.state.borrow_mut().node_mut(node).value = value.to_string();
    }

    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        self.state.borrow_mut().node_mut(node).rect = rect;
    }

    /// Report a single intersection change for `node`.
    pub fn report_intersection(&self, node: NodeId, ratio: f64) {
        self.report_intersections(&[(node, ratio)]);
    }

    /// Report a batch of intersection changes. Every observer watching any
    /// of the nodes receives the batch in order; entries for targets it
    /// stopped observing earlier in the batch are skipped.
    pub fn report_intersections(&self, batch: &[(NodeId, f64)]) {
        let observer_count = self.state.borrow().observers.len();

        for index in 0..observer_count {
            let callback = self.state.borrow().observers[index].callback.clone();

            for &(node, ratio) in batch {
                if !self.state.borrow().observers[index].targets.contains(&node) {
                    continue;
                }
                let entry = IntersectionEntry {
                    target: node,
                    is_intersecting: ratio > 0.0,
                    intersection_ratio: ratio,
                };
                let verdict = {
                    let mut callback = callback.borrow_mut();
                    (*callback)(&entry)
                };
                if verdict == Observation::Stop {
                    self.state.borrow_mut().observers[index]
                        .targets
                        .retain(|&t| t != node);
                }
            }
        }
    }

    /// Move the clock forward, running every timer that falls due, in due
    /// order. Timers scheduled by those tasks run too if they fall due
    /// within the window.
    pub fn advance(&self, by: Duration) {
        let until = self.state.borrow().now + by;

        loop {
            let task = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= until)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                match next {
                    Some(i) => {
                        let timer = state.timers.remove(i);
                        state.now = timer.due;
                        timer.task
                    }
                    None => break,
                }
            };
            task();
        }

        self.state.borrow_mut().now = until;
    }

    /// Make the third-party reveal library available on the page.
    pub fn install_reveal_library(&self, initialized: bool) {
        self.state.borrow_mut().reveal_library = if initialized {
            RevealLibrary::Initialized
        } else {
            RevealLibrary::Pending
        };
    }

    // --- introspection ---

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Whether any observer still watches `node`.
    pub fn is_observed(&self, node: NodeId) -> bool {
        self.state
            .borrow()
            .observers
            .iter()
            .any(|o| o.targets.contains(&node))
    }

    /// Options of every observer watching `node`.
    pub fn observer_options(&self, node: NodeId) -> Vec<ObserverOptions> {
        self.state
            .borrow()
            .observers
            .iter()
            .filter(|o| o.targets.contains(&node))
            .map(|o| o.options.clone())
            .collect()
    }

    pub fn listener_count(&self, target: &ListenTarget<NodeId>, kind: &EventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|slot| &slot.target == target && &slot.kind == kind)
            .count()
    }

    pub fn reveal_library_inits(&self) -> usize {
        self.state.borrow().reveal_library_inits
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.state.borrow().node(node).tag.clone()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.state.borrow().node(node).text.clone()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.borrow().node(node).parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state.borrow().node(node).children.clone()
    }

    /// Whether the node is connected to the document.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.state.borrow().is_ancestor_or_self(DOCUMENT, node)
    }

    /// Inline style serialized as `prop: value;` pairs.
    pub fn css_text(&self, node: NodeId) -> String {
        self.state
            .borrow()
            .node(node)
            .styles
            .iter()
            .map(|(prop, value)| format!("{}: {};", prop, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn copy_element(state: &mut PageState, parent: NodeId, element: ElementRef<'_>) {
    let id = state.push_node(element.value().name());
    for (name, value) in element.value().attrs() {
        state
            .node_mut(id)
            .attrs
            .insert(name.to_string(), value.to_string());
    }
    if let Some(value) = state.node(id).attrs.get("value").cloned() {
        state.node_mut(id).value = value;
    }
    if let Some(css) = state.node(id).attrs.get("style").cloned() {
        state.node_mut(id).styles = parse_declarations(&css);
    }
    state.attach(parent, id);

    let mut text = String::new();
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            copy_element(state, id, child_element);
        } else if let Some(fragment) = child.value().as_text() {
            text.push_str(fragment);
        }
    }

    let node = state.node_mut(id);
    if node.tag == "textarea" {
        node.value = text.clone();
    }
    node.text = text;
}

fn parse_declarations(css: &str) -> Vec<(String, String)> {
    css.split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
            if prop.is_empty() || value.is_empty() {
                None
            } else {
                Some((prop, value))
            }
        })
        .collect()
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query_selector(&self, selector: &str) -> EffectsResult<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    fn query_selector_all(&self, selector: &str) -> EffectsResult<Vec<NodeId>> {
        let query = Query::parse(selector)?;
        Ok(query.select(&self.state.borrow(), DOCUMENT))
    }

    fn query_selector_within(&self, root: &NodeId, selector: &str) -> EffectsResult<Vec<NodeId>> {
        let query = Query::parse(selector)?;
        Ok(query.select(&self.state.borrow(), *root))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let state = self.state.borrow();
        state
            .descendants(DOCUMENT)
            .into_iter()
            .find(|&n| state.node(n).attrs.get("id").is_some_and(|v| v == id))
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut state = self.state.borrow_mut();
        let attrs = &mut state.node_mut(*node).attrs;
        let list = attrs.entry("class".to_string()).or_default();
        if !list.split_whitespace().any(|c| c == class) {
            if !list.is_empty() {
                list.push(' ');
            }
            list.push_str(class);
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(list) = state.node_mut(*node).attrs.get_mut("class") {
            *list = list
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.state
            .borrow()
            .node(*node)
            .attrs
            .get("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.state.borrow().node(*node).attrs.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> EffectsResult<()> {
        self.state
            .borrow_mut()
            .node_mut(*node)
            .attrs
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn style(&self, node: &NodeId, property: &str) -> Option<String> {
        self.state
            .borrow()
            .node(*node)
            .styles
            .iter()
            .find(|(prop, _)| prop == property)
            .map(|(_, value)| value.clone())
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> EffectsResult<()> {
        let mut state = self.state.borrow_mut();
        let styles = &mut state.node_mut(*node).styles;
        let value = value.trim();
        match styles.iter().position(|(prop, _)| prop == property) {
            Some(i) if value.is_empty() => {
                styles.remove(i);
            }
            Some(i) => styles[i].1 = value.to_string(),
            None if !value.is_empty() => styles.push((property.to_string(), value.to_string())),
            None => {}
        }
        Ok(())
    }

    fn set_css_text(&self, node: &NodeId, css: &str) {
        self.state.borrow_mut().node_mut(*node).styles = parse_declarations(css);
    }

    fn value(&self, node: &NodeId) -> String {
        self.state.borrow().node(*node).value.clone()
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        self.state.borrow().node(*node).rect
    }

    fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }

    fn create_element(&self, tag: &str) -> EffectsResult<NodeId> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(EffectsError::Dom(format!("invalid tag name: '{}'", tag)));
        }
        Ok(self.state.borrow_mut().push_node(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> EffectsResult<()> {
        let mut state = self.state.borrow_mut();
        if state.is_ancestor_or_self(*child, *parent) {
            return Err(EffectsError::Dom(
                "HierarchyRequestError: node would contain itself".to_string(),
            ));
        }
        state.attach(*parent, *child);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        self.state.borrow_mut().detach(*node);
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let mut state = self.state.borrow_mut();
        let node = state.node_mut(*node);
        node.text = text.to_string();
        if node.tag == "textarea" {
            node.value = text.to_string();
        }
    }

    fn head(&self) -> Option<NodeId> {
        self.state.borrow().section("head")
    }

    fn body(&self) -> Option<NodeId> {
        self.state.borrow().section("body")
    }

    fn listen(
        &self,
        target: ListenTarget<NodeId>,
        kind: EventKind,
        handler: Handler,
    ) -> EffectsResult<()> {
        self.state.borrow_mut().listeners.push(ListenerSlot {
            target,
            kind,
            handler: Rc::from(handler),
        });
        Ok(())
    }

    fn set_timeout(&self, delay: Duration, task: Task) -> EffectsResult<()> {
        let mut state = self.state.borrow_mut();
        let seq = state.next_timer_seq;
        state.next_timer_seq += 1;
        let due = state.now + delay;
        state.timers.push(PendingTimer { due, seq, task });
        Ok(())
    }

    fn observe_intersections(
        &self,
        targets: &[NodeId],
        options: &ObserverOptions,
        callback: IntersectionCallback<NodeId>,
    ) -> EffectsResult<()> {
        self.state.borrow_mut().observers.push(ObserverSlot {
            options: options.clone(),
            targets: targets.to_vec(),
            callback: Rc::new(RefCell::new(callback)),
        });
        Ok(())
    }

    fn reveal_library(&self) -> RevealLibrary {
        self.state.borrow().reveal_library
    }

    fn init_reveal_library(&self) -> EffectsResult<()> {
        let mut state = self.state.borrow_mut();
        if state.reveal_library == RevealLibrary::Absent {
            return Err(EffectsError::Dom("reveal library is not loaded".to_string()));
        }
        state.reveal_library = RevealLibrary::Initialized;
        state.reveal_library_inits += 1;
        Ok(())
    }
}
