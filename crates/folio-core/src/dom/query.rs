//! CSS selector matching for the headless document.
//!
//! Selector lists are parsed by the `selectors` crate with scraper's parser
//! settings, the same grammar `scraper::Selector` accepts. Arena nodes are
//! matched through [`selectors::Element`], so combinators, attribute
//! operators and structural pseudo-classes behave as in a browser.

use std::fmt;

use cssparser::ParserInput;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, Parser, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    self, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode,
    NeedsSelectorFlags, QuirksMode,
};
use selectors::parser::{ParseRelative, SelectorImpl};
use selectors::{NthIndexCache, OpaqueElement, SelectorList};

use super::memory::{NodeData, NodeId, PageState, DOCUMENT};
use crate::error::{EffectsError, EffectsResult};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

type NamespaceUrl = <Simple as SelectorImpl>::NamespaceUrl;

/// A parsed selector list.
#[derive(Debug, Clone)]
pub(super) struct Query {
    selectors: SelectorList<Simple>,
}

impl Query {
    pub(super) fn parse(source: &str) -> EffectsResult<Self> {
        let mut input = ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        SelectorList::parse(&Parser, &mut parser, ParseRelative::No)
            .map(|selectors| Self { selectors })
            .map_err(|e| EffectsError::Dom(format!("invalid selector '{}': {:?}", source, e.kind)))
    }

    /// Descendants of `root` matching the list, in document order.
    pub(super) fn select(&self, state: &PageState, root: NodeId) -> Vec<NodeId> {
        let mut cache = NthIndexCache::default();
        state
            .descendants(root)
            .into_iter()
            .filter(|&id| self.matches(&ArenaElement { state, id }, &mut cache))
            .collect()
    }

    fn matches(&self, element: &ArenaElement<'_>, cache: &mut NthIndexCache) -> bool {
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        matching::matches_selector_list(&self.selectors, element, &mut context)
    }
}

/// Borrowed view of one arena element.
#[derive(Clone, Copy)]
struct ArenaElement<'a> {
    state: &'a PageState,
    id: NodeId,
}

impl<'a> ArenaElement<'a> {
    fn data(&self) -> &'a NodeData {
        self.state.node(self.id)
    }

    fn at(&self, id: NodeId) -> Self {
        Self {
            state: self.state,
            id,
        }
    }

    /// Sibling `offset` places away from this element.
    fn sibling(&self, offset: isize) -> Option<Self> {
        let parent = self.data().parent?;
        let siblings = &self.state.node(parent).children;
        let index = siblings.iter().position(|&c| c == self.id)?;
        let target = index.checked_add_signed(offset)?;
        siblings.get(target).map(|&id| self.at(id))
    }
}

impl fmt::Debug for ArenaElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {:?}", self.data().tag, self.id)
    }
}

impl<'a> selectors::Element for ArenaElement<'a> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.data())
    }

    fn parent_element(&self) -> Option<Self> {
        self.data()
            .parent
            .filter(|&parent| parent != DOCUMENT)
            .map(|parent| self.at(parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling(-1)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling(1)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.data().children.first().map(|&id| self.at(id))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.data().tag.as_str() == &*name.0
    }

    fn has_namespace(&self, namespace: &NamespaceUrl) -> bool {
        &**namespace == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data().tag == other.data().tag
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Arena attributes carry no namespace.
        if matches!(*ns, NamespaceConstraint::Specific(url) if !url.is_empty()) {
            return false;
        }
        self.data()
            .attrs
            .get(&*local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        let data = self.data();
        matches!(data.tag.as_str(), "a" | "area" | "link") && data.attrs.contains_key("href")
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data()
            .attrs
            .get("id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data().attrs.get("class").is_some_and(|list| {
            list.split_whitespace()
                .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        let data = self.data();
        data.children.is_empty() && data.text.is_empty()
    }

    fn is_root(&self) -> bool {
        self.data().parent == Some(DOCUMENT)
    }
}
