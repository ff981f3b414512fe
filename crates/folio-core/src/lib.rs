//! Folio Core Library
//!
//! Interactive effects for a static single-page portfolio.
//!
//! ## Overview
//!
//! Once the document is parsed, a handful of independent effects are wired
//! onto elements located by CSS selector: a navbar that changes style after
//! scrolling, skill bars that fill when they come into view, tilting and
//! lifting cards, scroll-triggered reveal classes, a certificate modal
//! entrance, live contact form feedback, click ripples and hover tooltips.
//!
//! The effects are written against the [`Dom`] trait. The browser crate
//! implements it over `web-sys`; [`MemoryDom`] implements it headlessly.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::rc::Rc;
//! use folio_core::{boot, EffectsConfig, MemoryDom};
//!
//! let dom = Rc::new(MemoryDom::parse(include_str!("index.html")));
//! let page = boot(dom.clone(), EffectsConfig::default());
//!
//! dom.scroll_to(250.0);
//! let nav = dom.query_selector(".navbar")?.unwrap();
//! assert!(dom.has_class(&nav, "scrolled"));
//! ```

pub mod config;
pub mod dom;
pub mod effects;
pub mod error;
pub mod logging;

// Re-exports
pub use config::EffectsConfig;
pub use dom::{Dom, DomEvent, EventKind, ListenTarget, MemoryDom, NodeId, Rect, RevealLibrary};
pub use effects::{boot, init_tooltips, EffectsReport, Page, PortfolioEffects, Tooltips};
pub use error::{EffectsError, EffectsResult};
