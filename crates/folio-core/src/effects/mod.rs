//! Page effects controller.
//!
//! One controller per page, built explicitly around the document it drives:
//!
//! ```ignore
//! let dom = Rc::new(MemoryDom::parse(html));
//! let page = boot(dom, EffectsConfig::default());
//! tracing::info!(?page.report, "effects ready");
//! ```
//!
//! Every routine queries its anchors once, at setup. A missing anchor
//! disables only that routine; a failing routine is logged and skipped.

pub mod contact;
pub mod hover;
pub mod modal;
pub mod navbar;
pub mod reveal;
pub mod ripple;
pub mod skills;
pub mod tooltip;

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::EffectsConfig;
use crate::dom::{Dom, RevealLibrary};
use crate::error::EffectsResult;

pub use contact::{validate_field, validate_value, FieldKind, FieldValidity};
pub use hover::{tilt_angles, TiltAngles};
pub use ripple::{ripple_geometry, RippleGeometry, RIPPLE_KEYFRAMES};
pub use tooltip::{init_tooltips, Tooltips};

/// What each routine wired at setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectsReport {
    pub navbar: bool,
    pub skill_bars: usize,
    pub tilt_cards: usize,
    pub lift_items: usize,
    pub reveal_elements: usize,
    pub certificate_modals: usize,
    pub form_fields: usize,
    pub ripple_buttons: usize,
    /// Routines that failed and were skipped
    pub failed: Vec<&'static str>,
}

/// The page effects controller.
pub struct PortfolioEffects<D: Dom> {
    dom: Rc<D>,
    config: EffectsConfig,
}

impl<D: Dom> PortfolioEffects<D> {
    pub fn new(dom: Rc<D>, config: EffectsConfig) -> Self {
        Self { dom, config }
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// Run the six setup routines. Each is independent of the others.
    pub fn init(&self) -> EffectsReport {
        let mut report = EffectsReport::default();
        let failed = &mut report.failed;

        report.navbar = settle("navbar", failed, self.setup_navbar_scroll());
        report.skill_bars = settle("skills", failed, self.setup_skill_animations());
        let (tilt, lift) = settle("hover", failed, self.setup_hover_effects());
        report.tilt_cards = tilt;
        report.lift_items = lift;
        report.reveal_elements = settle("reveal", failed, self.setup_scroll_reveal());
        report.certificate_modals = settle("modals", failed, self.setup_certificate_modals());
        report.form_fields = settle("contact", failed, self.setup_contact_form());

        report
    }

    pub fn setup_navbar_scroll(&self) -> EffectsResult<bool> {
        navbar::setup_navbar_scroll(&self.dom, &self.config.navbar)
    }

    pub fn setup_skill_animations(&self) -> EffectsResult<usize> {
        skills::setup_skill_animations(&self.dom, &self.config.skills)
    }

    /// Returns `(tilt cards, lift items)` wired.
    pub fn setup_hover_effects(&self) -> EffectsResult<(usize, usize)> {
        let tilt = hover::setup_tilt(&self.dom, &self.config.hover)?;
        let lift = hover::setup_lift(&self.dom, &self.config.hover)?;
        Ok((tilt, lift))
    }

    pub fn setup_scroll_reveal(&self) -> EffectsResult<usize> {
        reveal::setup_scroll_reveal(&self.dom, &self.config.reveal)
    }

    pub fn setup_certificate_modals(&self) -> EffectsResult<usize> {
        modal::setup_certificate_modals(&self.dom, &self.config.modal)
    }

    pub fn setup_contact_form(&self) -> EffectsResult<usize> {
        contact::setup_contact_form(&self.dom, &self.config.contact)
    }

    pub fn setup_ripple_effects(&self) -> EffectsResult<usize> {
        ripple::setup_ripple_effects(&self.dom, &self.config.ripple)
    }
}

fn settle<T: Default>(
    routine: &'static str,
    failed: &mut Vec<&'static str>,
    result: EffectsResult<T>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(routine, error = %e, "effect setup failed, routine disabled");
            failed.push(routine);
            T::default()
        }
    }
}

/// Initialize the third-party reveal library when the page loaded it and
/// nobody initialized it yet. Returns whether it was initialized here.
pub fn init_reveal_library<D: Dom>(dom: &D) -> EffectsResult<bool> {
    match dom.reveal_library() {
        RevealLibrary::Pending => {
            dom.init_reveal_library()?;
            debug!("reveal library initialized");
            Ok(true)
        }
        RevealLibrary::Absent | RevealLibrary::Initialized => Ok(false),
    }
}

/// Everything wired on a page.
pub struct Page<D: Dom> {
    pub effects: PortfolioEffects<D>,
    pub report: EffectsReport,
    /// `None` when the tooltip helper failed to set up
    pub tooltips: Option<Tooltips<D>>,
}

/// Wire the whole page: the six routines, ripple buttons, tooltips and the
/// third-party reveal library.
pub fn boot<D: Dom>(dom: Rc<D>, config: EffectsConfig) -> Page<D> {
    let effects = PortfolioEffects::new(Rc::clone(&dom), config);
    let mut report = effects.init();
    report.ripple_buttons = settle("ripple", &mut report.failed, effects.setup_ripple_effects());

    let tooltips = match init_tooltips(&dom, &effects.config().tooltip) {
        Ok(tooltips) => Some(tooltips),
        Err(e) => {
            warn!(error = %e, "tooltip setup failed");
            report.failed.push("tooltips");
            None
        }
    };

    if let Err(e) = init_reveal_library(&*dom) {
        warn!(error = %e, "reveal library init failed");
    }

    info!(
        navbar = report.navbar,
        skill_bars = report.skill_bars,
        tilt_cards = report.tilt_cards,
        lift_items = report.lift_items,
        reveal_elements = report.reveal_elements,
        certificate_modals = report.certificate_modals,
        form_fields = report.form_fields,
        ripple_buttons = report.ripple_buttons,
        tooltips = tooltips.as_ref().map_or(0, |t| t.len()),
        failed = report.failed.len(),
        "page effects wired"
    );

    Page {
        effects,
        report,
        tooltips,
    }
}
