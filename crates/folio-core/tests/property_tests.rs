//! Property-based tests for the pure effect rules
//!
//! Uses proptest to check the navbar threshold, the tilt geometry and the
//! contact field validation over generated inputs, both directly and
//! through a `MemoryDom` page where the rule has visible effects.

use std::rc::Rc;

use folio_core::config::{ContactFormConfig, HoverConfig, NavbarConfig};
use folio_core::effects::contact::setup_contact_form;
use folio_core::effects::hover::{neutral_transform, setup_tilt};
use folio_core::effects::navbar::{is_scrolled, setup_navbar_scroll};
use folio_core::effects::{tilt_angles, validate_value, FieldKind, FieldValidity};
use folio_core::{Dom, DomEvent, EventKind, MemoryDom, Rect};
use proptest::prelude::*;

// ============================================================================
// Strategy Generators
// ============================================================================

/// Element bounds with a usable area somewhere in a large viewport
fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0.0..2000.0f64, 0.0..2000.0f64, 1.0..800.0f64, 1.0..800.0f64)
        .prop_map(|(left, top, width, height)| Rect::new(left, top, width, height))
}

/// Well-formed addresses: local part, domain, dotted suffix
fn email_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9._+-]{1,20}@[a-z0-9-]{1,20}\\.[a-z]{2,6}")
        .expect("valid regex")
}

/// Arbitrary short field input, including `@`, ASCII and Unicode spaces,
/// the byte order mark and U+0085 (which JavaScript does not treat as space)
fn field_input_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ a-z@.\\t\\n\\x{A0}\\x{85}\\x{FEFF}\\x{2028}]{0,30}")
        .expect("valid regex")
}

// ============================================================================
// Reference Rules
// ============================================================================

/// Every character JavaScript's `trim` strips and its `\s` matches
const JS_SPACE: &[char] = &[
    '\t', '\n', '\u{B}', '\u{C}', '\r', ' ', '\u{A0}', '\u{1680}', '\u{2000}', '\u{2001}',
    '\u{2002}', '\u{2003}', '\u{2004}', '\u{2005}', '\u{2006}', '\u{2007}', '\u{2008}',
    '\u{2009}', '\u{200A}', '\u{2028}', '\u{2029}', '\u{202F}', '\u{205F}', '\u{3000}',
    '\u{FEFF}',
];

fn js_trim(value: &str) -> &str {
    value.trim_matches(|c: char| JS_SPACE.contains(&c))
}

/// `local@domain.tld` shape checked by hand: one `@`, a non-empty local
/// part, a dot with text on both sides in the domain, no whitespace
fn email_shape(value: &str) -> bool {
    if value.chars().any(|c| JS_SPACE.contains(&c)) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

// ============================================================================
// Navbar
// ============================================================================

proptest! {
    /// The scrolled state is exactly "offset above the threshold"
    #[test]
    fn scrolled_iff_above_threshold(y in -500.0..5000.0f64) {
        prop_assert_eq!(is_scrolled(y, 100.0), y > 100.0);
    }

    /// Whatever the scroll history, the class reflects only the last offset
    #[test]
    fn navbar_class_follows_last_scroll(offsets in prop::collection::vec(0.0..400.0f64, 1..20)) {
        let dom = Rc::new(MemoryDom::parse(r#"<nav class="navbar"></nav>"#));
        setup_navbar_scroll(&dom, &NavbarConfig::default()).unwrap();
        let nav = dom.query_selector(".navbar").unwrap().unwrap();

        for &y in &offsets {
            dom.scroll_to(y);
        }
        let last = offsets[offsets.len() - 1];
        prop_assert_eq!(dom.has_class(&nav, "scrolled"), last > 100.0);
    }
}

// ============================================================================
// Tilt
// ============================================================================

proptest! {
    /// A pointer at the exact center produces no rotation
    #[test]
    fn center_pointer_has_no_tilt(rect in rect_strategy()) {
        let event = DomEvent::at(rect.left + rect.width / 2.0, rect.top + rect.height / 2.0);
        let angles = tilt_angles(rect, &event, 25.0);
        prop_assert!(angles.rotate_x.abs() < 1e-9);
        prop_assert!(angles.rotate_y.abs() < 1e-9);
    }

    /// The top-left quadrant tilts with positive X and negative Y rotation
    #[test]
    fn top_left_quadrant_signs(
        rect in rect_strategy(),
        fx in 0.0..0.49f64,
        fy in 0.0..0.49f64,
    ) {
        let event = DomEvent::at(rect.left + rect.width * fx, rect.top + rect.height * fy);
        let angles = tilt_angles(rect, &event, 25.0);
        prop_assert!(angles.rotate_x > 0.0);
        prop_assert!(angles.rotate_y < 0.0);
    }

    /// Leaving always restores the neutral transform, whatever came before
    #[test]
    fn leave_resets_tilt(
        rect in rect_strategy(),
        moves in prop::collection::vec((0.0..2800.0f64, 0.0..2800.0f64), 0..10),
    ) {
        let dom = Rc::new(MemoryDom::parse(r#"<div class="hover-grow" id="card"></div>"#));
        let config = HoverConfig::default();
        setup_tilt(&dom, &config).unwrap();
        let card = dom.element_by_id("card").unwrap();
        dom.set_rect(card, rect);

        for (x, y) in moves {
            dom.fire_at(card, EventKind::MouseMove, x, y);
        }
        dom.fire(card, EventKind::MouseLeave);

        let expected = neutral_transform(&config);
        prop_assert_eq!(dom.style(&card, "transform"), Some(expected));
    }
}

// ============================================================================
// Contact validation
// ============================================================================

proptest! {
    /// Generated addresses are valid, with or without surrounding whitespace
    #[test]
    fn wellformed_emails_are_valid(email in email_strategy(), pad in "[ \\t\\x{FEFF}]{0,3}") {
        let padded = format!("{}{}{}", pad, email, pad);
        prop_assert_eq!(validate_value(&padded, FieldKind::Email), FieldValidity::Valid);
    }

    /// Email validity is exactly: trimmed value shaped like an address
    #[test]
    fn email_rule(input in field_input_strategy()) {
        let expected = email_shape(js_trim(&input));
        prop_assert_eq!(validate_value(&input, FieldKind::Email).is_valid(), expected);
    }

    /// Text validity is exactly: trimmed value non-empty
    #[test]
    fn text_rule(input in field_input_strategy()) {
        prop_assert_eq!(
            validate_value(&input, FieldKind::Text).is_valid(),
            !js_trim(&input).is_empty()
        );
    }

    /// On a live form, every field carries exactly one validity class
    #[test]
    fn fields_carry_one_validity_class(
        inputs in prop::collection::vec(field_input_strategy(), 1..10),
    ) {
        let dom = Rc::new(MemoryDom::parse(
            r#"<form id="contact-form"><input type="email" id="email"></form>"#,
        ));
        setup_contact_form(&dom, &ContactFormConfig::default()).unwrap();
        let email = dom.element_by_id("email").unwrap();

        for input in &inputs {
            dom.type_into(email, input);
            let valid = dom.has_class(&email, "valid");
            let invalid = dom.has_class(&email, "invalid");
            prop_assert!(valid != invalid);
            prop_assert_eq!(valid, validate_value(input, FieldKind::Email).is_valid());
        }
    }
}
