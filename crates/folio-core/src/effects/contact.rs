//! Contact form field feedback.
//!
//! Each field is re-validated on every input event and marked with exactly
//! one of the valid/invalid classes. Blur toggles the filled class from the
//! raw value, independent of validity. Nothing intercepts submission.

use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::config::ContactFormConfig;
use crate::dom::{set_class, Dom, DomEvent, EventKind, ListenTarget};
use crate::error::EffectsResult;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// `local@domain.tld` where no part holds `@` or whitespace. The class is
/// JavaScript's `\s`: Unicode White_Space plus U+FEFF, minus U+0085.
fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        let part = r"[^@\s\x{FEFF}--\x{85}]+";
        Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern is a valid regex")
    })
}

/// Whitespace as JavaScript's `String.prototype.trim` strips it.
pub fn is_js_space(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// How a field's value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any non-empty value
    Text,
    /// Non-empty and shaped like an address
    Email,
}

impl FieldKind {
    /// Kind from the element's `type` attribute. Textareas, untyped inputs
    /// and unknown types (including a padded `" email "`) are text.
    pub fn from_type_attr(input_type: Option<&str>) -> Self {
        match input_type {
            Some(t) if t.eq_ignore_ascii_case("email") => FieldKind::Email,
            _ => FieldKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValidity {
    Valid,
    Invalid,
}

impl FieldValidity {
    pub fn is_valid(self) -> bool {
        self == FieldValidity::Valid
    }
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Validate a raw field value. Surrounding whitespace, as [`is_js_space`]
/// defines it, is ignored.
pub fn validate_value(value: &str, kind: FieldKind) -> FieldValidity {
    let value = value.trim_matches(is_js_space);
    let ok = match kind {
        _ if value.is_empty() => false,
        FieldKind::Email => is_valid_email(value),
        FieldKind::Text => true,
    };
    if ok {
        FieldValidity::Valid
    } else {
        FieldValidity::Invalid
    }
}

/// Validate a field's current value and apply the matching class.
pub fn validate_field<D: Dom>(
    dom: &D,
    field: &D::Node,
    config: &ContactFormConfig,
) -> FieldValidity {
    let kind = FieldKind::from_type_attr(dom.attribute(field, "type").as_deref());
    let validity = validate_value(&dom.value(field), kind);

    let valid = validity.is_valid();
    set_class(dom, field, &config.valid_class, valid);
    set_class(dom, field, &config.invalid_class, !valid);
    validity
}

/// Wire the contact form fields. Returns the number of fields wired, zero
/// when the page has no contact form.
pub fn setup_contact_form<D: Dom>(dom: &Rc<D>, config: &ContactFormConfig) -> EffectsResult<usize> {
    let Some(form) = dom.element_by_id(&config.form_id) else {
        debug!(form_id = %config.form_id, "no contact form on page");
        return Ok(0);
    };

    let fields = dom.query_selector_within(&form, &config.field_selector)?;
    for field in &fields {
        let handle = Rc::clone(dom);
        let target = field.clone();
        let settings = config.clone();
        dom.listen(
            ListenTarget::Element(field.clone()),
            EventKind::Input,
            Box::new(move |_: &DomEvent| {
                validate_field(&*handle, &target, &settings);
            }),
        )?;

        let handle = Rc::clone(dom);
        let target = field.clone();
        let filled = config.filled_class.clone();
        dom.listen(
            ListenTarget::Element(field.clone()),
            EventKind::Blur,
            Box::new(move |_: &DomEvent| {
                let has_value = !handle.value(&target).is_empty();
                set_class(&*handle, &target, &filled, has_value);
            }),
        )?;
    }

    Ok(fields.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.io"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@@b.c"));
    }

    #[test]
    fn value_rules() {
        assert_eq!(validate_value("   ", FieldKind::Text), FieldValidity::Invalid);
        assert_eq!(validate_value(" hi ", FieldKind::Text), FieldValidity::Valid);
        assert_eq!(
            validate_value("  ada@example.com\n", FieldKind::Email),
            FieldValidity::Valid
        );
        assert_eq!(validate_value("", FieldKind::Email), FieldValidity::Invalid);
    }

    #[test]
    fn byte_order_mark_counts_as_whitespace() {
        assert_eq!(validate_value("\u{FEFF}", FieldKind::Text), FieldValidity::Invalid);
        assert_eq!(
            validate_value("a\u{FEFF}b@c.de", FieldKind::Email),
            FieldValidity::Invalid
        );
        assert_eq!(
            validate_value("\u{FEFF}ada@example.com\u{FEFF}", FieldKind::Email),
            FieldValidity::Valid
        );
    }

    #[test]
    fn next_line_is_not_whitespace() {
        assert!(!is_js_space('\u{85}'));
        assert!(is_js_space('\u{A0}'));
        assert!(is_js_space('\u{2028}'));
        assert_eq!(validate_value("\u{85}", FieldKind::Text), FieldValidity::Valid);
        assert!(is_valid_email("a\u{85}b@c.de"));
        assert!(!is_valid_email("a\u{A0}b@c.de"));
    }

    #[test]
    fn type_attribute_is_case_insensitive() {
        assert_eq!(FieldKind::from_type_attr(Some("EMAIL")), FieldKind::Email);
        assert_eq!(FieldKind::from_type_attr(Some("text")), FieldKind::Text);
        assert_eq!(FieldKind::from_type_attr(None), FieldKind::Text);
    }

    #[test]
    fn padded_type_attribute_is_text() {
        assert_eq!(FieldKind::from_type_attr(Some(" email ")), FieldKind::Text);
        assert_eq!(FieldKind::from_type_attr(Some("email\n")), FieldKind::Text);
    }

    #[test]
    fn classes_are_exclusive() {
        let dom = MemoryDom::parse(r#"<input type="email" id="mail">"#);
        let field = dom.element_by_id("mail").unwrap();
        let config = ContactFormConfig::default();

        dom.set_value(field, "nope");
        assert_eq!(validate_field(&dom, &field, &config), FieldValidity::Invalid);
        assert!(dom.has_class(&field, "invalid"));
        assert!(!dom.has_class(&field, "valid"));

        dom.set_value(field, "ada@example.com");
        assert_eq!(validate_field(&dom, &field, &config), FieldValidity::Valid);
        assert!(dom.has_class(&field, "valid"));
        assert!(!dom.has_class(&field, "invalid"));
    }
}
