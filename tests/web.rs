//! Browser smoke tests for `WebDom`.
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use folio::WebDom;
use folio_core::config::{ContactFormConfig, NavbarConfig, RippleConfig};
use folio_core::effects::navbar::setup_navbar_scroll;
use folio_core::effects::ripple::ensure_ripple_styles;
use folio_core::effects::validate_field;
use folio_core::{Dom, RevealLibrary};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount(dom: &WebDom, markup: &str) -> web_sys::Element {
    let host = dom.create_element("div").unwrap();
    host.set_inner_html(markup);
    dom.append_child(&dom.body().unwrap(), &host).unwrap();
    host
}

#[wasm_bindgen_test]
fn classes_styles_and_attributes() {
    let dom = WebDom::new().unwrap();
    let host = mount(&dom, r#"<div id="sample" style="width: 40%"></div>"#);
    let sample = dom.element_by_id("sample").unwrap();

    dom.add_class(&sample, "valid");
    assert!(dom.has_class(&sample, "valid"));
    dom.remove_class(&sample, "valid");
    assert!(!dom.has_class(&sample, "valid"));

    assert_eq!(dom.style(&sample, "width").as_deref(), Some("40%"));
    dom.set_style(&sample, "opacity", "0").unwrap();
    assert_eq!(dom.style(&sample, "opacity").as_deref(), Some("0"));

    dom.set_attribute(&sample, "data-width", "80").unwrap();
    assert_eq!(dom.attribute(&sample, "data-width").as_deref(), Some("80"));

    dom.remove(&host);
    assert!(dom.element_by_id("sample").is_none());
}

#[wasm_bindgen_test]
fn navbar_is_wired_when_present() {
    let dom = Rc::new(WebDom::new().unwrap());
    let host = mount(&dom, r#"<nav class="navbar"></nav>"#);
    assert!(setup_navbar_scroll(&dom, &NavbarConfig::default()).unwrap());
    dom.remove(&host);
}

#[wasm_bindgen_test]
fn email_field_is_validated() {
    let dom = WebDom::new().unwrap();
    let host = mount(&dom, r#"<input type="email" id="mail" value="ada@example.com">"#);
    let field = dom.element_by_id("mail").unwrap();

    assert!(validate_field(&dom, &field, &ContactFormConfig::default()).is_valid());
    assert!(dom.has_class(&field, "valid"));
    dom.remove(&host);
}

#[wasm_bindgen_test]
fn ripple_styles_land_in_head() {
    let dom = WebDom::new().unwrap();
    ensure_ripple_styles(&dom, &RippleConfig::default()).unwrap();
    let style = dom.element_by_id("ripple-styles").unwrap();
    assert_eq!(dom.head(), style.parent_element());
}

#[wasm_bindgen_test]
fn reveal_library_absent_by_default() {
    let dom = WebDom::new().unwrap();
    assert_eq!(dom.reveal_library(), RevealLibrary::Absent);
    assert!(dom.init_reveal_library().is_err());
}
