//! Browser tests for the LinkLabel binding
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Function};
use linklabel::WasmLabel;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_default_label_links_mentions() {
    let label = WasmLabel::new(JsValue::UNDEFINED).unwrap();
    let initial = label.revision();

    assert!(label.set_text("hi @alice").unwrap());
    assert!(!label.set_text("hi @alice").unwrap());
    assert_eq!(label.display_text(), "hi @alice");
    assert_eq!(label.revision(), initial + 1.0);
}

#[wasm_bindgen_test]
fn test_tap_calls_js_handler_with_payload() {
    let label = WasmLabel::new(JsValue::UNDEFINED).unwrap();
    let seen = Array::new();
    let push = Function::new_with_args("name", "this.push(name)").bind(&seen);
    label.on_mention(push);
    label.set_text("hi @alice").unwrap();

    label.tap(Some(5));
    label.tap(Some(0));

    assert_eq!(seen.length(), 1);
    assert_eq!(seen.get(0).as_string().as_deref(), Some("alice"));
}

#[wasm_bindgen_test]
fn test_utf16_offsets_after_astral_chars() {
    let label = WasmLabel::new(JsValue::UNDEFINED).unwrap();
    let seen = Array::new();
    label.on_mention(Function::new_with_args("name", "this.push(name)").bind(&seen));
    // the emoji is two UTF-16 units and four bytes
    label.set_text("😀 @bob").unwrap();

    label.tap(Some(3));
    assert_eq!(seen.get(0).as_string().as_deref(), Some("bob"));
}

#[wasm_bindgen_test]
fn test_invalid_color_rejected() {
    let label = WasmLabel::new(JsValue::UNDEFINED).unwrap();
    assert!(label.set_link_color("not-a-colour").is_err());
    assert!(label.set_link_color("#336699").is_ok());
}

#[wasm_bindgen_test]
fn test_selection_collapsed() {
    let label = WasmLabel::new(JsValue::UNDEFINED).unwrap();
    assert_eq!(label.selection_changed(1, 4), Some(vec![0, 0]));
    assert_eq!(label.selection_changed(0, 0), None);
}

#[wasm_bindgen_test]
fn test_log_level_parsed() {
    assert!(linklabel::set_log_level("debug").is_ok());
    assert!(linklabel::set_log_level("loud").is_err());
    assert!(linklabel::set_log_level("warn").is_ok());
}
