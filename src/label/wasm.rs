//! JS bindings for `Label`
//!
//! Every method takes `&self` and keeps its `RefCell` borrows short, so a
//! JS handler is free to call back into the label (e.g. `setText` from an
//! `onMention` callback). Handlers are resolved first, called last.

use js_sys::Function;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use crate::label::category::EnabledTypes;
use crate::label::core::Label;
use crate::label::interaction::{DispatchOutcome, Gesture, GestureState, HandlerGroup, InteractionResolver};
use crate::label::options::LabelOptions;
use crate::label::style::{Color, FontDescriptor};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(js_name = LinkLabel)]
pub struct WasmLabel {
    label: RefCell<Label>,
    handlers: RefCell<HashMap<HandlerGroup, Function>>,
    resolver: InteractionResolver,
}

#[wasm_bindgen(js_class = LinkLabel)]
impl WasmLabel {
    /// `options` is a plain object matching `LabelOptions`; omit for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<WasmLabel, JsValue> {
        let options: LabelOptions = if options.is_undefined() || options.is_null() {
            LabelOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(|e| js_err(format!("Failed to parse options: {}", e)))?
        };
        let label = Label::with_options(options).map_err(js_err)?;
        Ok(WasmLabel {
            label: RefCell::new(label),
            handlers: RefCell::new(HashMap::new()),
            resolver: InteractionResolver::new(),
        })
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Returns true when the text changed and the label was rebuilt
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&self, text: &str) -> Result<bool, JsValue> {
        self.label.borrow_mut().set_text(text).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setEnabledTypes)]
    pub fn set_enabled_types(&self, types: JsValue) -> Result<(), JsValue> {
        let types: EnabledTypes = serde_wasm_bindgen::from_value(types)
            .map_err(|e| js_err(format!("Failed to parse enabled types: {}", e)))?;
        self.label.borrow_mut().set_enabled_types(types).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setLinkColor)]
    pub fn set_link_color(&self, hex: &str) -> Result<(), JsValue> {
        let color = Color::from_hex(hex).map_err(js_err)?;
        self.label.borrow_mut().set_link_color(color);
        Ok(())
    }

    #[wasm_bindgen(js_name = setUnderline)]
    pub fn set_underline(&self, underline: bool) {
        self.label.borrow_mut().set_underline(underline);
    }

    #[wasm_bindgen(js_name = setTextColor)]
    pub fn set_text_color(&self, hex: &str) -> Result<(), JsValue> {
        let color = Color::from_hex(hex).map_err(js_err)?;
        self.label.borrow_mut().set_text_color(color);
        Ok(())
    }

    #[wasm_bindgen(js_name = setFont)]
    pub fn set_font(&self, family: &str, size: f32, line_height: Option<f32>) {
        let mut font = FontDescriptor::new(family, size);
        if let Some(h) = line_height {
            font.line_height = h;
        }
        self.label.borrow_mut().set_font(font);
    }

    #[wasm_bindgen(js_name = setNumberOfLines)]
    pub fn set_number_of_lines(&self, lines: u32) {
        self.label.borrow_mut().set_number_of_lines(lines as usize);
    }

    // ========================================================================
    // Handlers (last registration wins)
    // ========================================================================

    #[wasm_bindgen(js_name = onMention)]
    pub fn on_mention(&self, f: Function) {
        self.register(HandlerGroup::Mention, f);
    }

    #[wasm_bindgen(js_name = onUrl)]
    pub fn on_url(&self, f: Function) {
        self.register(HandlerGroup::Url, f);
    }

    #[wasm_bindgen(js_name = onPhone)]
    pub fn on_phone(&self, f: Function) {
        self.register(HandlerGroup::Phone, f);
    }

    #[wasm_bindgen(js_name = onAddress)]
    pub fn on_address(&self, f: Function) {
        self.register(HandlerGroup::Address, f);
    }

    #[wasm_bindgen(js_name = onRegex)]
    pub fn on_regex(&self, f: Function) {
        self.register(HandlerGroup::Regex, f);
    }

    #[wasm_bindgen(js_name = onLongPress)]
    pub fn on_long_press(&self, f: Function) {
        self.register(HandlerGroup::LongPress, f);
    }

    #[wasm_bindgen(js_name = onTap)]
    pub fn on_tap(&self, f: Function) {
        self.register(HandlerGroup::Tap, f);
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    /// Tap at a UTF-16 offset into `displayText()` (omit when the tap missed the text)
    #[wasm_bindgen]
    pub fn tap(&self, utf16_offset: Option<u32>) -> JsValue {
        self.gesture(Gesture::Tap, utf16_offset)
    }

    /// Long-press; `began` is true only for a recognizer in its began state
    #[wasm_bindgen(js_name = longPress)]
    pub fn long_press(&self, utf16_offset: Option<u32>, began: bool) -> JsValue {
        let state = if began { GestureState::Began } else { GestureState::Changed };
        self.gesture(Gesture::LongPress(state), utf16_offset)
    }

    /// Range the host selection must be reset to, or undefined
    #[wasm_bindgen(js_name = selectionChanged)]
    pub fn selection_changed(&self, start: u32, end: u32) -> Option<Vec<u32>> {
        self.label
            .borrow()
            .selection_changed(start as usize..end as usize)
            .map(|r| vec![r.start as u32, r.end as u32])
    }

    // ========================================================================
    // Artifact
    // ========================================================================

    #[wasm_bindgen(js_name = displayText)]
    pub fn display_text(&self) -> String {
        self.label.borrow().styled_text().text().to_string()
    }

    #[wasm_bindgen]
    pub fn runs(&self) -> JsValue {
        let label = self.label.borrow();
        match serde_wasm_bindgen::to_value(label.styled_text().runs()) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::error_1(&format!("[LinkLabel] Serialization failed: {:?}", e).into());
                JsValue::NULL
            }
        }
    }

    #[wasm_bindgen]
    pub fn revision(&self) -> f64 {
        self.label.borrow().revision() as f64
    }

    #[wasm_bindgen(js_name = numberOfLines)]
    pub fn number_of_lines(&self) -> u32 {
        self.label.borrow().options().number_of_lines as u32
    }
}

impl WasmLabel {
    fn register(&self, group: HandlerGroup, f: Function) {
        self.handlers.borrow_mut().insert(group, f);
    }

    fn gesture(&self, gesture: Gesture, utf16_offset: Option<u32>) -> JsValue {
        let outcome = {
            let label = self.label.borrow();
            let styled = label.styled_text();
            let position = utf16_offset.and_then(|o| styled.byte_offset_from_utf16(o as usize));
            self.resolver.resolve(gesture, position, styled)
        };

        let handler = self.handlers.borrow().get(&outcome.group()).cloned();
        if let Some(f) = handler {
            let result = match &outcome {
                DispatchOutcome::Keyword(target) => f.call1(&JsValue::NULL, &JsValue::from_str(&target.payload)),
                DispatchOutcome::LongPress | DispatchOutcome::Tap => f.call0(&JsValue::NULL),
            };
            if let Err(e) = result {
                web_sys::console::error_1(&format!("[LinkLabel] Handler threw: {:?}", e).into());
            }
        }

        serde_wasm_bindgen::to_value(&outcome).unwrap_or(JsValue::NULL)
    }
}
