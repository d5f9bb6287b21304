//! LinkLabel: tappable keyword labels
//!
//! A Rust/WASM engine that finds mentions, URLs, phone numbers, addresses,
//! emoticons and custom patterns in a string, turns them into styled runs,
//! and routes taps on those runs to per-category handlers.
//!
//! # Architecture
//!
//! ## Annotation pipeline
//! - `patterns.rs` - PatternLibrary: per-category regex scanning
//! - `encoder.rs` - MatchEncoder: matches to link / inline-image spans
//! - `styled.rs` - AnnotatedTextBuilder: spans to styled runs (last applied wins)
//! - `pipeline.rs` - `configure`: options in, `StyledText` out
//!
//! ## Label
//! - `core.rs` - Label: rebuild gating, handlers, gesture dispatch
//! - `change.rs` - ChangeDetector: skip rebuilds on identical text
//! - `interaction.rs` - InteractionResolver + TapHandlers
//! - `layout.rs` - TextLayout: host layout seam, intrinsic size
//! - `options.rs` - LabelOptions: serde configuration
//! - `console.rs` - tracing events to the browser console (`console_log` feature)
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { LinkLabel } from 'linklabel';
//!
//! await init();
//!
//! const label = new LinkLabel({ link_color: '#0066cc', has_underline: true });
//! label.onMention(name => openProfile(name));
//! label.onTap(() => console.log('plain tap'));
//! label.setText('ping @alice or visit www.example.com');
//!
//! // Offsets are UTF-16 indices into label.displayText()
//! label.tap(6);              // -> onMention('alice')
//! label.longPress(6, true);  // -> onLongPress()
//! console.log(label.runs());
//! ```

pub mod label;

pub use label::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook and console logging for the browser
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    label::console::init();
}

/// Set the most verbose level sent to the browser console
/// ("error", "warn", "info", "debug" or "trace"; default "warn")
#[cfg(feature = "console_log")]
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level: tracing::Level = level
        .parse()
        .map_err(|_| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    label::console::set_max_level(level);
    Ok(())
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("linklabel v{}", env!("CARGO_PKG_VERSION"))
}
