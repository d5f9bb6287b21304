//! Label configuration
//!
//! Every recognised option with its default. Loadable from JSON (native
//! hosts) or from a JS object through `serde-wasm-bindgen`.

use serde::{Deserialize, Serialize};

use crate::label::category::EnabledTypes;
use crate::label::error::LabelResult;
use crate::label::style::{Color, FontDescriptor, LinkStyle, Rect, TextStyle};

/// Recognised label options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOptions {
    /// Active keyword categories. Default: mention, url, phone, address
    pub enabled_types: EnabledTypes,
    /// Colour of every tappable span. Default: blue
    pub link_color: Color,
    /// Underline tappable spans. Default: false
    pub has_underline: bool,
    /// Maximum visible lines, 0 = unlimited. Container only; never affects spans
    pub number_of_lines: usize,
    pub text: String,
    /// Base text colour. Default: black
    pub text_color: Color,
    pub font: FontDescriptor,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            enabled_types: EnabledTypes::default(),
            link_color: Color::BLUE,
            has_underline: false,
            number_of_lines: 0,
            text: String::new(),
            text_color: Color::BLACK,
            font: FontDescriptor::default(),
        }
    }
}

impl LabelOptions {
    pub fn from_json(json: &str) -> LabelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> LabelResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font: self.font.clone(),
            color: self.text_color,
        }
    }

    pub fn link_style(&self) -> LinkStyle {
        LinkStyle {
            color: self.link_color,
            underline: self.has_underline,
        }
    }

    /// A square one line of the base font high
    pub fn default_image_bounds(&self) -> Rect {
        Rect::square(self.font.line_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::category::KeywordCategory;

    #[test]
    fn test_defaults() {
        let options = LabelOptions::default();
        assert_eq!(options.link_color, Color::BLUE);
        assert!(!options.has_underline);
        assert_eq!(options.number_of_lines, 0);
        assert_eq!(options.enabled_types.len(), 4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = LabelOptions::from_json(
            r##"{"text":"hi @bob","link_color":"#FF0000","enabled_types":[{"type":"mention"}]}"##,
        )
        .unwrap();
        assert_eq!(options.text, "hi @bob");
        assert_eq!(options.link_color, Color::rgb(255, 0, 0));
        assert_eq!(options.text_color, Color::BLACK);
        assert!(options.enabled_types.contains(&KeywordCategory::Mention));
        assert!(!options.enabled_types.contains(&KeywordCategory::Url));
    }

    #[test]
    fn test_bad_color_is_config_error() {
        let err = LabelOptions::from_json(r#"{"link_color":"blue"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid label config"));
    }

    #[test]
    fn test_json_roundtrip_keeps_options() {
        let mut options = LabelOptions::default();
        options.enabled_types.insert(KeywordCategory::regex(r"#\w+"));
        options.has_underline = true;
        let back = LabelOptions::from_json(&options.to_json().unwrap()).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_default_image_bounds_follow_font() {
        let mut options = LabelOptions::default();
        options.font = FontDescriptor::new("Inter", 20.0);
        let bounds = options.default_image_bounds();
        assert!((bounds.width - 24.0).abs() < 1e-4);
        assert_eq!(bounds.width, bounds.height);
    }
}
