//! Label: reactive wrapper around the annotation pipeline
//!
//! # Design Principles
//! 1. The pipeline (`configure_with`) stays a pure transform; `Label` only
//!    decides *when* to run it.
//! 2. `set_text` rebuilds only when the text actually changes.
//! 3. Style and category changes always rebuild; line limits never do.
//! 4. A failed rebuild leaves the previous options and `StyledText` in place.
//!
//! # Usage
//! ```rust
//! use linklabel::{Gesture, Label};
//!
//! let mut label = Label::new();
//! label.on_mention(|name| println!("tapped {name}"));
//! label.set_text("hi @alice").unwrap();
//! label.handle_gesture(Gesture::Tap, Some(4));
//! ```

use std::ops::Range;

use crate::label::category::{EnabledTypes, LinkCategory};
use crate::label::change::ChangeDetector;
use crate::label::error::LabelResult;
use crate::label::interaction::{suppress_selection, DispatchOutcome, Gesture, InteractionResolver, TapHandlers};
use crate::label::layout::{intrinsic_content_size, TextLayout};
use crate::label::options::LabelOptions;
use crate::label::patterns::PatternLibrary;
use crate::label::pipeline::configure_with;
use crate::label::style::{Color, FontDescriptor, Point, Size};
use crate::label::styled::StyledText;

/// Tappable keyword label
pub struct Label {
    options: LabelOptions,
    library: PatternLibrary,
    change_detector: ChangeDetector,
    styled: StyledText,
    handlers: TapHandlers,
    resolver: InteractionResolver,
    revision: u64,
}

impl Default for Label {
    fn default() -> Self {
        Self::new()
    }
}

impl Label {
    /// Empty label with default options
    pub fn new() -> Self {
        let mut change_detector = ChangeDetector::new();
        change_detector.has_changed("");
        Self {
            options: LabelOptions::default(),
            library: PatternLibrary::new(),
            change_detector,
            styled: StyledText::default(),
            handlers: TapHandlers::new(),
            resolver: InteractionResolver::new(),
            revision: 0,
        }
    }

    /// Label built from `options`; invalid custom patterns are reported here
    pub fn with_options(options: LabelOptions) -> LabelResult<Self> {
        let mut label = Self::new();
        label.change_detector.has_changed(&options.text);
        label.commit(options)?;
        Ok(label)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn options(&self) -> &LabelOptions {
        &self.options
    }

    pub fn text(&self) -> &str {
        &self.options.text
    }

    /// Current artifact; replaced wholesale on every rebuild
    pub fn styled_text(&self) -> &StyledText {
        &self.styled
    }

    /// Number of rebuilds so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn change_detector(&self) -> &ChangeDetector {
        &self.change_detector
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Set the text. Returns whether a rebuild happened.
    pub fn set_text(&mut self, text: impl Into<String>) -> LabelResult<bool> {
        let text = text.into();
        if !self.change_detector.has_changed(&text) {
            tracing::debug!("text unchanged, skipping rebuild");
            return Ok(false);
        }
        let mut options = self.options.clone();
        options.text = text;
        if let Err(e) = self.commit(options) {
            // next set_text with the same value must retry
            self.change_detector.forget();
            return Err(e);
        }
        Ok(true)
    }

    /// Replace the active categories; invalid custom patterns are rejected
    pub fn set_enabled_types(&mut self, enabled: EnabledTypes) -> LabelResult<()> {
        let mut options = self.options.clone();
        options.enabled_types = enabled;
        self.commit(options)
    }

    pub fn set_link_color(&mut self, color: Color) {
        self.restyle(|o| o.link_color = color);
    }

    pub fn set_underline(&mut self, underline: bool) {
        self.restyle(|o| o.has_underline = underline);
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.restyle(|o| o.text_color = color);
    }

    pub fn set_font(&mut self, font: FontDescriptor) {
        self.restyle(|o| o.font = font);
    }

    /// Container constraint only; does not rebuild
    pub fn set_number_of_lines(&mut self, lines: usize) {
        self.options.number_of_lines = lines;
    }

    /// Apply a full option set (text gate included)
    pub fn configure(&mut self, options: LabelOptions) -> LabelResult<()> {
        self.change_detector.has_changed(&options.text);
        self.commit(options).inspect_err(|_| self.change_detector.forget())
    }

    fn restyle(&mut self, change: impl FnOnce(&mut LabelOptions)) {
        let mut options = self.options.clone();
        change(&mut options);
        if let Err(e) = self.commit(options) {
            tracing::warn!(error = %e, "restyle failed, keeping previous text");
        }
    }

    fn commit(&mut self, options: LabelOptions) -> LabelResult<()> {
        let styled = configure_with(&mut self.library, &options)?;
        self.options = options;
        self.styled = styled;
        self.revision += 1;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    pub fn on_mention(&mut self, handler: impl FnMut(&str) + 'static) {
        self.handlers.set_keyword(LinkCategory::Mention, handler);
    }

    pub fn on_url(&mut self, handler: impl FnMut(&str) + 'static) {
        self.handlers.set_keyword(LinkCategory::Url, handler);
    }

    pub fn on_phone(&mut self, handler: impl FnMut(&str) + 'static) {
        self.handlers.set_keyword(LinkCategory::Phone, handler);
    }

    pub fn on_address(&mut self, handler: impl FnMut(&str) + 'static) {
        self.handlers.set_keyword(LinkCategory::Address, handler);
    }

    pub fn on_regex(&mut self, handler: impl FnMut(&str) + 'static) {
        self.handlers.set_keyword(LinkCategory::Regex, handler);
    }

    pub fn on_long_press(&mut self, handler: impl FnMut() + 'static) {
        self.handlers.set_long_press(handler);
    }

    pub fn on_tap(&mut self, handler: impl FnMut() + 'static) {
        self.handlers.set_tap(handler);
    }

    // -------------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------------

    /// Resolve a gesture at a display position and run its handler
    pub fn handle_gesture(&mut self, gesture: Gesture, position: Option<usize>) -> DispatchOutcome {
        let outcome = self.resolver.resolve(gesture, position, &self.styled);
        self.handlers.dispatch(&outcome);
        outcome
    }

    /// Same as `handle_gesture`, asking the host layout where `point` lands
    pub fn handle_gesture_at<L: TextLayout + ?Sized>(&mut self, gesture: Gesture, point: Point, layout: &L) -> DispatchOutcome {
        let position = layout.closest_position(&self.styled, point);
        self.handle_gesture(gesture, position)
    }

    /// Host selection changed; returns the range to force it back to
    pub fn selection_changed(&self, selected: Range<usize>) -> Option<Range<usize>> {
        suppress_selection(selected)
    }

    /// Natural content size at `max_width`, honouring `number_of_lines`
    pub fn intrinsic_content_size<L: TextLayout + ?Sized>(&self, layout: &L, max_width: f32) -> Size {
        intrinsic_content_size(layout, &self.styled, max_width, self.options.number_of_lines)
    }
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Label")
            .field("options", &self.options)
            .field("revision", &self.revision)
            .field("handlers", &self.handlers)
            .finish()
    }
}
