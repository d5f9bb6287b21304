//! InteractionResolver: gesture + position -> handler
//!
//! # State machine
//! Idle → (tap / long-press at a resolved position) → Lookup → Dispatch → Idle
//!
//! Resolution is pure and returns a `DispatchOutcome`; invoking the handler
//! is a separate step so no borrow of the styled text is held while
//! caller code runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use crate::label::category::LinkCategory;
use crate::label::span::LinkTarget;
use crate::label::styled::StyledText;

// =============================================================================
// Gestures
// =============================================================================

/// Recognizer state reported by the host
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Tap,
    LongPress(GestureState),
}

impl Gesture {
    /// A long-press observed in its `Began` state
    pub fn is_confirmed_long_press(&self) -> bool {
        matches!(self, Gesture::LongPress(GestureState::Began))
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Handler slot; at most one handler per group
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HandlerGroup {
    Mention,
    Url,
    Phone,
    Address,
    Regex,
    LongPress,
    Tap,
}

impl From<LinkCategory> for HandlerGroup {
    fn from(category: LinkCategory) -> Self {
        match category {
            LinkCategory::Mention => HandlerGroup::Mention,
            LinkCategory::Url => HandlerGroup::Url,
            LinkCategory::Phone => HandlerGroup::Phone,
            LinkCategory::Address => HandlerGroup::Address,
            LinkCategory::Regex => HandlerGroup::Regex,
        }
    }
}

/// Where a gesture ends up
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// A tagged span was under the position
    Keyword(LinkTarget),
    /// Confirmed long-press, whatever is under the position
    LongPress,
    /// Nothing tappable under the position
    Tap,
}

impl DispatchOutcome {
    pub fn group(&self) -> HandlerGroup {
        match self {
            DispatchOutcome::Keyword(target) => target.category.into(),
            DispatchOutcome::LongPress => HandlerGroup::LongPress,
            DispatchOutcome::Tap => HandlerGroup::Tap,
        }
    }
}

/// Maps a gesture at a text position to a `DispatchOutcome`
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionResolver;

impl InteractionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a gesture. `position` is the display byte offset the host
    /// layout found under the touch, or `None` when the touch missed the text.
    pub fn resolve(&self, gesture: Gesture, position: Option<usize>, styled: &StyledText) -> DispatchOutcome {
        if gesture.is_confirmed_long_press() {
            return DispatchOutcome::LongPress;
        }

        let target = position
            .and_then(|pos| styled.snap_position(pos))
            .and_then(|pos| styled.link_at(pos));

        match target {
            Some(target) => DispatchOutcome::Keyword(target.clone()),
            None => DispatchOutcome::Tap,
        }
    }
}

// =============================================================================
// TapHandlers
// =============================================================================

pub type KeywordHandler = Box<dyn FnMut(&str)>;
pub type GestureHandler = Box<dyn FnMut()>;

/// Registered callbacks. Registering again for a group replaces the old handler.
#[derive(Default)]
pub struct TapHandlers {
    keyword: HashMap<LinkCategory, KeywordHandler>,
    long_press: Option<GestureHandler>,
    tap: Option<GestureHandler>,
}

impl TapHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_keyword(&mut self, category: LinkCategory, handler: impl FnMut(&str) + 'static) {
        self.keyword.insert(category, Box::new(handler));
    }

    pub fn set_long_press(&mut self, handler: impl FnMut() + 'static) {
        self.long_press = Some(Box::new(handler));
    }

    pub fn set_tap(&mut self, handler: impl FnMut() + 'static) {
        self.tap = Some(Box::new(handler));
    }

    pub fn is_registered(&self, group: HandlerGroup) -> bool {
        match group {
            HandlerGroup::LongPress => self.long_press.is_some(),
            HandlerGroup::Tap => self.tap.is_some(),
            HandlerGroup::Mention => self.keyword.contains_key(&LinkCategory::Mention),
            HandlerGroup::Url => self.keyword.contains_key(&LinkCategory::Url),
            HandlerGroup::Phone => self.keyword.contains_key(&LinkCategory::Phone),
            HandlerGroup::Address => self.keyword.contains_key(&LinkCategory::Address),
            HandlerGroup::Regex => self.keyword.contains_key(&LinkCategory::Regex),
        }
    }

    /// Invoke the handler for `outcome`. Returns false when none is registered.
    pub fn dispatch(&mut self, outcome: &DispatchOutcome) -> bool {
        let handled = match outcome {
            DispatchOutcome::Keyword(target) => match self.keyword.get_mut(&target.category) {
                Some(handler) => {
                    handler(&target.payload);
                    true
                }
                None => false,
            },
            DispatchOutcome::LongPress => self.long_press.as_mut().map(|h| h()).is_some(),
            DispatchOutcome::Tap => self.tap.as_mut().map(|h| h()).is_some(),
        };
        if !handled {
            tracing::debug!(group = ?outcome.group(), "no handler registered");
        }
        handled
    }
}

impl fmt::Debug for TapHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keyword: Vec<_> = self.keyword.keys().map(LinkCategory::as_str).collect();
        keyword.sort_unstable();
        f.debug_struct("TapHandlers")
            .field("keyword", &keyword)
            .field("long_press", &self.long_press.is_some())
            .field("tap", &self.tap.is_some())
            .finish()
    }
}

// =============================================================================
// Selection
// =============================================================================

/// The label never holds a selection. Returns the range the host must
/// reset its selection to, or `None` when it is already empty at the origin.
pub fn suppress_selection(selected: Range<usize>) -> Option<Range<usize>> {
    if selected == (0..0) {
        None
    } else {
        Some(0..0)
    }
}

// =============================================================================
// Tests
// =============================================================================
