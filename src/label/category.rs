//! Keyword categories and the ordered set of enabled ones
//!
//! The evaluation order lives here and nowhere else: built-ins first in
//! fixed order (mention, url, phone, address), then every emoticon/regex
//! entry in insertion order. Later categories overwrite earlier ones where
//! their spans overlap, so this order is observable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::label::style::Rect;

// =============================================================================
// Link categories (tappable)
// =============================================================================

/// Category carried by a tappable span
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    Mention,
    Url,
    Phone,
    Address,
    Regex,
}

impl LinkCategory {
    pub const ALL: [LinkCategory; 5] = [
        LinkCategory::Mention,
        LinkCategory::Url,
        LinkCategory::Phone,
        LinkCategory::Address,
        LinkCategory::Regex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkCategory::Mention => "mention",
            LinkCategory::Url => "url",
            LinkCategory::Phone => "phone",
            LinkCategory::Address => "address",
            LinkCategory::Regex => "regex",
        }
    }

    /// Stable prefix of the tagged identifier on the URI channel
    pub fn uri_prefix(&self) -> &'static str {
        match self {
            LinkCategory::Mention => "label-mention:",
            LinkCategory::Url => "label-url:",
            LinkCategory::Phone => "label-phone:",
            LinkCategory::Address => "label-address:",
            LinkCategory::Regex => "label-regex:",
        }
    }

    /// Whether the payload is percent-encoded on the URI channel.
    /// Url and phone payloads travel verbatim.
    pub fn percent_encoded(&self) -> bool {
        matches!(self, LinkCategory::Mention | LinkCategory::Address | LinkCategory::Regex)
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Emoticons
// =============================================================================

/// Maps a matched emoticon code (e.g. `[smile]`) to an image name
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageNamer {
    /// Use the matched code as the image name
    #[default]
    Verbatim,
    /// Replace every `{}` in the template with the matched code
    Template(String),
    /// Arbitrary function (native callers only)
    #[serde(skip)]
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl ImageNamer {
    pub fn custom(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        ImageNamer::Custom(Arc::new(f))
    }

    pub fn resolve(&self, code: &str) -> String {
        match self {
            ImageNamer::Verbatim => code.to_string(),
            ImageNamer::Template(t) => t.replace("{}", code),
            ImageNamer::Custom(f) => f(code),
        }
    }
}

impl fmt::Debug for ImageNamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageNamer::Verbatim => f.write_str("Verbatim"),
            ImageNamer::Template(t) => f.debug_tuple("Template").field(t).finish(),
            ImageNamer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for ImageNamer {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ImageNamer::Verbatim, ImageNamer::Verbatim) => true,
            (ImageNamer::Template(a), ImageNamer::Template(b)) => a == b,
            (ImageNamer::Custom(a), ImageNamer::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Emoticon category parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmoticonSpec {
    /// Pattern for emoticon codes; `None` uses the bracketed-code default
    pub pattern: Option<String>,
    /// Image bounds; `None` uses a line-height square of the base font
    pub bounds: Option<Rect>,
    pub image_name: ImageNamer,
}

// =============================================================================
// KeywordCategory
// =============================================================================

/// One kind of keyword the label recognises
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeywordCategory {
    Mention,
    Url,
    Phone,
    Address,
    Emoticon(EmoticonSpec),
    Regex { pattern: String },
}

impl KeywordCategory {
    /// Built-in categories, in their fixed evaluation order
    pub const BUILTIN: [KeywordCategory; 4] = [
        KeywordCategory::Mention,
        KeywordCategory::Url,
        KeywordCategory::Phone,
        KeywordCategory::Address,
    ];

    pub fn regex(pattern: impl Into<String>) -> Self {
        KeywordCategory::Regex { pattern: pattern.into() }
    }

    pub fn emoticon(spec: EmoticonSpec) -> Self {
        KeywordCategory::Emoticon(spec)
    }

    pub fn is_builtin(&self) -> bool {
        matches!(
            self,
            KeywordCategory::Mention | KeywordCategory::Url | KeywordCategory::Phone | KeywordCategory::Address
        )
    }

    /// Category of the link produced by this keyword kind; emoticons are not links
    pub fn link_category(&self) -> Option<LinkCategory> {
        match self {
            KeywordCategory::Mention => Some(LinkCategory::Mention),
            KeywordCategory::Url => Some(LinkCategory::Url),
            KeywordCategory::Phone => Some(LinkCategory::Phone),
            KeywordCategory::Address => Some(LinkCategory::Address),
            KeywordCategory::Regex { .. } => Some(LinkCategory::Regex),
            KeywordCategory::Emoticon(_) => None,
        }
    }
}

// =============================================================================
// EnabledTypes
// =============================================================================

/// Ordered set of active categories. Duplicates are ignored, first insertion wins.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "Vec<KeywordCategory>", into = "Vec<KeywordCategory>")]
pub struct EnabledTypes {
    types: Vec<KeywordCategory>,
}

impl EnabledTypes {
    pub fn empty() -> Self {
        Self { types: Vec::new() }
    }

    /// Add a category; returns false if it was already present
    pub fn insert(&mut self, category: KeywordCategory) -> bool {
        if self.types.contains(&category) {
            return false;
        }
        self.types.push(category);
        true
    }

    pub fn contains(&self, category: &KeywordCategory) -> bool {
        self.types.contains(category)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Categories in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &KeywordCategory> {
        self.types.iter()
    }

    /// Categories in the order their spans are applied.
    ///
    /// Enabled built-ins come first in `BUILTIN` order regardless of where
    /// they were inserted, then emoticon/regex entries in insertion order.
    pub fn evaluation_order(&self) -> Vec<&KeywordCategory> {
        let builtins = KeywordCategory::BUILTIN
            .iter()
            .filter_map(|b| self.types.iter().find(|t| *t == b));
        let custom = self.types.iter().filter(|t| !t.is_builtin());
        builtins.chain(custom).collect()
    }
}

impl Default for EnabledTypes {
    fn default() -> Self {
        KeywordCategory::BUILTIN.into_iter().collect()
    }
}

impl FromIterator<KeywordCategory> for EnabledTypes {
    fn from_iter<I: IntoIterator<Item = KeywordCategory>>(iter: I) -> Self {
        let mut set = EnabledTypes::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

impl From<Vec<KeywordCategory>> for EnabledTypes {
    fn from(types: Vec<KeywordCategory>) -> Self {
        types.into_iter().collect()
    }
}

impl From<EnabledTypes> for Vec<KeywordCategory> {
    fn from(set: EnabledTypes) -> Self {
        set.types
    }
}
