//! Annotated spans and their tagged link targets
//!
//! A span either links to a `LinkTarget` or asks for an inline image. The
//! target is a typed `{category, payload}` value; the `file:///` URI form
//! exists only for hosts whose rich-text transport carries links as URLs.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::label::category::LinkCategory;
use crate::label::style::Rect;

/// Base of every tagged identifier on the URI channel
pub const URI_BASE: &str = "file:///";

// =============================================================================
// LinkTarget
// =============================================================================

/// Category plus decoded payload of a tappable span
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkTarget {
    pub category: LinkCategory,
    pub payload: String,
}

impl LinkTarget {
    pub fn new(category: LinkCategory, payload: impl Into<String>) -> Self {
        Self {
            category,
            payload: payload.into(),
        }
    }

    /// Tagged identifier, e.g. `file:///label-mention:alice`.
    ///
    /// Mention, address and regex payloads are percent-encoded; url and
    /// phone payloads are written verbatim.
    pub fn to_uri(&self) -> String {
        let payload = if self.category.percent_encoded() {
            urlencoding::encode(&self.payload)
        } else {
            self.payload.as_str().into()
        };
        format!("{}{}{}", URI_BASE, self.category.uri_prefix(), payload)
    }

    /// Decode a tagged identifier produced by `to_uri`.
    ///
    /// Returns `None` for foreign URIs and for payloads that do not
    /// percent-decode to UTF-8.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let tagged = uri.strip_prefix(URI_BASE)?;
        LinkCategory::ALL.iter().find_map(|category| {
            let rest = tagged.strip_prefix(category.uri_prefix())?;
            let payload = if category.percent_encoded() {
                urlencoding::decode(rest).ok()?.into_owned()
            } else {
                rest.to_string()
            };
            Some(LinkTarget::new(*category, payload))
        })
    }
}

// =============================================================================
// AnnotatedSpan
// =============================================================================

/// Non-empty, inside `text`, on char boundaries
pub(crate) fn range_fits(text: &str, range: &Range<usize>) -> bool {
    range.start < range.end
        && range.end <= text.len()
        && text.is_char_boundary(range.start)
        && text.is_char_boundary(range.end)
}

/// Inline image requested by an emoticon match
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InlineImage {
    pub name: String,
    pub bounds: Rect,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decoration {
    Link(LinkTarget),
    InlineImage(InlineImage),
}

/// A contiguous source range carrying a link or an image request
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnnotatedSpan {
    pub range: Range<usize>,
    pub decoration: Decoration,
}

impl AnnotatedSpan {
    pub fn link(range: Range<usize>, target: LinkTarget) -> Self {
        Self {
            range,
            decoration: Decoration::Link(target),
        }
    }

    pub fn image(range: Range<usize>, image: InlineImage) -> Self {
        Self {
            range,
            decoration: Decoration::InlineImage(image),
        }
    }

    pub fn target(&self) -> Option<&LinkTarget> {
        match &self.decoration {
            Decoration::Link(t) => Some(t),
            Decoration::InlineImage(_) => None,
        }
    }

    /// Payload of a link span; image spans carry none
    pub fn payload(&self) -> Option<&str> {
        self.target().map(|t| t.payload.as_str())
    }

    pub fn is_inline_image(&self) -> bool {
        matches!(self.decoration, Decoration::InlineImage(_))
    }

    pub fn image_ref(&self) -> Option<&str> {
        match &self.decoration {
            Decoration::InlineImage(img) => Some(img.name.as_str()),
            Decoration::Link(_) => None,
        }
    }
}
