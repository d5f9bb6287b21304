//! MatchEncoder: keyword matches -> annotated spans
//!
//! Spans come out in the order matches go in, which is the category
//! evaluation order. There is no cross-category dedup: where spans overlap
//! the later one wins when rendered.

use crate::label::category::{KeywordCategory, LinkCategory};
use crate::label::patterns::MatchResult;
use crate::label::span::{range_fits, AnnotatedSpan, InlineImage, LinkTarget};
use crate::label::style::Rect;

/// Encodes matches into spans
#[derive(Debug, Clone)]
pub struct MatchEncoder {
    /// Bounds for emoticon images whose category gives none
    default_image_bounds: Rect,
}

impl MatchEncoder {
    pub fn new(default_image_bounds: Rect) -> Self {
        Self { default_image_bounds }
    }

    /// Encode `matches` against `text`.
    ///
    /// Matches whose range falls outside `text` (stale matches from a
    /// previous text) or off a char boundary are dropped.
    pub fn merge(&self, text: &str, matches: &[MatchResult]) -> Vec<AnnotatedSpan> {
        let mut spans = Vec::with_capacity(matches.len());
        for m in matches {
            if !range_fits(text, &m.range) {
                tracing::debug!(range = ?m.range, len = text.len(), "dropping out-of-bounds match");
                continue;
            }
            spans.push(self.encode(m));
        }
        spans
    }

    fn encode(&self, m: &MatchResult) -> AnnotatedSpan {
        let range = m.range.clone();
        match &m.category {
            KeywordCategory::Mention => {
                let name = m.raw_text.strip_prefix('@').unwrap_or(&m.raw_text);
                AnnotatedSpan::link(range, LinkTarget::new(LinkCategory::Mention, name))
            }
            KeywordCategory::Url => AnnotatedSpan::link(range, LinkTarget::new(LinkCategory::Url, m.raw_text.as_str())),
            KeywordCategory::Phone => {
                AnnotatedSpan::link(range, LinkTarget::new(LinkCategory::Phone, m.raw_text.as_str()))
            }
            KeywordCategory::Address => {
                AnnotatedSpan::link(range, LinkTarget::new(LinkCategory::Address, m.raw_text.as_str()))
            }
            KeywordCategory::Regex { .. } => {
                AnnotatedSpan::link(range, LinkTarget::new(LinkCategory::Regex, m.raw_text.as_str()))
            }
            KeywordCategory::Emoticon(spec) => AnnotatedSpan::image(
                range,
                InlineImage {
                    name: spec.image_name.resolve(&m.raw_text),
                    bounds: spec.bounds.unwrap_or(self.default_image_bounds),
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::category::{EmoticonSpec, ImageNamer};

    fn found(range: std::ops::Range<usize>, category: KeywordCategory, text: &str) -> MatchResult {
        MatchResult {
            raw_text: text[range.clone()].to_string(),
            range,
            category,
        }
    }

    fn encoder() -> MatchEncoder {
        MatchEncoder::new(Rect::square(20.0))
    }

    #[test]
    fn test_mention_strips_sigil() {
        let text = "hi @alice";
        let spans = encoder().merge(text, &[found(3..9, KeywordCategory::Mention, text)]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].range, 3..9);
        assert_eq!(spans[0].payload(), Some("alice"));
    }

    #[test]
    fn test_raw_payloads() {
        let text = "x https://a.io 555-123-4567 #tag";
        let spans = encoder().merge(
            text,
            &[
                found(2..14, KeywordCategory::Url, text),
                found(15..27, KeywordCategory::Phone, text),
                found(28..32, KeywordCategory::regex(r"#\w+"), text),
            ],
        );
        let payloads: Vec<_> = spans.iter().filter_map(|s| s.payload()).collect();
        assert_eq!(payloads, vec!["https://a.io", "555-123-4567", "#tag"]);
    }

    #[test]
    fn test_stale_match_dropped() {
        let old = "a much longer old text @bob";
        let stale = found(23..27, KeywordCategory::Mention, old);
        let spans = encoder().merge("short", &[stale]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_off_char_boundary_dropped() {
        let m = MatchResult {
            range: 1..3,
            category: KeywordCategory::Url,
            raw_text: String::new(),
        };
        assert!(encoder().merge("é漢", &[m]).is_empty());
    }

    #[test]
    fn test_emoticon_becomes_image_with_default_bounds() {
        let text = "ok [smile]";
        let category = KeywordCategory::emoticon(EmoticonSpec {
            image_name: ImageNamer::Template("emoji_{}".to_string()),
            ..Default::default()
        });
        let spans = encoder().merge(text, &[found(3..10, category, text)]);
        assert!(spans[0].is_inline_image());
        assert_eq!(spans[0].image_ref(), Some("emoji_[smile]"));
        assert_eq!(spans[0].payload(), None);
        match &spans[0].decoration {
            crate::label::span::Decoration::InlineImage(img) => assert_eq!(img.bounds, Rect::square(20.0)),
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_order_preserved_without_dedup() {
        let text = "@alice";
        let spans = encoder().merge(
            text,
            &[
                found(0..6, KeywordCategory::Mention, text),
                found(0..6, KeywordCategory::regex("@a\\w+"), text),
            ],
        );
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].target().unwrap().category, LinkCategory::Mention);
        assert_eq!(spans[1].target().unwrap().category, LinkCategory::Regex);
    }
}
