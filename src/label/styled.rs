//! AnnotatedTextBuilder: spans -> StyledText
//!
//! Rendering is a full rebuild every time:
//! 1. base font and colour over the whole text,
//! 2. link spans in application order, the last span covering a position wins,
//! 3. emoticon spans replace their range with one U+FFFC and an image run.
//!    Images take precedence over links, even links applied after them.
//!
//! All positions on a `StyledText` are byte offsets into its display text.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BinaryHeap};
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

use crate::label::span::{range_fits, AnnotatedSpan, Decoration, InlineImage, LinkTarget};
use crate::label::style::{LinkStyle, RunStyle, TextStyle};

/// Placeholder character standing in for an inline image
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

// =============================================================================
// Types
// =============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunContent {
    Text { link: Option<LinkTarget> },
    Image(InlineImage),
}

/// Maximal stretch of display text sharing one style and one owner
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Run {
    /// Range in the display text
    pub range: Range<usize>,
    /// Range in the source text the run was built from
    pub source_range: Range<usize>,
    pub style: RunStyle,
    pub content: RunContent,
}

impl Run {
    pub fn link(&self) -> Option<&LinkTarget> {
        match &self.content {
            RunContent::Text { link } => link.as_ref(),
            RunContent::Image(_) => None,
        }
    }

    /// Tagged identifier for hosts that carry links as URLs
    pub fn link_uri(&self) -> Option<String> {
        self.link().map(LinkTarget::to_uri)
    }
}

/// The rendered artifact. Immutable; rebuilt wholesale on every change.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct StyledText {
    text: String,
    base: TextStyle,
    link_style: LinkStyle,
    runs: Vec<Run>,
}

impl StyledText {
    /// Display text, with inline images as U+FFFC
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn base_style(&self) -> &TextStyle {
        &self.base
    }

    pub fn link_style(&self) -> &LinkStyle {
        &self.link_style
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Run containing display position `pos`
    pub fn run_at(&self, pos: usize) -> Option<&Run> {
        let idx = self.runs.partition_point(|r| r.range.end <= pos);
        self.runs.get(idx).filter(|r| r.range.contains(&pos))
    }

    /// Link attached at display position `pos`, if any
    pub fn link_at(&self, pos: usize) -> Option<&LinkTarget> {
        self.run_at(pos).and_then(Run::link)
    }

    /// Every link run, in display order
    pub fn links(&self) -> impl Iterator<Item = (Range<usize>, &LinkTarget)> {
        self.runs.iter().filter_map(|r| r.link().map(|l| (r.range.clone(), l)))
    }

    /// Links whose runs intersect `range`
    pub fn links_in(&self, range: Range<usize>) -> impl Iterator<Item = (Range<usize>, &LinkTarget)> {
        self.links()
            .filter(move |(r, _)| r.start < range.end && r.end > range.start)
    }

    /// Snap `pos` to the start of the grapheme cluster containing it.
    /// Positions past the end come back as `None`.
    pub fn snap_position(&self, pos: usize) -> Option<usize> {
        if pos >= self.text.len() {
            return None;
        }
        self.text
            .grapheme_indices(true)
            .take_while(|(start, _)| *start <= pos)
            .last()
            .map(|(start, _)| start)
    }

    /// Convert a UTF-16 code unit offset (as used by JS hosts) to a byte offset
    pub fn byte_offset_from_utf16(&self, utf16: usize) -> Option<usize> {
        let mut units = 0;
        for (byte, ch) in self.text.char_indices() {
            if units >= utf16 {
                return Some(byte);
            }
            units += ch.len_utf16();
        }
        (units >= utf16).then_some(self.text.len())
    }
}

// =============================================================================
// AnnotatedTextBuilder
// =============================================================================

/// Builds `StyledText` from source text and spans
#[derive(Debug, Clone, Default)]
pub struct AnnotatedTextBuilder {
    base: TextStyle,
    link: LinkStyle,
}

/// Elementary piece of the source text between two span boundaries
enum Piece {
    Text { range: Range<usize>, owner: Option<usize> },
    Image { range: Range<usize>, image: InlineImage },
}

impl AnnotatedTextBuilder {
    pub fn new(base: TextStyle, link: LinkStyle) -> Self {
        Self { base, link }
    }

    pub fn render(&self, text: &str, spans: &[AnnotatedSpan]) -> StyledText {
        let images = self.accepted_images(text, spans);
        let pieces = self.pieces(text, spans, &images);

        let mut display = String::with_capacity(text.len());
        let mut runs: Vec<Run> = Vec::new();
        let mut last_owner: Option<Option<usize>> = None;

        for piece in pieces {
            match piece {
                Piece::Image { range, image } => {
                    let start = display.len();
                    display.push(OBJECT_REPLACEMENT);
                    runs.push(Run {
                        range: start..display.len(),
                        source_range: range,
                        style: RunStyle::base(&self.base),
                        content: RunContent::Image(image),
                    });
                    last_owner = None;
                }
                Piece::Text { range, owner } => {
                    let start = display.len();
                    display.push_str(&text[range.clone()]);
                    let end = display.len();

                    if last_owner == Some(owner) {
                        if let Some(run) = runs.last_mut() {
                            run.range.end = end;
                            run.source_range.end = range.end;
                            continue;
                        }
                    }

                    let link = owner.and_then(|i| spans[i].target().cloned());
                    let style = if link.is_some() {
                        RunStyle::link(&self.base, &self.link)
                    } else {
                        RunStyle::base(&self.base)
                    };
                    runs.push(Run {
                        range: start..end,
                        source_range: range,
                        style,
                        content: RunContent::Text { link },
                    });
                    last_owner = Some(owner);
                }
            }
        }

        StyledText {
            text: display,
            base: self.base.clone(),
            link_style: self.link,
            runs,
        }
    }

    /// Image spans that get substituted, sorted by position. A later image
    /// overlapping an earlier substitution is skipped.
    fn accepted_images<'a>(&self, text: &str, spans: &'a [AnnotatedSpan]) -> Vec<(Range<usize>, &'a InlineImage)> {
        // start -> (end, image); entries never overlap
        let mut accepted: BTreeMap<usize, (usize, &InlineImage)> = BTreeMap::new();
        for span in spans.iter().filter(|s| range_fits(text, &s.range)) {
            if let Decoration::InlineImage(image) = &span.decoration {
                let r = &span.range;
                let clashes = accepted
                    .range(..r.end)
                    .next_back()
                    .is_some_and(|(_, (end, _))| *end > r.start);
                if clashes {
                    tracing::debug!(range = ?r, "skipping emoticon overlapping an earlier one");
                    continue;
                }
                accepted.insert(r.start, (r.end, image));
            }
        }
        accepted
            .into_iter()
            .map(|(start, (end, image))| (start..end, image))
            .collect()
    }

    /// Split `text` at every span boundary and give each piece its owner,
    /// the link applied last among those covering it.
    ///
    /// One sweep over the boundaries: links enter a max-heap keyed on their
    /// application index when the sweep reaches their start and are dropped
    /// lazily once they surface with an end behind the sweep.
    fn pieces(&self, text: &str, spans: &[AnnotatedSpan], images: &[(Range<usize>, &InlineImage)]) -> Vec<Piece> {
        let fitting: Vec<usize> = (0..spans.len())
            .filter(|&i| range_fits(text, &spans[i].range))
            .collect();

        let mut bounds = Vec::with_capacity(fitting.len() * 2 + 2);
        bounds.push(0);
        bounds.push(text.len());
        for &i in &fitting {
            bounds.push(spans[i].range.start);
            bounds.push(spans[i].range.end);
        }
        bounds.sort_unstable();
        bounds.dedup();

        let mut links: Vec<usize> = fitting.into_iter().filter(|&i| spans[i].target().is_some()).collect();
        links.sort_by_key(|&i| spans[i].range.start);

        let mut active: BinaryHeap<usize> = BinaryHeap::new();
        let mut next_link = 0;
        let mut next_image = 0;
        let mut pieces = Vec::with_capacity(bounds.len());

        for w in bounds.windows(2) {
            let (a, b) = (w[0], w[1]);

            while next_link < links.len() && spans[links[next_link]].range.start <= a {
                active.push(links[next_link]);
                next_link += 1;
            }
            while active.peek().is_some_and(|&i| spans[i].range.end <= a) {
                active.pop();
            }

            while next_image < images.len() && images[next_image].0.end <= a {
                next_image += 1;
            }
            if let Some((r, image)) = images.get(next_image).filter(|(r, _)| r.start <= a) {
                if r.start == a {
                    pieces.push(Piece::Image {
                        range: r.clone(),
                        image: (*image).clone(),
                    });
                }
                continue;
            }

            pieces.push(Piece::Text {
                range: a..b,
                owner: active.peek().copied(),
            });
        }
        pieces
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::category::LinkCategory;
    use crate::label::style::{Color, Rect};

    fn builder() -> AnnotatedTextBuilder {
        AnnotatedTextBuilder::new(
            TextStyle::default(),
            LinkStyle {
                color: Color::rgb(255, 0, 0),
                underline: true,
            },
        )
    }

    fn link(range: Range<usize>, category: LinkCategory, payload: &str) -> AnnotatedSpan {
        AnnotatedSpan::link(range, LinkTarget::new(category, payload))
    }

    fn image(range: Range<usize>, name: &str) -> AnnotatedSpan {
        AnnotatedSpan::image(
            range,
            InlineImage {
                name: name.to_string(),
                bounds: Rect::square(10.0),
            },
        )
    }

    #[test]
    fn test_plain_text_single_base_run() {
        let styled = builder().render("hello", &[]);
        assert_eq!(styled.runs().len(), 1);
        assert_eq!(styled.runs()[0].style, RunStyle::base(&TextStyle::default()));
        assert_eq!(styled.link_at(0), None);
    }

    #[test]
    fn test_empty_text_has_no_runs() {
        let styled = builder().render("", &[]);
        assert!(styled.is_empty());
        assert!(styled.runs().is_empty());
        assert_eq!(styled.link_at(0), None);
    }

    #[test]
    fn test_link_style_applied() {
        let styled = builder().render("hi @bob!", &[link(3..7, LinkCategory::Mention, "bob")]);
        assert_eq!(styled.runs().len(), 3);
        let run = &styled.runs()[1];
        assert_eq!(run.range, 3..7);
        assert_eq!(run.style.color, Color::rgb(255, 0, 0));
        assert!(run.style.underline);
        assert_eq!(styled.link_at(5).unwrap().payload, "bob");
        assert_eq!(styled.link_at(7), None);
    }

    #[test]
    fn test_last_applied_span_wins_on_overlap() {
        let spans = [
            link(0..10, LinkCategory::Url, "www.ab.com"),
            link(4..6, LinkCategory::Regex, "ab"),
        ];
        let styled = builder().render("www.ab.com", &spans);
        assert_eq!(styled.link_at(0).unwrap().category, LinkCategory::Url);
        assert_eq!(styled.link_at(4).unwrap().category, LinkCategory::Regex);
        assert_eq!(styled.link_at(7).unwrap().category, LinkCategory::Url);
        assert_eq!(styled.runs().len(), 3);
    }

    #[test]
    fn test_adjacent_distinct_links_stay_separate() {
        let spans = [
            link(0..2, LinkCategory::Regex, "ab"),
            link(2..4, LinkCategory::Regex, "cd"),
        ];
        let styled = builder().render("abcd", &spans);
        assert_eq!(styled.runs().len(), 2);
        assert_eq!(styled.link_at(1).unwrap().payload, "ab");
        assert_eq!(styled.link_at(2).unwrap().payload, "cd");
    }

    #[test]
    fn test_emoticon_replaced_by_placeholder() {
        let styled = builder().render("a[smile]b @x", &[image(1..8, "smile"), link(10..12, LinkCategory::Mention, "x")]);
        let expected = format!("a{}b @x", OBJECT_REPLACEMENT);
        assert_eq!(styled.text(), expected);

        let image_run = styled.run_at(1).unwrap();
        assert_eq!(image_run.source_range, 1..8);
        assert!(matches!(&image_run.content, RunContent::Image(img) if img.name == "smile"));
        assert_eq!(styled.link_at(1), None);

        // link shifted by the substitution
        let at = expected.find('@').unwrap();
        assert_eq!(styled.link_at(at).unwrap().payload, "x");
    }

    #[test]
    fn test_link_cut_by_image_keeps_outer_parts() {
        let spans = [link(0..9, LinkCategory::Regex, "ab[smile]"), image(2..9, "smile")];
        let styled = builder().render("ab[smile]", &spans);
        assert_eq!(styled.text(), format!("ab{}", OBJECT_REPLACEMENT));
        assert_eq!(styled.link_at(0).unwrap().payload, "ab[smile]");
        assert_eq!(styled.link_at(2), None);
    }

    #[test]
    fn test_overlapping_images_first_wins() {
        let styled = builder().render("[a][b]", &[image(0..3, "a"), image(1..6, "ab")]);
        assert_eq!(styled.text(), format!("{}[b]", OBJECT_REPLACEMENT));
    }

    #[test]
    fn test_invalid_spans_ignored() {
        let spans = [link(2..40, LinkCategory::Url, "x"), link(1..2, LinkCategory::Regex, "é")];
        let styled = builder().render("aé", &spans);
        assert_eq!(styled.text(), "aé");
        assert_eq!(styled.links().count(), 0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let spans = [link(0..4, LinkCategory::Url, "www.x"), image(5..8, "y")];
        let a = builder().render("www.x [y]", &spans);
        let b = builder().render("www.x [y]", &spans);
        assert_eq!(a, b);
    }

    #[test]
    fn test_links_in_range() {
        let spans = [
            link(0..2, LinkCategory::Regex, "ab"),
            link(6..8, LinkCategory::Regex, "ef"),
        ];
        let styled = builder().render("ab cd ef", &spans);
        assert_eq!(styled.links().count(), 2);
        assert_eq!(styled.links_in(1..4).count(), 1);
        assert_eq!(styled.links_in(2..5).count(), 0);
    }

    #[test]
    fn test_snap_position_to_grapheme_start() {
        let styled = builder().render("ae\u{301}x", &[]);
        assert_eq!(styled.snap_position(2), Some(1));
        assert_eq!(styled.snap_position(4), Some(4));
        assert_eq!(styled.snap_position(5), None);
    }

    #[test]
    fn test_utf16_offsets() {
        let styled = builder().render("a😀b", &[]);
        assert_eq!(styled.byte_offset_from_utf16(0), Some(0));
        assert_eq!(styled.byte_offset_from_utf16(1), Some(1));
        assert_eq!(styled.byte_offset_from_utf16(3), Some(5));
        assert_eq!(styled.byte_offset_from_utf16(4), Some(6));
        assert_eq!(styled.byte_offset_from_utf16(5), None);
    }

    #[test]
    fn test_run_link_uri() {
        let styled = builder().render("@al", &[link(0..3, LinkCategory::Mention, "al")]);
        assert_eq!(styled.runs()[0].link_uri().as_deref(), Some("file:///label-mention:al"));
    }

    #[test]
    fn test_outer_link_resumes_after_later_links_end() {
        let spans = [
            link(0..10, LinkCategory::Url, "A"),
            link(2..8, LinkCategory::Regex, "B"),
            link(4..6, LinkCategory::Regex, "C"),
            link(3..9, LinkCategory::Regex, "D"),
        ];
        let styled = builder().render("abcdefghij", &spans);

        let payloads: Vec<&str> = (0..10).map(|i| styled.link_at(i).unwrap().payload.as_str()).collect();
        assert_eq!(payloads, vec!["A", "A", "B", "D", "D", "D", "D", "D", "D", "A"]);
        assert_eq!(styled.runs().len(), 4);
    }

    #[test]
    fn test_many_adjacent_links() {
        let n = 20_000;
        let text = "@a ".repeat(n);
        let spans: Vec<AnnotatedSpan> = (0..n)
            .map(|i| link(i * 3..i * 3 + 2, LinkCategory::Mention, "a"))
            .collect();

        let styled = builder().render(&text, &spans);

        assert_eq!(styled.runs().len(), 2 * n);
        assert_eq!(styled.links().count(), n);
        assert!(styled.link_at(text.len() - 2).is_some());
        assert!(styled.link_at(text.len() - 1).is_none());
    }

    #[test]
    fn test_images_accepted_out_of_order() {
        let spans = [image(4..6, "ef"), image(0..2, "ab"), image(1..5, "bcde")];
        let styled = builder().render("abcdefg", &spans);
        assert_eq!(styled.text(), "\u{FFFC}cd\u{FFFC}g");
    }

    #[test]
    fn test_image_wins_over_later_link() {
        // inline images take precedence over links regardless of order
        let spans = [image(0..7, "smile"), link(0..7, LinkCategory::Regex, "[smile]")];
        let styled = builder().render("[smile]", &spans);

        assert_eq!(styled.text(), OBJECT_REPLACEMENT.to_string());
        assert_eq!(styled.runs().len(), 1);
        assert_eq!(styled.links().count(), 0);
    }
}
