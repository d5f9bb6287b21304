//! Host text-layout seam
//!
//! The engine never lays text out. Hosts implement `TextLayout` with their
//! own layout service; the label uses it to turn touches into positions and
//! to answer the natural-size query.

use crate::label::style::{Point, Rect, Size};
use crate::label::styled::StyledText;

/// Text layout service provided by the host
pub trait TextLayout {
    /// Display byte offset closest to `point`, or `None` when the point is
    /// outside the laid-out text
    fn closest_position(&self, styled: &StyledText, point: Point) -> Option<usize>;

    /// Bounding rect actually used by `styled` in a container of `container`
    /// size, showing at most `max_lines` lines (0 = unlimited)
    fn used_rect(&self, styled: &StyledText, container: Size, max_lines: usize) -> Rect;
}

/// Minimum size needed to show `styled` at `max_width`, rounded up to whole points
pub fn intrinsic_content_size<L: TextLayout + ?Sized>(
    layout: &L,
    styled: &StyledText,
    max_width: f32,
    max_lines: usize,
) -> Size {
    let container = Size {
        width: max_width,
        height: f32::INFINITY,
    };
    let used = layout.used_rect(styled, container, max_lines);
    Size {
        width: used.width.ceil(),
        height: used.height.ceil(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::styled::AnnotatedTextBuilder;

    struct FixedRect(Rect);

    impl TextLayout for FixedRect {
        fn closest_position(&self, _styled: &StyledText, _point: Point) -> Option<usize> {
            None
        }

        fn used_rect(&self, _styled: &StyledText, container: Size, _max_lines: usize) -> Rect {
            assert!(container.height.is_infinite(), "height must be unconstrained");
            Rect::new(0.0, 0.0, self.0.width.min(container.width), self.0.height)
        }
    }

    #[test]
    fn test_intrinsic_size_rounds_up() {
        let styled = AnnotatedTextBuilder::default().render("x", &[]);
        let size = intrinsic_content_size(&FixedRect(Rect::new(0.0, 0.0, 80.2, 40.01)), &styled, 100.0, 0);
        assert_eq!(size, Size { width: 81.0, height: 41.0 });
    }

    #[test]
    fn test_intrinsic_size_capped_by_width() {
        let styled = AnnotatedTextBuilder::default().render("x", &[]);
        let size = intrinsic_content_size(&FixedRect(Rect::new(0.0, 0.0, 500.0, 20.0)), &styled, 120.5, 0);
        assert_eq!(size.width, 121.0);
    }
}
