//! Horizontal scrollbar indicator
//!
//! The indicator is a thin translucent thumb along the bottom of the view. It
//! only shows position; it takes no input. While the view is overscrolled the
//! content length used for the thumb is stretched in proportion to the
//! overscroll, so the thumb shrinks against the edge instead of sliding past it.

use glide_core::geometry::{Rect, Size};
use glide_paint::{Color, PaintContext};

use crate::config::ScrollbarStyle;

/// Geometry of the thumb in view coordinates
///
/// Returns `None` when there is nothing to indicate: empty content, the whole
/// content already visible, or a thumb that would be zero pixels wide.
pub fn thumb_rect(
    view: Size,
    viewport: Rect,
    content_width: i32,
    overscroll_allowance: i32,
    style: &ScrollbarStyle,
) -> Option<Rect> {
    if content_width <= 0 || overscroll_allowance <= 0 {
        return None;
    }
    if viewport.left <= 0 && viewport.right >= content_width {
        return None;
    }

    let l_view = view.width;
    let mut l_content = content_width;
    let mut offset = viewport.left;
    let magic = content_width as f32 / overscroll_allowance as f32 * 2.0;
    if offset < 0 {
        l_content = (l_content as f32 + -offset as f32 * magic) as i32;
        offset = 0;
    } else if l_view + offset > l_content {
        l_content = (l_content as f32 + (l_view + offset - l_content) as f32 * magic) as i32;
        offset = l_content - l_view;
    }

    let ratio = l_view as f32 / l_content as f32;
    if ratio >= 1.0 {
        return None;
    }

    let space = ((l_view as f32 * 0.1) as i32).min(style.max_padding);
    let track = l_view - 2 * space;
    let width = (track as f32 * ratio) as i32;
    if width <= 0 {
        return None;
    }

    let top = view.height - style.thickness - style.bottom_margin;
    let left = space + (track as i64 * offset as i64 / l_content as i64) as i32;
    Some(Rect::from_origin_size(left, top, width, style.thickness))
}

/// The indicator child of a scroll view
#[derive(Clone, Debug)]
pub struct ScrollbarIndicator {
    thumb: Option<Rect>,
    color: Color,
}

impl ScrollbarIndicator {
    pub fn new(style: &ScrollbarStyle) -> Self {
        Self {
            thumb: None,
            color: style.thumb_color(),
        }
    }

    /// Current thumb rect, empty when there is no thumb
    pub fn rect(&self) -> Rect {
        self.thumb.unwrap_or(Rect::EMPTY)
    }

    pub fn set_thumb(&mut self, thumb: Option<Rect>) {
        self.thumb = thumb;
    }

    pub fn paint(&self, ctx: &mut PaintContext<'_>) {
        if let Some(thumb) = self.thumb {
            ctx.blend_rect(thumb, self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumb(offset: i32) -> Option<Rect> {
        let viewport = Rect::from_origin_size(offset, 0, 300, 100);
        thumb_rect(Size::new(300, 100), viewport, 1000, 100, &ScrollbarStyle::default())
    }

    #[test]
    fn test_thumb_tracks_offset() {
        assert_eq!(thumb(0), Some(Rect::new(10, 93, 94, 96)));
        assert_eq!(thumb(350), Some(Rect::new(108, 93, 192, 96)));
        assert_eq!(thumb(700), Some(Rect::new(206, 93, 290, 96)));
    }

    #[test]
    fn test_overscroll_shrinks_thumb_against_edge() {
        let stretched = thumb(750).unwrap_or(Rect::EMPTY);
        assert_eq!(stretched, Rect::new(248, 93, 290, 96));

        let stretched = thumb(-50).unwrap_or(Rect::EMPTY);
        assert_eq!(stretched.left, 10);
        assert_eq!(stretched.width(), 42);
    }

    #[test]
    fn test_no_thumb_when_everything_is_visible() {
        let viewport = Rect::from_origin_size(0, 0, 300, 100);
        let style = ScrollbarStyle::default();
        assert_eq!(thumb_rect(Size::new(300, 100), viewport, 200, 100, &style), None);
        assert_eq!(thumb_rect(Size::new(300, 100), viewport, 0, 100, &style), None);
    }
}
