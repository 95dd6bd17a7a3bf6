//! Paint contexts
//!
//! A [`PaintContext`] is a window onto a [`Surface`]: local coordinates are
//! translated by an origin and every write is clipped to a clip rectangle.
//! Sub-contexts narrow the clip and shift the origin, which is how a parent
//! hands a child a drawing area restricted to the region that needs repainting.

use glide_core::geometry::{Point, Rect};

use crate::color::Color;
use crate::surface::Surface;

/// A translated, clipped view of a surface
pub struct PaintContext<'a> {
    surface: &'a mut Surface,
    /// Surface position of local (0, 0)
    origin: Point,
    /// Clip in surface coordinates
    clip: Rect,
}

impl<'a> PaintContext<'a> {
    /// Context covering the whole surface
    pub fn new(surface: &'a mut Surface) -> Self {
        let clip = surface.bounds();
        Self {
            surface,
            origin: Point::ZERO,
            clip,
        }
    }

    /// Derive a context whose local origin sits at `offset` (in this context's
    /// coordinates), clipped additionally to `clip` (also in this context's
    /// coordinates) when given
    pub fn sub_context(&mut self, offset: Point, clip: Option<Rect>) -> PaintContext<'_> {
        let mut new_clip = self.clip;
        if let Some(clip) = clip {
            new_clip = new_clip.intersect(&self.to_surface(clip));
        }
        PaintContext {
            surface: &mut *self.surface,
            origin: self.origin.offset(offset.x, offset.y),
            clip: new_clip,
        }
    }

    /// Current clip in local coordinates
    pub fn clip_rect(&self) -> Rect {
        if self.clip.is_empty() {
            return Rect::EMPTY;
        }
        self.clip.offset(-self.origin.x, -self.origin.y)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn surface(&self) -> &Surface {
        &*self.surface
    }

    fn to_surface(&self, rect: Rect) -> Rect {
        rect.offset(self.origin.x, self.origin.y)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let r = self.to_surface(rect).intersect(&self.clip);
        self.surface.fill_rect(r, color);
    }

    pub fn blend_rect(&mut self, rect: Rect, color: Color) {
        let r = self.to_surface(rect).intersect(&self.clip);
        self.surface.blend_rect(r, color);
    }

    /// Block copy `src_rect` of `src` so its origin lands at local `dst`
    pub fn blit(&mut self, src: &Surface, src_rect: Rect, dst: Point) {
        let src_rect = src_rect.intersect(&src.bounds());
        if src_rect.is_empty() {
            return;
        }
        let target = Rect::from_origin_size(
            dst.x + self.origin.x,
            dst.y + self.origin.y,
            src_rect.width(),
            src_rect.height(),
        );
        let clipped = target.intersect(&self.clip);
        if clipped.is_empty() {
            return;
        }
        let from = Rect::from_origin_size(
            src_rect.left + (clipped.left - target.left),
            src_rect.top + (clipped.top - target.top),
            clipped.width(),
            clipped.height(),
        );
        self.surface.blit_from(src, from, clipped.origin());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_context_translates_and_clips() {
        let mut surface = Surface::new(10, 10);
        {
            let mut ctx = PaintContext::new(&mut surface);
            let mut child = ctx.sub_context(Point::new(4, 4), Some(Rect::new(4, 4, 6, 6)));
            assert_eq!(child.clip_rect(), Rect::new(0, 0, 2, 2));
            child.fill_rect(Rect::new(-100, -100, 100, 100), Color::WHITE);
        }
        assert_eq!(surface.pixel(3, 3), Some(0));
        assert_eq!(surface.pixel(4, 4), Some(0xffffffff));
        assert_eq!(surface.pixel(5, 5), Some(0xffffffff));
        assert_eq!(surface.pixel(6, 6), Some(0));
    }

    #[test]
    fn test_blit_respects_clip() {
        let mut src = Surface::new(4, 1);
        src.clear(Color::WHITE);
        let mut dst = Surface::new(8, 1);
        {
            let mut ctx = PaintContext::new(&mut dst);
            let mut ctx = ctx.sub_context(Point::ZERO, Some(Rect::new(2, 0, 4, 1)));
            ctx.blit(&src, src.bounds(), Point::new(0, 0));
        }
        assert_eq!(dst.pixel(1, 0), Some(0));
        assert_eq!(dst.pixel(2, 0), Some(0xffffffff));
        assert_eq!(dst.pixel(3, 0), Some(0xffffffff));
        assert_eq!(dst.pixel(4, 0), Some(0));
    }
}
