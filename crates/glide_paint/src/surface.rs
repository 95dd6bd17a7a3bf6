//! Off-screen pixel surfaces
//!
//! A [`Surface`] is a row-major RGBA8 buffer with pixels packed as
//! `0xRRGGBBAA`. It serves both as the real target a view paints into and as
//! the compatible off-screen buffer the render cache keeps between frames.
//! Every operation clips against the surface bounds; out-of-range requests
//! are silently trimmed.

use glide_core::geometry::{Point, Rect, Size};

use crate::color::Color;

/// An RGBA8 pixel buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    pixels: Vec<u32>,
    width: i32,
    height: i32,
}

impl Surface {
    /// Create a transparent surface. Negative dimensions produce an empty surface.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        tracing::trace!("allocating {}x{} surface", width, height);
        Self {
            pixels: vec![0; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Create a surface of the same size, the way a compatible memory DC is made
    pub fn with_size(size: Size) -> Self {
        Self::new(size.width, size.height)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Packed pixel at `(x, y)`
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if self.bounds().contains(Point::new(x, y)) {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Copy out the pixels of `rect` (clipped to the surface), row by row
    pub fn region(&self, rect: Rect) -> Vec<u32> {
        let r = rect.intersect(&self.bounds());
        let mut out = Vec::with_capacity((r.width().max(0) * r.height().max(0)) as usize);
        for y in r.top..r.bottom {
            let start = self.index(r.left, y);
            out.extend_from_slice(&self.pixels[start..start + r.width() as usize]);
        }
        out
    }

    /// Fill the whole surface
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_pixel());
    }

    /// Overwrite `rect` with a solid color
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let r = rect.intersect(&self.bounds());
        let pixel = color.to_pixel();
        for y in r.top..r.bottom {
            let start = self.index(r.left, y);
            self.pixels[start..start + r.width() as usize].fill(pixel);
        }
    }

    /// Composite a translucent color over `rect` (source-over, straight alpha)
    pub fn blend_rect(&mut self, rect: Rect, color: Color) {
        if color.a >= 1.0 {
            self.fill_rect(rect, color);
            return;
        }
        if color.a <= 0.0 {
            return;
        }
        let r = rect.intersect(&self.bounds());
        for y in r.top..r.bottom {
            let start = self.index(r.left, y);
            for px in &mut self.pixels[start..start + r.width() as usize] {
                *px = blend_over(*px, color);
            }
        }
    }

    /// Copy a block from `src` so that `src_rect`'s origin lands at `dst`
    ///
    /// Both sides are clipped; pixels that fall outside either surface are skipped.
    pub fn blit_from(&mut self, src: &Surface, src_rect: Rect, dst: Point) {
        let Some((from, to)) = clip_copy(src.bounds(), self.bounds(), src_rect, dst) else {
            return;
        };
        let w = from.width() as usize;
        for row in 0..from.height() {
            let s = src.index(from.left, from.top + row);
            let d = self.index(to.x, to.y + row);
            self.pixels[d..d + w].copy_from_slice(&src.pixels[s..s + w]);
        }
    }

    /// Move a block within this surface, handling overlap (scroll copy)
    pub fn copy_within(&mut self, src_rect: Rect, dst: Point) {
        let bounds = self.bounds();
        let Some((from, to)) = clip_copy(bounds, bounds, src_rect, dst) else {
            return;
        };
        let w = from.width() as usize;
        let rows: Box<dyn Iterator<Item = i32>> = if to.y > from.top {
            Box::new((0..from.height()).rev())
        } else {
            Box::new(0..from.height())
        };
        for row in rows {
            let s = self.index(from.left, from.top + row);
            let d = self.index(to.x, to.y + row);
            self.pixels.copy_within(s..s + w, d);
        }
    }
}

/// Clip a copy of `src_rect` (in `src_bounds`) to `dst` (in `dst_bounds`).
///
/// Returns the clipped source rect and its destination origin.
fn clip_copy(src_bounds: Rect, dst_bounds: Rect, src_rect: Rect, dst: Point) -> Option<(Rect, Point)> {
    let from = src_rect.intersect(&src_bounds);
    if from.is_empty() {
        return None;
    }
    // Shift the destination by however much the source was trimmed
    let dst = dst.offset(from.left - src_rect.left, from.top - src_rect.top);
    let target = Rect::from_origin_size(dst.x, dst.y, from.width(), from.height()).intersect(&dst_bounds);
    if target.is_empty() {
        return None;
    }
    let from = Rect::from_origin_size(
        from.left + (target.left - dst.x),
        from.top + (target.top - dst.y),
        target.width(),
        target.height(),
    );
    Some((from, target.origin()))
}

fn blend_over(dst: u32, src: Color) -> u32 {
    let d = Color::from_pixel(dst);
    let a = src.a;
    let out_a = a + d.a * (1.0 - a);
    if out_a <= 0.0 {
        return 0;
    }
    let mix = |s: f32, d_c: f32| (s * a + d_c * d.a * (1.0 - a)) / out_a;
    Color::new(mix(src.r, d.r), mix(src.g, d.g), mix(src.b, d.b), out_a).to_pixel()
}
