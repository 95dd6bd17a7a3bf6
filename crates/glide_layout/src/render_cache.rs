//! Incremental off-screen render cache
//!
//! The cache keeps an off-screen surface holding the content as it looked
//! through the last painted viewport. All rectangles here are in content
//! coordinates; buffer pixel `(0, 0)` shows the top-left corner of the cached
//! viewport.
//!
//! On every paint the cache reconciles itself with the current viewport:
//!
//! 1. When the viewport moved, the part still visible is shifted inside the
//!    buffer and the newly exposed strip joins the dirty rect.
//! 2. The dirty rect, clipped to what is visible, is cleared and re-rendered.
//! 3. The visible part of the buffer is copied to the target.
//!
//! Invalidations accumulate into a single bounding rectangle. The shift in
//! step 1 assumes exactly one dirty rect, so it must stay a bounding box.

use glide_core::geometry::{Point, Rect};
use glide_paint::{Color, PaintContext, Surface};

/// What a reconciliation did, for diagnostics and tests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Region kept from the previous frame and how far it moved in the buffer
    pub shifted: Option<(Rect, Point)>,
    /// Region rendered afresh
    pub repainted: Option<Rect>,
}

impl ReconcileReport {
    /// Nothing was shifted or rendered
    pub fn is_noop(&self) -> bool {
        self.shifted.is_none() && self.repainted.is_none()
    }
}

/// Off-screen buffer plus dirty-region bookkeeping
#[derive(Debug)]
pub struct RenderCache {
    buffer: Option<Surface>,
    cached_viewport: Option<Rect>,
    dirty: Rect,
    cacheable: bool,
}

impl RenderCache {
    pub fn new(cacheable: bool) -> Self {
        Self {
            buffer: None,
            cached_viewport: None,
            dirty: Rect::EMPTY,
            cacheable,
        }
    }

    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// Enable or disable caching; disabling frees the buffer at once
    pub fn set_cacheable(&mut self, cacheable: bool) {
        if self.cacheable != cacheable {
            if !cacheable {
                self.discard();
            }
            self.cacheable = cacheable;
        }
    }

    /// Drop the buffer and forget all cached state
    pub fn discard(&mut self) {
        if self.buffer.take().is_some() {
            tracing::debug!("render cache discarded");
        }
        self.cached_viewport = None;
        self.dirty = Rect::EMPTY;
    }

    /// Mark `rect` as needing re-render
    pub fn invalidate(&mut self, rect: Rect) {
        if !self.cacheable {
            return;
        }
        self.dirty = self.dirty.union(&rect);
        tracing::trace!("cache dirty rect now {:?}", self.dirty);
    }

    pub fn dirty_rect(&self) -> Rect {
        self.dirty
    }

    pub fn cached_viewport(&self) -> Option<Rect> {
        self.cached_viewport
    }

    pub fn buffer(&self) -> Option<&Surface> {
        self.buffer.as_ref()
    }

    /// Paint the content through the cache
    ///
    /// `target` uses view coordinates, where the viewport's top-left is
    /// `(0, 0)`. `content` is the content's full extent and `viewport` the
    /// visible window, both in content coordinates. `render` paints the
    /// content into a context whose origin is the content's origin.
    ///
    /// Returns `None` when no content is visible.
    pub fn paint<F>(
        &mut self,
        target: &mut PaintContext<'_>,
        content: Rect,
        viewport: Rect,
        render: F,
    ) -> Option<ReconcileReport>
    where
        F: FnMut(&mut PaintContext<'_>),
    {
        let visible = content.intersect(&viewport);
        if visible.is_empty() {
            return None;
        }

        let stale_size = self.buffer.as_ref().map(|b| b.size()) != Some(viewport.size());
        if stale_size {
            tracing::debug!("allocating {}x{} render cache", viewport.width(), viewport.height());
            self.buffer = Some(Surface::with_size(viewport.size()));
            self.cached_viewport = None;
            self.dirty = content;
        }

        let mut report = ReconcileReport::default();
        if !self.dirty.is_empty() || self.cached_viewport != Some(viewport) {
            report = self.reconcile(content, viewport, visible, render);
        }

        if let Some(buffer) = self.buffer.as_ref() {
            let src = visible.offset(-viewport.left, -viewport.top);
            target.blit(buffer, src, src.origin());
        }
        Some(report)
    }

    fn reconcile<F>(&mut self, content: Rect, viewport: Rect, visible: Rect, mut render: F) -> ReconcileReport
    where
        F: FnMut(&mut PaintContext<'_>),
    {
        let mut report = ReconcileReport::default();
        let Some(buffer) = self.buffer.as_mut() else {
            return report;
        };

        if let Some(previous) = self.cached_viewport.filter(|prev| *prev != viewport) {
            let kept = content.intersect(&previous).intersect(&visible);
            if kept.is_empty() {
                self.dirty = self.dirty.union(&visible);
            } else {
                let src = kept.offset(-previous.left, -previous.top);
                let dst = kept.offset(-viewport.left, -viewport.top).origin();
                buffer.copy_within(src, dst);
                let shift = Point::new(previous.left - viewport.left, previous.top - viewport.top);
                tracing::trace!("cache shift {:?} by {:?}", kept, shift);
                report.shifted = Some((kept, shift));

                for exposed in visible.subtract(&kept) {
                    self.dirty = self.dirty.union(&exposed);
                }
            }
        }

        let dirty = self.dirty.intersect(&visible);
        if !dirty.is_empty() {
            tracing::trace!("cache repaint {:?}", dirty);
            let local = dirty.offset(-viewport.left, -viewport.top);
            buffer.fill_rect(local, Color::TRANSPARENT);

            let mut ctx = PaintContext::new(buffer);
            let offset = Point::new(content.left - viewport.left, content.top - viewport.top);
            let mut content_ctx = ctx.sub_context(offset, Some(local));
            render(&mut content_ctx);
            report.repainted = Some(dirty);
        }

        self.dirty = Rect::EMPTY;
        self.cached_viewport = Some(viewport);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Content whose every column has a distinct color
    fn render_columns(ctx: &mut PaintContext<'_>) {
        let clip = ctx.clip_rect();
        for x in clip.left..clip.right {
            ctx.fill_rect(Rect::new(x, clip.top, x + 1, clip.bottom), column_color(x));
        }
    }

    fn column_color(x: i32) -> Color {
        Color::from_rgba8((x % 256) as u8, (x / 256) as u8, 0x80, 0xff)
    }

    fn viewport(x: i32) -> Rect {
        Rect::from_origin_size(x, 0, 300, 20)
    }

    const CONTENT: Rect = Rect::new(0, 0, 1000, 20);

    #[test]
    fn test_first_paint_renders_visible_part() {
        let mut cache = RenderCache::new(true);
        let mut target = Surface::new(300, 20);
        let report = cache
            .paint(&mut PaintContext::new(&mut target), CONTENT, viewport(0), render_columns)
            .unwrap();
        assert_eq!(report.shifted, None);
        assert_eq!(report.repainted, Some(viewport(0)));
        assert_eq!(target.pixel(299, 5), Some(column_color(299).to_pixel()));
        assert!(cache.dirty_rect().is_empty());
    }

    #[test]
    fn test_scroll_shifts_and_repaints_exposed_strip() {
        let mut cache = RenderCache::new(true);
        let mut target = Surface::new(300, 20);
        cache.paint(&mut PaintContext::new(&mut target), CONTENT, viewport(0), render_columns);

        let report = cache
            .paint(&mut PaintContext::new(&mut target), CONTENT, viewport(50), render_columns)
            .unwrap();
        assert_eq!(report.shifted, Some((Rect::new(50, 0, 300, 20), Point::new(-50, 0))));
        assert_eq!(report.repainted, Some(Rect::new(300, 0, 350, 20)));
        for x in [0, 249, 250, 299] {
            assert_eq!(target.pixel(x, 10), Some(column_color(x + 50).to_pixel()));
        }
    }

    #[test]
    fn test_second_reconcile_is_a_noop() {
        let mut cache = RenderCache::new(true);
        let mut target = Surface::new(300, 20);
        cache.paint(&mut PaintContext::new(&mut target), CONTENT, viewport(120), render_columns);
        let before = cache.buffer().cloned();

        let report = cache
            .paint(&mut PaintContext::new(&mut target), CONTENT, viewport(120), render_columns)
            .unwrap();
        assert!(report.is_noop());
        assert_eq!(cache.buffer().cloned(), before);
        assert!(cache.dirty_rect().is_empty());
    }

    #[test]
    fn test_invalidate_accumulates_bounding_box() {
        let mut cache = RenderCache::new(true);
        cache.invalidate(Rect::new(10, 0, 20, 5));
        cache.invalidate(Rect::new(100, 10, 110, 20));
        assert_eq!(cache.dirty_rect(), Rect::new(10, 0, 110, 20));
    }

    #[test]
    fn test_jump_without_overlap_repaints_everything() {
        let mut cache = RenderCache::new(true);
        let mut target = Surface::new(300, 20);
        cache.paint(&mut PaintContext::new(&mut target), CONTENT, viewport(0), render_columns);
        let report = cache
            .paint(&mut PaintContext::new(&mut target), CONTENT, viewport(600), render_columns)
            .unwrap();
        assert_eq!(report.shifted, None);
        assert_eq!(report.repainted, Some(viewport(600)));
        assert_eq!(target.pixel(0, 0), Some(column_color(600).to_pixel()));
    }

    #[test]
    fn test_disable_discards_buffer() {
        let mut cache = RenderCache::new(true);
        let mut target = Surface::new(300, 20);
        cache.paint(&mut PaintContext::new(&mut target), CONTENT, viewport(0), render_columns);
        cache.set_cacheable(false);
        assert!(cache.buffer().is_none());
        assert_eq!(cache.cached_viewport(), None);
        cache.invalidate(Rect::new(0, 0, 5, 5));
        assert!(cache.dirty_rect().is_empty());
    }

    #[test]
    fn test_nothing_visible() {
        let mut cache = RenderCache::new(true);
        let mut target = Surface::new(300, 20);
        let report = cache.paint(
            &mut PaintContext::new(&mut target),
            CONTENT,
            Rect::from_origin_size(-400, 0, 300, 20),
            render_columns,
        );
        assert_eq!(report, None);
        assert!(cache.buffer().is_none());
    }
}
