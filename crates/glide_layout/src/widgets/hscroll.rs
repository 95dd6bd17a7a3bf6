//! Horizontal scroll view with momentum and an incremental render cache
//!
//! The view holds one content piece wider than itself and pans it
//! horizontally. The viewport is expressed by moving the content: a viewport
//! at `x` places the content at `-x`.
//!
//! # Example
//!
//! ```rust
//! use glide_core::geometry::{Point, Rect, Size};
//! use glide_layout::{HScrollView, Piece, ScrollViewConfig};
//! use glide_paint::{Color, PaintContext, Surface};
//!
//! struct Strip;
//!
//! impl Piece for Strip {
//!     fn size(&self) -> Size {
//!         Size::new(1000, 80)
//!     }
//!
//!     fn paint(&mut self, ctx: &mut PaintContext<'_>) {
//!         ctx.fill_rect(self.rect(), Color::from_hex(0x3366cc));
//!     }
//! }
//!
//! let mut view = HScrollView::new(Rect::new(0, 0, 300, 80), ScrollViewConfig::default());
//! view.add_child(Box::new(Strip), Point::ZERO);
//!
//! view.move_viewport(250, 40);
//! assert_eq!(view.viewport(), Rect::new(250, 0, 550, 80));
//!
//! let mut surface = Surface::new(300, 80);
//! view.paint(&mut PaintContext::new(&mut surface));
//! ```
//!
//! # Input
//!
//! Feed pointer events through [`HScrollView::handle_event`] and drive time
//! with [`HScrollView::on_timers`] and [`HScrollView::on_frame`]. Responses of
//! [`EventResponse::PassThrough`] mean the event belongs to the content.

use std::cell::Cell;

use glide_animation::{FlingGeometry, FrameTicker, MomentumSession, MovingStatus, VelocityTracker};
use glide_core::events::{event_types, Event, EventResponse};
use glide_core::geometry::{Point, Rect, Size};
use glide_core::timer::{TimerId, TimerQueue};
use glide_paint::{Color, PaintContext};
use slotmap::SlotMap;
use smallvec::smallvec;

use crate::config::ScrollViewConfig;
use crate::gesture::{GesturePhase, GestureTracker, MoveAction, ReleaseAction};
use crate::piece::{ChildPiece, Piece, PieceId, PieceItem};
use crate::render_cache::RenderCache;
use crate::scrollbar::{thumb_rect, ScrollbarIndicator};

/// Backdrop stripe pattern: `STRIPE` rows of one color, `GAP` of the other
const STRIPE: i32 = 4;
const GAP: i32 = 1;

/// One-shot timers a view arms
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewTimer {
    PressTimeout,
    HideScrollbar,
}

/// A running fling and the clock that drives it
struct ActiveMomentum {
    session: MomentumSession,
    ticker: FrameTicker,
}

// ============================================================================
// HScrollView
// ============================================================================

/// A horizontally scrolling viewport onto a single content piece
pub struct HScrollView {
    config: ScrollViewConfig,
    rect: Rect,
    children: SlotMap<PieceId, PieceItem>,
    order: Vec<PieceId>,
    scrollbar: PieceId,
    /// First non-scrollbar child, looked up once and reset on restructuring
    content: Cell<Option<PieceId>>,
    ratio_x: f32,
    ratio_y: f32,
    show_scrollbar: bool,
    scrollbar_hidden: bool,
    gesture: GestureTracker,
    velocity: VelocityTracker,
    momentum: Option<ActiveMomentum>,
    timers: TimerQueue<ViewTimer>,
    press_timer: Option<TimerId>,
    hide_timer: Option<TimerId>,
    cache: RenderCache,
    /// View-space area the host must repaint
    damage: Rect,
}

impl HScrollView {
    /// Create an empty view occupying `rect` in its parent
    pub fn new(rect: Rect, config: ScrollViewConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid scroll view config: {:?}", config.validate());
        let mut children = SlotMap::with_key();
        let scrollbar = children.insert(PieceItem {
            piece: ChildPiece::Scrollbar(ScrollbarIndicator::new(&config.scrollbar)),
            origin: Point::ZERO,
        });

        Self {
            rect,
            children,
            order: vec![scrollbar],
            scrollbar,
            content: Cell::new(None),
            ratio_x: 1.0,
            ratio_y: 0.0,
            show_scrollbar: config.show_scrollbar,
            scrollbar_hidden: true,
            gesture: GestureTracker::new(config.gesture),
            velocity: VelocityTracker::new(),
            momentum: None,
            timers: TimerQueue::new(),
            press_timer: None,
            hide_timer: None,
            cache: RenderCache::new(config.cacheable),
            damage: Rect::EMPTY,
            config,
        }
    }

    pub fn config(&self) -> &ScrollViewConfig {
        &self.config
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn size(&self) -> Size {
        self.rect.size()
    }

    /// Move or resize the view; the render cache is dropped
    pub fn set_rect(&mut self, rect: Rect) {
        self.cache.discard();
        self.rect = rect;
        self.damage = Rect::from_size(rect.size());
    }

    fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    // ========================================================================
    // Children
    // ========================================================================

    /// Add a child at `origin` (view coordinates)
    pub fn add_child(&mut self, piece: Box<dyn Piece>, origin: Point) -> PieceId {
        let id = self.children.insert(PieceItem {
            piece: ChildPiece::Content(piece),
            origin,
        });
        self.order.push(id);
        self.content.set(None);
        self.add_damage(self.children[id].rect());
        id
    }

    /// Remove a child. The scrollbar indicator cannot be removed.
    pub fn remove_child(&mut self, id: PieceId) -> Option<Box<dyn Piece>> {
        if id == self.scrollbar {
            return None;
        }
        let was_content = self.content_id() == Some(id);
        let item = self.children.remove(id)?;
        self.order.retain(|&child| child != id);
        self.content.set(None);
        if was_content {
            self.cache.discard();
        }
        self.add_damage(item.rect());
        match item.piece {
            ChildPiece::Content(piece) => Some(piece),
            ChildPiece::Scrollbar(_) => None,
        }
    }

    /// The scrolled child: the first child that is not the scrollbar
    pub fn content_id(&self) -> Option<PieceId> {
        if let Some(id) = self.content.get() {
            return Some(id);
        }
        let found = self
            .order
            .iter()
            .copied()
            .find(|id| self.children.get(*id).is_some_and(|item| !item.is_scrollbar()));
        self.content.set(found);
        found
    }

    pub fn content(&self) -> Option<&dyn Piece> {
        self.content_id().and_then(|id| self.children.get(id)?.content())
    }

    pub fn content_mut(&mut self) -> Option<&mut (dyn Piece + 'static)> {
        let id = self.content_id()?;
        self.children.get_mut(id)?.content_mut()
    }

    fn content_item(&self) -> Option<&PieceItem> {
        self.content_id().and_then(|id| self.children.get(id))
    }

    /// Size of the content, zero without content
    pub fn content_size(&self) -> Size {
        self.content_item().map_or(Size::new(0, 0), |item| item.local_rect().size())
    }

    pub fn piece_origin(&self, id: PieceId) -> Option<Point> {
        self.children.get(id).map(|item| item.origin)
    }

    /// Place a child at `origin`, invalidating where it was and where it lands
    ///
    /// Moving the content keeps the render cache: its pixels are unchanged,
    /// only where they show.
    pub fn move_piece(&mut self, id: PieceId, origin: Point) {
        let reserve_cache = self.content_id() == Some(id);
        if !self.children.contains_key(id) {
            tracing::debug!("move_piece on unknown child {:?}", id);
            return;
        }
        self.invalidate_piece(id, None, reserve_cache);
        if let Some(item) = self.children.get_mut(id) {
            item.origin = origin;
        }
        self.invalidate_piece(id, None, reserve_cache);
    }

    /// Mark part of a child (local coordinates, whole child when `None`) for repaint
    ///
    /// With `reserve_cache` unset, content invalidations also dirty the render
    /// cache so the region is re-rendered instead of copied.
    pub fn invalidate_piece(&mut self, id: PieceId, rect: Option<Rect>, reserve_cache: bool) {
        let Some(item) = self.children.get(id) else {
            return;
        };
        let local = rect.unwrap_or_else(|| item.local_rect());
        let in_view = local.offset(item.origin.x, item.origin.y);
        self.add_damage(in_view);

        if !reserve_cache && self.content_id() == Some(id) {
            self.cache.invalidate(local);
        }
    }

    fn add_damage(&mut self, rect: Rect) {
        let rect = rect.intersect(&self.bounds());
        self.damage = self.damage.union(&rect);
    }

    /// Take the accumulated view-space damage, leaving none behind
    pub fn take_damage(&mut self) -> Rect {
        std::mem::replace(&mut self.damage, Rect::EMPTY)
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    /// The visible window in content coordinates
    pub fn viewport(&self) -> Rect {
        let size = self.size();
        match self.content_item() {
            Some(item) => Rect::from_origin_size(-item.origin.x, -item.origin.y, size.width, size.height),
            None => Rect::from_size(size),
        }
    }

    /// Scroll so the viewport's left edge sits at `x`
    ///
    /// Vertical scrolling is disabled, so `y` is ignored. `x` is clamped to
    /// the content extent widened by the overscroll allowance on both sides.
    pub fn move_viewport(&mut self, x: i32, _y: i32) {
        let Some(id) = self.content_id() else {
            return;
        };
        let allowance = self.config.overscroll_allowance;
        let max = (self.content_size().width + allowance - self.size().width).max(0);
        let x = if x < -allowance { -allowance } else { x.min(max) };
        self.move_piece(id, Point::new(-x, 0));
    }

    /// Whether the content is wider than the view
    pub fn can_scroll(&self) -> bool {
        self.content_item().is_some() && self.viewport().width() < self.content_size().width
    }

    // ========================================================================
    // Cache and scrollbar
    // ========================================================================

    pub fn enable_cache(&mut self, cacheable: bool) {
        self.cache.set_cacheable(cacheable);
    }

    pub fn is_cacheable(&self) -> bool {
        self.cache.is_cacheable()
    }

    pub fn render_cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Whether the scrollbar indicator is wanted at all
    pub fn show_scrollbar(&mut self, show: bool) {
        self.show_scrollbar = show;
    }

    /// Whether the indicator would be drawn on the next paint
    pub fn is_scrollbar_visible(&self) -> bool {
        self.show_scrollbar && !self.scrollbar_hidden
    }

    fn current_thumb(&self) -> Option<Rect> {
        thumb_rect(
            self.size(),
            self.viewport(),
            self.content_size().width,
            self.config.overscroll_allowance,
            &self.config.scrollbar,
        )
    }

    fn set_scrollbar_hidden(&mut self, hidden: bool) {
        if self.scrollbar_hidden == hidden {
            return;
        }
        self.scrollbar_hidden = hidden;
        let old = self.children.get(self.scrollbar).map_or(Rect::EMPTY, |item| item.rect());
        let new = self.current_thumb().unwrap_or(Rect::EMPTY);
        self.add_damage(old.union(&new));
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Earliest pending timer deadline, for the host's event loop
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Fire every timer due at `now_ms`
    pub fn on_timers(&mut self, now_ms: u64) {
        for (id, timer) in self.timers.take_due(now_ms) {
            match timer {
                ViewTimer::PressTimeout => {
                    if self.press_timer == Some(id) {
                        self.press_timer = None;
                    }
                    if let Some(at) = self.gesture.check_timeout(now_ms) {
                        self.forward_press(at, now_ms);
                    }
                }
                ViewTimer::HideScrollbar => {
                    if self.hide_timer == Some(id) {
                        self.hide_timer = None;
                    }
                    self.set_scrollbar_hidden(true);
                }
            }
        }
    }

    fn arm_press_timer(&mut self, now_ms: u64) {
        self.cancel_press_timer();
        let delay = self.config.gesture.press_timeout_ms;
        self.press_timer = Some(self.timers.start(ViewTimer::PressTimeout, now_ms, delay));
    }

    fn cancel_press_timer(&mut self) {
        if let Some(id) = self.press_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn arm_hide_timer(&mut self, now_ms: u64) {
        self.cancel_hide_timer();
        let delay = self.config.scrollbar.auto_hide_ms;
        self.hide_timer = Some(self.timers.start(ViewTimer::HideScrollbar, now_ms, delay));
    }

    /// A press cancels the hide timer; its release must put it back
    fn rearm_hide_timer(&mut self, now_ms: u64) {
        if !self.scrollbar_hidden && self.momentum.is_none() {
            self.arm_hide_timer(now_ms);
        }
    }

    fn cancel_hide_timer(&mut self) {
        if let Some(id) = self.hide_timer.take() {
            self.timers.cancel(id);
        }
    }

    // ========================================================================
    // Momentum
    // ========================================================================

    pub fn is_animating(&self) -> bool {
        self.momentum.is_some()
    }

    /// Moving status of the running fling
    pub fn moving_status(&self) -> Option<MovingStatus> {
        self.momentum.as_ref().map(|m| m.session.status())
    }

    /// Start a fling with a pointer velocity (px/s)
    ///
    /// # Panics
    ///
    /// Panics if a fling is already running or the content cannot scroll.
    pub fn start_momentum(&mut self, pointer_vx: f32) {
        assert!(self.momentum.is_none(), "momentum session started while another is active");
        let viewport = self.viewport();
        let geometry = FlingGeometry {
            offset: viewport.left as f32,
            viewport_width: viewport.width() as f32,
            content_width: self.content_size().width as f32,
            overscroll_allowance: self.config.overscroll_allowance as f32,
        };
        // Dragging the pointer left moves the viewport right
        let session = MomentumSession::start(self.config.momentum, geometry, -pointer_vx);
        self.momentum = Some(ActiveMomentum {
            session,
            ticker: FrameTicker::new(self.config.frame_rate),
        });
    }

    /// Tear down the running fling and schedule the scrollbar to hide
    ///
    /// # Panics
    ///
    /// Panics if no fling is running.
    pub fn stop_momentum(&mut self, now_ms: u64) {
        match self.momentum.as_mut() {
            Some(active) => active.session.destroy(),
            None => panic!("stop_momentum without an active session"),
        }
        self.momentum = None;
        self.arm_hide_timer(now_ms);
    }

    /// Advance the running fling to `now_ms`
    ///
    /// Returns whether another frame is needed.
    pub fn on_frame(&mut self, now_ms: u64) -> bool {
        let outcome = match self.momentum.as_mut() {
            Some(active) => {
                let dt = active.ticker.tick(now_ms);
                active.session.tick(dt)
            }
            None => return false,
        };

        self.move_viewport(outcome.offset() as i32, 0);
        if outcome.is_stopped() {
            self.stop_momentum(now_ms);
            false
        } else {
            true
        }
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    pub fn gesture(&self) -> &GestureTracker {
        &self.gesture
    }

    /// Dispatch a pointer event in view coordinates
    pub fn handle_event(&mut self, event: &Event) -> EventResponse {
        let now = event.timestamp;
        match (event.event_type, event.position()) {
            (event_types::POINTER_DOWN, Some(at)) => self.on_press(at, now),
            (event_types::POINTER_MOVE, Some(at)) => self.on_pointer_move(at, now),
            (event_types::POINTER_UP, Some(at)) => self.on_release(at, now),
            (event_types::POINTER_LEAVE, _) => self.on_pointer_leave(now),
            _ => EventResponse::PassThrough,
        }
    }

    pub fn on_press(&mut self, at: Point, now_ms: u64) -> EventResponse {
        self.cancel_hide_timer();
        let outcome = self.gesture.press(at, now_ms, self.momentum.is_some());
        self.velocity.reset(at, now_ms);

        if outcome.interrupt_momentum {
            tracing::debug!("press interrupted momentum");
            self.stop_momentum(now_ms);
        }
        if outcome.arm_timer {
            self.arm_press_timer(now_ms);
        }
        EventResponse::Handled
    }

    pub fn on_pointer_move(&mut self, at: Point, now_ms: u64) -> EventResponse {
        let outcome = self.gesture.pointer_move(at, now_ms);
        self.drop_press_timer_once_classified();
        if let Some(press) = outcome.forward_press {
            self.forward_press(press, now_ms);
        }

        match outcome.action {
            MoveAction::Dropped => EventResponse::Handled,
            MoveAction::PassToChild => EventResponse::PassThrough,
            MoveAction::Pan { dx, dy } => {
                self.velocity.record(at, now_ms);
                if self.can_scroll() {
                    let viewport = self.viewport();
                    self.move_viewport(
                        viewport.left + (dx as f32 * self.ratio_x) as i32,
                        viewport.top + (dy as f32 * self.ratio_y) as i32,
                    );
                    self.cancel_hide_timer();
                    self.set_scrollbar_hidden(false);
                }
                EventResponse::Handled
            }
        }
    }

    pub fn on_release(&mut self, at: Point, now_ms: u64) -> EventResponse {
        let outcome = self.gesture.release(at, now_ms);
        self.cancel_press_timer();
        if let Some(press) = outcome.forward_press {
            self.forward_press(press, now_ms);
        }

        match outcome.action {
            ReleaseAction::Dropped => EventResponse::Handled,
            ReleaseAction::PassToChild => {
                self.rearm_hide_timer(now_ms);
                EventResponse::PassThrough
            }
            ReleaseAction::Handled => {
                self.rearm_hide_timer(now_ms);
                EventResponse::Handled
            }
            ReleaseAction::Fling => {
                let (vx, vy) = self.velocity.velocity(now_ms);
                if self.can_scroll() {
                    self.start_momentum(vx);
                } else {
                    self.rearm_hide_timer(now_ms);
                }

                if vx < -self.config.reveal_fling_velocity && vx.abs() > 10.0 * vy.abs() {
                    tracing::debug!("fast leftward fling, forwarding press to content");
                    let press = self.gesture.press_position();
                    self.forward_press(press, now_ms);
                    EventResponse::PassThrough
                } else {
                    EventResponse::Handled
                }
            }
        }
    }

    /// The pointer left the view; a held press ends where it was last seen
    pub fn on_pointer_leave(&mut self, now_ms: u64) -> EventResponse {
        if self.gesture.is_pressed() {
            let at = self.gesture.last_position();
            self.on_release(at, now_ms);
        }
        self.cancel_press_timer();
        EventResponse::Handled
    }

    fn drop_press_timer_once_classified(&mut self) {
        if self.gesture.phase() != GesturePhase::Pressed {
            self.cancel_press_timer();
        }
    }

    /// Deliver a synthetic press to the content at view position `at`
    fn forward_press(&mut self, at: Point, now_ms: u64) {
        let viewport = self.viewport();
        let local = at.offset(viewport.left, viewport.top);
        let Some(content) = self.content_mut() else {
            return;
        };
        tracing::debug!("forwarding press to content at {:?}", local);
        content.process_event(&Event::pointer(event_types::POINTER_DOWN, local.x, local.y, now_ms));
    }

    // ========================================================================
    // Painting
    // ========================================================================

    /// Paint the view into `target`, whose origin is the view's top-left
    pub fn paint(&mut self, target: &mut PaintContext<'_>) {
        let bounds = self.bounds();
        let mut clipped = target.sub_context(Point::ZERO, Some(bounds));
        let target = &mut clipped;

        // Content narrower than the view sits at the left edge
        if let Some(id) = self.content_id() {
            let origin = self.children[id].origin;
            if bounds.width() >= self.content_size().width && origin.x != 0 {
                self.move_piece(id, Point::new(0, origin.y));
            }
        }

        self.paint_backdrop(target, bounds);
        self.paint_content(target);

        for &id in &self.order {
            if Some(id) == self.content.get() {
                continue;
            }
            if let Some(PieceItem {
                piece: ChildPiece::Content(piece),
                origin,
            }) = self.children.get_mut(id)
            {
                let mut ctx = target.sub_context(*origin, None);
                piece.paint(&mut ctx);
            }
        }

        if self.is_scrollbar_visible() {
            let thumb = self.current_thumb();
            if let Some(PieceItem {
                piece: ChildPiece::Scrollbar(bar),
                ..
            }) = self.children.get_mut(self.scrollbar)
            {
                bar.set_thumb(thumb);
                bar.paint(target);
            }
        }
    }

    fn paint_backdrop(&self, target: &mut PaintContext<'_>, bounds: Rect) {
        let uncovered = match self.content_item() {
            Some(item) => bounds.subtract(&item.rect()),
            None => smallvec![bounds],
        };
        let stripe = Color::from_hex(0xd0d0d0);
        let gap = Color::from_hex(0xe0e0e0);
        for area in uncovered {
            let mut y = area.top;
            while y < area.bottom {
                target.fill_rect(Rect::new(area.left, y, area.right, (y + STRIPE).min(area.bottom)), stripe);
                target.fill_rect(
                    Rect::new(area.left, y + STRIPE, area.right, (y + STRIPE + GAP).min(area.bottom)),
                    gap,
                );
                y += STRIPE + GAP;
            }
        }
    }

    fn paint_content(&mut self, target: &mut PaintContext<'_>) {
        let Some(id) = self.content_id() else {
            return;
        };
        let viewport = self.viewport();
        let Some(item) = self.children.get_mut(id) else {
            return;
        };
        let origin = item.origin;
        let ChildPiece::Content(piece) = &mut item.piece else {
            return;
        };
        let content_rect = piece.rect();

        if self.cache.is_cacheable() {
            self.cache
                .paint(target, content_rect, viewport, |ctx| piece.paint(ctx));
        } else {
            let clip = content_rect.offset(origin.x, origin.y);
            let mut ctx = target.sub_context(origin, Some(clip));
            piece.paint(&mut ctx);
        }
    }
}

impl Drop for HScrollView {
    fn drop(&mut self) {
        if let Some(active) = self.momentum.as_mut() {
            active.session.destroy();
        }
        self.momentum = None;
    }
}
