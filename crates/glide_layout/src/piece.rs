//! Child pieces of a view
//!
//! A piece is anything that can report its size and paint itself in its own
//! coordinates. A view places pieces at an origin and owns them.

use glide_core::events::{Event, EventResponse};
use glide_core::geometry::{Point, Rect, Size};
use glide_paint::PaintContext;
use slotmap::new_key_type;

use crate::scrollbar::ScrollbarIndicator;

new_key_type! {
    /// Handle to a child of a view
    pub struct PieceId;
}

/// A paintable, event-receiving element
pub trait Piece {
    /// Extent of the piece; its local coordinates span `(0, 0)..size`
    fn size(&self) -> Size;

    /// Paint into `ctx`, whose origin is the piece's top-left corner
    ///
    /// `ctx.clip_rect()` is the only area that needs painting.
    fn paint(&mut self, ctx: &mut PaintContext<'_>);

    /// Handle an event in local coordinates
    fn process_event(&mut self, _event: &Event) -> EventResponse {
        EventResponse::PassThrough
    }

    /// Local bounds
    fn rect(&self) -> Rect {
        Rect::from_size(self.size())
    }
}

pub(crate) enum ChildPiece {
    Scrollbar(ScrollbarIndicator),
    Content(Box<dyn Piece>),
}

/// A child and where it sits in the view
pub(crate) struct PieceItem {
    pub piece: ChildPiece,
    pub origin: Point,
}

impl PieceItem {
    pub fn is_scrollbar(&self) -> bool {
        matches!(self.piece, ChildPiece::Scrollbar(_))
    }

    /// Local bounds of the child
    pub fn local_rect(&self) -> Rect {
        match &self.piece {
            ChildPiece::Scrollbar(bar) => bar.rect(),
            ChildPiece::Content(piece) => piece.rect(),
        }
    }

    /// Bounds in view coordinates
    pub fn rect(&self) -> Rect {
        self.local_rect().offset(self.origin.x, self.origin.y)
    }

    pub fn content(&self) -> Option<&dyn Piece> {
        match &self.piece {
            ChildPiece::Content(piece) => Some(piece.as_ref()),
            ChildPiece::Scrollbar(_) => None,
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut (dyn Piece + 'static)> {
        match &mut self.piece {
            ChildPiece::Content(piece) => Some(piece.as_mut()),
            ChildPiece::Scrollbar(_) => None,
        }
    }
}
