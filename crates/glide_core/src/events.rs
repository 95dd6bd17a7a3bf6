//! Pointer event model
//!
//! Events are delivered to pieces by the host. A piece answers with an
//! [`EventResponse`] telling the host whether it consumed the event or whether
//! the event belongs to the piece underneath.

use crate::geometry::Point;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    /// Pointer left the piece while a button may still be held
    pub const POINTER_LEAVE: EventType = 5;
    /// Synthetic: a press was held still for the disambiguation window
    pub const PRESS_TIMEOUT: EventType = 50;
}

/// A UI event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
    /// Milliseconds on the host's monotonic clock
    pub timestamp: u64,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Pointer { x: i32, y: i32 },
    None,
}

impl Event {
    /// Create a pointer event at `(x, y)`
    pub fn pointer(event_type: EventType, x: i32, y: i32, timestamp: u64) -> Self {
        Self {
            event_type,
            data: EventData::Pointer { x, y },
            timestamp,
        }
    }

    /// Pointer position, if this is a pointer event
    pub fn position(&self) -> Option<Point> {
        match self.data {
            EventData::Pointer { x, y } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// Result of delivering an event to a piece
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventResponse {
    /// The piece consumed the event
    #[default]
    Handled,
    /// The event belongs to the child underneath; the host should deliver it there
    PassThrough,
}

impl EventResponse {
    pub fn is_pass_through(&self) -> bool {
        matches!(self, EventResponse::PassThrough)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_position() {
        let e = Event::pointer(event_types::POINTER_DOWN, 12, -3, 40);
        assert_eq!(e.position(), Some(Point::new(12, -3)));

        let r = Event {
            event_type: event_types::POINTER_LEAVE,
            data: EventData::None,
            timestamp: 0,
        };
        assert_eq!(r.position(), None);
    }
}
