//! Buffer info snapshot
//!
//! A point-in-time copy of what the console reports about itself. Handlers
//! fetch a fresh one before every command: the console is shared with the
//! host and the output stream, so a cached copy goes stale between escape
//! sequences.

use serde::{Deserialize, Serialize};

use super::attr::Attributes;
use super::geometry::{Coord, Rect};

/// Geometry, cursor and attributes of a console screen buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferInfo {
    /// Cursor position in buffer coordinates
    pub cursor: Coord,
    /// Total buffer size (columns, rows)
    pub size: Coord,
    /// Visible window inside the buffer
    pub window: Rect,
    /// Attribute word applied to newly written text
    pub attributes: Attributes,
}

impl BufferInfo {
    /// Number of columns in the buffer
    pub fn columns(&self) -> i32 {
        i32::from(self.size.x)
    }

    /// Number of cells between the start of the buffer and `pos`
    pub fn offset_of(&self, pos: Coord) -> i32 {
        i32::from(pos.y) * self.columns() + i32::from(pos.x)
    }

    /// Clamp a position into the buffer
    pub fn clamp(&self, pos: Coord) -> Coord {
        pos.clamp_to(self.size)
    }
}
