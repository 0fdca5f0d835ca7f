//! Buffer coordinates and rectangles
//!
//! All positions are buffer-relative: row 0 is the top of the scrollback
//! buffer, not the top of the visible window. Values are signed 16-bit to
//! match the native console structures, so rectangles computed relative to
//! the cursor may start above the buffer.

use serde::{Deserialize, Serialize};

/// A cell position (or a size, when used for buffer dimensions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    /// Column
    pub x: i16,
    /// Row
    pub y: i16,
}

impl Coord {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Clamp into a buffer of the given size
    pub fn clamp_to(self, size: Coord) -> Self {
        Self {
            x: self.x.clamp(0, (size.x - 1).max(0)),
            y: self.y.clamp(0, (size.y - 1).max(0)),
        }
    }

    /// Whether this position lies inside a buffer of the given size
    pub fn within(self, size: Coord) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < size.x && self.y < size.y
    }
}

/// An inclusive rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

impl Rect {
    pub const fn new(left: i16, top: i16, right: i16, bottom: i16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The rectangle covering a whole buffer of the given size
    pub const fn of_size(size: Coord) -> Self {
        Self::new(0, 0, size.x - 1, size.y - 1)
    }

    /// `right - left`, the native console convention (one less than the
    /// number of columns covered)
    pub const fn width(&self) -> i16 {
        self.right - self.left
    }

    /// `bottom - top`, the native console convention (one less than the
    /// number of rows covered)
    pub const fn height(&self) -> i16 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    pub fn contains(&self, pos: Coord) -> bool {
        pos.x >= self.left && pos.x <= self.right && pos.y >= self.top && pos.y <= self.bottom
    }

    /// Overlap of two rectangles (may be empty)
    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }
}

/// Narrow an `i32` into the coordinate range
pub(crate) fn saturate(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}
