//! Console Core Module
//!
//! Platform-independent pieces of the translator:
//! - Packed attribute word and the ANSI color lookup
//! - Buffer coordinates and rectangles
//! - Buffer info snapshots
//!
//! Nothing here talks to a console; these are plain values that the
//! translator computes with before issuing provider calls.

pub mod attr;
mod geometry;
mod snapshot;

pub use attr::Attributes;
pub use geometry::{Coord, Rect};
pub(crate) use geometry::saturate;
pub use snapshot::BufferInfo;
