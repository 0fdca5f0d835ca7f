//! Scroll up / scroll down
//!
//! Positive row counts move content up (new lines appear at the bottom),
//! negative counts move it down (new lines appear at the top), following
//! terminal semantics rather than raw buffer offsets.
//!
//! The scrolled region is the window-height span of rows ending at the
//! cursor, full buffer width. Its top is computed from the cursor and may
//! lie above row 0; the console clips it. The console does not blank the
//! rows it exposes when older content is still in the buffer, it shows that
//! content instead, only rows that have nothing to show come up blank.

use tracing::trace;

use super::AnsiTranslator;
use crate::console::{ConsoleBuffer, ConsoleResult};
use crate::core::{saturate, BufferInfo, Coord, Rect};

/// Source rectangle and destination of a scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollGeometry {
    pub source: Rect,
    pub dest: Coord,
}

/// Geometry for scrolling `rows` lines, or `None` when there is nothing to
/// scroll
pub fn scroll_geometry(info: &BufferInfo, rows: i16) -> Option<ScrollGeometry> {
    if rows == 0 {
        return None;
    }
    let top = saturate(i32::from(info.cursor.y) - i32::from(info.window.height()));
    let source = Rect {
        top,
        bottom: info.cursor.y,
        left: 0,
        right: saturate(i32::from(info.size.x) - 1),
    };
    let dest = Coord {
        x: 0,
        y: saturate(i32::from(source.top) - i32::from(rows)),
    };
    Some(ScrollGeometry { source, dest })
}

impl<B: ConsoleBuffer> AnsiTranslator<B> {
    /// CSI S
    pub fn scroll_up(&mut self, count: u16) -> ConsoleResult<()> {
        self.scroll(saturate(i32::from(count)))
    }

    /// CSI T
    pub fn scroll_down(&mut self, count: u16) -> ConsoleResult<()> {
        self.scroll(saturate(-i32::from(count)))
    }

    /// Scroll by `rows`: positive moves content up, negative moves it down.
    /// Zero issues no console calls at all.
    pub fn scroll(&mut self, rows: i16) -> ConsoleResult<()> {
        if rows == 0 {
            return Ok(());
        }
        let info = self.console.buffer_info()?;
        let Some(geometry) = scroll_geometry(&info, rows) else {
            return Ok(());
        };
        trace!(rows, source = ?geometry.source, dest = ?geometry.dest, "scroll");
        // Exposed cells take whatever attributes the console is using now
        self.console
            .scroll_region(geometry.source, None, geometry.dest, info.attributes)
    }
}
