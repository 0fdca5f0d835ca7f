//! In-memory console
//!
//! A character grid with one attribute word per cell that behaves like a
//! native console screen buffer: fills wrap across rows and stop at the end
//! of the buffer, scrolls are clipped, and out-of-range cursor moves fail.
//!
//! Every successful primitive is recorded as a [`ConsoleCall`] so tests can
//! assert the exact sequence of operations a command produced. Failures can
//! be injected per operation with [`MemoryConsole::fail_on`].

use std::io;

use serde::{Deserialize, Serialize};

use super::{ConsoleBuffer, ConsoleError, ConsoleResult, StreamId};
use crate::core::{saturate, Attributes, BufferInfo, Coord, Rect};

/// A single buffer cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    pub attr: Attributes,
}

impl Cell {
    pub const fn new(ch: char, attr: Attributes) -> Self {
        Self { ch, attr }
    }
}

/// Primitive operation kinds, used for fault injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleOp {
    BufferInfo,
    SetCursor,
    SetAttributes,
    FillAttributes,
    FillChars,
    ScrollRegion,
    Close,
}

impl ConsoleOp {
    pub fn name(self) -> &'static str {
        match self {
            ConsoleOp::BufferInfo => "buffer info",
            ConsoleOp::SetCursor => "set cursor",
            ConsoleOp::SetAttributes => "set attributes",
            ConsoleOp::FillAttributes => "fill attributes",
            ConsoleOp::FillChars => "fill characters",
            ConsoleOp::ScrollRegion => "scroll region",
            ConsoleOp::Close => "close",
        }
    }
}

/// A recorded primitive call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ConsoleCall {
    BufferInfo,
    SetCursor {
        pos: Coord,
    },
    SetAttributes {
        attributes: Attributes,
    },
    FillAttributes {
        attributes: Attributes,
        count: u32,
        origin: Coord,
    },
    FillChars {
        ch: char,
        count: u32,
        origin: Coord,
    },
    ScrollRegion {
        source: Rect,
        clip: Option<Rect>,
        dest: Coord,
        fill: Attributes,
    },
    Close,
}

impl ConsoleCall {
    /// Whether the call changes console state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ConsoleCall::BufferInfo)
    }
}

/// Serializable view of a [`MemoryConsole`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenDump {
    pub size: Coord,
    pub window: Rect,
    pub cursor: Coord,
    pub attributes: Attributes,
    /// Visible rows, trailing spaces trimmed
    pub rows: Vec<String>,
}

/// Deterministic console screen buffer held in memory
#[derive(Debug, Clone)]
pub struct MemoryConsole {
    stream: StreamId,
    size: Coord,
    window: Rect,
    cursor: Coord,
    attributes: Attributes,
    cells: Vec<Cell>,
    calls: Vec<ConsoleCall>,
    fail_on: Option<ConsoleOp>,
    closed: bool,
}

impl MemoryConsole {
    /// Create a buffer of `cols` x `rows` whose window shows all of it
    pub fn new(cols: i16, rows: i16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let size = Coord::new(cols, rows);
        let attributes = Attributes::DEFAULT;
        Self {
            stream: StreamId::Stdout,
            size,
            window: Rect::of_size(size),
            cursor: Coord::default(),
            attributes,
            cells: vec![Cell::new(' ', attributes); cols as usize * rows as usize],
            calls: Vec::new(),
            fail_on: None,
            closed: false,
        }
    }

    /// Show `height` rows of the buffer starting at row `top`
    pub fn with_window(mut self, top: i16, height: i16) -> Self {
        self.set_window(top, height);
        self
    }

    /// Start with `attributes` as the current word and on every cell
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        for cell in &mut self.cells {
            cell.attr = attributes;
        }
        self
    }

    pub fn with_cursor(mut self, pos: Coord) -> Self {
        self.cursor = pos.clamp_to(self.size);
        self
    }

    /// Move the visible window, as a host would when the user scrolls
    pub fn set_window(&mut self, top: i16, height: i16) {
        let top = top.clamp(0, self.size.y - 1);
        let bottom = i32::from(top) + i32::from(height.max(1)) - 1;
        let bottom = saturate(bottom).min(self.size.y - 1);
        self.window = Rect::new(0, top, self.size.x - 1, bottom);
    }

    /// Move the cursor without recording a call
    pub fn place_cursor(&mut self, pos: Coord) {
        self.cursor = pos.clamp_to(self.size);
    }

    /// Make every subsequent call of kind `op` fail
    pub fn fail_on(&mut self, op: ConsoleOp) {
        self.fail_on = Some(op);
    }

    pub fn clear_failure(&mut self) {
        self.fail_on = None;
    }

    pub fn stream(&self) -> StreamId {
        self.stream
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn window(&self) -> Rect {
        self.window
    }

    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> &[ConsoleCall] {
        &self.calls
    }

    /// Recorded calls that change console state
    pub fn mutations(&self) -> Vec<ConsoleCall> {
        self.calls
            .iter()
            .filter(|call| call.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Cell at a buffer position
    pub fn cell(&self, x: i16, y: i16) -> Option<Cell> {
        self.index_of(Coord::new(x, y)).map(|i| self.cells[i])
    }

    /// Write text at a position as a console would, using the current
    /// attributes. Does not wrap and does not move the cursor.
    pub fn write_at(&mut self, pos: Coord, text: &str) {
        let attr = self.attributes;
        for (i, ch) in text.chars().enumerate() {
            let Ok(dx) = i16::try_from(i) else { break };
            if let Some(idx) = self.index_of(Coord::new(pos.x.saturating_add(dx), pos.y)) {
                self.cells[idx] = Cell::new(ch, attr);
            }
        }
    }

    /// Text of one buffer row, trailing spaces trimmed
    pub fn row_text(&self, y: i16) -> String {
        if y < 0 || y >= self.size.y {
            return String::new();
        }
        let start = y as usize * self.size.x as usize;
        let row: String = self.cells[start..start + self.size.x as usize]
            .iter()
            .map(|cell| cell.ch)
            .collect();
        row.trim_end().to_string()
    }

    /// Rows currently inside the window
    pub fn visible_rows(&self) -> Vec<String> {
        (self.window.top..=self.window.bottom)
            .map(|y| self.row_text(y))
            .collect()
    }

    pub fn dump(&self) -> ScreenDump {
        ScreenDump {
            size: self.size,
            window: self.window,
            cursor: self.cursor,
            attributes: self.attributes,
            rows: self.visible_rows(),
        }
    }

    fn index_of(&self, pos: Coord) -> Option<usize> {
        pos.within(self.size)
            .then(|| pos.y as usize * self.size.x as usize + pos.x as usize)
    }

    fn check(&self, op: ConsoleOp) -> ConsoleResult<()> {
        if self.closed {
            return Err(ConsoleError::io(
                op.name(),
                io::Error::new(io::ErrorKind::NotConnected, "console handle is closed"),
            ));
        }
        if self.fail_on == Some(op) {
            return Err(ConsoleError::io(
                op.name(),
                io::Error::new(io::ErrorKind::Other, "injected failure"),
            ));
        }
        Ok(())
    }

    fn fill_with(
        &mut self,
        op: ConsoleOp,
        count: u32,
        origin: Coord,
        mut write: impl FnMut(&mut Cell),
    ) -> ConsoleResult<u32> {
        let start = self.index_of(origin).ok_or_else(|| {
            ConsoleError::io(
                op.name(),
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("origin ({}, {}) outside buffer", origin.x, origin.y),
                ),
            )
        })?;
        let end = self.cells.len().min(start.saturating_add(count as usize));
        for cell in &mut self.cells[start..end] {
            write(cell);
        }
        Ok((end - start) as u32)
    }
}

impl Default for MemoryConsole {
    /// An 80 column, 300 row buffer showing its first 25 rows
    fn default() -> Self {
        Self::new(80, 300).with_window(0, 25)
    }
}

impl ConsoleBuffer for MemoryConsole {
    fn open(stream: StreamId) -> ConsoleResult<Self> {
        Ok(Self {
            stream,
            ..Self::default()
        })
    }

    fn buffer_info(&mut self) -> ConsoleResult<BufferInfo> {
        self.check(ConsoleOp::BufferInfo)?;
        self.calls.push(ConsoleCall::BufferInfo);
        Ok(BufferInfo {
            cursor: self.cursor,
            size: self.size,
            window: self.window,
            attributes: self.attributes,
        })
    }

    fn set_cursor(&mut self, pos: Coord) -> ConsoleResult<()> {
        self.check(ConsoleOp::SetCursor)?;
        if !pos.within(self.size) {
            return Err(ConsoleError::io(
                ConsoleOp::SetCursor.name(),
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("cursor ({}, {}) outside buffer", pos.x, pos.y),
                ),
            ));
        }
        self.calls.push(ConsoleCall::SetCursor { pos });
        self.cursor = pos;
        Ok(())
    }

    fn set_attributes(&mut self, attributes: Attributes) -> ConsoleResult<()> {
        self.check(ConsoleOp::SetAttributes)?;
        self.calls.push(ConsoleCall::SetAttributes { attributes });
        self.attributes = attributes;
        Ok(())
    }

    fn fill_attributes(
        &mut self,
        attributes: Attributes,
        count: u32,
        origin: Coord,
    ) -> ConsoleResult<u32> {
        self.check(ConsoleOp::FillAttributes)?;
        let written = self.fill_with(ConsoleOp::FillAttributes, count, origin, |cell| {
            cell.attr = attributes
        })?;
        self.calls.push(ConsoleCall::FillAttributes {
            attributes,
            count,
            origin,
        });
        Ok(written)
    }

    fn fill_chars(&mut self, ch: char, count: u32, origin: Coord) -> ConsoleResult<u32> {
        self.check(ConsoleOp::FillChars)?;
        let written = self.fill_with(ConsoleOp::FillChars, count, origin, |cell| cell.ch = ch)?;
        self.calls.push(ConsoleCall::FillChars { ch, count, origin });
        Ok(written)
    }

    fn scroll_region(
        &mut self,
        source: Rect,
        clip: Option<Rect>,
        dest: Coord,
        fill: Attributes,
    ) -> ConsoleResult<()> {
        self.check(ConsoleOp::ScrollRegion)?;
        self.calls.push(ConsoleCall::ScrollRegion {
            source,
            clip,
            dest,
            fill,
        });

        let bounds = Rect::of_size(self.size);
        let clip = clip.unwrap_or(bounds).intersect(&bounds);
        let visible_source = source.intersect(&bounds);
        if visible_source.is_empty() || clip.is_empty() {
            return Ok(());
        }

        let dx = i32::from(dest.x) - i32::from(source.left);
        let dy = i32::from(dest.y) - i32::from(source.top);
        let original = self.cells.clone();
        let blank = Cell::new(' ', fill);

        for y in visible_source.top..=visible_source.bottom {
            for x in visible_source.left..=visible_source.right {
                let pos = Coord::new(x, y);
                if clip.contains(pos) {
                    if let Some(i) = self.index_of(pos) {
                        self.cells[i] = blank;
                    }
                }
            }
        }

        for y in visible_source.top..=visible_source.bottom {
            for x in visible_source.left..=visible_source.right {
                let (Ok(tx), Ok(ty)) = (
                    i16::try_from(i32::from(x) + dx),
                    i16::try_from(i32::from(y) + dy),
                ) else {
                    continue;
                };
                let target = Coord::new(tx, ty);
                if !clip.contains(target) {
                    continue;
                }
                if let (Some(from), Some(to)) =
                    (self.index_of(Coord::new(x, y)), self.index_of(target))
                {
                    self.cells[to] = original[from];
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) -> ConsoleResult<()> {
        self.check(ConsoleOp::Close)?;
        self.calls.push(ConsoleCall::Close);
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_ON_BLUE: Attributes = Attributes::new(0x0014);

    #[test]
    fn test_default_geometry() {
        let mut console = MemoryConsole::default();
        let info = console.buffer_info().unwrap();
        assert_eq!(info.size, Coord::new(80, 300));
        assert_eq!(info.window, Rect::new(0, 0, 79, 24));
        assert_eq!(info.cursor, Coord::new(0, 0));
        assert_eq!(info.attributes, Attributes::DEFAULT);
    }

    #[test]
    fn test_window_stops_at_buffer_end() {
        let mut console = MemoryConsole::new(80, 300);
        console.set_window(250, i16::MAX);
        assert_eq!(console.window(), Rect::new(0, 250, 79, 299));

        console.set_window(-5, 10);
        assert_eq!(console.window(), Rect::new(0, 0, 79, 9));
    }

    #[test]
    fn test_open_records_stream() {
        let console = MemoryConsole::open(StreamId::Stderr).unwrap();
        assert_eq!(console.stream(), StreamId::Stderr);
    }

    #[test]
    fn test_fill_wraps_rows() {
        let mut console = MemoryConsole::new(4, 3);
        let written = console.fill_chars('x', 6, Coord::new(2, 0)).unwrap();
        assert_eq!(written, 6);
        assert_eq!(console.row_text(0), "  xx");
        assert_eq!(console.row_text(1), "xxxx");
        assert_eq!(console.row_text(2), "");
    }

    #[test]
    fn test_fill_stops_at_buffer_end() {
        let mut console = MemoryConsole::new(4, 2);
        let written = console
            .fill_attributes(RED_ON_BLUE, 100, Coord::new(1, 1))
            .unwrap();
        assert_eq!(written, 3);
        assert_eq!(console.cell(0, 1).unwrap().attr, Attributes::DEFAULT);
        assert_eq!(console.cell(3, 1).unwrap().attr, RED_ON_BLUE);
    }

    #[test]
    fn test_fill_outside_buffer_fails() {
        let mut console = MemoryConsole::new(4, 2);
        let err = console.fill_chars('x', 1, Coord::new(0, 2)).unwrap_err();
        assert!(matches!(err, ConsoleError::Io { op: "fill characters", .. }));
        assert!(console.calls().is_empty());
    }

    #[test]
    fn test_set_cursor_outside_buffer_fails() {
        let mut console = MemoryConsole::new(10, 5);
        assert!(console.set_cursor(Coord::new(10, 0)).is_err());
        assert!(console.set_cursor(Coord::new(9, 4)).is_ok());
        assert_eq!(console.cursor(), Coord::new(9, 4));
    }

    #[test]
    fn test_scroll_up_one_row() {
        let mut console = MemoryConsole::new(5, 4);
        for y in 0..4 {
            console.write_at(Coord::new(0, y), &format!("row{y}"));
        }
        console
            .scroll_region(Rect::new(0, 0, 4, 3), None, Coord::new(0, -1), RED_ON_BLUE)
            .unwrap();
        assert_eq!(console.row_text(0), "row1");
        assert_eq!(console.row_text(2), "row3");
        assert_eq!(console.row_text(3), "");
        assert_eq!(console.cell(0, 3).unwrap().attr, RED_ON_BLUE);
    }

    #[test]
    fn test_scroll_down_one_row() {
        let mut console = MemoryConsole::new(5, 4);
        for y in 0..4 {
            console.write_at(Coord::new(0, y), &format!("row{y}"));
        }
        console
            .scroll_region(Rect::new(0, 0, 4, 3), None, Coord::new(0, 1), Attributes::DEFAULT)
            .unwrap();
        assert_eq!(console.row_text(0), "");
        assert_eq!(console.row_text(1), "row0");
        assert_eq!(console.row_text(3), "row2");
    }

    #[test]
    fn test_scroll_source_above_buffer() {
        let mut console = MemoryConsole::new(5, 6);
        for y in 0..6 {
            console.write_at(Coord::new(0, y), &format!("row{y}"));
        }
        console
            .scroll_region(Rect::new(0, -3, 4, 2), None, Coord::new(0, -4), Attributes::DEFAULT)
            .unwrap();
        assert_eq!(console.row_text(0), "row1");
        assert_eq!(console.row_text(1), "row2");
        assert_eq!(console.row_text(2), "");
        assert_eq!(console.row_text(3), "row3");
    }

    #[test]
    fn test_scroll_respects_clip() {
        let mut console = MemoryConsole::new(5, 4);
        for y in 0..4 {
            console.write_at(Coord::new(0, y), &format!("row{y}"));
        }
        console
            .scroll_region(
                Rect::new(0, 0, 4, 3),
                Some(Rect::new(0, 1, 4, 3)),
                Coord::new(0, -1),
                Attributes::DEFAULT,
            )
            .unwrap();
        assert_eq!(console.row_text(0), "row0");
        assert_eq!(console.row_text(1), "row2");
        assert_eq!(console.row_text(2), "row3");
        assert_eq!(console.row_text(3), "");
    }

    #[test]
    fn test_injected_failure() {
        let mut console = MemoryConsole::new(10, 5);
        console.fail_on(ConsoleOp::SetAttributes);
        let err = console.set_attributes(RED_ON_BLUE).unwrap_err();
        assert!(matches!(err, ConsoleError::Io { op: "set attributes", .. }));
        assert_eq!(console.attributes(), Attributes::DEFAULT);

        console.clear_failure();
        console.set_attributes(RED_ON_BLUE).unwrap();
        assert_eq!(console.attributes(), RED_ON_BLUE);
    }

    #[test]
    fn test_closed_console_rejects_calls() {
        let mut console = MemoryConsole::new(10, 5);
        console.close().unwrap();
        assert!(console.is_closed());
        assert!(console.buffer_info().is_err());
        assert!(console.close().is_err());
    }

    #[test]
    fn test_dump_serialization() {
        let mut console = MemoryConsole::new(10, 3);
        console.write_at(Coord::new(0, 1), "hi");
        let dump = console.dump();
        assert_eq!(dump.rows, vec!["", "hi", ""]);

        let json = serde_json::to_string(&dump).unwrap();
        let restored: ScreenDump = serde_json::from_str(&json).unwrap();
        assert_eq!(dump, restored);
    }

    #[test]
    fn test_call_serialization() {
        let call = ConsoleCall::FillChars {
            ch: ' ',
            count: 80,
            origin: Coord::new(0, 5),
        };
        let json = serde_json::to_string(&call).unwrap();
        assert!(json.contains("\"call\":\"fill_chars\""));
        let restored: ConsoleCall = serde_json::from_str(&json).unwrap();
        assert_eq!(call, restored);
    }
}
