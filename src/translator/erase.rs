//! Erase in line / erase in display
//!
//! Erasing writes spaces in the attributes captured at construction, not
//! the current ones, so an erased region looks like untouched console even
//! after colors were changed mid-stream. Each erase is one attribute fill
//! followed by one character fill over the same run.

use tracing::trace;

use super::{AnsiTranslator, EraseMode};
use crate::console::{ConsoleBuffer, ConsoleResult};
use crate::core::{BufferInfo, Coord};

/// Contiguous cells to fill, wrapping across rows from `origin`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FillRun {
    pub origin: Coord,
    pub count: i32,
}

/// Run covered by an erase-in-line on the cursor row
pub(crate) fn line_run(info: &BufferInfo, mode: EraseMode) -> FillRun {
    let cursor = info.cursor;
    let row_start = Coord::new(0, cursor.y);
    match mode {
        EraseMode::All => FillRun {
            origin: row_start,
            count: info.columns(),
        },
        EraseMode::ToBeginning => FillRun {
            origin: row_start,
            count: i32::from(cursor.x),
        },
        EraseMode::ToEnd => FillRun {
            origin: cursor,
            count: info.columns() - i32::from(cursor.x),
        },
    }
}

/// Run covered by an erase-in-display over the visible window
pub(crate) fn screen_run(info: &BufferInfo, mode: EraseMode) -> FillRun {
    let cursor = info.cursor;
    let window = info.window;
    let top_left = Coord::new(0, window.top);
    let columns = info.columns();
    match mode {
        EraseMode::All => FillRun {
            origin: top_left,
            count: (i32::from(window.height()) + 1) * columns,
        },
        EraseMode::ToBeginning => FillRun {
            origin: top_left,
            count: (i32::from(cursor.y) - i32::from(window.top)) * columns
                + i32::from(cursor.x),
        },
        EraseMode::ToEnd => FillRun {
            origin: cursor,
            count: (i32::from(window.bottom) - i32::from(cursor.y)) * columns + columns
                - i32::from(cursor.x),
        },
    }
}

impl<B: ConsoleBuffer> AnsiTranslator<B> {
    /// CSI K
    pub fn erase_line(&mut self, mode: EraseMode) -> ConsoleResult<()> {
        let info = self.console.buffer_info()?;
        let run = line_run(&info, mode);
        trace!(?mode, ?run, "erase line");
        self.fill_run(run)
    }

    /// CSI J
    pub fn erase_screen(&mut self, mode: EraseMode) -> ConsoleResult<()> {
        let info = self.console.buffer_info()?;
        let run = screen_run(&info, mode);
        trace!(?mode, ?run, "erase screen");
        self.fill_run(run)
    }

    fn fill_run(&mut self, run: FillRun) -> ConsoleResult<()> {
        let Ok(count) = u32::try_from(run.count) else {
            return Ok(());
        };
        if count == 0 {
            return Ok(());
        }
        self.console
            .fill_attributes(self.original, count, run.origin)?;
        self.console.fill_chars(self.fill_char, count, run.origin)?;
        Ok(())
    }
}
