//! ANSI Translator
//!
//! Applies decoded ANSI commands to a console that only understands
//! attribute words, cursor positions and cell fills. Each handler fetches a
//! fresh [`BufferInfo`], computes the new cursor, attribute word or fill run,
//! and issues the matching [`ConsoleBuffer`] primitives.
//!
//! State kept between commands is limited to what the console cannot tell
//! us: the attribute word seen at construction (the target of every
//! "default" and "reset" command), the pre-swap attribute word, whether
//! reverse video is on, and the saved cursor.
//!
//! Any provider failure aborts the command in progress and is returned to
//! the caller. Nothing is rolled back: an erase that fails halfway leaves a
//! partially erased region.

mod command;
mod erase;
mod scroll;

pub use command::{sgr, Command, EraseMode};
pub use scroll::{scroll_geometry, ScrollGeometry};

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::console::{ConsoleBuffer, ConsoleError, ConsoleResult, StreamId};
use crate::core::{saturate, Attributes, BufferInfo, Coord};

/// Translator from decoded ANSI commands to console buffer operations
pub struct AnsiTranslator<B: ConsoleBuffer> {
    console: B,
    /// Attributes the console had when the translator was created
    original: Attributes,
    /// Last committed attributes, before the negative swap
    current: Attributes,
    /// Reverse video
    negative: bool,
    saved_cursor: Option<Coord>,
    fill_char: char,
    underline_as_intensity: bool,
    closed: bool,
}

impl<B: ConsoleBuffer> AnsiTranslator<B> {
    /// Wrap an open console, capturing its current attributes as the
    /// defaults
    pub fn new(console: B) -> ConsoleResult<Self> {
        Self::with_config(console, &Config::default())
    }

    /// Wrap an open console with explicit settings.
    ///
    /// The fill character must be a single UTF-16 unit, since console cells
    /// hold one unit each.
    pub fn with_config(mut console: B, config: &Config) -> ConsoleResult<Self> {
        let setup = if config.fill_char.len_utf16() == 1 {
            console.buffer_info()
        } else {
            Err(ConsoleError::UnsupportedFillChar(config.fill_char))
        };
        let info = match setup {
            Ok(info) => info,
            Err(e) => {
                if let Err(close_err) = console.close() {
                    warn!(error = %close_err, "failed to release console after setup error");
                }
                return Err(e);
            }
        };
        debug!(
            attributes = %format_args!("{:#06x}", info.attributes.bits()),
            size = ?info.size,
            window = ?info.window,
            "captured original console state"
        );
        Ok(Self {
            console,
            original: info.attributes,
            current: info.attributes,
            negative: false,
            saved_cursor: None,
            fill_char: config.fill_char,
            underline_as_intensity: config.underline_as_intensity,
            closed: false,
        })
    }

    /// Open the console attached to file descriptor 1 (stdout) or 2
    /// (stderr)
    pub fn open(fd: i32) -> ConsoleResult<Self> {
        let stream = StreamId::try_from(fd)?;
        let config = Config {
            stream,
            ..Config::default()
        };
        Self::open_with_config(&config)
    }

    /// Open the console named by `config.stream`
    pub fn open_with_config(config: &Config) -> ConsoleResult<Self> {
        let console = B::open(config.stream)?;
        debug!(stream = %config.stream, "opened console");
        Self::with_config(console, config)
    }

    /// Release the console handle
    pub fn close(mut self) -> ConsoleResult<()> {
        self.closed = true;
        debug!("closing console");
        self.console.close()
    }

    pub fn console(&self) -> &B {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut B {
        &mut self.console
    }

    /// Attributes captured at construction
    pub fn original_attributes(&self) -> Attributes {
        self.original
    }

    /// Current attributes, before the negative swap
    pub fn attributes(&self) -> Attributes {
        self.current
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn saved_cursor(&self) -> Option<Coord> {
        self.saved_cursor
    }

    /// Apply one decoded command
    pub fn apply(&mut self, command: Command) -> ConsoleResult<()> {
        trace!(?command, "apply");
        match command {
            Command::SetAttribute { code } => self.set_attribute(code),
            Command::SetForeground { color } => self.set_foreground(color),
            Command::SetBackground { color } => self.set_background(color),
            Command::DefaultForeground => self.default_foreground(),
            Command::DefaultBackground => self.default_background(),
            Command::ResetAttributes => self.reset_attributes(),
            Command::SaveCursor => self.save_cursor(),
            Command::RestoreCursor => self.restore_cursor(),
            Command::CursorUp { count } => self.cursor_up(count),
            Command::CursorDown { count } => self.cursor_down(count),
            Command::CursorLeft { count } => self.cursor_left(count),
            Command::CursorRight { count } => self.cursor_right(count),
            Command::CursorUpLine { count } => self.cursor_up_line(count),
            Command::CursorDownLine { count } => self.cursor_down_line(count),
            Command::CursorToColumn { col } => self.cursor_to_column(col),
            Command::CursorToRow { row } => self.cursor_to_row(row),
            Command::CursorTo { row, col } => self.cursor_to(row, col),
            Command::EraseLine { mode } => self.erase_line(mode),
            Command::EraseScreen { mode } => self.erase_screen(mode),
            Command::ScrollUp { count } => self.scroll_up(count),
            Command::ScrollDown { count } => self.scroll_down(count),
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// SGR attribute codes: bold (1), normal (22), underline (4/24),
    /// negative (7/27) and the bright colors (90-97, 100-107).
    ///
    /// Any other code is ignored.
    pub fn set_attribute(&mut self, code: u16) -> ConsoleResult<()> {
        match code {
            90..=97 => {
                let color = (code - sgr::BRIGHT_FOREGROUND_BASE) as u8;
                self.current = self.current.with_bright_foreground(color);
            }
            100..=107 => {
                let color = (code - sgr::BRIGHT_BACKGROUND_BASE) as u8;
                self.current = self.current.with_bright_background(color);
            }
            sgr::BOLD => self.current = self.current.with_foreground_intensity(true),
            sgr::NORMAL => self.current = self.current.with_foreground_intensity(false),
            sgr::UNDERLINE | sgr::UNDERLINE_OFF if !self.underline_as_intensity => {
                trace!(code, "underline emulation disabled");
                return Ok(());
            }
            sgr::UNDERLINE => self.current = self.current.with_background_intensity(true),
            sgr::UNDERLINE_OFF => self.current = self.current.with_background_intensity(false),
            sgr::NEGATIVE_ON => self.negative = true,
            sgr::NEGATIVE_OFF => self.negative = false,
            _ => {
                trace!(code, "ignoring unsupported attribute");
                return Ok(());
            }
        }
        self.apply_attributes()
    }

    /// SGR 30-37
    pub fn set_foreground(&mut self, color: u8) -> ConsoleResult<()> {
        self.current = self.current.with_ansi_foreground(color);
        self.apply_attributes()
    }

    /// SGR 40-47
    pub fn set_background(&mut self, color: u8) -> ConsoleResult<()> {
        self.current = self.current.with_ansi_background(color);
        self.apply_attributes()
    }

    /// SGR 39
    pub fn default_foreground(&mut self) -> ConsoleResult<()> {
        self.current = self.current.with_foreground_of(self.original);
        self.apply_attributes()
    }

    /// SGR 49
    pub fn default_background(&mut self) -> ConsoleResult<()> {
        self.current = self.current.with_background_of(self.original);
        self.apply_attributes()
    }

    /// SGR 0: both colors and intensities back to the originals, reverse
    /// video off
    pub fn reset_attributes(&mut self) -> ConsoleResult<()> {
        self.current = self.current.with_colors_of(self.original);
        self.negative = false;
        self.apply_attributes()
    }

    fn apply_attributes(&mut self) -> ConsoleResult<()> {
        let word = self.current.with_negative(self.negative);
        trace!(
            attributes = %format_args!("{:#06x}", word.bits()),
            negative = self.negative,
            "set attributes"
        );
        self.console.set_attributes(word)
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    pub fn save_cursor(&mut self) -> ConsoleResult<()> {
        let info = self.console.buffer_info()?;
        trace!(cursor = ?info.cursor, "save cursor");
        self.saved_cursor = Some(info.cursor);
        Ok(())
    }

    /// Return to the saved cursor. Does nothing if no cursor was saved.
    pub fn restore_cursor(&mut self) -> ConsoleResult<()> {
        let Some(saved) = self.saved_cursor else {
            trace!("restore cursor without save");
            return Ok(());
        };
        self.move_cursor(|_| saved)
    }

    /// CSI A: stops at the top of the window
    pub fn cursor_up(&mut self, count: u16) -> ConsoleResult<()> {
        self.move_cursor(|info| Coord {
            x: info.cursor.x,
            y: line_up(info, count),
        })
    }

    /// CSI B: stops at the bottom of the buffer
    pub fn cursor_down(&mut self, count: u16) -> ConsoleResult<()> {
        self.move_cursor(|info| {
            let y = (i32::from(info.cursor.y) + i32::from(count)).min(i32::from(info.size.y) - 1);
            Coord {
                x: info.cursor.x,
                y: saturate(y),
            }
        })
    }

    /// CSI D: stops at column 0
    pub fn cursor_left(&mut self, count: u16) -> ConsoleResult<()> {
        self.move_cursor(|info| Coord {
            x: saturate((i32::from(info.cursor.x) - i32::from(count)).max(0)),
            y: info.cursor.y,
        })
    }

    /// CSI C: stops at the right edge of the window
    pub fn cursor_right(&mut self, count: u16) -> ConsoleResult<()> {
        self.move_cursor(|info| {
            let x = (i32::from(info.cursor.x) + i32::from(count)).min(last_column(info));
            Coord {
                x: saturate(x),
                y: info.cursor.y,
            }
        })
    }

    /// CSI F: up, then to column 0
    pub fn cursor_up_line(&mut self, count: u16) -> ConsoleResult<()> {
        self.move_cursor(|info| Coord {
            x: 0,
            y: line_up(info, count),
        })
    }

    /// CSI E: down, then to column 0
    pub fn cursor_down_line(&mut self, count: u16) -> ConsoleResult<()> {
        self.move_cursor(|info| {
            let y = (i32::from(info.cursor.y) + i32::from(count)).max(i32::from(info.window.top));
            Coord { x: 0, y: saturate(y) }
        })
    }

    /// CSI G, 1-based column
    pub fn cursor_to_column(&mut self, col: u16) -> ConsoleResult<()> {
        self.move_cursor(|info| Coord {
            x: absolute_column(info, col),
            y: info.cursor.y,
        })
    }

    /// CSI d, 1-based row counted from the top of the window
    pub fn cursor_to_row(&mut self, row: u16) -> ConsoleResult<()> {
        self.move_cursor(|info| Coord {
            x: info.cursor.x,
            y: absolute_row(info, row),
        })
    }

    /// CSI H, 1-based row and column; the row is counted from the top of
    /// the window
    pub fn cursor_to(&mut self, row: u16, col: u16) -> ConsoleResult<()> {
        self.move_cursor(|info| Coord {
            x: absolute_column(info, col),
            y: absolute_row(info, row),
        })
    }

    fn move_cursor(&mut self, target: impl FnOnce(&BufferInfo) -> Coord) -> ConsoleResult<()> {
        let info = self.console.buffer_info()?;
        let pos = info.clamp(target(&info));
        trace!(from = ?info.cursor, to = ?pos, "set cursor");
        self.console.set_cursor(pos)
    }
}

impl<B: ConsoleBuffer> Drop for AnsiTranslator<B> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.console.close() {
            warn!(error = %e, "failed to release console on drop");
        }
    }
}

fn line_up(info: &BufferInfo, count: u16) -> i16 {
    let y = (i32::from(info.cursor.y) - i32::from(count)).max(i32::from(info.window.top));
    saturate(y)
}

/// Rightmost column the cursor may reach inside the window
fn last_column(info: &BufferInfo) -> i32 {
    i32::from(info.window.width())
}

fn absolute_column(info: &BufferInfo, col: u16) -> i16 {
    let x = (i32::from(col) - 1).min(last_column(info)).max(0);
    saturate(x)
}

fn absolute_row(info: &BufferInfo, row: u16) -> i16 {
    let top = i32::from(info.window.top);
    let y = (top + i32::from(row) - 1)
        .min(i32::from(info.size.y) - 1)
        .max(top);
    saturate(y)
}
