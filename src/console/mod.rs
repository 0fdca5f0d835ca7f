//! Console screen buffer providers
//!
//! The translator never touches a console directly. Everything goes through
//! [`ConsoleBuffer`], which exposes the handful of primitives a native
//! attribute-based console offers: query geometry, move the cursor, set the
//! text attribute, fill a run of cells, scroll a rectangle.
//!
//! Two providers ship with the crate: [`MemoryConsole`], a deterministic
//! in-memory grid used by the tests and the replay tool, and (on Windows)
//! `WindowsConsole` over the Win32 console API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Attributes, BufferInfo, Coord, Rect};

mod memory;
#[cfg(windows)]
mod windows;

pub use memory::{Cell, ConsoleCall, ConsoleOp, MemoryConsole, ScreenDump};
#[cfg(windows)]
pub use windows::WindowsConsole;

/// Error type for console operations
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Invalid console stream: file descriptor {0}")]
    InvalidStream(i32),

    #[error("Console handle for {0} is unavailable")]
    Unavailable(StreamId),

    #[error("Fill character {0:?} does not fit in one console cell")]
    UnsupportedFillChar(char),

    #[error("Console {op} failed: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ConsoleError {
    pub fn io(op: &'static str, source: std::io::Error) -> Self {
        ConsoleError::Io { op, source }
    }
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Which standard stream a console is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamId {
    /// Primary output (file descriptor 1)
    #[default]
    Stdout,
    /// Error output (file descriptor 2)
    Stderr,
}

impl StreamId {
    pub fn fd(self) -> i32 {
        match self {
            StreamId::Stdout => 1,
            StreamId::Stderr => 2,
        }
    }
}

impl TryFrom<i32> for StreamId {
    type Error = ConsoleError;

    fn try_from(fd: i32) -> ConsoleResult<Self> {
        match fd {
            1 => Ok(StreamId::Stdout),
            2 => Ok(StreamId::Stderr),
            other => Err(ConsoleError::InvalidStream(other)),
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamId::Stdout => f.write_str("stdout"),
            StreamId::Stderr => f.write_str("stderr"),
        }
    }
}

/// A console screen buffer that stores one character and one attribute
/// word per cell.
///
/// Every call may fail; callers treat a failure as fatal for the command in
/// progress. Counts and origins are in buffer coordinates.
pub trait ConsoleBuffer {
    /// Acquire the console attached to a standard stream
    fn open(stream: StreamId) -> ConsoleResult<Self>
    where
        Self: Sized;

    /// Report cursor, size, window and current attributes
    fn buffer_info(&mut self) -> ConsoleResult<BufferInfo>;

    /// Move the cursor
    fn set_cursor(&mut self, pos: Coord) -> ConsoleResult<()>;

    /// Set the attribute word used for subsequently written text
    fn set_attributes(&mut self, attributes: Attributes) -> ConsoleResult<()>;

    /// Write `attributes` into `count` consecutive cells starting at
    /// `origin`, wrapping across rows. Returns the number of cells written.
    fn fill_attributes(
        &mut self,
        attributes: Attributes,
        count: u32,
        origin: Coord,
    ) -> ConsoleResult<u32>;

    /// Write `ch` into `count` consecutive cells starting at `origin`,
    /// wrapping across rows. Returns the number of cells written.
    fn fill_chars(&mut self, ch: char, count: u32, origin: Coord) -> ConsoleResult<u32>;

    /// Move the contents of `source` so its top-left lands on `dest`.
    ///
    /// Only cells inside `clip` (the whole buffer when `None`) change.
    /// Source cells left uncovered are filled with spaces in `fill`.
    fn scroll_region(
        &mut self,
        source: Rect,
        clip: Option<Rect>,
        dest: Coord,
        fill: Attributes,
    ) -> ConsoleResult<()>;

    /// Release the console handle
    fn close(&mut self) -> ConsoleResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_from_fd() {
        assert_eq!(StreamId::try_from(1).unwrap(), StreamId::Stdout);
        assert_eq!(StreamId::try_from(2).unwrap(), StreamId::Stderr);
        assert!(matches!(
            StreamId::try_from(0),
            Err(ConsoleError::InvalidStream(0))
        ));
        assert!(matches!(
            StreamId::try_from(3),
            Err(ConsoleError::InvalidStream(3))
        ));
    }

    #[test]
    fn test_stream_fd_roundtrip() {
        for stream in [StreamId::Stdout, StreamId::Stderr] {
            assert_eq!(StreamId::try_from(stream.fd()).unwrap(), stream);
        }
    }

    #[test]
    fn test_error_display() {
        let err = ConsoleError::io(
            "fill",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert_eq!(err.to_string(), "Console fill failed: boom");
        assert_eq!(
            ConsoleError::Unavailable(StreamId::Stderr).to_string(),
            "Console handle for stderr is unavailable"
        );
    }
}
