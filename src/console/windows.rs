//! Win32 console backend
//!
//! Thin wrapper over the native console screen buffer API. Each call maps
//! one-to-one onto a Win32 function; a zero `BOOL` becomes
//! [`ConsoleError::Io`] carrying the thread's last OS error.

use std::io;
use std::ptr;

use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Console::{
    FillConsoleOutputAttribute, FillConsoleOutputCharacterW, GetConsoleScreenBufferInfo,
    GetStdHandle, ScrollConsoleScreenBufferW, SetConsoleCursorPosition, SetConsoleTextAttribute,
    CHAR_INFO, CHAR_INFO_0, CONSOLE_SCREEN_BUFFER_INFO, COORD, SMALL_RECT, STD_ERROR_HANDLE,
    STD_OUTPUT_HANDLE,
};

use super::{ConsoleBuffer, ConsoleError, ConsoleResult, StreamId};
use crate::core::{Attributes, BufferInfo, Coord, Rect};

/// Console screen buffer attached to a standard stream
#[derive(Debug)]
pub struct WindowsConsole {
    handle: HANDLE,
    stream: StreamId,
}

fn check(op: &'static str, ok: i32) -> ConsoleResult<()> {
    if ok == 0 {
        Err(ConsoleError::io(op, io::Error::last_os_error()))
    } else {
        Ok(())
    }
}

fn to_coord(pos: Coord) -> COORD {
    COORD { X: pos.x, Y: pos.y }
}

fn to_small_rect(rect: Rect) -> SMALL_RECT {
    SMALL_RECT {
        Left: rect.left,
        Top: rect.top,
        Right: rect.right,
        Bottom: rect.bottom,
    }
}

impl WindowsConsole {
    pub fn stream(&self) -> StreamId {
        self.stream
    }

    fn ensure_open(&self, op: &'static str) -> ConsoleResult<()> {
        if self.handle.is_null() {
            return Err(ConsoleError::io(
                op,
                io::Error::new(io::ErrorKind::NotConnected, "console handle is closed"),
            ));
        }
        Ok(())
    }
}

impl ConsoleBuffer for WindowsConsole {
    fn open(stream: StreamId) -> ConsoleResult<Self> {
        let std_handle = match stream {
            StreamId::Stdout => STD_OUTPUT_HANDLE,
            StreamId::Stderr => STD_ERROR_HANDLE,
        };
        // SAFETY: GetStdHandle has no preconditions.
        let handle = unsafe { GetStdHandle(std_handle) };
        if handle == INVALID_HANDLE_VALUE || handle.is_null() {
            return Err(ConsoleError::Unavailable(stream));
        }
        tracing::debug!(%stream, "acquired console handle");
        Ok(Self { handle, stream })
    }

    fn buffer_info(&mut self) -> ConsoleResult<BufferInfo> {
        self.ensure_open("buffer info")?;
        // SAFETY: CONSOLE_SCREEN_BUFFER_INFO is plain data; all-zero is valid.
        let mut raw: CONSOLE_SCREEN_BUFFER_INFO = unsafe { std::mem::zeroed() };
        // SAFETY: handle is a live console handle and `raw` outlives the call.
        check("buffer info", unsafe {
            GetConsoleScreenBufferInfo(self.handle, &mut raw)
        })?;
        Ok(BufferInfo {
            cursor: Coord::new(raw.dwCursorPosition.X, raw.dwCursorPosition.Y),
            size: Coord::new(raw.dwSize.X, raw.dwSize.Y),
            window: Rect::new(
                raw.srWindow.Left,
                raw.srWindow.Top,
                raw.srWindow.Right,
                raw.srWindow.Bottom,
            ),
            attributes: Attributes::new(raw.wAttributes),
        })
    }

    fn set_cursor(&mut self, pos: Coord) -> ConsoleResult<()> {
        self.ensure_open("set cursor")?;
        // SAFETY: handle is a live console handle.
        check("set cursor", unsafe {
            SetConsoleCursorPosition(self.handle, to_coord(pos))
        })
    }

    fn set_attributes(&mut self, attributes: Attributes) -> ConsoleResult<()> {
        self.ensure_open("set attributes")?;
        // SAFETY: handle is a live console handle.
        check("set attributes", unsafe {
            SetConsoleTextAttribute(self.handle, attributes.bits())
        })
    }

    fn fill_attributes(
        &mut self,
        attributes: Attributes,
        count: u32,
        origin: Coord,
    ) -> ConsoleResult<u32> {
        self.ensure_open("fill attributes")?;
        let mut written = 0u32;
        // SAFETY: handle is a live console handle and `written` outlives the call.
        check("fill attributes", unsafe {
            FillConsoleOutputAttribute(
                self.handle,
                attributes.bits(),
                count,
                to_coord(origin),
                &mut written,
            )
        })?;
        Ok(written)
    }

    fn fill_chars(&mut self, ch: char, count: u32, origin: Coord) -> ConsoleResult<u32> {
        self.ensure_open("fill characters")?;
        let mut units = [0u16; 2];
        let unit = ch.encode_utf16(&mut units)[0];
        let mut written = 0u32;
        // SAFETY: handle is a live console handle and `written` outlives the call.
        check("fill characters", unsafe {
            FillConsoleOutputCharacterW(self.handle, unit, count, to_coord(origin), &mut written)
        })?;
        Ok(written)
    }

    fn scroll_region(
        &mut self,
        source: Rect,
        clip: Option<Rect>,
        dest: Coord,
        fill: Attributes,
    ) -> ConsoleResult<()> {
        self.ensure_open("scroll region")?;
        let source = to_small_rect(source);
        let clip = clip.map(to_small_rect);
        let clip_ptr = clip.as_ref().map_or(ptr::null(), |rect| rect as *const SMALL_RECT);
        let fill = CHAR_INFO {
            Char: CHAR_INFO_0 {
                UnicodeChar: u16::from(b' '),
            },
            Attributes: fill.bits(),
        };
        // SAFETY: every pointer refers to a local that outlives the call.
        check("scroll region", unsafe {
            ScrollConsoleScreenBufferW(self.handle, &source, clip_ptr, to_coord(dest), &fill)
        })
    }

    fn close(&mut self) -> ConsoleResult<()> {
        self.ensure_open("close")?;
        let handle = std::mem::replace(&mut self.handle, ptr::null_mut());
        tracing::debug!(stream = %self.stream, "releasing console handle");
        // SAFETY: handle came from GetStdHandle and is released exactly once.
        check("close", unsafe { CloseHandle(handle) })
    }
}
