//! Decoded ANSI commands
//!
//! The parser hands the translator already-decoded commands with integer
//! parameters. [`Command`] is the value form of those calls, so a command
//! stream can be queued, logged, serialized, or replayed.

use serde::{Deserialize, Serialize};

/// SGR codes understood by [`AnsiTranslator::set_attribute`](super::AnsiTranslator::set_attribute)
pub mod sgr {
    pub const RESET: u16 = 0;
    pub const BOLD: u16 = 1;
    pub const UNDERLINE: u16 = 4;
    pub const NEGATIVE_ON: u16 = 7;
    pub const NORMAL: u16 = 22;
    pub const UNDERLINE_OFF: u16 = 24;
    pub const NEGATIVE_OFF: u16 = 27;
    pub const FOREGROUND_BASE: u16 = 30;
    pub const DEFAULT_FOREGROUND: u16 = 39;
    pub const BACKGROUND_BASE: u16 = 40;
    pub const DEFAULT_BACKGROUND: u16 = 49;
    pub const BRIGHT_FOREGROUND_BASE: u16 = 90;
    pub const BRIGHT_BACKGROUND_BASE: u16 = 100;
}

/// Extent of an erase-in-line or erase-in-display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraseMode {
    /// From the cursor to the end (parameter 0)
    ToEnd,
    /// From the start up to the cursor (parameter 1)
    ToBeginning,
    /// Everything (parameter 2)
    All,
}

impl EraseMode {
    /// Map the CSI `J`/`K` parameter; anything else is not an erase mode
    pub fn from_param(param: u16) -> Option<Self> {
        match param {
            0 => Some(EraseMode::ToEnd),
            1 => Some(EraseMode::ToBeginning),
            2 => Some(EraseMode::All),
            _ => None,
        }
    }
}

/// A decoded command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// SGR attribute code (bold, underline, negative, bright colors, ...)
    SetAttribute { code: u16 },
    /// SGR 30-37
    SetForeground { color: u8 },
    /// SGR 40-47
    SetBackground { color: u8 },
    /// SGR 39
    DefaultForeground,
    /// SGR 49
    DefaultBackground,
    /// SGR 0
    ResetAttributes,
    /// CSI s / ESC 7
    SaveCursor,
    /// CSI u / ESC 8
    RestoreCursor,
    /// CSI A
    CursorUp { count: u16 },
    /// CSI B
    CursorDown { count: u16 },
    /// CSI D
    CursorLeft { count: u16 },
    /// CSI C
    CursorRight { count: u16 },
    /// CSI F
    CursorUpLine { count: u16 },
    /// CSI E
    CursorDownLine { count: u16 },
    /// CSI G, 1-based
    CursorToColumn { col: u16 },
    /// CSI d, 1-based
    CursorToRow { row: u16 },
    /// CSI H, 1-based
    CursorTo { row: u16, col: u16 },
    /// CSI K
    EraseLine { mode: EraseMode },
    /// CSI J
    EraseScreen { mode: EraseMode },
    /// CSI S
    ScrollUp { count: u16 },
    /// CSI T
    ScrollDown { count: u16 },
}

impl Command {
    /// Map one SGR parameter onto a command.
    ///
    /// Base colors and their defaults get dedicated commands; every other
    /// code is passed through as [`Command::SetAttribute`] and left for the
    /// translator to accept or ignore.
    pub fn from_sgr(code: u16) -> Command {
        match code {
            sgr::RESET => Command::ResetAttributes,
            30..=37 => Command::SetForeground {
                color: (code - sgr::FOREGROUND_BASE) as u8,
            },
            sgr::DEFAULT_FOREGROUND => Command::DefaultForeground,
            40..=47 => Command::SetBackground {
                color: (code - sgr::BACKGROUND_BASE) as u8,
            },
            sgr::DEFAULT_BACKGROUND => Command::DefaultBackground,
            code => Command::SetAttribute { code },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_mode_from_param() {
        assert_eq!(EraseMode::from_param(0), Some(EraseMode::ToEnd));
        assert_eq!(EraseMode::from_param(1), Some(EraseMode::ToBeginning));
        assert_eq!(EraseMode::from_param(2), Some(EraseMode::All));
        assert_eq!(EraseMode::from_param(3), None);
    }

    #[test]
    fn test_from_sgr() {
        assert_eq!(Command::from_sgr(0), Command::ResetAttributes);
        assert_eq!(Command::from_sgr(31), Command::SetForeground { color: 1 });
        assert_eq!(Command::from_sgr(39), Command::DefaultForeground);
        assert_eq!(Command::from_sgr(47), Command::SetBackground { color: 7 });
        assert_eq!(Command::from_sgr(49), Command::DefaultBackground);
        assert_eq!(Command::from_sgr(1), Command::SetAttribute { code: 1 });
        assert_eq!(Command::from_sgr(94), Command::SetAttribute { code: 94 });
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::CursorTo { row: 3, col: 7 };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"op":"cursor_to","row":3,"col":7}"#);

        let restored: Command = serde_json::from_str(r#"{"op":"erase_line","mode":"all"}"#).unwrap();
        assert_eq!(restored, Command::EraseLine { mode: EraseMode::All });

        let restored: Command = serde_json::from_str(r#"{"op":"save_cursor"}"#).unwrap();
        assert_eq!(restored, Command::SaveCursor);
    }
}
