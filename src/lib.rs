//! Mochi Console Host Library
//!
//! Replays ANSI terminal commands on consoles that render escape bytes
//! literally. Decoded commands (cursor motion, erase, colors, scroll,
//! save/restore cursor) are re-expressed as explicit attribute writes,
//! cursor moves and cell fills on an attribute-based screen buffer.
//!
//! - `core`: attribute word codec, coordinates, buffer snapshots
//! - `console`: the console provider trait and its backends
//! - `translator`: the command handlers
//! - `config`: translator settings
//!
//! ```
//! use mochi_conhost::console::MemoryConsole;
//! use mochi_conhost::translator::{AnsiTranslator, Command, EraseMode};
//!
//! let mut translator = AnsiTranslator::new(MemoryConsole::default()).unwrap();
//! translator.apply(Command::from_sgr(31)).unwrap();
//! translator.apply(Command::EraseScreen { mode: EraseMode::All }).unwrap();
//! translator.apply(Command::CursorTo { row: 1, col: 1 }).unwrap();
//! ```

pub mod config;
pub mod console;
pub mod core;
pub mod translator;

pub use config::Config;
pub use console::{ConsoleBuffer, ConsoleError, ConsoleResult, MemoryConsole, StreamId};
pub use translator::{AnsiTranslator, Command, EraseMode};
