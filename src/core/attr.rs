//! Console Attribute Word
//!
//! Native console buffers store one 16-bit attribute word per cell. The low
//! nibble is the foreground color, the next nibble is the background color,
//! and the top bit of each nibble is that color's intensity. Bits 8-15 carry
//! provider-specific flags (grid lines, DBCS markers) that this codec never
//! interprets.
//!
//! ANSI orders its eight base colors differently from the console (ANSI red
//! is 1, console red is 4), so every ANSI index goes through a lookup table.

use serde::{Deserialize, Serialize};

pub const FOREGROUND_BLUE: u16 = 0x0001;
pub const FOREGROUND_GREEN: u16 = 0x0002;
pub const FOREGROUND_RED: u16 = 0x0004;
pub const FOREGROUND_INTENSITY: u16 = 0x0008;
pub const BACKGROUND_BLUE: u16 = 0x0010;
pub const BACKGROUND_GREEN: u16 = 0x0020;
pub const BACKGROUND_RED: u16 = 0x0040;
pub const BACKGROUND_INTENSITY: u16 = 0x0080;

/// Foreground sub-field, intensity included
pub const FOREGROUND_MASK: u16 = 0x000F;
/// Background sub-field, intensity included
pub const BACKGROUND_MASK: u16 = 0x00F0;
/// Bits the codec leaves untouched
pub const FLAGS_MASK: u16 = 0xFF00;

/// ANSI color index (0-7) to the console's 3-bit color value.
///
/// Order: black, red, green, yellow, blue, magenta, cyan, white (grey).
const ANSI_TO_CONSOLE: [u16; 8] = [
    0,                                                   // black
    FOREGROUND_RED,                                      // red
    FOREGROUND_GREEN,                                    // green
    FOREGROUND_RED | FOREGROUND_GREEN,                   // yellow
    FOREGROUND_BLUE,                                     // blue
    FOREGROUND_RED | FOREGROUND_BLUE,                    // magenta
    FOREGROUND_GREEN | FOREGROUND_BLUE,                  // cyan
    FOREGROUND_RED | FOREGROUND_GREEN | FOREGROUND_BLUE, // grey
];

/// Console foreground bits for an ANSI color index.
///
/// Only the low three bits of `index` are used.
pub fn foreground(index: u8) -> u16 {
    ANSI_TO_CONSOLE[usize::from(index & 0x07)]
}

/// Console background bits for an ANSI color index.
///
/// Only the low three bits of `index` are used.
pub fn background(index: u8) -> u16 {
    foreground(index) << 4
}

/// Inverse of the lookup table: console 3-bit color value to ANSI index.
pub fn console_to_ansi(bits: u16) -> u8 {
    let bits = bits & 0x07;
    ANSI_TO_CONSOLE
        .iter()
        .position(|&entry| entry == bits)
        .map_or(0, |i| i as u8)
}

/// A packed console attribute word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(u16);

impl Attributes {
    /// Grey on black, the console's stock default
    pub const DEFAULT: Attributes = Attributes(FOREGROUND_RED | FOREGROUND_GREEN | FOREGROUND_BLUE);

    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Foreground nibble (0-15), intensity in bit 3
    pub const fn foreground(self) -> u8 {
        (self.0 & FOREGROUND_MASK) as u8
    }

    /// Background nibble (0-15), intensity in bit 3
    pub const fn background(self) -> u8 {
        ((self.0 & BACKGROUND_MASK) >> 4) as u8
    }

    /// Replace the whole foreground nibble
    pub const fn with_foreground(self, nibble: u8) -> Self {
        Self((self.0 & !FOREGROUND_MASK) | (nibble as u16 & 0x0F))
    }

    /// Replace the whole background nibble
    pub const fn with_background(self, nibble: u8) -> Self {
        Self((self.0 & !BACKGROUND_MASK) | ((nibble as u16 & 0x0F) << 4))
    }

    /// Set the foreground to an ANSI base color, clearing its intensity
    pub fn with_ansi_foreground(self, index: u8) -> Self {
        Self((self.0 & !FOREGROUND_MASK) | foreground(index))
    }

    /// Set the background to an ANSI base color, clearing its intensity
    pub fn with_ansi_background(self, index: u8) -> Self {
        Self((self.0 & !BACKGROUND_MASK) | background(index))
    }

    /// Set the foreground to a bright ANSI color (SGR 90-97)
    pub fn with_bright_foreground(self, index: u8) -> Self {
        self.with_ansi_foreground(index).with_foreground_intensity(true)
    }

    /// Set the background to a bright ANSI color (SGR 100-107)
    pub fn with_bright_background(self, index: u8) -> Self {
        self.with_ansi_background(index).with_background_intensity(true)
    }

    pub const fn foreground_intensity(self) -> bool {
        self.0 & FOREGROUND_INTENSITY != 0
    }

    pub const fn background_intensity(self) -> bool {
        self.0 & BACKGROUND_INTENSITY != 0
    }

    pub const fn with_foreground_intensity(self, on: bool) -> Self {
        if on {
            Self(self.0 | FOREGROUND_INTENSITY)
        } else {
            Self(self.0 & !FOREGROUND_INTENSITY)
        }
    }

    /// The console has no underline; background intensity stands in for it
    pub const fn with_background_intensity(self, on: bool) -> Self {
        if on {
            Self(self.0 | BACKGROUND_INTENSITY)
        } else {
            Self(self.0 & !BACKGROUND_INTENSITY)
        }
    }

    /// Take the foreground nibble from `other`, keep everything else
    pub const fn with_foreground_of(self, other: Attributes) -> Self {
        Self((self.0 & !FOREGROUND_MASK) | (other.0 & FOREGROUND_MASK))
    }

    /// Take the background nibble from `other`, keep everything else
    pub const fn with_background_of(self, other: Attributes) -> Self {
        Self((self.0 & !BACKGROUND_MASK) | (other.0 & BACKGROUND_MASK))
    }

    /// Take both color nibbles from `other`, keep the flag byte
    pub const fn with_colors_of(self, other: Attributes) -> Self {
        Self((self.0 & FLAGS_MASK) | (other.0 & !FLAGS_MASK))
    }

    /// Swap the foreground and background nibbles when `negative` is set.
    ///
    /// Applying it twice gives back the original word.
    pub const fn with_negative(self, negative: bool) -> Self {
        if !negative {
            return self;
        }
        let fg = (self.0 & FOREGROUND_MASK) << 4;
        let bg = (self.0 & BACKGROUND_MASK) >> 4;
        Self((self.0 & FLAGS_MASK) | fg | bg)
    }
}

impl From<u16> for Attributes {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

impl From<Attributes> for u16 {
    fn from(attr: Attributes) -> Self {
        attr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_color_table() {
        assert_eq!(foreground(0), 0);
        assert_eq!(foreground(1), FOREGROUND_RED);
        assert_eq!(foreground(3), FOREGROUND_RED | FOREGROUND_GREEN);
        assert_eq!(foreground(4), FOREGROUND_BLUE);
        assert_eq!(foreground(7), 0x0007);
        assert_eq!(background(1), BACKGROUND_RED);
        assert_eq!(background(6), BACKGROUND_GREEN | BACKGROUND_BLUE);
        assert_eq!(background(7), 0x0070);
    }

    #[test]
    fn test_color_fields_disjoint() {
        for i in 0..8u8 {
            let fg = foreground(i);
            let bg = background(i);
            assert_eq!(fg & !FOREGROUND_MASK, 0);
            assert_eq!(bg & !BACKGROUND_MASK, 0);
            assert_eq!(fg & bg, 0);
            assert_eq!(fg & FOREGROUND_INTENSITY, 0);
            assert_eq!(bg & BACKGROUND_INTENSITY, 0);
        }
    }

    #[test]
    fn test_color_table_is_bijective() {
        for i in 0..8u8 {
            let attr = Attributes::new(0).with_ansi_foreground(i).with_ansi_background(7 - i);
            assert_eq!(console_to_ansi(u16::from(attr.foreground())), i);
            assert_eq!(console_to_ansi(u16::from(attr.background())), 7 - i);
        }
    }

    #[test]
    fn test_set_color_keeps_other_nibble_and_flags() {
        let attr = Attributes::new(0xAB5C);
        let fg = attr.with_ansi_foreground(2);
        assert_eq!(fg.bits(), 0xAB52);
        let bg = attr.with_ansi_background(4);
        assert_eq!(bg.bits(), 0xAB1C);
    }

    #[test]
    fn test_bright_colors_set_intensity() {
        let attr = Attributes::DEFAULT.with_bright_foreground(1);
        assert_eq!(attr.foreground(), 0x0C);
        assert!(attr.foreground_intensity());
        assert!(!attr.background_intensity());

        let attr = Attributes::DEFAULT.with_bright_background(4);
        assert_eq!(attr.background(), 0x09);
        assert!(attr.background_intensity());
        assert_eq!(attr.foreground(), 0x07);
    }

    #[test]
    fn test_normal_intensity_clears_one_bit() {
        let bold = Attributes::new(0x001E).with_foreground_intensity(true);
        let normal = bold.with_foreground_intensity(false);
        assert_eq!(normal.bits(), 0x0016);
    }

    #[test]
    fn test_negative_swaps_nibbles() {
        let attr = Attributes::new(0x1234);
        assert_eq!(attr.with_negative(true).bits(), 0x1243);
        assert_eq!(attr.with_negative(false), attr);

        // Intensity travels with its color
        let attr = Attributes::new(0x001C);
        assert_eq!(attr.with_negative(true).bits(), 0x00C1);
    }

    #[test]
    fn test_restore_from_original() {
        let original = Attributes::new(0x0017);
        let current = Attributes::new(0x80CE);
        assert_eq!(current.with_foreground_of(original).bits(), 0x80C7);
        assert_eq!(current.with_background_of(original).bits(), 0x801E);
        assert_eq!(current.with_colors_of(original).bits(), 0x8017);
    }

    proptest! {
        #[test]
        fn prop_negative_is_involution(bits in any::<u16>()) {
            let attr = Attributes::new(bits);
            prop_assert_eq!(attr.with_negative(true).with_negative(true), attr);
        }

        #[test]
        fn prop_negative_preserves_flags(bits in any::<u16>()) {
            let swapped = Attributes::new(bits).with_negative(true);
            prop_assert_eq!(swapped.bits() & FLAGS_MASK, bits & FLAGS_MASK);
        }

        #[test]
        fn prop_bright_foreground(bits in any::<u16>(), index in 0u8..8) {
            let attr = Attributes::new(bits).with_bright_foreground(index);
            prop_assert!(attr.foreground_intensity());
            prop_assert_eq!(u16::from(attr.foreground()) & 0x07, foreground(index));
            prop_assert_eq!(attr.bits() & !FOREGROUND_MASK, bits & !FOREGROUND_MASK);
        }

        #[test]
        fn prop_intensity_toggle_keeps_colors(bits in any::<u16>()) {
            let attr = Attributes::new(bits);
            let cleared = attr.with_foreground_intensity(false);
            prop_assert_eq!(cleared.bits(), bits & !FOREGROUND_INTENSITY);
            prop_assert_eq!(cleared.foreground() & 0x07, attr.foreground() & 0x07);
            prop_assert_eq!(cleared.background(), attr.background());
        }
    }
}
